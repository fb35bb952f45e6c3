//! Order lifecycle service
//!
//! All post-commit mutations funnel through here: each operation loads the
//! order under its entry guard, re-validates the current status via the
//! transition table, applies side data (shipment, requests, settlement)
//! and appends the timeline entry — one lock, no lost updates.

use std::sync::Arc;

use chrono::Utc;

use super::transition::{OrderAction, next_status};
use crate::models::{
    Actor, CancelRequest, Money, Order, RefundRequest, ReturnClassification, ReturnRequest,
    ReturnResolution, Shipment, ShipmentEvent, ShipmentStatus, ShippingPayer,
};
use crate::store::{CatalogStore, OrderStore};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_reason, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Settlement terms the seller sets when approving a return
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnTerms {
    pub resolution: ReturnResolution,
    pub shipping_payer: ShippingPayer,
    #[serde(default)]
    pub restocking_fee: Money,
    pub refund_amount: Money,
}

pub struct LifecycleService {
    orders: Arc<OrderStore>,
    catalog: Arc<CatalogStore>,
}

impl LifecycleService {
    pub fn new(orders: Arc<OrderStore>, catalog: Arc<CatalogStore>) -> Self {
        Self { orders, catalog }
    }

    // ========== Buyer operations ==========

    /// Free cancellation — allowed only before fulfillment starts
    pub fn cancel_free(&self, buyer_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            ensure_buyer(o, buyer_id)?;
            apply(o, Actor::Buyer, OrderAction::CancelFree)?;
            Ok(o.clone())
        })
    }

    /// Cancel after fulfillment started: opens a request the seller resolves
    pub fn request_cancel(&self, buyer_id: &str, code: &str, reason: &str) -> AppResult<Order> {
        validate_reason(reason, "reason")?;
        self.orders.update(code, |o| {
            ensure_buyer(o, buyer_id)?;
            ensure_no_pending_request(o)?;
            let resume = o.status;
            apply(o, Actor::Buyer, OrderAction::RequestCancel)?;
            o.cancel_request = Some(CancelRequest {
                reason: reason.to_string(),
                resume_status: resume,
                requested_at: Utc::now(),
            });
            Ok(o.clone())
        })
    }

    /// Buyer confirms receipt of the parcel
    pub fn confirm_received(&self, buyer_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            ensure_buyer(o, buyer_id)?;
            apply(o, Actor::Buyer, OrderAction::ConfirmReceived)?;
            Ok(o.clone())
        })
    }

    /// Open a return (reason + classification required)
    pub fn request_return(
        &self,
        buyer_id: &str,
        code: &str,
        reason: &str,
        classification: ReturnClassification,
    ) -> AppResult<Order> {
        validate_reason(reason, "reason")?;
        self.orders.update(code, |o| {
            ensure_buyer(o, buyer_id)?;
            ensure_no_pending_request(o)?;
            let resume = o.status;
            apply(o, Actor::Buyer, OrderAction::RequestReturn)?;
            o.return_request = Some(ReturnRequest {
                reason: reason.to_string(),
                classification,
                resume_status: resume,
                requested_at: Utc::now(),
                resolution: None,
                shipping_payer: None,
                restocking_fee: None,
                refund_amount: None,
                rejection_reason: None,
            });
            Ok(o.clone())
        })
    }

    /// Open a refund-without-return
    pub fn request_refund(&self, buyer_id: &str, code: &str, reason: &str) -> AppResult<Order> {
        validate_reason(reason, "reason")?;
        self.orders.update(code, |o| {
            ensure_buyer(o, buyer_id)?;
            ensure_no_pending_request(o)?;
            let resume = o.status;
            apply(o, Actor::Buyer, OrderAction::RequestRefund)?;
            o.refund_request = Some(RefundRequest {
                reason: reason.to_string(),
                resume_status: resume,
                requested_at: Utc::now(),
            });
            Ok(o.clone())
        })
    }

    // ========== Seller operations ==========

    pub fn confirm(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.seller_transition(seller_id, code, OrderAction::Confirm)
    }

    pub fn pack(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.seller_transition(seller_id, code, OrderAction::Pack)
    }

    /// PACKING → SHIPPED, creating the shipment record
    pub fn create_shipment(
        &self,
        seller_id: &str,
        code: &str,
        carrier: &str,
        service_name: &str,
        tracking_code: Option<String>,
    ) -> AppResult<Order> {
        validate_required_text(carrier, "carrier", MAX_NAME_LEN)?;
        validate_required_text(service_name, "serviceName", MAX_NAME_LEN)?;
        validate_optional_text(&tracking_code, "trackingCode", MAX_SHORT_TEXT_LEN)?;
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, OrderAction::Ship)?;
            let now = Utc::now();
            o.shipment = Some(Shipment {
                carrier: carrier.to_string(),
                service_name: service_name.to_string(),
                tracking_code,
                status: ShipmentStatus::Shipped,
                events: vec![ShipmentEvent {
                    status: ShipmentStatus::Shipped,
                    note: None,
                    at: now,
                }],
                created_at: now,
            });
            Ok(o.clone())
        })
    }

    /// Append a shipment event; status is strictly monotonic
    pub fn update_shipment(
        &self,
        seller_id: &str,
        code: &str,
        status: ShipmentStatus,
        note: Option<String>,
    ) -> AppResult<Order> {
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            let current = o
                .shipment
                .as_ref()
                .map(|s| s.status)
                .ok_or_else(|| AppError::not_eligible("Order has no shipment yet"))?;
            if status.rank() <= current.rank() {
                return Err(AppError::not_eligible(format!(
                    "Shipment status cannot move backward ({:?} → {:?})",
                    current, status
                )));
            }
            let action = match status {
                ShipmentStatus::InTransit => OrderAction::MarkInTransit,
                ShipmentStatus::Delivered => OrderAction::MarkDelivered,
                // rank check above already rejected this arm
                ShipmentStatus::Shipped => {
                    return Err(AppError::not_eligible("Shipment is already shipped"));
                }
            };
            apply(o, Actor::Seller, action)?;
            if let Some(shipment) = o.shipment.as_mut() {
                shipment.status = status;
                shipment.events.push(ShipmentEvent {
                    status,
                    note,
                    at: Utc::now(),
                });
            }
            Ok(o.clone())
        })
    }

    pub fn approve_cancel(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.seller_transition(seller_id, code, OrderAction::ApproveCancel)
    }

    /// Reject the cancel request: the order resumes its prior status
    pub fn reject_cancel(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            let resume = o
                .cancel_request
                .as_ref()
                .map(|r| r.resume_status)
                .ok_or_else(|| AppError::not_eligible("No cancel request to reject"))?;
            apply(o, Actor::Seller, OrderAction::RejectCancel { resume })?;
            o.cancel_request = None;
            Ok(o.clone())
        })
    }

    /// Approve a return with settlement terms. `refund_amount` is capped
    /// at the order total; `restocking_fee` must not be negative.
    pub fn approve_return(
        &self,
        seller_id: &str,
        code: &str,
        terms: ReturnTerms,
    ) -> AppResult<Order> {
        if terms.restocking_fee < 0 {
            return Err(AppError::validation("restockingFee must not be negative"));
        }
        if terms.refund_amount < 0 {
            return Err(AppError::validation("refundAmount must not be negative"));
        }
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, OrderAction::ApproveReturn)?;
            let capped = terms.refund_amount.min(o.total);
            let req = o
                .return_request
                .as_mut()
                .ok_or_else(|| AppError::internal("RETURN_REQUESTED order without a request"))?;
            req.resolution = Some(terms.resolution);
            req.shipping_payer = Some(terms.shipping_payer);
            req.restocking_fee = Some(terms.restocking_fee);
            req.refund_amount = Some(capped);
            Ok(o.clone())
        })
    }

    pub fn reject_return(&self, seller_id: &str, code: &str, reason: &str) -> AppResult<Order> {
        validate_reason(reason, "reason")?;
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, OrderAction::RejectReturn)?;
            let req = o
                .return_request
                .as_mut()
                .ok_or_else(|| AppError::internal("RETURN_REQUESTED order without a request"))?;
            req.rejection_reason = Some(reason.to_string());
            Ok(o.clone())
        })
    }

    /// Seller confirms physical receipt of the returned goods, which
    /// triggers refund settlement (disbursement is an external payment
    /// collaborator; the order records the amount and lands on REFUNDED).
    pub fn return_received(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, OrderAction::ReceiveReturn)?;
            let amount = o
                .return_request
                .as_ref()
                .and_then(|r| r.refund_amount)
                .unwrap_or(o.total);
            apply(o, Actor::Seller, OrderAction::SettleRefund)?;
            o.refunded_amount = Some(amount);
            Ok(o.clone())
        })
    }

    /// Approve the refund-without-return: full order total settles back
    pub fn approve_refund(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, OrderAction::ApproveRefund)?;
            o.refunded_amount = Some(o.total);
            o.refund_request = None;
            Ok(o.clone())
        })
    }

    /// Reject the refund request: the order resumes its prior status
    pub fn reject_refund(&self, seller_id: &str, code: &str) -> AppResult<Order> {
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            let resume = o
                .refund_request
                .as_ref()
                .map(|r| r.resume_status)
                .ok_or_else(|| AppError::not_eligible("No refund request to reject"))?;
            apply(o, Actor::Seller, OrderAction::RejectRefund { resume })?;
            o.refund_request = None;
            Ok(o.clone())
        })
    }

    // ========== Internals ==========

    fn seller_transition(&self, seller_id: &str, code: &str, action: OrderAction) -> AppResult<Order> {
        self.orders.update(code, |o| {
            self.ensure_seller(o, seller_id)?;
            apply(o, Actor::Seller, action)?;
            Ok(o.clone())
        })
    }

    fn ensure_seller(&self, order: &Order, seller_id: &str) -> AppResult<()> {
        if !self.catalog.seller_owns(&order.shop_id, seller_id) {
            return Err(AppError::forbidden("Order belongs to another shop"));
        }
        Ok(())
    }
}

fn ensure_buyer(order: &Order, buyer_id: &str) -> AppResult<()> {
    if order.buyer_id != buyer_id {
        return Err(AppError::forbidden("Order belongs to another buyer"));
    }
    Ok(())
}

/// One outstanding cancel/return/refund request per order
fn ensure_no_pending_request(order: &Order) -> AppResult<()> {
    if order.has_pending_request() {
        return Err(AppError::conflict(
            "An active request is already pending for this order",
        ));
    }
    Ok(())
}

/// Run the transition table and record the timeline entry
fn apply(order: &mut Order, actor: Actor, action: OrderAction) -> AppResult<()> {
    let from = order.status;
    let to = next_status(from, actor, action)?;
    order.status = to;
    let now = Utc::now();
    order.timeline.push(crate::models::TimelineEntry {
        from,
        to,
        actor,
        at: now,
    });
    order.updated_at = now;
    tracing::debug!(order = %order.code, ?from, ?to, ?actor, "Order transition");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, OrderStatus, PaymentMethod, Shop};

    fn service_with_order(status: OrderStatus) -> (LifecycleService, String) {
        let orders = Arc::new(OrderStore::new());
        let catalog = Arc::new(CatalogStore::new());
        catalog.upsert_shop(Shop {
            id: "shop-1".into(),
            seller_id: "seller-1".into(),
            name: "测试店铺".into(),
            is_active: true,
        });
        let now = Utc::now();
        let code = "ORD-TEST00000001".to_string();
        orders.insert_order(Order {
            code: code.clone(),
            group_code: "GRP-TEST00000001".into(),
            shop_id: "shop-1".into(),
            buyer_id: "buyer-1".into(),
            items: vec![],
            subtotal: 100_000,
            shipping_fee: 15_000,
            discount: 0,
            total: 115_000,
            payment_method: PaymentMethod::Cod,
            shipping_address: Address {
                full_name: "A".into(),
                phone: "0900000000".into(),
                line1: "1 Test St".into(),
                line2: None,
                city: "HCMC".into(),
            },
            status,
            shipment: None,
            cancel_request: None,
            return_request: None,
            refund_request: None,
            refunded_amount: None,
            dispute_ids: vec![],
            timeline: vec![],
            created_at: now,
            updated_at: now,
        });
        (LifecycleService::new(orders, catalog), code)
    }

    #[test]
    fn fulfillment_path_records_the_timeline() {
        let (svc, code) = service_with_order(OrderStatus::Placed);
        svc.confirm("seller-1", &code).unwrap();
        svc.pack("seller-1", &code).unwrap();
        let o = svc
            .create_shipment("seller-1", &code, "GHN", "Express", Some("GHN123".into()))
            .unwrap();
        assert_eq!(o.status, OrderStatus::Shipped);
        assert_eq!(o.timeline.len(), 3);
        assert!(o.shipment.is_some());
    }

    #[test]
    fn shipment_updates_are_monotonic() {
        let (svc, code) = service_with_order(OrderStatus::Packing);
        svc.create_shipment("seller-1", &code, "GHN", "Express", None)
            .unwrap();
        let o = svc
            .update_shipment("seller-1", &code, ShipmentStatus::Delivered, None)
            .unwrap();
        assert_eq!(o.status, OrderStatus::Delivered);
        // 不允许回退
        let err = svc
            .update_shipment("seller-1", &code, ShipmentStatus::InTransit, None)
            .unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)));
    }

    #[test]
    fn wrong_seller_is_forbidden() {
        let (svc, code) = service_with_order(OrderStatus::Placed);
        let err = svc.confirm("seller-9", &code).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn rejected_cancel_resumes_the_prior_status() {
        let (svc, code) = service_with_order(OrderStatus::Packing);
        svc.request_cancel("buyer-1", &code, "changed my mind today")
            .unwrap();
        let o = svc.reject_cancel("seller-1", &code).unwrap();
        assert_eq!(o.status, OrderStatus::Packing);
        assert!(o.cancel_request.is_none());
    }

    #[test]
    fn duplicate_request_is_a_conflict() {
        let (svc, code) = service_with_order(OrderStatus::Confirmed);
        svc.request_cancel("buyer-1", &code, "ordered by accident, sorry")
            .unwrap();
        let err = svc
            .request_cancel("buyer-1", &code, "ordered by accident, sorry")
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn return_flow_settles_the_agreed_amount() {
        let (svc, code) = service_with_order(OrderStatus::Delivered);
        svc.request_return(
            "buyer-1",
            &code,
            "arrived with a broken zipper",
            ReturnClassification::Defective,
        )
        .unwrap();
        svc.approve_return(
            "seller-1",
            &code,
            ReturnTerms {
                resolution: ReturnResolution::SellerFault,
                shipping_payer: ShippingPayer::Seller,
                restocking_fee: 0,
                refund_amount: 999_000_000, // capped at the order total
            },
        )
        .unwrap();
        let o = svc.return_received("seller-1", &code).unwrap();
        assert_eq!(o.status, OrderStatus::Refunded);
        assert_eq!(o.refunded_amount, Some(115_000));
    }

    #[test]
    fn rejected_return_keeps_the_sellers_reason() {
        let (svc, code) = service_with_order(OrderStatus::Delivered);
        svc.request_return(
            "buyer-1",
            &code,
            "does not match the listing photos",
            ReturnClassification::ChangeMind,
        )
        .unwrap();
        let o = svc
            .reject_return("seller-1", &code, "item matches the published listing")
            .unwrap();
        assert_eq!(o.status, OrderStatus::ReturnRejected);
        let req = o.return_request.unwrap();
        assert_eq!(
            req.rejection_reason.as_deref(),
            Some("item matches the published listing")
        );
    }

    #[test]
    fn refund_without_return_settles_the_full_total() {
        let (svc, code) = service_with_order(OrderStatus::Delivered);
        svc.request_refund("buyer-1", &code, "parcel box was empty")
            .unwrap();
        let o = svc.approve_refund("seller-1", &code).unwrap();
        assert_eq!(o.status, OrderStatus::Refunded);
        assert_eq!(o.refunded_amount, Some(115_000));
    }

    #[test]
    fn free_cancel_window_closes_at_packing() {
        let (svc, code) = service_with_order(OrderStatus::Placed);
        let o = svc.cancel_free("buyer-1", &code).unwrap();
        assert_eq!(o.status, OrderStatus::Cancelled);

        let (svc, code) = service_with_order(OrderStatus::Shipped);
        let err = svc.cancel_free("buyer-1", &code).unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)));
    }
}
