//! Dispute service
//!
//! Buyers open disputes against delivered (or return/refund-contested)
//! orders; sellers respond; admins adjudicate. One active dispute per
//! order, and one post-decision revision cycle at most.

use std::sync::Arc;

use chrono::Utc;

use crate::models::{Actor, Dispute, DisputeStatus, Order, OrderStatus};
use crate::store::{CatalogStore, DisputeStore, OrderStore};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_reason, validate_required_text};
use crate::utils::{AppError, AppResult, codes};

pub struct DisputeService {
    disputes: Arc<DisputeStore>,
    orders: Arc<OrderStore>,
    catalog: Arc<CatalogStore>,
}

impl DisputeService {
    pub fn new(
        disputes: Arc<DisputeStore>,
        orders: Arc<OrderStore>,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            disputes,
            orders,
            catalog,
        }
    }

    // ========== Buyer ==========

    /// Open a dispute. Eligible once the parcel reached the buyer, or while
    /// a return/refund sub-flow is being contested.
    pub fn open(
        &self,
        buyer_id: &str,
        order_code: &str,
        subject: &str,
        detail: &str,
    ) -> AppResult<Dispute> {
        validate_required_text(subject, "subject", MAX_NAME_LEN)?;
        validate_reason(detail, "detail")?;

        let order = self
            .orders
            .order(order_code)
            .ok_or_else(|| AppError::not_found("Order"))?;
        if order.buyer_id != buyer_id {
            return Err(AppError::forbidden("Order belongs to another buyer"));
        }
        if !dispute_eligible(&order) {
            return Err(AppError::not_eligible(format!(
                "Disputes cannot be opened while the order is {:?}",
                order.status
            )));
        }
        if self.disputes.active_for_order(order_code).is_some() {
            return Err(AppError::conflict(
                "An active dispute already exists for this order",
            ));
        }

        let now = Utc::now();
        let dispute = Dispute {
            id: codes::dispute_id(),
            order_code: order_code.to_string(),
            buyer_id: buyer_id.to_string(),
            shop_id: order.shop_id.clone(),
            subject: subject.to_string(),
            detail: detail.to_string(),
            status: DisputeStatus::Open,
            seller_response: None,
            resolution: None,
            edit_count: 0,
            revision_requested_at: None,
            revision_request_note: None,
            revision_requested_by: None,
            opened_at: now,
            updated_at: now,
        };
        self.disputes.insert(dispute.clone());

        // Back-reference on the order
        self.orders.update(order_code, |o| {
            o.dispute_ids.push(dispute.id.clone());
            Ok(())
        })?;

        tracing::info!(dispute = %dispute.id, order = %order_code, "Dispute opened");
        Ok(dispute)
    }

    // ========== Seller ==========

    /// Seller's written response, allowed while the dispute is undecided
    pub fn respond(&self, seller_id: &str, dispute_id: &str, response: &str) -> AppResult<Dispute> {
        validate_required_text(response, "response", MAX_NOTE_LEN)?;
        self.disputes.update(dispute_id, |d| {
            if !self.catalog.seller_owns(&d.shop_id, seller_id) {
                return Err(AppError::forbidden("Dispute belongs to another shop"));
            }
            if d.status.is_final() {
                return Err(AppError::not_eligible("Dispute has already been decided"));
            }
            d.seller_response = Some(response.to_string());
            d.updated_at = Utc::now();
            Ok(d.clone())
        })
    }

    // ========== Revision cycle ==========

    /// Either party asks the admin to revisit a decided dispute. Allowed
    /// once; after the corrective edit the dispute is locked for good.
    pub fn request_revision(
        &self,
        actor: Actor,
        actor_id: &str,
        dispute_id: &str,
        note: &str,
    ) -> AppResult<Dispute> {
        validate_reason(note, "note")?;
        self.disputes.update(dispute_id, |d| {
            match actor {
                Actor::Buyer if d.buyer_id == actor_id => {}
                Actor::Seller if self.catalog.seller_owns(&d.shop_id, actor_id) => {}
                _ => return Err(AppError::forbidden("Not a party to this dispute")),
            }
            if !d.status.is_final() {
                return Err(AppError::not_eligible(
                    "Only a decided dispute can be revised",
                ));
            }
            if d.revision_locked() {
                return Err(AppError::not_eligible("Dispute revision is locked"));
            }
            if d.revision_requested_at.is_some() {
                return Err(AppError::conflict("A revision has already been requested"));
            }
            d.revision_requested_at = Some(Utc::now());
            d.revision_request_note = Some(note.to_string());
            d.revision_requested_by = Some(actor);
            d.updated_at = Utc::now();
            Ok(d.clone())
        })
    }

    // ========== Admin ==========

    /// OPEN → UNDER_REVIEW
    pub fn review(&self, dispute_id: &str) -> AppResult<Dispute> {
        self.disputes.update(dispute_id, |d| {
            if d.status != DisputeStatus::Open {
                return Err(AppError::not_eligible(format!(
                    "Dispute is {:?}, expected OPEN",
                    d.status
                )));
            }
            d.status = DisputeStatus::UnderReview;
            d.updated_at = Utc::now();
            Ok(d.clone())
        })
    }

    /// UNDER_REVIEW → RESOLVED | REJECTED, with the written decision
    pub fn resolve(&self, dispute_id: &str, accept: bool, resolution: &str) -> AppResult<Dispute> {
        validate_reason(resolution, "resolution")?;
        self.disputes.update(dispute_id, |d| {
            if d.status != DisputeStatus::UnderReview {
                return Err(AppError::not_eligible(format!(
                    "Dispute is {:?}, expected UNDER_REVIEW",
                    d.status
                )));
            }
            d.status = if accept {
                DisputeStatus::Resolved
            } else {
                DisputeStatus::Rejected
            };
            d.resolution = Some(resolution.to_string());
            d.updated_at = Utc::now();
            tracing::info!(dispute = %d.id, status = ?d.status, "Dispute decided");
            Ok(d.clone())
        })
    }

    /// The single corrective edit after a granted revision request
    pub fn revise(
        &self,
        dispute_id: &str,
        accept: bool,
        resolution: &str,
    ) -> AppResult<Dispute> {
        validate_reason(resolution, "resolution")?;
        self.disputes.update(dispute_id, |d| {
            if !d.status.is_final() {
                return Err(AppError::not_eligible(
                    "Only a decided dispute can be revised",
                ));
            }
            if d.revision_requested_at.is_none() {
                return Err(AppError::not_eligible(
                    "No revision has been requested for this dispute",
                ));
            }
            if d.revision_locked() {
                return Err(AppError::not_eligible("Dispute revision is locked"));
            }
            d.status = if accept {
                DisputeStatus::Resolved
            } else {
                DisputeStatus::Rejected
            };
            d.resolution = Some(resolution.to_string());
            d.edit_count += 1;
            d.updated_at = Utc::now();
            Ok(d.clone())
        })
    }

    // ========== Reads ==========

    pub fn get(&self, dispute_id: &str) -> AppResult<Dispute> {
        self.disputes
            .get(dispute_id)
            .ok_or_else(|| AppError::not_found("Dispute"))
    }

    pub fn list(&self, status: Option<DisputeStatus>) -> Vec<Dispute> {
        self.disputes.list(status)
    }
}

/// 纠纷开启资格：包裹已到手，或退货/退款流程正被争议
fn dispute_eligible(order: &Order) -> bool {
    matches!(
        order.status,
        OrderStatus::Delivered
            | OrderStatus::Completed
            | OrderStatus::ReturnRequested
            | OrderStatus::ReturnApproved
            | OrderStatus::ReturnRejected
            | OrderStatus::ReturnReceived
            | OrderStatus::RefundRequested
            | OrderStatus::Refunded
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, PaymentMethod, Shop};

    fn service_with_order(status: OrderStatus) -> (DisputeService, String) {
        let disputes = Arc::new(DisputeStore::new());
        let orders = Arc::new(OrderStore::new());
        let catalog = Arc::new(CatalogStore::new());
        catalog.upsert_shop(Shop {
            id: "shop-1".into(),
            seller_id: "seller-1".into(),
            name: "测试店铺".into(),
            is_active: true,
        });
        let now = Utc::now();
        let code = "ORD-DISPUTE00001".to_string();
        orders.insert_order(Order {
            code: code.clone(),
            group_code: "GRP-DISPUTE00001".into(),
            shop_id: "shop-1".into(),
            buyer_id: "buyer-1".into(),
            items: vec![],
            subtotal: 50_000,
            shipping_fee: 0,
            discount: 0,
            total: 50_000,
            payment_method: PaymentMethod::Wallet,
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
        (DisputeService::new(disputes, orders, catalog), code)
    }

    #[test]
    fn one_active_dispute_per_order() {
        let (svc, code) = service_with_order(OrderStatus::Delivered);
        svc.open("buyer-1", &code, "Wrong colour", "ordered navy, got bright red")
            .unwrap();
        let err = svc
            .open("buyer-1", &code, "Wrong colour", "ordered navy, got bright red")
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn opening_records_the_dispute_on_the_order() {
        let (svc, code) = service_with_order(OrderStatus::Delivered);
        let d = svc
            .open("buyer-1", &code, "Wrong colour", "ordered navy, got bright red")
            .unwrap();
        let order = svc.orders.order(&code).unwrap();
        assert_eq!(order.dispute_ids, vec![d.id]);
    }

    #[test]
    fn early_statuses_are_not_disputable() {
        let (svc, code) = service_with_order(OrderStatus::Shipped);
        let err = svc
            .open("buyer-1", &code, "Late", "the parcel still has not arrived")
            .unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)));
    }

    #[test]
    fn adjudication_walks_open_review_resolved() {
        let (svc, code) = service_with_order(OrderStatus::Completed);
        let d = svc
            .open("buyer-1", &code, "Fake item", "the logo stitching is counterfeit")
            .unwrap();
        svc.respond("seller-1", &d.id, "Item is authentic, receipt attached")
            .unwrap();
        svc.review(&d.id).unwrap();
        let d = svc.resolve(&d.id, true, "seller evidence insufficient, refund").unwrap();
        assert_eq!(d.status, DisputeStatus::Resolved);
    }

    #[test]
    fn revision_cycle_runs_exactly_once() {
        let (svc, code) = service_with_order(OrderStatus::Completed);
        let d = svc
            .open("buyer-1", &code, "Fake item", "the logo stitching is counterfeit")
            .unwrap();
        svc.review(&d.id).unwrap();
        svc.resolve(&d.id, false, "buyer evidence does not show a defect")
            .unwrap();

        // 未请求修订前不能直接改判
        let err = svc.revise(&d.id, true, "second look at the photos").unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)));

        svc.request_revision(Actor::Buyer, "buyer-1", &d.id, "new photos attached now")
            .unwrap();
        let d = svc
            .revise(&d.id, true, "new photos show the defect clearly")
            .unwrap();
        assert_eq!(d.status, DisputeStatus::Resolved);
        assert_eq!(d.edit_count, 1);

        // Locked afterwards
        let err = svc
            .request_revision(Actor::Seller, "seller-1", &d.id, "we disagree with this")
            .unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)));
    }

    #[test]
    fn outsiders_cannot_request_revision() {
        let (svc, code) = service_with_order(OrderStatus::Completed);
        let d = svc
            .open("buyer-1", &code, "Fake item", "the logo stitching is counterfeit")
            .unwrap();
        svc.review(&d.id).unwrap();
        svc.resolve(&d.id, false, "buyer evidence does not show a defect")
            .unwrap();
        let err = svc
            .request_revision(Actor::Buyer, "buyer-9", &d.id, "let me in on this one")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
