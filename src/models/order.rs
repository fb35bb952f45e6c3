//! Order, order group, shipment and post-purchase request models
//!
//! Orders are created only by the checkout commit engine and mutated only
//! through lifecycle transitions. Items are frozen copies taken at commit
//! time — never re-derived from the live catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, Money};

/// Who is performing an operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Buyer,
    Seller,
    Admin,
}

/// Payment method selected at commit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery — order starts at PLACED
    Cod,
    /// Requires payment confirmation — order starts at PENDING_PAYMENT
    BankTransfer,
    /// Requires payment confirmation — order starts at PENDING_PAYMENT
    Wallet,
}

impl PaymentMethod {
    /// Whether the method needs an upstream payment confirmation step
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, Self::Cod)
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Placed,
    Confirmed,
    Packing,
    Shipped,
    InTransit,
    Delivered,
    Completed,
    CancelRequested,
    Cancelled,
    ReturnRequested,
    ReturnApproved,
    ReturnRejected,
    ReturnReceived,
    RefundRequested,
    Refunded,
}

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Completed | Self::Refunded | Self::ReturnRejected
        )
    }
}

/// Frozen line item snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sku_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub unit_price: Money,
    pub qty: u32,
    pub line_total: Money,
}

/// Shipment status — strictly monotonic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Shipped,
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    /// 单调序：物流状态只进不退
    pub fn rank(&self) -> u8 {
        match self {
            Self::Shipped => 0,
            Self::InTransit => 1,
            Self::Delivered => 2,
        }
    }

    /// Order status mirrored from a shipment update
    pub fn as_order_status(&self) -> OrderStatus {
        match self {
            Self::Shipped => OrderStatus::Shipped,
            Self::InTransit => OrderStatus::InTransit,
            Self::Delivered => OrderStatus::Delivered,
        }
    }
}

/// Append-only shipment history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentEvent {
    pub status: ShipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

/// Shipment created at PACKING → SHIPPED
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub carrier: String,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    pub status: ShipmentStatus,
    pub events: Vec<ShipmentEvent>,
    pub created_at: DateTime<Utc>,
}

/// Buyer-initiated cancellation request (post-fulfillment-start)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub reason: String,
    /// Status to resume when the seller rejects the request
    pub resume_status: OrderStatus,
    pub requested_at: DateTime<Utc>,
}

/// Return reason classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnClassification {
    ChangeMind,
    Defective,
    WrongItem,
    NotAsDescribed,
    Other,
}

/// Seller's fault assignment when approving a return
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnResolution {
    BuyerFault,
    SellerFault,
}

/// Who pays the return shipping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPayer {
    Buyer,
    Seller,
}

/// Buyer-initiated return request and its (optional) approval terms
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub reason: String,
    pub classification: ReturnClassification,
    /// Status the order was in when the return was opened
    pub resume_status: OrderStatus,
    pub requested_at: DateTime<Utc>,
    // Approval terms, set at RETURN_APPROVED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ReturnResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_payer: Option<ShippingPayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restocking_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<Money>,
    /// Seller's stated reason, set at RETURN_REJECTED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Buyer-initiated refund-without-return request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub reason: String,
    /// Status to resume when the seller rejects the request
    pub resume_status: OrderStatus,
    pub requested_at: DateTime<Utc>,
}

/// Append-only status history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub actor: Actor,
    pub at: DateTime<Utc>,
}

/// The unit of seller-facing fulfillment — always exactly one shop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub code: String,
    /// Back-reference to the owning group (not ownership)
    pub group_code: String,
    pub shop_id: String,
    pub buyer_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub shipping_address: Address,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment: Option<Shipment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_request: Option<CancelRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_request: Option<ReturnRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_request: Option<RefundRequest>,
    /// Amount settled back to the buyer (return/refund flows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_amount: Option<Money>,
    pub dispute_ids: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether any cancel/return/refund request is currently pending
    pub fn has_pending_request(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::CancelRequested
                | OrderStatus::ReturnRequested
                | OrderStatus::RefundRequested
        )
    }
}

/// Aggregate status of an order group, derived from child orders at read time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderGroupStatus {
    /// At least one child order is still in flight
    Processing,
    /// Every child reached COMPLETED (or REFUNDED after completion flows)
    Completed,
    /// Every child was cancelled
    Cancelled,
    /// All terminal, but outcomes differ
    Mixed,
}

/// Immutable envelope for one multi-shop purchase event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderGroup {
    pub group_code: String,
    pub buyer_id: String,
    pub total: Money,
    pub order_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderGroup {
    /// Derive the aggregate status from the child statuses
    pub fn aggregate_status(children: &[OrderStatus]) -> OrderGroupStatus {
        if children.iter().any(|s| !s.is_terminal()) {
            return OrderGroupStatus::Processing;
        }
        if children.iter().all(|s| *s == OrderStatus::Cancelled) {
            OrderGroupStatus::Cancelled
        } else if children
            .iter()
            .all(|s| matches!(s, OrderStatus::Completed | OrderStatus::Refunded))
        {
            OrderGroupStatus::Completed
        } else {
            OrderGroupStatus::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_status_is_ordered() {
        assert!(ShipmentStatus::Shipped.rank() < ShipmentStatus::InTransit.rank());
        assert!(ShipmentStatus::InTransit.rank() < ShipmentStatus::Delivered.rank());
    }

    #[test]
    fn aggregate_status_covers_the_outcomes() {
        use OrderStatus::*;
        assert_eq!(
            OrderGroup::aggregate_status(&[Placed, Completed]),
            OrderGroupStatus::Processing
        );
        assert_eq!(
            OrderGroup::aggregate_status(&[Cancelled, Cancelled]),
            OrderGroupStatus::Cancelled
        );
        assert_eq!(
            OrderGroup::aggregate_status(&[Completed, Refunded]),
            OrderGroupStatus::Completed
        );
        assert_eq!(
            OrderGroup::aggregate_status(&[Completed, Cancelled]),
            OrderGroupStatus::Mixed
        );
    }
}
