//! Order status transition table
//!
//! 唯一权威的状态转换函数：不在表内的转换一律拒绝。
//! Wrong actor → FORBIDDEN; right actor, wrong state → NOT_ELIGIBLE.
//! Request sub-states are resolved exclusively by the counter-party —
//! no self-approval.

use thiserror::Error;

use crate::models::{Actor, OrderStatus};
use crate::utils::AppError;

/// Every mutation an order can undergo after commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Buyer cancels outright — free only before fulfillment starts
    CancelFree,
    /// Seller accepts the order
    Confirm,
    /// Seller starts packing
    Pack,
    /// Buyer asks to cancel after fulfillment started (needs approval)
    RequestCancel,
    /// Seller approves the pending cancel request
    ApproveCancel,
    /// Seller rejects it; the order resumes its prior state
    RejectCancel { resume: OrderStatus },
    /// Seller hands the parcel to the carrier
    Ship,
    /// Carrier update: parcel moving
    MarkInTransit,
    /// Carrier update: parcel delivered
    MarkDelivered,
    /// Buyer confirms receipt
    ConfirmReceived,
    /// Buyer opens a return
    RequestReturn,
    /// Buyer opens a refund-without-return
    RequestRefund,
    /// Seller approves the return with settlement terms
    ApproveReturn,
    /// Seller rejects the return
    RejectReturn,
    /// Seller confirms physical receipt of the returned goods
    ReceiveReturn,
    /// Refund settlement lands (return path or approved refund)
    SettleRefund,
    /// Seller approves the refund-without-return
    ApproveRefund,
    /// Seller rejects it; the order resumes its prior state
    RejectRefund { resume: OrderStatus },
}

impl OrderAction {
    /// The only actor allowed to perform this action
    pub fn required_actor(&self) -> Actor {
        match self {
            Self::CancelFree
            | Self::RequestCancel
            | Self::ConfirmReceived
            | Self::RequestReturn
            | Self::RequestRefund => Actor::Buyer,
            _ => Actor::Seller,
        }
    }
}

/// Transition rejection, mapped onto the error taxonomy
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("{actor:?} cannot perform {action:?}")]
    WrongActor { actor: Actor, action: OrderAction },

    #[error("Cannot {action:?} an order in {from:?} status")]
    InvalidState { from: OrderStatus, action: OrderAction },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::WrongActor { .. } => AppError::forbidden(e.to_string()),
            TransitionError::InvalidState { .. } => AppError::not_eligible(e.to_string()),
        }
    }
}

/// The transition table. Returns the next status, or why the transition
/// is not permitted.
pub fn next_status(
    current: OrderStatus,
    actor: Actor,
    action: OrderAction,
) -> Result<OrderStatus, TransitionError> {
    use OrderStatus::*;

    if actor != action.required_actor() {
        return Err(TransitionError::WrongActor { actor, action });
    }

    let invalid = || TransitionError::InvalidState {
        from: current,
        action,
    };

    let next = match action {
        // 免费取消：仅在进入履约（PACKING）之前
        OrderAction::CancelFree => match current {
            Placed | PendingPayment => Cancelled,
            _ => return Err(invalid()),
        },
        OrderAction::Confirm => match current {
            Placed | PendingPayment => Confirmed,
            _ => return Err(invalid()),
        },
        OrderAction::Pack => match current {
            Confirmed => Packing,
            _ => return Err(invalid()),
        },
        OrderAction::RequestCancel => match current {
            Confirmed | Packing => CancelRequested,
            _ => return Err(invalid()),
        },
        OrderAction::ApproveCancel => match current {
            CancelRequested => Cancelled,
            _ => return Err(invalid()),
        },
        OrderAction::RejectCancel { resume } => match (current, resume) {
            (CancelRequested, Confirmed | Packing) => resume,
            _ => return Err(invalid()),
        },
        OrderAction::Ship => match current {
            Packing => Shipped,
            _ => return Err(invalid()),
        },
        OrderAction::MarkInTransit => match current {
            Shipped => InTransit,
            _ => return Err(invalid()),
        },
        OrderAction::MarkDelivered => match current {
            Shipped | InTransit => Delivered,
            _ => return Err(invalid()),
        },
        // RETURN_REJECTED closes only the return; the order itself may
        // still complete
        OrderAction::ConfirmReceived => match current {
            Delivered | ReturnRejected => Completed,
            _ => return Err(invalid()),
        },
        OrderAction::RequestReturn => match current {
            Delivered | Completed => ReturnRequested,
            _ => return Err(invalid()),
        },
        OrderAction::RequestRefund => match current {
            Delivered | Completed => RefundRequested,
            _ => return Err(invalid()),
        },
        OrderAction::ApproveReturn => match current {
            ReturnRequested => ReturnApproved,
            _ => return Err(invalid()),
        },
        OrderAction::RejectReturn => match current {
            ReturnRequested => ReturnRejected,
            _ => return Err(invalid()),
        },
        OrderAction::ReceiveReturn => match current {
            ReturnApproved => ReturnReceived,
            _ => return Err(invalid()),
        },
        OrderAction::SettleRefund => match current {
            ReturnReceived => Refunded,
            _ => return Err(invalid()),
        },
        OrderAction::ApproveRefund => match current {
            RefundRequested => Refunded,
            _ => return Err(invalid()),
        },
        OrderAction::RejectRefund { resume } => match (current, resume) {
            (RefundRequested, Delivered | Completed) => resume,
            _ => return Err(invalid()),
        },
    };
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn placed_cannot_jump_to_shipped() {
        let err = next_status(Placed, Actor::Seller, OrderAction::Ship).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { .. }));
    }

    #[test]
    fn happy_path_through_fulfillment() {
        let mut status = Placed;
        for action in [
            OrderAction::Confirm,
            OrderAction::Pack,
            OrderAction::Ship,
            OrderAction::MarkInTransit,
            OrderAction::MarkDelivered,
        ] {
            status = next_status(status, Actor::Seller, action).unwrap();
        }
        assert_eq!(status, Delivered);
        assert_eq!(
            next_status(status, Actor::Buyer, OrderAction::ConfirmReceived).unwrap(),
            Completed
        );
    }

    #[test]
    fn buyer_cannot_confirm_their_own_order() {
        let err = next_status(Placed, Actor::Buyer, OrderAction::Confirm).unwrap_err();
        assert!(matches!(err, TransitionError::WrongActor { .. }));
    }

    #[test]
    fn seller_cannot_self_approve_a_buyer_request() {
        // the request actions themselves are buyer-only
        let err = next_status(Confirmed, Actor::Seller, OrderAction::RequestCancel).unwrap_err();
        assert!(matches!(err, TransitionError::WrongActor { .. }));
    }

    #[test]
    fn free_cancel_ends_at_packing() {
        assert_eq!(
            next_status(Placed, Actor::Buyer, OrderAction::CancelFree).unwrap(),
            Cancelled
        );
        assert!(next_status(Packing, Actor::Buyer, OrderAction::CancelFree).is_err());
    }

    #[test]
    fn cancel_reject_resumes_only_prior_states() {
        assert_eq!(
            next_status(
                CancelRequested,
                Actor::Seller,
                OrderAction::RejectCancel { resume: Packing }
            )
            .unwrap(),
            Packing
        );
        assert!(
            next_status(
                CancelRequested,
                Actor::Seller,
                OrderAction::RejectCancel { resume: Shipped }
            )
            .is_err()
        );
    }

    #[test]
    fn return_only_from_delivered_or_completed() {
        assert!(next_status(Delivered, Actor::Buyer, OrderAction::RequestReturn).is_ok());
        assert!(next_status(Completed, Actor::Buyer, OrderAction::RequestReturn).is_ok());
        let err = next_status(Shipped, Actor::Buyer, OrderAction::RequestReturn).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { .. }));
    }

    #[test]
    fn return_flow_reaches_refunded() {
        let mut status = ReturnRequested;
        status = next_status(status, Actor::Seller, OrderAction::ApproveReturn).unwrap();
        status = next_status(status, Actor::Seller, OrderAction::ReceiveReturn).unwrap();
        status = next_status(status, Actor::Seller, OrderAction::SettleRefund).unwrap();
        assert_eq!(status, Refunded);
    }

    #[test]
    fn rejected_return_can_still_complete() {
        assert_eq!(
            next_status(ReturnRejected, Actor::Buyer, OrderAction::ConfirmReceived).unwrap(),
            Completed
        );
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for terminal in [Cancelled, Refunded] {
            assert!(next_status(terminal, Actor::Seller, OrderAction::Confirm).is_err());
            assert!(next_status(terminal, Actor::Buyer, OrderAction::CancelFree).is_err());
        }
    }
}
