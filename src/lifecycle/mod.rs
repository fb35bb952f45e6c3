//! 订单生命周期 / Post-purchase lifecycle
//!
//! `transition` holds the one authoritative status table; `service`
//! executes actions against stored orders; `dispute` handles the
//! adjudication track that runs alongside the order itself.

mod dispute;
mod service;
mod transition;

pub use dispute::DisputeService;
pub use service::{LifecycleService, ReturnTerms};
pub use transition::{OrderAction, TransitionError, next_status};
