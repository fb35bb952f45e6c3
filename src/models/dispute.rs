//! Dispute model
//!
//! Adjudicated by platform admins. Once resolved or rejected the decision
//! is final, except for exactly one revision cycle: one revision request
//! (by either party) followed by at most one admin corrective edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Actor;

/// Dispute adjudication status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    Open,
    UnderReview,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    /// Resolved/Rejected disputes count as decided (final barring revision)
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

/// A dispute raised by the buyer against one order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: String,
    pub order_code: String,
    pub buyer_id: String,
    pub shop_id: String,
    pub subject: String,
    pub detail: String,
    pub status: DisputeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_response: Option<String>,
    /// Adjudicator's written resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Admin corrective edits applied after the decision, capped at 1
    pub edit_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_request_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_requested_by: Option<Actor>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dispute {
    /// 修订周期是否已永久锁定（一次修订请求 + 一次纠正后锁死）
    pub fn revision_locked(&self) -> bool {
        self.edit_count >= 1
    }
}
