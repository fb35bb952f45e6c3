//! Dispute store

use dashmap::DashMap;

use crate::models::{Dispute, DisputeStatus};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct DisputeStore {
    disputes: DashMap<String, Dispute>,
}

impl DisputeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, dispute: Dispute) {
        self.disputes.insert(dispute.id.clone(), dispute);
    }

    pub fn get(&self, id: &str) -> Option<Dispute> {
        self.disputes.get(id).map(|d| d.clone())
    }

    /// The one active (non-final) dispute for an order, if any
    pub fn active_for_order(&self, order_code: &str) -> Option<Dispute> {
        self.disputes
            .iter()
            .find(|d| d.order_code == order_code && !d.status.is_final())
            .map(|d| d.clone())
    }

    /// Mutate one dispute under its entry guard
    pub fn update<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Dispute) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut entry = self
            .disputes
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Dispute {id}")))?;
        f(&mut entry)
    }

    pub fn list(&self, status: Option<DisputeStatus>) -> Vec<Dispute> {
        let mut out: Vec<Dispute> = self
            .disputes
            .iter()
            .filter(|d| status.is_none_or(|s| d.status == s))
            .map(|d| d.clone())
            .collect();
        out.sort_by(|a, b| b.opened_at.cmp(&a.opened_at).then(a.id.cmp(&b.id)));
        out
    }
}
