//! In-memory ledger and history store
//!
//! Suitable for tests and single-process embedding; a hosted deployment
//! supplies its own database-backed implementations of the same traits.

use dashmap::DashMap;
use std::sync::Arc;

use super::{CreditLedger, HandlerError, HistoryRecord, HistoryStore};

/// Credit balances keyed by user id
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: Arc<DashMap<String, u64>>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user's balance, replacing any previous value
    pub fn grant(&self, user_id: &str, credits: u64) {
        self.balances.insert(user_id.to_string(), credits);
    }

    #[must_use]
    pub fn credits(&self, user_id: &str) -> u64 {
        self.balances.get(user_id).map_or(0, |b| *b)
    }
}

impl CreditLedger for InMemoryLedger {
    async fn balance(&self, user_id: &str) -> Result<u64, HandlerError> {
        Ok(self.credits(user_id))
    }

    async fn deduct(&self, user_id: &str, amount: u64) -> Result<(), HandlerError> {
        let mut balance = self
            .balances
            .get_mut(user_id)
            .ok_or_else(|| HandlerError::Ledger(format!("Unknown user {user_id}")))?;

        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            HandlerError::Ledger(format!(
                "Cannot deduct {amount} from {user_id}: balance is {}",
                *balance
            ))
        })?;
        *balance = remaining;
        Ok(())
    }
}

/// History records keyed by user id, in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Arc<DashMap<String, Vec<HistoryRecord>>>,
}

impl InMemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records_for(&self, user_id: &str) -> Vec<HistoryRecord> {
        self.records
            .get(user_id)
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl HistoryStore for InMemoryHistory {
    async fn save(&self, record: HistoryRecord) -> Result<(), HandlerError> {
        self.records
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }
}
