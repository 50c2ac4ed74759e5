use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::{Listing, Role};

/// A batch of saved listings handed to the payment step. Charged as fee x count.
#[derive(Debug, Clone)]
pub struct UnlockRequest<T> {
    pub role: Role,
    pub items: Vec<T>,
}

impl<T: Listing> UnlockRequest<T> {
    pub fn new(role: Role, items: Vec<T>) -> Self {
        Self { role, items }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn total_cents(&self, fee_cents: u32) -> u64 {
        u64::from(fee_cents) * self.items.len() as u64
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id().to_string()).collect()
    }
}

/// Listing ids each role has paid to reveal.
#[derive(Debug, Default, Clone)]
pub struct UnlockLedger {
    unlocked: HashMap<Role, HashSet<String>>,
}

impl UnlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(role: Role, ids: impl IntoIterator<Item = String>) -> Self {
        let mut ledger = Self::new();
        ledger.unlocked.entry(role).or_default().extend(ids);
        ledger
    }

    pub fn is_unlocked(&self, role: Role, id: &str) -> bool {
        self.unlocked
            .get(&role)
            .is_some_and(|ids| ids.contains(id))
    }

    /// Records a completed request. Returns how many ids were newly unlocked.
    pub fn apply<T: Listing>(&mut self, request: &UnlockRequest<T>) -> usize {
        let ids = self.unlocked.entry(request.role).or_default();
        let added = request
            .items
            .iter()
            .filter(|item| ids.insert(item.id().to_string()))
            .count();
        info!(role = %request.role, added, "unlocks applied");
        added
    }
}

/// One stored unlock, with the fee charged when it was bought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockRecord {
    pub listing_id: String,
    pub unlocked_at: String,
    pub fee_cents: u32,
}

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
