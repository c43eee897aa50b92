//! Selected-drug list with synchronous change notification.
//!
//! The store is owned by the application context and injected where needed;
//! independent instances share nothing.

use crate::models::Drug;

/// Receives the full list after every change.
pub trait SelectionObserver: Send + Sync {
    fn on_change(&self, drugs: &[Drug]);
}

impl<F> SelectionObserver for F
where
    F: Fn(&[Drug]) + Send + Sync,
{
    fn on_change(&self, drugs: &[Drug]) {
        self(drugs)
    }
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw value, for handing across the FFI boundary.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for SubscriptionId {
    fn from(value: u64) -> Self {
        SubscriptionId(value)
    }
}

/// Ordered set of drugs keyed by CIS.
#[derive(Default)]
pub struct SelectionStore {
    drugs: Vec<Drug>,
    observers: Vec<(SubscriptionId, Box<dyn SelectionObserver>)>,
    next_subscription: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drug unless one with the same CIS is already present.
    ///
    /// Returns `true` if the list changed.
    pub fn add(&mut self, drug: Drug) -> bool {
        if self.contains(&drug.cis) {
            tracing::debug!(cis = %drug.cis, "Drug already selected");
            return false;
        }
        self.drugs.push(drug);
        self.notify();
        true
    }

    /// Remove the drug with the given CIS.
    ///
    /// Returns `true` if the list changed.
    pub fn remove(&mut self, cis: &str) -> bool {
        let before = self.drugs.len();
        self.drugs.retain(|d| d.cis != cis);
        if self.drugs.len() == before {
            return false;
        }
        self.notify();
        true
    }

    /// Remove every drug.
    pub fn clear(&mut self) {
        if self.drugs.is_empty() {
            return;
        }
        self.drugs.clear();
        self.notify();
    }

    /// Current list in insertion order.
    pub fn read(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn contains(&self, cis: &str) -> bool {
        self.drugs.iter().any(|d| d.cis == cis)
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Register an observer. It is not called for the current state.
    pub fn subscribe(&mut self, observer: impl SelectionObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer.on_change(&self.drugs);
        }
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("drugs", &self.drugs)
            .field("observers", &self.observers.len())
            .finish()
    }
}
