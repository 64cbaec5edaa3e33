//! The remote collection the dashboard reads from and writes to.
//!
//! The store is authoritative for every guarantee. Callers see it through the
//! narrow [`GuaranteeStore`] contract: row CRUD, an aggregate statistics read
//! and a change subscription. Failures are returned once and never retried.
//!
//! Implementations are synchronous; async callers go through [`run`], which
//! moves the call onto the blocking pool.

mod sqlite;

pub use sqlite::SqliteStore;

use common::model::{ChangeEvent, GuaranteeRecord, Statistics};
use common::requests::{GuaranteeUpdate, NewGuarantee};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store not configured: {0}")]
    NotConfigured(String),

    #[error("Guarantee not found: {0}")]
    NotFound(String),

    #[error("Invalid guarantee: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait GuaranteeStore: Send + Sync {
    /// Every record, newest created first.
    fn list_all(&self) -> Result<Vec<GuaranteeRecord>, StoreError>;

    fn get(&self, id: &str) -> Result<GuaranteeRecord, StoreError>;

    fn create(&self, guarantee: NewGuarantee) -> Result<GuaranteeRecord, StoreError>;

    /// Changes only the fields present in `changes`.
    fn update(&self, id: &str, changes: GuaranteeUpdate) -> Result<GuaranteeRecord, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;

    fn statistics(&self) -> Result<Statistics, StoreError>;

    /// Starts receiving the changes committed from now on.
    fn subscribe(&self) -> ChangeSubscription;
}

pub type SharedStore = Arc<dyn GuaranteeStore>;

/// Runs a store call on the blocking pool.
pub async fn run<T, F>(store: &SharedStore, call: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn GuaranteeStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| StoreError::Unavailable(format!("join error: {}", e)))?
}

/// What a subscription yields.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Event(ChangeEvent),
    /// The receiver fell behind and this many events were discarded.
    Lagged(u64),
}

/// Receiving end of the change channel. Dropping it unsubscribes.
pub struct ChangeSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn new(rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Waits for the next delivery; `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        match self.rx.recv().await {
            Ok(event) => Some(Delivery::Event(event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Some(Delivery::Lagged(skipped)),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Drops everything already queued and returns how many events that was.
    ///
    /// Called right before a full refetch, which supersedes them.
    pub fn discard_pending(&mut self) -> u64 {
        let mut dropped = 0;
        loop {
            match self.rx.try_recv() {
                Ok(_) => dropped += 1,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => dropped += skipped,
                Err(_) => return dropped,
            }
        }
    }
}
