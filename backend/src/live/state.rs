use crate::live::statistics::StatisticsSnapshot;
use crate::store::SharedStore;
use common::reconcile::GuaranteeList;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedList = Arc<RwLock<GuaranteeList>>;
pub type SharedStatistics = Arc<RwLock<StatisticsSnapshot>>;

/// Upload size accepted when no other limit is configured.
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// A thread-safe, shareable container for everything the handlers need.
///
/// Created once in `main.rs` and cloned into each Actix worker. All fields
/// are reference counted, so clones share the same list and snapshot.
#[derive(Clone)]
pub struct AppState {
    /// The authoritative collection.
    pub store: SharedStore,

    /// Newest-first copy of the collection.
    ///
    /// Written by the change feed task (and by explicit refreshes); read by
    /// the list and export endpoints.
    pub list: SharedList,

    /// Last statistics fetched from the store, with the last refresh error.
    pub statistics: SharedStatistics,

    /// Currency applied to imported rows that leave it blank.
    pub home_currency: String,

    /// Maximum bytes read from one multipart upload.
    pub upload_limit: usize,
}

impl AppState {
    pub fn new(store: SharedStore, home_currency: impl Into<String>) -> Self {
        Self {
            store,
            list: Arc::new(RwLock::new(GuaranteeList::default())),
            statistics: Arc::new(RwLock::new(StatisticsSnapshot::default())),
            home_currency: home_currency.into(),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }
}
