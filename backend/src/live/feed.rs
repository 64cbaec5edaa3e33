use crate::live::state::SharedList;
use crate::store::{self, ChangeSubscription, Delivery, SharedStore, StoreError};
use common::model::GuaranteeRecord;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

/// Owns the running change feed.
///
/// The feed stops when the handle is dropped or [`FeedHandle::unsubscribe`]
/// is called. After that nothing writes to the list on its behalf; a store
/// call still in flight completes, and its event is simply never applied.
pub struct FeedHandle {
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn unsubscribe(self) {}
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
        info!("Change feed unsubscribed");
    }
}

/// Seeds `list` from the store and keeps it in sync with store changes.
///
/// The subscription is taken before the initial fetch so that no change is
/// lost between the two. Events are applied in delivery order.
pub async fn mount(store: &SharedStore, list: &SharedList) -> Result<FeedHandle, StoreError> {
    let subscription = store.subscribe();
    let count = refetch(store, list).await?.len();
    info!("Change feed mounted with {} guarantee(s)", count);

    let task = tokio::spawn(run(store.clone(), list.clone(), subscription));
    Ok(FeedHandle { task })
}

/// Replaces the list with a fresh read from the store.
///
/// Events the running feed has queued but not yet applied are applied on top
/// of the fresh read, so an insert from that window shows up twice until the
/// next refetch. The feed's own lag recovery discards its queue first.
pub async fn refetch(
    store: &SharedStore,
    list: &SharedList,
) -> Result<Vec<GuaranteeRecord>, StoreError> {
    let records = store::run(store, |s| s.list_all()).await?;
    list.write().await.reset(records.clone());
    Ok(records)
}

async fn run(store: SharedStore, list: SharedList, mut subscription: ChangeSubscription) {
    while let Some(delivery) = subscription.next().await {
        match delivery {
            Delivery::Event(event) => {
                let kind = event.kind();
                let id = event.record_id().to_string();
                if !list.write().await.apply(event) {
                    debug!("Ignored {:?} for unknown guarantee {}", kind, id);
                }
            }
            Delivery::Lagged(skipped) => {
                let queued = subscription.discard_pending();
                warn!(
                    "Change feed skipped {} event(s) and dropped {} queued; refetching",
                    skipped, queued
                );
                if let Err(e) = refetch(&store, &list).await {
                    error!("Refetch after lag failed: {}", e);
                }
            }
        }
    }
    info!("Change feed closed by the store");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::state::AppState;
    use crate::store::SqliteStore;
    use chrono::NaiveDate;
    use common::model::{GuaranteeStatus, GuaranteeType};
    use common::requests::{GuaranteeUpdate, NewGuarantee};
    use std::sync::Arc;
    use std::time::Duration;

    fn new_guarantee(number: &str) -> NewGuarantee {
        NewGuarantee {
            guarantee_number: number.to_string(),
            guarantee_type: GuaranteeType::Initial,
            value: 500.0,
            currency: None,
            issue_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            status: None,
            bank_name: "Banque Saudi Fransi".to_string(),
        }
    }

    async fn wait_for<F: Fn(&[GuaranteeRecord]) -> bool>(list: &SharedList, done: F) -> bool {
        for _ in 0..100 {
            if done(list.read().await.records()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn mount_seeds_and_follows_changes() {
        let state = AppState::new(Arc::new(SqliteStore::open_in_memory().unwrap()), "SAR");
        let existing = state.store.create(new_guarantee("BG-1")).unwrap();

        let handle = mount(&state.store, &state.list).await.unwrap();
        assert_eq!(state.list.read().await.len(), 1);

        let added = state.store.create(new_guarantee("BG-2")).unwrap();
        assert!(wait_for(&state.list, |r| r.len() == 2 && r[0].id == added.id).await);

        state
            .store
            .update(
                &existing.id,
                GuaranteeUpdate {
                    status: Some(GuaranteeStatus::Expired),
                    ..GuaranteeUpdate::default()
                },
            )
            .unwrap();
        assert!(wait_for(&state.list, |r| r[1].status == GuaranteeStatus::Expired).await);

        state.store.delete(&added.id).unwrap();
        assert!(wait_for(&state.list, |r| r.len() == 1 && r[0].id == existing.id).await);

        handle.unsubscribe();
    }

    #[tokio::test]
    async fn unsubscribed_feed_stops_applying() {
        let state = AppState::new(Arc::new(SqliteStore::open_in_memory().unwrap()), "SAR");
        let handle = mount(&state.store, &state.list).await.unwrap();
        drop(handle);
        tokio::task::yield_now().await;

        state.store.create(new_guarantee("BG-1")).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(state.list.read().await.is_empty());
    }
}
