use super::{ChangeSubscription, GuaranteeStore, StoreError};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use common::model::{ChangeEvent, GuaranteeRecord, GuaranteeStatus, GuaranteeType, Statistics};
use common::requests::{GuaranteeUpdate, NewGuarantee};
use common::HOME_CURRENCY;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS bank_guarantees (
    id TEXT PRIMARY KEY,
    guarantee_number TEXT NOT NULL,
    guarantee_type TEXT NOT NULL,
    value REAL NOT NULL CHECK (value >= 0),
    currency TEXT NOT NULL,
    issue_date TEXT NOT NULL,
    expiry_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    bank_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const COLUMNS: &str = "id, guarantee_number, guarantee_type, value, currency, issue_date, \
                       expiry_date, status, bank_name, created_at, updated_at";

/// SQLite-backed guarantee collection.
///
/// Every successful write is published to subscribers as a [`ChangeEvent`]
/// after the statement has been committed. The connection lock is held
/// until the event is sent, so subscribers see writes in commit order.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    changes: broadcast::Sender<ChangeEvent>,
    home_currency: String,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        if path.trim().is_empty() {
            return Err(StoreError::NotConfigured(
                "no database location was provided".to_string(),
            ));
        }
        let conn = Connection::open(path)?;
        info!("Opened guarantee store at {}", path);
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    pub fn with_home_currency(mut self, currency: impl Into<String>) -> Self {
        self.home_currency = currency.into();
        self
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Ok(Self {
            conn: Mutex::new(conn),
            changes,
            home_currency: HOME_CURRENCY.to_string(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    fn publish(&self, event: ChangeEvent) {
        // No subscribers is not an error.
        let receivers = self.changes.send(event).unwrap_or(0);
        debug!("Published change to {} subscriber(s)", receivers);
    }
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into())
    })
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<GuaranteeRecord> {
    Ok(GuaranteeRecord {
        id: row.get(0)?,
        guarantee_number: row.get(1)?,
        guarantee_type: parse_column(row, 2)?,
        value: row.get(3)?,
        currency: row.get(4)?,
        issue_date: parse_column(row, 5)?,
        expiry_date: parse_column(row, 6)?,
        status: parse_column(row, 7)?,
        bank_name: row.get(8)?,
        created_at: parse_column(row, 9)?,
        updated_at: parse_column(row, 10)?,
    })
}

fn fetch(conn: &Connection, id: &str) -> Result<GuaranteeRecord, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM bank_guarantees WHERE id = ?1", COLUMNS),
        params![id],
        map_record,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn check_record(record: &GuaranteeRecord) -> Result<(), StoreError> {
    if record.guarantee_number.trim().is_empty() {
        return Err(StoreError::Invalid("guarantee number is required".to_string()));
    }
    if record.bank_name.trim().is_empty() {
        return Err(StoreError::Invalid("bank name is required".to_string()));
    }
    if !record.value.is_finite() || record.value < 0.0 {
        return Err(StoreError::Invalid(format!(
            "value must be a non-negative amount, got {}",
            record.value
        )));
    }
    Ok(())
}

impl GuaranteeStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<GuaranteeRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bank_guarantees ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))?;
        let records = stmt
            .query_map([], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<GuaranteeRecord, StoreError> {
        let conn = self.conn()?;
        fetch(&conn, id)
    }

    fn create(&self, guarantee: NewGuarantee) -> Result<GuaranteeRecord, StoreError> {
        let stamp = now();
        let currency = guarantee
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.home_currency.clone());
        let record = GuaranteeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            guarantee_number: guarantee.guarantee_number,
            guarantee_type: guarantee.guarantee_type,
            value: guarantee.value,
            currency,
            issue_date: guarantee.issue_date,
            expiry_date: guarantee.expiry_date,
            status: guarantee.status.unwrap_or_default(),
            bank_name: guarantee.bank_name,
            created_at: stamp,
            updated_at: stamp,
        };
        check_record(&record)?;

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO bank_guarantees ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                COLUMNS
            ),
            params![
                record.id,
                record.guarantee_number,
                record.guarantee_type.slug(),
                record.value,
                record.currency,
                record.issue_date.to_string(),
                record.expiry_date.to_string(),
                record.status.as_str(),
                record.bank_name,
                timestamp(record.created_at),
                timestamp(record.updated_at),
            ],
        )?;

        self.publish(ChangeEvent::Insert(record.clone()));
        Ok(record)
    }

    fn update(&self, id: &str, changes: GuaranteeUpdate) -> Result<GuaranteeRecord, StoreError> {
        let conn = self.conn()?;
        let mut record = fetch(&conn, id)?;
        if changes.is_empty() {
            return Ok(record);
        }

        if let Some(number) = changes.guarantee_number {
            record.guarantee_number = number;
        }
        if let Some(kind) = changes.guarantee_type {
            record.guarantee_type = kind;
        }
        if let Some(value) = changes.value {
            record.value = value;
        }
        if let Some(currency) = changes.currency {
            record.currency = currency;
        }
        if let Some(date) = changes.issue_date {
            record.issue_date = date;
        }
        if let Some(date) = changes.expiry_date {
            record.expiry_date = date;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        if let Some(bank) = changes.bank_name {
            record.bank_name = bank;
        }
        record.updated_at = now();
        check_record(&record)?;

        conn.execute(
            "UPDATE bank_guarantees SET guarantee_number = ?1, guarantee_type = ?2, value = ?3, \
             currency = ?4, issue_date = ?5, expiry_date = ?6, status = ?7, bank_name = ?8, \
             updated_at = ?9 WHERE id = ?10",
            params![
                record.guarantee_number,
                record.guarantee_type.slug(),
                record.value,
                record.currency,
                record.issue_date.to_string(),
                record.expiry_date.to_string(),
                record.status.as_str(),
                record.bank_name,
                timestamp(record.updated_at),
                record.id,
            ],
        )?;

        self.publish(ChangeEvent::Update(record.clone()));
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM bank_guarantees WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.publish(ChangeEvent::Delete { id: id.to_string() });
        Ok(())
    }

    fn statistics(&self) -> Result<Statistics, StoreError> {
        let conn = self.conn()?;
        let (total, total_value): (i64, f64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(value), 0.0) FROM bank_guarantees",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stats = Statistics {
            total: total as u64,
            total_value,
            ..Statistics::default()
        };

        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM bank_guarantees GROUP BY status")?;
        let by_status = stmt.query_map([], |row| {
            Ok((parse_column::<GuaranteeStatus>(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        for entry in by_status {
            let (status, count) = entry?;
            let slot = match status {
                GuaranteeStatus::Active => &mut stats.active_count,
                GuaranteeStatus::Pending => &mut stats.pending_count,
                GuaranteeStatus::Expired => &mut stats.expired_count,
            };
            *slot = count as u64;
        }

        let mut stmt = conn
            .prepare("SELECT guarantee_type, COUNT(*) FROM bank_guarantees GROUP BY guarantee_type")?;
        let by_type = stmt.query_map([], |row| {
            Ok((parse_column::<GuaranteeType>(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        for entry in by_type {
            let (kind, count) = entry?;
            stats.type_distribution.insert(kind, count as u64);
        }

        Ok(stats)
    }

    fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.changes.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Delivery;
    use chrono::NaiveDate;

    fn new_guarantee(number: &str, kind: GuaranteeType, value: f64) -> NewGuarantee {
        NewGuarantee {
            guarantee_number: number.to_string(),
            guarantee_type: kind,
            value,
            currency: None,
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: None,
            bank_name: "Alinma".to_string(),
        }
    }

    #[test]
    fn blank_location_is_not_configured() {
        assert!(matches!(
            SqliteStore::open("  "),
            Err(StoreError::NotConfigured(_))
        ));
    }

    #[test]
    fn create_fills_defaults_and_lists_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store
            .create(new_guarantee("BG-1", GuaranteeType::Performance, 10.0))
            .unwrap();
        let second = store
            .create(new_guarantee("BG-2", GuaranteeType::Final, 20.0))
            .unwrap();

        assert_eq!(first.currency, "SAR");
        assert_eq!(first.status, GuaranteeStatus::Pending);
        assert_ne!(first.id, second.id);

        let ids: Vec<_> = store.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(store.get(&first.id).unwrap(), first);
    }

    #[test]
    fn home_currency_is_configurable() {
        let store = SqliteStore::open_in_memory()
            .unwrap()
            .with_home_currency("AED");
        let record = store
            .create(new_guarantee("BG-1", GuaranteeType::Initial, 1.0))
            .unwrap();
        assert_eq!(record.currency, "AED");
    }

    #[test]
    fn negative_value_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .create(new_guarantee("BG-1", GuaranteeType::Initial, -5.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let record = store
            .create(new_guarantee("BG-1", GuaranteeType::Performance, 10.0))
            .unwrap();

        let updated = store
            .update(
                &record.id,
                GuaranteeUpdate {
                    status: Some(GuaranteeStatus::Active),
                    value: Some(99.5),
                    ..GuaranteeUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, GuaranteeStatus::Active);
        assert_eq!(updated.value, 99.5);
        assert_eq!(updated.guarantee_number, record.guarantee_number);
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(store.get(&record.id).unwrap(), updated);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update("nope", GuaranteeUpdate::default()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn statistics_aggregate_all_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.statistics().unwrap(), Statistics::default());

        store
            .create(new_guarantee("BG-1", GuaranteeType::Performance, 100.0))
            .unwrap();
        store
            .create(new_guarantee("BG-2", GuaranteeType::Performance, 50.0))
            .unwrap();
        let mut expired = new_guarantee("BG-3", GuaranteeType::Maintenance, 25.5);
        expired.status = Some(GuaranteeStatus::Expired);
        store.create(expired).unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total_value, 175.5);
        assert_eq!(stats.pending_count, 2);
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.active_count, 0);
        assert_eq!(stats.type_distribution[&GuaranteeType::Performance], 2);
        assert_eq!(stats.type_distribution[&GuaranteeType::Maintenance], 1);
        assert!(!stats.type_distribution.contains_key(&GuaranteeType::Final));
    }

    #[tokio::test]
    async fn writes_are_published_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut sub = store.subscribe();

        let record = store
            .create(new_guarantee("BG-1", GuaranteeType::Final, 1.0))
            .unwrap();
        let updated = store
            .update(
                &record.id,
                GuaranteeUpdate {
                    bank_name: Some("Riyad Bank".into()),
                    ..GuaranteeUpdate::default()
                },
            )
            .unwrap();
        store.delete(&record.id).unwrap();

        assert_eq!(sub.next().await, Some(Delivery::Event(ChangeEvent::Insert(record.clone()))));
        assert_eq!(sub.next().await, Some(Delivery::Event(ChangeEvent::Update(updated))));
        assert_eq!(
            sub.next().await,
            Some(Delivery::Event(ChangeEvent::Delete { id: record.id }))
        );
    }

    #[tokio::test]
    async fn discarded_events_are_not_delivered() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut sub = store.subscribe();

        for number in ["BG-1", "BG-2", "BG-3"] {
            store
                .create(new_guarantee(number, GuaranteeType::Initial, 1.0))
                .unwrap();
        }
        assert_eq!(sub.discard_pending(), 3);
        assert_eq!(sub.discard_pending(), 0);

        let later = store
            .create(new_guarantee("BG-4", GuaranteeType::Initial, 1.0))
            .unwrap();
        assert_eq!(sub.next().await, Some(Delivery::Event(ChangeEvent::Insert(later))));
    }

    #[test]
    fn file_backed_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guarantees.sqlite");
        let path = path.to_str().unwrap();

        let id = SqliteStore::open(path)
            .unwrap()
            .create(new_guarantee("BG-1", GuaranteeType::Initial, 7.0))
            .unwrap()
            .id;

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.get(&id).unwrap().guarantee_number, "BG-1");
    }
}
