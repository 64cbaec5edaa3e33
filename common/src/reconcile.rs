use crate::model::{ChangeEvent, GuaranteeRecord};

/// Client-side copy of the guarantee list, newest first.
///
/// The store stays authoritative. The list is seeded from a full fetch and
/// then kept current by applying change events in the order they arrive,
/// without refetching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuaranteeList {
    records: Vec<GuaranteeRecord>,
}

impl GuaranteeList {
    /// `records` must already be ordered newest first.
    pub fn new(records: Vec<GuaranteeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[GuaranteeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces the whole list after a refetch.
    pub fn reset(&mut self, records: Vec<GuaranteeRecord>) {
        self.records = records;
    }

    /// Applies one change and reports whether the list was modified.
    ///
    /// - Insert prepends, even when a record with the same id is present.
    /// - Update replaces the first record with the same id, in place.
    /// - Delete removes the first record with the id.
    ///
    /// Updates and deletes for unknown ids leave the list untouched.
    pub fn apply(&mut self, event: ChangeEvent) -> bool {
        match event {
            ChangeEvent::Insert(record) => {
                self.records.insert(0, record);
                true
            }
            ChangeEvent::Update(record) => {
                match self.records.iter_mut().find(|r| r.id == record.id) {
                    Some(slot) => {
                        *slot = record;
                        true
                    }
                    None => false,
                }
            }
            ChangeEvent::Delete { id } => match self.position(&id) {
                Some(idx) => {
                    self.records.remove(idx);
                    true
                }
                None => false,
            },
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}
