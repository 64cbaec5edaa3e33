use crate::model::guarantee::GuaranteeRecord;
use serde::{Deserialize, Serialize};

/// A single change published by the store after a successful write.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A record was created. It becomes the head of a newest-first list.
    Insert(GuaranteeRecord),
    /// A record was modified. Carries the full record after the change.
    Update(GuaranteeRecord),
    /// A record was removed. Only its identifier is known.
    Delete { id: String },
}

impl ChangeEvent {
    /// Identifier of the record the event refers to.
    pub fn record_id(&self) -> &str {
        match self {
            ChangeEvent::Insert(record) | ChangeEvent::Update(record) => &record.id,
            ChangeEvent::Delete { id } => id,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Insert(_) => ChangeKind::Insert,
            ChangeEvent::Update(_) => ChangeKind::Update,
            ChangeEvent::Delete { .. } => ChangeKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Wire shape of a change notification: `{eventType, new, old}`.
///
/// `new` is present for inserts and updates; `old` is present for deletes
/// and carries at least the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePayload {
    pub event_type: ChangeKind,
    pub new: Option<GuaranteeRecord>,
    pub old: Option<DeletedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedRef {
    pub id: String,
}

impl From<&ChangeEvent> for ChangePayload {
    fn from(event: &ChangeEvent) -> Self {
        match event {
            ChangeEvent::Insert(record) => ChangePayload {
                event_type: ChangeKind::Insert,
                new: Some(record.clone()),
                old: None,
            },
            ChangeEvent::Update(record) => ChangePayload {
                event_type: ChangeKind::Update,
                new: Some(record.clone()),
                old: None,
            },
            ChangeEvent::Delete { id } => ChangePayload {
                event_type: ChangeKind::Delete,
                new: None,
                old: Some(DeletedRef { id: id.clone() }),
            },
        }
    }
}

impl ChangePayload {
    /// Converts the wire shape into an event.
    ///
    /// Returns `None` when the side the event kind needs is missing; such
    /// payloads carry nothing to apply.
    pub fn into_event(self) -> Option<ChangeEvent> {
        match self.event_type {
            ChangeKind::Insert => self.new.map(ChangeEvent::Insert),
            ChangeKind::Update => self.new.map(ChangeEvent::Update),
            ChangeKind::Delete => self.old.map(|old| ChangeEvent::Delete { id: old.id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_payload_uses_old_side() {
        let json = r#"{"eventType":"DELETE","new":null,"old":{"id":"abc"}}"#;
        let payload: ChangePayload = serde_json::from_str(json).unwrap();
        assert_eq!(
            payload.into_event(),
            Some(ChangeEvent::Delete { id: "abc".into() })
        );
    }

    #[test]
    fn insert_without_record_is_dropped() {
        let payload = ChangePayload {
            event_type: ChangeKind::Insert,
            new: None,
            old: None,
        };
        assert_eq!(payload.into_event(), None);
    }
}
