//! # Reminder Drafts
//!
//! Holds a submitted reminder form until its owner picks the repeat days.
//! Drafts are keyed by a random id carried in the day select's custom id and
//! expire after ten minutes.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use crate::features::reminders::form::PendingReminder;
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DRAFT_TTL: Duration = Duration::from_secs(10 * 60);

/// Where a finished draft is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// Append a new reminder posting to `channel_id`
    Create { channel_id: u64 },
    /// Replace the owner's reminder at `index`
    Edit { index: usize, channel_id: u64 },
}

impl DraftTarget {
    pub fn channel_id(&self) -> u64 {
        match self {
            Self::Create { channel_id } | Self::Edit { channel_id, .. } => *channel_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Draft {
    pub owner_id: String,
    pub reminder: PendingReminder,
    pub target: DraftTarget,
    created_at: Instant,
}

#[derive(Clone)]
pub struct DraftBook {
    drafts: Arc<DashMap<Uuid, Draft>>,
    ttl: Duration,
}

impl Default for DraftBook {
    fn default() -> Self {
        Self::new(DRAFT_TTL)
    }
}

impl DraftBook {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Park a draft and return the id to embed in the day select
    pub fn park(&self, owner_id: &str, reminder: PendingReminder, target: DraftTarget) -> Uuid {
        self.purge_expired();
        let id = Uuid::new_v4();
        self.drafts.insert(
            id,
            Draft {
                owner_id: owner_id.to_string(),
                reminder,
                target,
                created_at: Instant::now(),
            },
        );
        debug!("Parked reminder draft {id} for user {owner_id}");
        id
    }

    /// Remove and return the draft if `owner_id` owns it and it has not expired
    pub fn take(&self, id: &Uuid, owner_id: &str) -> Option<Draft> {
        let (_, draft) = self
            .drafts
            .remove_if(id, |_, draft| draft.owner_id == owner_id)?;
        (draft.created_at.elapsed() < self.ttl).then_some(draft)
    }

    /// Drop expired drafts, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.drafts.len();
        self.drafts
            .retain(|_, draft| draft.created_at.elapsed() < self.ttl);
        before.saturating_sub(self.drafts.len())
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::model::TimeOfDay;

    fn pending() -> PendingReminder {
        PendingReminder {
            title: "Standup".to_string(),
            time: TimeOfDay::new(9, 0).unwrap(),
            checklist: vec![],
            lead_minutes: 5,
        }
    }

    #[test]
    fn test_take_is_owner_only_and_once() {
        let book = DraftBook::default();
        let id = book.park("1", pending(), DraftTarget::Create { channel_id: 7 });

        assert!(book.take(&id, "2").is_none());
        assert_eq!(book.len(), 1);

        let draft = book.take(&id, "1").unwrap();
        assert_eq!(draft.target.channel_id(), 7);
        assert!(book.take(&id, "1").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn test_expired_drafts_are_dropped() {
        let book = DraftBook::new(Duration::ZERO);
        let id = book.park("1", pending(), DraftTarget::Edit { index: 0, channel_id: 7 });

        assert!(book.take(&id, "1").is_none());

        book.park("1", pending(), DraftTarget::Create { channel_id: 7 });
        assert_eq!(book.purge_expired(), 1);
        assert!(book.is_empty());
    }
}
