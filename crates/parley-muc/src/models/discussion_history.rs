// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedMessage {
    pub nickname: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// The delayed messages of one local calendar day in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedMessages {
    pub date: NaiveDate,
    pub messages: Vec<DelayedMessage>,
}

/// Messages a room replayed when we joined, grouped by the local date they were sent on.
#[derive(Debug, Default)]
pub struct DiscussionHistory {
    groups: RwLock<Vec<DelayedMessages>>,
}

impl DelayedMessages {
    fn new(date: NaiveDate) -> Self {
        DelayedMessages {
            date,
            messages: vec![],
        }
    }

    /// Appends `message` unless it is older than the last message of the group.
    fn add(&mut self, message: DelayedMessage) -> bool {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                return false;
            }
        }
        self.messages.push(message);
        true
    }
}

impl DiscussionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the group of its local date. Returns false if the message arrived out
    /// of order and was dropped.
    pub fn add_message(
        &self,
        nickname: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> bool {
        let date = timestamp.with_timezone(&Local).date_naive();
        let message = DelayedMessage {
            nickname: nickname.into(),
            message: message.into(),
            timestamp,
        };

        let mut groups = self.groups.write();

        let group = match groups.iter().position(|group| group.date == date) {
            Some(idx) => &mut groups[idx],
            None => {
                groups.push(DelayedMessages::new(date));
                let idx = groups.len() - 1;
                &mut groups[idx]
            }
        };

        let added = group.add(message);
        if !added {
            debug!("Dropped out-of-order history message from {}.", date);
        }
        added
    }

    pub fn groups(&self) -> Vec<DelayedMessages> {
        self.groups.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().iter().all(|group| group.messages.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn local(day: u32, hour: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2023, 5, day, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_groups_by_date_in_order() {
        let history = DiscussionHistory::new();

        assert!(history.add_message("a", "first", local(10, 9)));
        assert!(history.add_message("b", "second", local(10, 11)));

        let groups = history.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].messages.iter().map(|m| m.message.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_drops_out_of_order_message() {
        let history = DiscussionHistory::new();

        history.add_message("a", "first", local(10, 9));
        history.add_message("b", "second", local(10, 11));
        assert!(!history.add_message("c", "late", local(10, 8)));

        let groups = history.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].messages.len(), 2);
    }

    #[test]
    fn test_accepts_equal_timestamps() {
        let history = DiscussionHistory::new();

        assert!(history.add_message("a", "one", local(10, 9)));
        assert!(history.add_message("b", "two", local(10, 9)));
        assert_eq!(history.groups()[0].messages.len(), 2);
    }

    #[test]
    fn test_starts_new_group_per_day() {
        let history = DiscussionHistory::new();
        assert!(history.is_empty());

        history.add_message("a", "monday", local(8, 12));
        history.add_message("a", "tuesday", local(9, 12));

        let groups = history.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2023, 5, 8).unwrap());
        assert_eq!(groups[1].date, NaiveDate::from_ymd_opt(2023, 5, 9).unwrap());
        assert!(!history.is_empty());
    }
}
