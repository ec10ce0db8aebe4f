// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jid::BareJid;
use parking_lot::RwLock;
use tracing::error;

use crate::events::MucEvent;

use super::{DelayedMessages, DiscussionHistory, Occupant, RoomDiscoInfo, RoomRoster};

/// Receives the events published by a room.
pub trait RoomObserver: Send + Sync {
    fn handle_event(&self, room: &BareJid, event: &MucEvent);
}

impl<F> RoomObserver for F
where
    F: Fn(&BareJid, &MucEvent) + Send + Sync,
{
    fn handle_event(&self, room: &BareJid, event: &MucEvent) {
        self(room, event)
    }
}

/// A multi-user chat room we know about. Clones share the same state.
#[derive(Clone)]
pub struct Room {
    inner: Arc<RoomInner>,
}

struct RoomInner {
    id: BareJid,
    roster: RoomRoster,
    history: DiscussionHistory,
    details: RwLock<RoomDetails>,
    observers: RwLock<Vec<Arc<dyn RoomObserver>>>,
}

#[derive(Debug, Default)]
struct RoomDetails {
    self_nickname: Option<String>,
    subject: Option<String>,
    properties: Option<RoomDiscoInfo>,
}

impl Room {
    pub fn new(id: BareJid) -> Self {
        Room {
            inner: Arc::new(RoomInner {
                id,
                roster: RoomRoster::new(),
                history: DiscussionHistory::new(),
                details: Default::default(),
                observers: Default::default(),
            }),
        }
    }

    pub fn id(&self) -> &BareJid {
        &self.inner.id
    }

    pub fn roster(&self) -> &RoomRoster {
        &self.inner.roster
    }
}

impl Room {
    /// Marks `occupant` as the local user and adds it to the roster.
    pub fn add_self_occupant(&self, occupant: Occupant) {
        let nickname = occupant.nickname.clone();
        self.inner.roster.upsert(occupant);
        self.inner.details.write().self_nickname = Some(nickname);
    }

    pub fn self_occupant(&self) -> Option<Occupant> {
        let nickname = self.inner.details.read().self_nickname.clone()?;
        self.inner.roster.get(&nickname)
    }

    pub fn self_occupant_nickname(&self) -> Option<String> {
        self.inner.details.read().self_nickname.clone()
    }

    pub fn is_self_occupant_in_the_room(&self) -> bool {
        self.self_occupant().is_some()
    }

    pub fn is_self_occupant_an_owner(&self) -> bool {
        self.self_occupant()
            .map(|occupant| occupant.is_owner())
            .unwrap_or(false)
    }

    /// Forgets the local user and removes it from the roster.
    pub fn remove_self_occupant(&self) -> Option<Occupant> {
        let nickname = self.inner.details.write().self_nickname.take()?;
        self.inner.roster.remove(&nickname)
    }
}

impl Room {
    /// Stores `subject`. Returns true if a different subject was replaced, false when this is
    /// the first subject of the room or nothing changed.
    pub fn update_subject(&self, subject: impl Into<String>) -> bool {
        let subject = subject.into();
        let mut details = self.inner.details.write();

        match &details.subject {
            None => {
                details.subject = Some(subject);
                false
            }
            Some(current) if *current == subject => false,
            Some(_) => {
                details.subject = Some(subject);
                true
            }
        }
    }

    pub fn subject(&self) -> Option<String> {
        self.inner.details.read().subject.clone()
    }

    pub fn has_subject(&self) -> bool {
        self.inner.details.read().subject.is_some()
    }

    pub fn add_history_message(
        &self,
        nickname: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> bool {
        self.inner
            .history
            .add_message(nickname, message, timestamp)
    }

    pub fn history(&self) -> Vec<DelayedMessages> {
        self.inner.history.groups()
    }

    pub fn has_history(&self) -> bool {
        !self.inner.history.is_empty()
    }

    /// Replaces the known room properties.
    pub fn update_properties(&self, properties: RoomDiscoInfo) {
        self.inner.details.write().properties = Some(properties);
    }

    pub fn properties(&self) -> Option<RoomDiscoInfo> {
        self.inner.details.read().properties.clone()
    }

    pub fn anyone_can_change_subject(&self) -> bool {
        self.inner
            .details
            .read()
            .properties
            .as_ref()
            .map(|properties| properties.occupants_can_change_subject)
            .unwrap_or(false)
    }

    /// Only occupants may change the subject. Moderators always can, everybody else only if
    /// the room allows it.
    pub fn can_change_subject(&self) -> bool {
        let Some(occupant) = self.self_occupant() else {
            return false;
        };
        self.anyone_can_change_subject() || occupant.is_moderator()
    }
}

impl Room {
    pub fn subscribe(&self, observer: impl RoomObserver + 'static) {
        self.inner.observers.write().push(Arc::new(observer));
    }

    /// Hands `event` to all observers in the order they subscribed. A panicking observer is
    /// logged and does not keep the others from running.
    pub fn publish(&self, event: &MucEvent) {
        let observers = self.inner.observers.read().clone();

        for observer in observers {
            let result = catch_unwind(AssertUnwindSafe(|| {
                observer.handle_event(&self.inner.id, event)
            }));

            if result.is_err() {
                error!(
                    "Room observer panicked while handling event for {}.",
                    self.inner.id
                );
            }
        }
    }
}

impl Debug for Room {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.inner.id)
            .field("roster", &self.inner.roster)
            .field("details", &*self.inner.details.read())
            .field("observers", &self.inner.observers.read().len())
            .finish()
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use crate::models::{Affiliation, Role};

    use super::*;

    fn room() -> Room {
        Room::new(parley_xmpp::bare!("coven@chat.shakespeare.lit"))
    }

    fn properties(occupants_can_change_subject: bool) -> RoomDiscoInfo {
        RoomDiscoInfo {
            occupants_can_change_subject,
            ..Default::default()
        }
    }

    #[test]
    fn test_self_occupant() {
        let room = room();
        assert!(!room.is_self_occupant_in_the_room());
        assert!(!room.is_self_occupant_an_owner());

        room.add_self_occupant(Occupant::new("me", Affiliation::Owner, Role::Moderator));
        assert!(room.is_self_occupant_in_the_room());
        assert!(room.is_self_occupant_an_owner());
        assert_eq!(room.roster().len(), 1);

        room.roster().update_affiliation("me", Affiliation::Member);
        assert!(!room.is_self_occupant_an_owner());

        assert!(room.remove_self_occupant().is_some());
        assert!(!room.is_self_occupant_in_the_room());
        assert!(room.roster().is_empty());
    }

    #[test]
    fn test_update_subject() {
        let room = room();
        assert!(!room.has_subject());

        assert!(!room.update_subject("Witchcraft"));
        assert_eq!(room.subject(), Some("Witchcraft".to_string()));
        assert!(!room.update_subject("Witchcraft"));
        assert!(room.update_subject("Potions"));
        assert_eq!(room.subject(), Some("Potions".to_string()));
    }

    #[test]
    fn test_update_properties_replaces_snapshot() {
        let room = room();
        assert_eq!(room.properties(), None);

        room.update_properties(properties(true));
        assert!(room.anyone_can_change_subject());

        room.update_properties(properties(false));
        assert!(!room.anyone_can_change_subject());
    }

    #[test]
    fn test_can_change_subject() {
        let room = room();
        room.update_properties(properties(true));
        assert!(!room.can_change_subject());

        room.add_self_occupant(Occupant::new("me", Affiliation::Owner, Role::Visitor));
        assert!(room.can_change_subject());

        room.update_properties(properties(false));
        assert!(!room.can_change_subject());

        room.roster().update_role("me", Role::Moderator);
        assert!(room.can_change_subject());
    }

    #[test]
    fn test_publish_in_order() {
        let room = room();
        let received = Arc::new(Mutex::new(vec![]));

        for idx in 0..3 {
            let received = received.clone();
            room.subscribe(move |_: &BareJid, _: &MucEvent| received.lock().push(idx));
        }

        room.publish(&MucEvent::RoomRenamed);
        assert_eq!(*received.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_publish_survives_panicking_observer() {
        let room = room();
        let count = Arc::new(AtomicUsize::new(0));

        let first = count.clone();
        room.subscribe(move |_: &BareJid, _: &MucEvent| {
            first.fetch_add(1, Ordering::SeqCst);
        });
        room.subscribe(|_: &BareJid, _: &MucEvent| panic!("observer failure"));
        let third = count.clone();
        room.subscribe(move |_: &BareJid, _: &MucEvent| {
            third.fetch_add(1, Ordering::SeqCst);
        });

        room.publish(&MucEvent::LoggingEnabled);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_history() {
        let room = room();
        assert!(!room.has_history());
        room.add_history_message("crone1", "Hi", Utc::now());
        assert!(room.has_history());
        assert_eq!(room.history()[0].messages[0].nickname, "crone1");
    }
}
