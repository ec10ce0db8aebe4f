// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use jid::BareJid;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::models::Room;

/// Keeps track of the rooms of one account, keyed by their bare JID.
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: RwLock<HashMap<BareJid, Room>>,
}

impl RoomManager {
    pub fn new() -> Self {
        RoomManager {
            rooms: Default::default(),
        }
    }

    pub fn get_room(&self, room_id: &BareJid) -> Option<Room> {
        self.rooms.read().get(room_id).cloned()
    }

    pub fn get_all_rooms(&self) -> Vec<Room> {
        self.rooms.read().values().cloned().collect()
    }

    /// Registers `room`. Returns false and leaves the registry untouched if a room with the
    /// same JID exists already.
    pub fn add_room(&self, room: Room) -> bool {
        let mut rooms = self.rooms.write();

        if rooms.contains_key(room.id()) {
            warn!("Room {} is already registered.", room.id());
            return false;
        }

        debug!("Adding room {}.", room.id());
        rooms.insert(room.id().clone(), room);
        true
    }

    /// Forgets the room with `room_id`. Returns false if there was no such room.
    pub fn leave_room(&self, room_id: &BareJid) -> bool {
        let removed = self.rooms.write().remove(room_id).is_some();
        if removed {
            debug!("Removed room {}.", room_id);
        }
        removed
    }

    pub fn delete_room(&self, room_id: &BareJid) -> bool {
        self.leave_room(room_id)
    }
}
