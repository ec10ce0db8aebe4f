// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use room_creation::{create_instant_room, create_reserved_room, RoomCreation};

mod room_creation;
