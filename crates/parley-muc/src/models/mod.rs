// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use affiliation::Affiliation;
pub use discussion_history::{DelayedMessage, DelayedMessages, DiscussionHistory};
pub use occupant::{Availability, Occupant, OccupantStatus};
pub use role::Role;
pub use room::{Room, RoomObserver};
pub use room_config_field::{
    RoomConfigFieldListMultiValue, RoomConfigFieldListValue, RoomConfigFieldValue,
    RoomConfigFormField,
};
pub use room_config_form::RoomConfigForm;
pub use room_disco_info::{AnonymityLevel, RoomConfigChange, RoomDiscoInfo};
pub use roster::{OccupantsByRole, RoomRoster};
pub use updates::{
    Actor, AffiliationRoleUpdate, AffiliationUpdate, RoleUpdate, SelfAffiliationRoleUpdate,
    SelfAffiliationUpdate, SelfRoleUpdate,
};

mod affiliation;
mod discussion_history;
mod occupant;
mod role;
mod room;
pub mod room_config_field;
mod room_config_form;
mod room_disco_info;
mod roster;
mod updates;
