// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

//! Status codes carried in `<status code='…'/>` elements of muc#user payloads.
//! https://xmpp.org/extensions/xep-0045.html#registrar-statuscodes

/// Inform occupants that room logging is now enabled
pub const LOGGING_ENABLED: u16 = 170;
/// Inform occupants that room logging is now disabled
pub const LOGGING_DISABLED: u16 = 171;
/// Inform occupants that the room is now non-anonymous
pub const NON_ANONYMOUS: u16 = 172;
/// Inform occupants that the room is now semi-anonymous
pub const SEMI_ANONYMOUS: u16 = 173;
/// Inform occupants that a non-privacy-related room configuration change has occurred
pub const CONFIG_CHANGED: u16 = 104;
/// Inform user that presence refers to itself
pub const SELF_PRESENCE: u16 = 110;
/// Inform user that a new room has been created
pub const ROOM_CREATED: u16 = 201;
/// Inform user that they have been removed because the room became members-only
pub const REMOVED_MEMBERS_ONLY: u16 = 322;
