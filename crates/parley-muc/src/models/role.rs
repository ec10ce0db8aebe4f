// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter};
use xmpp_parsers::muc::user;

use crate::error::ModelError;

/// The privilege level of an occupant for the duration of a visit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Not present in the room.
    #[default]
    None,
    /// May be present but cannot speak in moderated rooms.
    Visitor,
    Participant,
    Moderator,
}

impl Role {
    pub fn is_none(&self) -> bool {
        *self == Role::None
    }

    pub fn is_visitor(&self) -> bool {
        *self == Role::Visitor
    }

    pub fn is_participant(&self) -> bool {
        *self == Role::Participant
    }

    pub fn is_moderator(&self) -> bool {
        *self == Role::Moderator
    }

    pub fn rank(&self) -> u8 {
        match self {
            Role::None => 0,
            Role::Visitor => 1,
            Role::Participant => 2,
            Role::Moderator => 3,
        }
    }

    pub fn is_different_from(&self, other: &Role) -> bool {
        self.rank() != other.rank()
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "none" => Role::None,
            "visitor" => Role::Visitor,
            "participant" => Role::Participant,
            "moderator" => Role::Moderator,
            _ => return Err(ModelError::UnknownRole(s.to_string())),
        })
    }
}

impl From<user::Role> for Role {
    fn from(value: user::Role) -> Self {
        match value {
            user::Role::Moderator => Role::Moderator,
            user::Role::Participant => Role::Participant,
            user::Role::Visitor => Role::Visitor,
            user::Role::None => Role::None,
        }
    }
}

impl From<Role> for user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::Moderator => user::Role::Moderator,
            Role::Participant => user::Role::Participant,
            Role::Visitor => user::Role::Visitor,
            Role::None => user::Role::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parses_tokens() {
        for role in Role::iter() {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
        assert_eq!(
            Role::from_str("admin").unwrap_err(),
            ModelError::UnknownRole("admin".to_string())
        );
    }

    #[test]
    fn test_order_follows_rank() {
        for a in Role::iter() {
            for b in Role::iter() {
                assert_eq!(a < b, a.rank() < b.rank());
                assert_eq!(a.is_different_from(&b), a != b);
            }
        }
        assert!(Role::Visitor < Role::Moderator);
    }
}
