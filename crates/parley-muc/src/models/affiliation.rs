// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::cmp::Ordering;
use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter};
use xmpp_parsers::muc::user;

use crate::error::ModelError;

/// The long-term relationship of a user with a room. It survives leaving and re-entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Affiliation {
    /// The user who created the room, or who got appointed by its creator
    /// to be their equal.
    Owner,

    /// A user who has been empowered by an owner to do administrative
    /// operations.
    Admin,

    /// A user who is whitelisted to speak in moderated rooms, or to join a
    /// member-only room.
    Member,

    /// A user who has been banned from this room.
    Outcast,

    /// A normal participant.
    #[default]
    None,
}

impl Affiliation {
    pub fn is_owner(&self) -> bool {
        *self == Affiliation::Owner
    }

    /// True for admins only. Owners have admin privileges but are not admins.
    pub fn is_admin(&self) -> bool {
        *self == Affiliation::Admin
    }

    pub fn is_member(&self) -> bool {
        *self == Affiliation::Member
    }

    pub fn is_banned(&self) -> bool {
        *self == Affiliation::Outcast
    }

    pub fn is_outcast(&self) -> bool {
        self.is_banned()
    }

    pub fn is_none(&self) -> bool {
        *self == Affiliation::None
    }

    /// Admins and owners may moderate the room.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Affiliation::Admin | Affiliation::Owner)
    }

    /// A discrete number identifying the affiliation. Outcast ranks below None so that a ban
    /// registers as a change.
    pub fn rank(&self) -> u8 {
        match self {
            Affiliation::Outcast => 0,
            Affiliation::None => 1,
            Affiliation::Member => 2,
            Affiliation::Admin => 3,
            Affiliation::Owner => 4,
        }
    }

    pub fn is_different_from(&self, other: &Affiliation) -> bool {
        self.rank() != other.rank()
    }

    /// Returns true if `self` grants strictly fewer privileges than `other`. None and Outcast
    /// are on the same level, neither is lower than the other.
    pub fn is_lower_than(&self, other: &Affiliation) -> bool {
        self.partial_cmp(other) == Some(Ordering::Less)
    }

    fn privilege_level(&self) -> u8 {
        match self {
            Affiliation::Outcast | Affiliation::None => 0,
            Affiliation::Member => 1,
            Affiliation::Admin => 2,
            Affiliation::Owner => 3,
        }
    }
}

impl PartialOrd for Affiliation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        match self.privilege_level().cmp(&other.privilege_level()) {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl FromStr for Affiliation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "owner" => Affiliation::Owner,
            "admin" => Affiliation::Admin,
            "member" => Affiliation::Member,
            "outcast" => Affiliation::Outcast,
            "none" => Affiliation::None,
            _ => return Err(ModelError::UnknownAffiliation(s.to_string())),
        })
    }
}

impl From<user::Affiliation> for Affiliation {
    fn from(value: user::Affiliation) -> Self {
        match value {
            user::Affiliation::Owner => Affiliation::Owner,
            user::Affiliation::Admin => Affiliation::Admin,
            user::Affiliation::Member => Affiliation::Member,
            user::Affiliation::Outcast => Affiliation::Outcast,
            user::Affiliation::None => Affiliation::None,
        }
    }
}

impl From<Affiliation> for user::Affiliation {
    fn from(value: Affiliation) -> Self {
        match value {
            Affiliation::Owner => user::Affiliation::Owner,
            Affiliation::Admin => user::Affiliation::Admin,
            Affiliation::Member => user::Affiliation::Member,
            Affiliation::Outcast => user::Affiliation::Outcast,
            Affiliation::None => user::Affiliation::None,
        }
    }
}
