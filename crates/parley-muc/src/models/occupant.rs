// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use jid::Jid;
use serde::{Deserialize, Serialize};
use xmpp_parsers::presence;

use super::{Affiliation, Role};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Availability {
    Available,
    #[default]
    Unavailable,
    DoNotDisturb,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupantStatus {
    pub availability: Availability,
    pub message: Option<String>,
}

/// A nickname-identified participant currently present in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub nickname: String,
    pub affiliation: Affiliation,
    pub role: Role,
    /// The real JID of the occupant. Only available in non-anonymous rooms or to moderators.
    pub real_jid: Option<Jid>,
    pub status: OccupantStatus,
}

impl Occupant {
    pub fn new(nickname: impl Into<String>, affiliation: Affiliation, role: Role) -> Self {
        Occupant {
            nickname: nickname.into(),
            affiliation,
            role,
            real_jid: None,
            status: OccupantStatus {
                availability: Availability::Available,
                message: None,
            },
        }
    }

    pub fn with_real_jid(mut self, jid: impl Into<Jid>) -> Self {
        self.real_jid = Some(jid.into());
        self
    }

    pub fn with_status(mut self, status: OccupantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_owner(&self) -> bool {
        self.affiliation.is_owner()
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }
}

impl From<(Option<presence::Type>, Option<presence::Show>)> for Availability {
    fn from(value: (Option<presence::Type>, Option<presence::Show>)) -> Self {
        match value {
            (None, None) => Availability::Available,
            (None, Some(presence::Show::Away)) => Availability::Away,
            (None, Some(presence::Show::Chat)) => Availability::Available,
            (None, Some(presence::Show::Dnd)) => Availability::DoNotDisturb,
            (None, Some(presence::Show::Xa)) => Availability::Away,
            (Some(_), _) => Availability::Unavailable,
        }
    }
}

impl From<&presence::Presence> for OccupantStatus {
    fn from(value: &presence::Presence) -> Self {
        OccupantStatus {
            availability: Availability::from((
                if value.type_ == presence::Type::None {
                    None
                } else {
                    Some(value.type_.clone())
                },
                value.show.clone(),
            )),
            message: value.statuses.first_key_value().map(|v| v.1.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use xmpp_parsers::presence::{Presence, Show, Type};

    use super::*;

    #[test]
    fn test_status_from_presence() {
        let mut presence = Presence::new(Type::None);
        presence.show = Some(Show::Dnd);
        presence.set_status("en", "In a meeting");

        assert_eq!(
            OccupantStatus::from(&presence),
            OccupantStatus {
                availability: Availability::DoNotDisturb,
                message: Some("In a meeting".to_string()),
            }
        );

        assert_eq!(
            OccupantStatus::from(&Presence::new(Type::Unavailable)).availability,
            Availability::Unavailable
        );
    }
}
