// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::{DateTime, Utc};
use jid::{BareJid, Jid};
use xmpp_parsers::stanza_error::DefinedCondition;

use crate::models::{
    Affiliation, AffiliationRoleUpdate, AffiliationUpdate, AnonymityLevel,
    DelayedMessages, Occupant, OccupantStatus, Role, RoleUpdate, RoomConfigChange, RoomConfigForm,
    RoomDiscoInfo, SelfAffiliationRoleUpdate, SelfAffiliationUpdate, SelfRoleUpdate,
};

/// Describes an occupant as seen in the presence that triggered an event.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupantInfo {
    pub nickname: String,
    pub real_jid: Option<Jid>,
    pub affiliation: Affiliation,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MucEvent {
    /// The room was created on the server by us.
    RoomCreated { room: BareJid },

    /// The name of the room changed.
    RoomRenamed,

    /// The room was destroyed by an owner.
    RoomDestroyed {
        reason: Option<String>,
        alternative_room: Option<BareJid>,
        password: Option<String>,
    },

    OccupantJoined { occupant: OccupantInfo },

    /// The presence of an occupant changed.
    OccupantUpdated {
        occupant: OccupantInfo,
        status: OccupantStatus,
    },

    OccupantLeft { occupant: OccupantInfo },

    /// An occupant was removed from the room, e.g. kicked or banned.
    OccupantRemoved { nickname: String },

    SelfOccupantJoined { occupant: OccupantInfo },

    /// We are no longer in the room.
    SelfOccupantRemoved,

    /// An occupant was removed because the room became members-only.
    NonMemberRemoved { nickname: String },

    LiveMessageReceived {
        nickname: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    DelayedMessageReceived {
        nickname: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// The room finished replaying its history.
    DiscussionHistoryReceived { history: Vec<DelayedMessages> },

    /// An occupant changed the subject.
    SubjectUpdated { nickname: String, subject: String },

    /// The subject sent when joining.
    SubjectReceived { subject: String },

    LoggingEnabled,
    LoggingDisabled,

    RoomAnonymityChanged { anonymity: AnonymityLevel },

    DiscoInfoReceived { info: RoomDiscoInfo },

    /// The configuration form of a reserved room was received.
    ConfigReceived { form: RoomConfigForm },

    ConfigChanged {
        changes: Vec<RoomConfigChange>,
        info: RoomDiscoInfo,
    },

    /// The disco info request triggered by a configuration change did not complete.
    ConfigTimeout,

    AffiliationUpdated { update: AffiliationUpdate },
    SelfAffiliationUpdated { update: SelfAffiliationUpdate },
    RoleUpdated { update: RoleUpdate },
    SelfRoleUpdated { update: SelfRoleUpdate },
    AffiliationRoleUpdated { update: AffiliationRoleUpdate },
    SelfAffiliationRoleUpdated { update: SelfAffiliationRoleUpdate },

    Error { error: MucErrorType },
}

/// The kinds of errors a MUC service reports back to an occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MucErrorType {
    NotAuthorized,
    Forbidden,
    ItemNotFound,
    NotAllowed,
    NotAcceptable,
    RegistrationRequired,
    Conflict,
    ServiceUnavailable,
    MessageForbidden,
    MessageNotAcceptable,
    Unknown,
}

impl MucErrorType {
    /// Classifies an error returned for a presence, i.e. when joining.
    pub fn from_presence_error(condition: &DefinedCondition) -> Self {
        match condition {
            DefinedCondition::NotAuthorized => Self::NotAuthorized,
            DefinedCondition::Forbidden => Self::Forbidden,
            DefinedCondition::ItemNotFound => Self::ItemNotFound,
            DefinedCondition::NotAllowed => Self::NotAllowed,
            DefinedCondition::NotAcceptable => Self::NotAcceptable,
            DefinedCondition::RegistrationRequired => Self::RegistrationRequired,
            DefinedCondition::Conflict => Self::Conflict,
            DefinedCondition::ServiceUnavailable => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }

    /// Classifies an error returned for a groupchat message.
    pub fn from_message_error(condition: &DefinedCondition) -> Self {
        match condition {
            DefinedCondition::Forbidden => Self::MessageForbidden,
            DefinedCondition::NotAcceptable => Self::MessageNotAcceptable,
            _ => Self::from_presence_error(condition),
        }
    }
}

impl From<&Occupant> for OccupantInfo {
    fn from(value: &Occupant) -> Self {
        OccupantInfo {
            nickname: value.nickname.clone(),
            real_jid: value.real_jid.clone(),
            affiliation: value.affiliation,
            role: value.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert_eq!(
            MucErrorType::from_presence_error(&DefinedCondition::Conflict),
            MucErrorType::Conflict
        );
        assert_eq!(
            MucErrorType::from_presence_error(&DefinedCondition::Forbidden),
            MucErrorType::Forbidden
        );
        assert_eq!(
            MucErrorType::from_message_error(&DefinedCondition::Forbidden),
            MucErrorType::MessageForbidden
        );
        assert_eq!(
            MucErrorType::from_message_error(&DefinedCondition::NotAcceptable),
            MucErrorType::MessageNotAcceptable
        );
        assert_eq!(
            MucErrorType::from_message_error(&DefinedCondition::ItemNotFound),
            MucErrorType::ItemNotFound
        );
        assert_eq!(
            MucErrorType::from_presence_error(&DefinedCondition::InternalServerError),
            MucErrorType::Unknown
        );
    }
}
