// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::str::FromStr;

use jid::Jid;
use xmpp_parsers::data_forms::Field;
use xmpp_parsers::disco;
use xmpp_parsers::disco::DiscoInfoResult;

use parley_xmpp::stanza::muc::ns::{disco_feature, roomconfig, roominfo};
use parley_xmpp::stanza::muc::status;
use parley_xmpp::{ns, parse_bool, ParseError};

/// Who can see the real JIDs of the occupants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnonymityLevel {
    /// Everybody can see real JIDs.
    NonAnonymous,
    /// Only moderators can see real JIDs.
    SemiAnonymous,
    #[default]
    Unknown,
}

/// A room configuration change announced through a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomConfigChange {
    NotPrivacyRelated,
    LoggingEnabled,
    LoggingDisabled,
    NonAnonymous,
    SemiAnonymous,
}

impl RoomConfigChange {
    pub fn from_status_code(code: u16) -> Option<Self> {
        Some(match code {
            status::CONFIG_CHANGED => Self::NotPrivacyRelated,
            status::LOGGING_ENABLED => Self::LoggingEnabled,
            status::LOGGING_DISABLED => Self::LoggingDisabled,
            status::NON_ANONYMOUS => Self::NonAnonymous,
            status::SEMI_ANONYMOUS => Self::SemiAnonymous,
            _ => return None,
        })
    }
}

/// The room properties advertised through service discovery.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomDiscoInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub subject: Option<String>,
    pub anonymity: AnonymityLevel,
    pub occupants_can_change_subject: bool,
    pub occupants_can_invite: bool,
    pub logged: bool,
    pub members_only: bool,
    pub moderated: bool,
    pub open: bool,
    pub password_protected: bool,
    pub persistent: bool,
    pub public: bool,
    pub allows_registration: bool,
    pub max_history_fetch: Option<u32>,
    pub occupants: Option<u32>,
    pub contact_jids: Vec<Jid>,
}

impl TryFrom<DiscoInfoResult> for RoomDiscoInfo {
    type Error = ParseError;

    fn try_from(value: DiscoInfoResult) -> Result<Self, Self::Error> {
        let mut result = RoomDiscoInfo::from(value.features.as_slice());

        result.title = value
            .identities
            .iter()
            .find(|identity| identity.category == "conference")
            .and_then(|identity| identity.name.clone());

        for form in &value.extensions {
            if form.form_type.as_deref() != Some(ns::MUC_ROOMINFO) {
                continue;
            }

            for field in &form.fields {
                let Some(var) = &field.var else { continue };

                match var.as_ref() {
                    roominfo::DESCRIPTION => result.description = first_value(field),
                    roominfo::LANG => result.language = first_value(field),
                    roominfo::SUBJECT => result.subject = first_value(field),
                    roominfo::SUBJECT_MOD => {
                        result.occupants_can_change_subject = parse_bool_field(field)?
                    }
                    roominfo::MAX_HISTORY_FETCH => {
                        result.max_history_fetch = first_value(field)
                            .map(|value| value.parse::<u32>())
                            .transpose()?
                    }
                    roominfo::OCCUPANTS => {
                        result.occupants = first_value(field)
                            .map(|value| value.parse::<u32>())
                            .transpose()?
                    }
                    roominfo::CONTACT_JID => {
                        result.contact_jids = field
                            .values
                            .iter()
                            .map(|value| Jid::from_str(value))
                            .collect::<Result<Vec<_>, _>>()?
                    }
                    roomconfig::ROOM_NAME => {
                        if let Some(name) = first_value(field) {
                            result.title = Some(name)
                        }
                    }
                    roomconfig::ALLOW_INVITES | roomconfig::ALLOW_MEMBER_INVITES => {
                        result.occupants_can_invite |= parse_bool_field(field)?
                    }
                    roomconfig::ENABLE_LOGGING | roomconfig::ENABLE_ARCHIVING => {
                        result.logged |= parse_bool_field(field)?
                    }
                    _ => (),
                }
            }
        }

        Ok(result)
    }
}

impl From<&[disco::Feature]> for RoomDiscoInfo {
    fn from(features: &[disco::Feature]) -> Self {
        use disco_feature as feat;

        let mut result = RoomDiscoInfo::default();

        for feature in features {
            match feature.var.as_ref() {
                feat::MEMBERS_ONLY => result.members_only = true,
                feat::MODERATED => result.moderated = true,
                feat::NON_ANONYMOUS => result.anonymity = AnonymityLevel::NonAnonymous,
                feat::OPEN => result.open = true,
                feat::PASSWORD_PROTECTED => result.password_protected = true,
                feat::PERSISTENT => result.persistent = true,
                feat::PUBLIC => result.public = true,
                feat::REGISTER => result.allows_registration = true,
                feat::SEMI_ANONYMOUS => result.anonymity = AnonymityLevel::SemiAnonymous,
                _ => (),
            }
        }

        result
    }
}

fn first_value(field: &Field) -> Option<String> {
    field
        .values
        .first()
        .filter(|value| !value.is_empty())
        .cloned()
}

fn parse_bool_field(field: &Field) -> Result<bool, ParseError> {
    Ok(first_value(field)
        .map(parse_bool)
        .transpose()?
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xmpp_parsers::data_forms::{DataForm, DataFormType, FieldType};
    use xmpp_parsers::disco::{Feature, Identity};

    use super::*;

    fn roominfo_form(fields: Vec<Field>) -> DataForm {
        DataForm {
            type_: DataFormType::Result_,
            form_type: Some(ns::MUC_ROOMINFO.to_string()),
            title: None,
            instructions: None,
            fields,
        }
    }

    #[test]
    fn test_parses_disco_info() {
        let info = DiscoInfoResult {
            node: None,
            identities: vec![Identity::new("conference", "text", "en", "The Coven")],
            features: vec![
                Feature::new(ns::MUC),
                Feature::new(disco_feature::PERSISTENT),
                Feature::new(disco_feature::SEMI_ANONYMOUS),
                Feature::new(disco_feature::MEMBERS_ONLY),
                Feature::new(disco_feature::REGISTER),
            ],
            extensions: vec![roominfo_form(vec![
                Field::new(roominfo::DESCRIPTION, FieldType::TextSingle)
                    .with_value("Witchcraft"),
                Field::new(roominfo::LANG, FieldType::TextSingle).with_value("en"),
                Field::new(roominfo::SUBJECT_MOD, FieldType::Boolean).with_value("1"),
                Field::new(roominfo::OCCUPANTS, FieldType::TextSingle).with_value("3"),
                Field::new(roominfo::CONTACT_JID, FieldType::JidMulti)
                    .with_value("crone1@shakespeare.lit"),
                Field::new(roomconfig::ALLOW_INVITES, FieldType::Boolean).with_value("true"),
            ])],
        };

        let info = RoomDiscoInfo::try_from(info).unwrap();

        assert_eq!(
            info,
            RoomDiscoInfo {
                title: Some("The Coven".to_string()),
                description: Some("Witchcraft".to_string()),
                language: Some("en".to_string()),
                subject: None,
                anonymity: AnonymityLevel::SemiAnonymous,
                occupants_can_change_subject: true,
                occupants_can_invite: true,
                logged: false,
                members_only: true,
                moderated: false,
                open: false,
                password_protected: false,
                persistent: true,
                public: false,
                allows_registration: true,
                max_history_fetch: None,
                occupants: Some(3),
                contact_jids: vec![parley_xmpp::jid!("crone1@shakespeare.lit")],
            }
        );
    }

    #[test]
    fn test_fails_on_malformed_boolean() {
        let info = DiscoInfoResult {
            node: None,
            identities: vec![],
            features: vec![],
            extensions: vec![roominfo_form(vec![Field::new(
                roominfo::SUBJECT_MOD,
                FieldType::Boolean,
            )
            .with_value("maybe")])],
        };

        assert!(RoomDiscoInfo::try_from(info).is_err());
    }

    #[test]
    fn test_config_change_status_codes() {
        assert_eq!(
            RoomConfigChange::from_status_code(104),
            Some(RoomConfigChange::NotPrivacyRelated)
        );
        assert_eq!(
            RoomConfigChange::from_status_code(172),
            Some(RoomConfigChange::NonAnonymous)
        );
        assert_eq!(RoomConfigChange::from_status_code(110), None);
    }
}
