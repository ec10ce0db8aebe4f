// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::str::FromStr;

use jid::Jid;
use tracing::warn;
use xmpp_parsers::data_forms::{Field, FieldType};

use parley_xmpp::parse_bool;

pub const OPTION_NONE: &str = "none";
pub const OPTION_ANYONE: &str = "anyone";
pub const OPTION_MODERATOR: &str = "moderator";
pub const OPTION_MODERATORS: &str = "moderators";
pub const OPTION_PARTICIPANT: &str = "participant";
pub const OPTION_VISITOR: &str = "visitor";

/// A list-single value together with the options it can take.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomConfigFieldListValue {
    pub value: String,
    pub options: Vec<String>,
}

impl RoomConfigFieldListValue {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        RoomConfigFieldListValue {
            value: String::new(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces the options if the server sent any.
    pub(crate) fn update_from_field(&mut self, field: &Field) {
        self.value = field.values.first().cloned().unwrap_or_default();
        if !field.options.is_empty() {
            self.options = field
                .options
                .iter()
                .map(|option| option.value.clone())
                .collect();
        }
    }

    pub fn values(&self) -> Vec<String> {
        vec![self.value.clone()]
    }
}

/// A list-multi value together with the options it can take.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomConfigFieldListMultiValue {
    pub values: Vec<String>,
    pub options: Vec<String>,
}

impl RoomConfigFieldListMultiValue {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        RoomConfigFieldListMultiValue {
            values: vec![],
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn update_from_field(&mut self, field: &Field) {
        self.values = field.values.clone();
        if !field.options.is_empty() {
            self.options = field
                .options
                .iter()
                .map(|option| option.value.clone())
                .collect();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomConfigFieldValue {
    Boolean(bool),
    Text(String),
    TextMulti(Vec<String>),
    List(RoomConfigFieldListValue),
    ListMulti(RoomConfigFieldListMultiValue),
    Jid(Option<Jid>),
    JidMulti(Vec<Jid>),
    /// Sent back exactly as received.
    Hidden(Vec<String>),
    /// Values that did not fit the declared field type. Sent back exactly as received.
    Raw(Vec<String>),
}

impl RoomConfigFieldValue {
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Boolean(value) => vec![value.to_string()],
            Self::Text(value) => vec![value.clone()],
            Self::TextMulti(values) | Self::Hidden(values) | Self::Raw(values) => values.clone(),
            Self::List(list) => list.values(),
            Self::ListMulti(list) => list.values.clone(),
            Self::Jid(jid) => jid.iter().map(|jid| jid.to_string()).collect(),
            Self::JidMulti(jids) => jids.iter().map(|jid| jid.to_string()).collect(),
        }
    }
}

/// A configuration field without a typed counterpart in `RoomConfigForm`. It is submitted
/// with the type the server declared for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfigFormField {
    pub name: String,
    pub label: Option<String>,
    pub required: bool,
    pub type_: FieldType,
    pub value: RoomConfigFieldValue,
}

impl RoomConfigFormField {
    /// Returns `None` for fixed fields, which carry no value. Values that do not match the
    /// declared type are kept as `RoomConfigFieldValue::Raw`.
    pub(crate) fn from_field(name: &str, field: &Field) -> Option<Self> {
        let value = match field.type_ {
            FieldType::Fixed => return None,
            FieldType::Boolean => match single_bool(&field.values) {
                Ok(value) => RoomConfigFieldValue::Boolean(value.unwrap_or(false)),
                Err(value) => {
                    warn!("Keeping non-boolean value '{}' of field {}.", value, name);
                    RoomConfigFieldValue::Raw(field.values.clone())
                }
            },
            FieldType::TextSingle | FieldType::TextPrivate => {
                RoomConfigFieldValue::Text(single_string(&field.values))
            }
            FieldType::TextMulti => RoomConfigFieldValue::TextMulti(field.values.clone()),
            FieldType::ListSingle => {
                let mut list = RoomConfigFieldListValue::default();
                list.update_from_field(field);
                RoomConfigFieldValue::List(list)
            }
            FieldType::ListMulti => {
                let mut list = RoomConfigFieldListMultiValue::default();
                list.update_from_field(field);
                RoomConfigFieldValue::ListMulti(list)
            }
            FieldType::JidSingle => match field.values.first().filter(|value| !value.is_empty()) {
                None => RoomConfigFieldValue::Jid(None),
                Some(value) => match Jid::from_str(value) {
                    Ok(jid) => RoomConfigFieldValue::Jid(Some(jid)),
                    Err(err) => {
                        warn!("Keeping invalid JID '{}' of field {}. {}", value, name, err);
                        RoomConfigFieldValue::Raw(field.values.clone())
                    }
                },
            },
            FieldType::JidMulti => {
                let jids = non_empty(&field.values)
                    .map(|value| Jid::from_str(value))
                    .collect::<Result<Vec<_>, _>>();
                match jids {
                    Ok(jids) => RoomConfigFieldValue::JidMulti(jids),
                    Err(err) => {
                        warn!("Keeping invalid JIDs of field {}. {}", name, err);
                        RoomConfigFieldValue::Raw(field.values.clone())
                    }
                }
            }
            FieldType::Hidden => RoomConfigFieldValue::Hidden(field.values.clone()),
        };

        Some(RoomConfigFormField {
            name: name.to_string(),
            label: field.label.clone(),
            required: field.required,
            type_: field.type_.clone(),
            value,
        })
    }

    pub(crate) fn to_field(&self) -> Field {
        submit_field(&self.name, self.type_.clone(), self.value.values())
    }
}

pub(crate) fn submit_field(name: &str, type_: FieldType, values: Vec<String>) -> Field {
    let mut field = Field::new(name, type_);
    field.values = values;
    field
}

pub(crate) fn single_string(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

/// Reads the first value as a boolean. Returns the offending value if it is not one.
pub(crate) fn single_bool(values: &[String]) -> Result<Option<bool>, &str> {
    let Some(value) = values.first().filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    parse_bool(value).map(Some).map_err(|_| value.as_str())
}

/// Parses every non-empty value as a JID. Invalid ones are logged and skipped.
pub(crate) fn jid_list(name: &str, values: &[String]) -> Vec<Jid> {
    non_empty(values)
        .filter_map(|value| match Jid::from_str(value) {
            Ok(jid) => Some(jid),
            Err(err) => {
                warn!("Skipping invalid JID '{}' in field {}. {}", value, name, err);
                None
            }
        })
        .collect()
}

fn non_empty(values: &[String]) -> impl Iterator<Item = &String> {
    values.iter().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fixed_fields_are_skipped() {
        let field = Field::new("instructions", FieldType::Fixed).with_value("Read this");
        assert_eq!(RoomConfigFormField::from_field("instructions", &field), None);
    }

    #[test]
    fn test_list_value_keeps_default_options_without_server_options() {
        let mut list = RoomConfigFieldListValue::new(["moderators", "anyone"]);
        list.update_from_field(&Field::new("whois", FieldType::ListSingle).with_value("anyone"));

        assert_eq!(list.value, "anyone");
        assert_eq!(list.options, vec!["moderators", "anyone"]);
    }

    #[test]
    fn test_hidden_field_round_trips_values() {
        let field = Field::new("x-secret-token", FieldType::Hidden).with_value("abc");
        let parsed = RoomConfigFormField::from_field("x-secret-token", &field).unwrap();

        assert_eq!(
            parsed.value,
            RoomConfigFieldValue::Hidden(vec!["abc".to_string()])
        );
        assert_eq!(parsed.to_field().values, vec!["abc".to_string()]);
    }

    #[test]
    fn test_unparsable_values_are_kept_verbatim() {
        let field = Field::new("x-vendor-flag", FieldType::Boolean).with_value("yes");
        let parsed = RoomConfigFormField::from_field("x-vendor-flag", &field).unwrap();

        assert_eq!(parsed.value, RoomConfigFieldValue::Raw(vec!["yes".to_string()]));

        let submitted = parsed.to_field();
        assert_eq!(submitted.type_, FieldType::Boolean);
        assert_eq!(submitted.values, vec!["yes".to_string()]);

        let field = Field::new("x-moderators", FieldType::JidMulti)
            .with_value("crone1@shakespeare.lit")
            .with_value("@invalid");
        let parsed = RoomConfigFormField::from_field("x-moderators", &field).unwrap();
        assert_eq!(parsed.to_field().values, field.values);
    }

    #[test]
    fn test_text_private_keeps_its_type() {
        let field = Field::new("x-api-key", FieldType::TextPrivate).with_value("s3cr3t");
        let parsed = RoomConfigFormField::from_field("x-api-key", &field).unwrap();

        assert_eq!(parsed.value, RoomConfigFieldValue::Text("s3cr3t".to_string()));
        assert_eq!(parsed.to_field().type_, FieldType::TextPrivate);
    }

    #[test]
    fn test_jid_list_skips_invalid_values() {
        let values = vec![
            "crone1@shakespeare.lit".to_string(),
            String::new(),
            "@invalid".to_string(),
        ];
        assert_eq!(
            jid_list("muc#roomconfig_roomowners", &values),
            vec![parley_xmpp::jid!("crone1@shakespeare.lit")]
        );
    }
}
