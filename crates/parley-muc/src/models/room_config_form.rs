// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use jid::Jid;
use tracing::warn;
use xmpp_parsers::data_forms::{DataForm, DataFormType, Field, FieldType};

use parley_xmpp::stanza::muc::ns::roomconfig as cfg;
use parley_xmpp::{ns, ParseError};

use super::room_config_field::{
    jid_list, single_bool, single_string, submit_field, RoomConfigFieldListMultiValue,
    RoomConfigFieldListValue, RoomConfigFieldValue, RoomConfigFormField, OPTION_ANYONE,
    OPTION_MODERATOR, OPTION_MODERATORS, OPTION_NONE, OPTION_PARTICIPANT, OPTION_VISITOR,
};

/// A typed view of a `muc#roomconfig` form.
///
/// Fields known to the form are exposed as typed properties. Everything else lands in
/// `fields` and is sent back on submission. Fixed fields are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfigForm {
    pub title: String,
    pub description: String,
    pub language: String,
    pub pubsub_node: String,
    pub password: String,

    pub logged: bool,
    pub occupants_can_invite: bool,
    pub occupants_can_change_subject: bool,
    pub members_only: bool,
    pub moderated: bool,
    pub password_protected: bool,
    pub persistent: bool,
    pub public: bool,

    pub max_history_fetch: RoomConfigFieldListValue,
    pub allow_private_messages: RoomConfigFieldListValue,
    pub max_occupants: RoomConfigFieldListValue,
    pub whois: RoomConfigFieldListValue,

    pub retrieve_members_list: RoomConfigFieldListMultiValue,
    pub presence_broadcast: RoomConfigFieldListMultiValue,

    pub owners: Vec<Jid>,
    pub admins: Vec<Jid>,

    pub fields: Vec<RoomConfigFormField>,

    /// Names of the typed fields in the order the server sent them.
    known_fields: Vec<String>,
}

impl Default for RoomConfigForm {
    fn default() -> Self {
        let sizes = ["10", "20", "30", "50", "100", OPTION_NONE];
        let roles = [OPTION_MODERATOR, OPTION_PARTICIPANT, OPTION_VISITOR];

        RoomConfigForm {
            title: String::new(),
            description: String::new(),
            language: String::new(),
            pubsub_node: String::new(),
            password: String::new(),
            logged: false,
            occupants_can_invite: false,
            occupants_can_change_subject: false,
            members_only: false,
            moderated: false,
            password_protected: false,
            persistent: false,
            public: false,
            max_history_fetch: RoomConfigFieldListValue::new(sizes),
            allow_private_messages: RoomConfigFieldListValue::new([
                OPTION_PARTICIPANT,
                OPTION_MODERATORS,
                OPTION_NONE,
            ]),
            max_occupants: RoomConfigFieldListValue::new(sizes),
            whois: RoomConfigFieldListValue::new([OPTION_MODERATORS, OPTION_ANYONE]),
            retrieve_members_list: RoomConfigFieldListMultiValue::new(roles),
            presence_broadcast: RoomConfigFieldListMultiValue::new(roles),
            owners: vec![],
            admins: vec![],
            fields: vec![],
            known_fields: vec![],
        }
    }
}

impl RoomConfigForm {
    pub fn from_data_form(form: &DataForm) -> Result<Self, ParseError> {
        if let Some(form_type) = &form.form_type {
            if form_type != ns::MUC_ROOMCONFIG {
                return Err(ParseError::Generic {
                    msg: format!("Unexpected form type '{}'.", form_type),
                });
            }
        }

        let mut result = RoomConfigForm::default();

        for field in &form.fields {
            let Some(var) = &field.var else { continue };
            if var.is_empty() {
                continue;
            }
            result.set_field(var, field);
        }

        Ok(result)
    }

    /// Builds the submission for this form. Typed fields are emitted first, in the order the
    /// server sent them, followed by the remaining fields.
    pub fn to_data_form(&self) -> DataForm {
        let mut fields = Vec::with_capacity(self.known_fields.len() + self.fields.len());

        for name in &self.known_fields {
            if let Some(field) = self.typed_field(name) {
                fields.push(field);
            }
        }
        fields.extend(self.fields.iter().map(RoomConfigFormField::to_field));

        DataForm {
            type_: DataFormType::Submit,
            form_type: Some(ns::MUC_ROOMCONFIG.to_string()),
            title: None,
            instructions: None,
            fields,
        }
    }

    /// Replaces the value of the untyped field `name`. Returns false if there is no such field.
    pub fn update_field_value_by_name(&mut self, name: &str, value: RoomConfigFieldValue) -> bool {
        let Some(field) = self.fields.iter_mut().find(|field| field.name == name) else {
            return false;
        };
        field.value = value;
        true
    }

    pub fn field_by_name(&self, name: &str) -> Option<&RoomConfigFormField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl RoomConfigForm {
    fn set_field(&mut self, var: &str, field: &Field) {
        let values = &field.values;
        let flag = || bool_value(var, values);

        match var {
            cfg::MAX_HISTORY_FETCH | cfg::HISTORY_LENGTH => {
                self.max_history_fetch.update_from_field(field)
            }
            cfg::ALLOW_PM | cfg::ALLOW_PRIVATE_MESSAGES => {
                self.allow_private_messages.update_from_field(field)
            }
            cfg::ALLOW_INVITES | cfg::ALLOW_MEMBER_INVITES => {
                self.occupants_can_invite = flag()
            }
            cfg::CHANGE_SUBJECT => self.occupants_can_change_subject = flag(),
            cfg::ENABLE_LOGGING | cfg::ENABLE_ARCHIVING => self.logged = flag(),
            cfg::GET_MEMBER_LIST => self.retrieve_members_list.update_from_field(field),
            cfg::LANG => self.language = single_string(values),
            cfg::PUBSUB => self.pubsub_node = single_string(values),
            cfg::MAX_USERS => self.max_occupants.update_from_field(field),
            cfg::MEMBERS_ONLY => self.members_only = flag(),
            cfg::MODERATED_ROOM => self.moderated = flag(),
            cfg::PASSWORD_PROTECTED_ROOM => self.password_protected = flag(),
            cfg::PERSISTENT_ROOM => self.persistent = flag(),
            cfg::PRESENCE_BROADCAST => self.presence_broadcast.update_from_field(field),
            cfg::PUBLIC_ROOM => self.public = flag(),
            cfg::ROOM_ADMINS => self.admins = jid_list(var, values),
            cfg::ROOM_DESC => self.description = single_string(values),
            cfg::ROOM_NAME => self.title = single_string(values),
            cfg::ROOM_OWNERS => self.owners = jid_list(var, values),
            cfg::ROOM_SECRET => self.password = single_string(values),
            cfg::WHOIS => self.whois.update_from_field(field),
            _ => {
                if let Some(field) = RoomConfigFormField::from_field(var, field) {
                    self.fields.push(field);
                }
                return;
            }
        }

        self.known_fields.push(var.to_string());
    }

    fn typed_field(&self, name: &str) -> Option<Field> {
        let (type_, values) = match name {
            cfg::MAX_HISTORY_FETCH | cfg::HISTORY_LENGTH => {
                (FieldType::ListSingle, self.max_history_fetch.values())
            }
            cfg::ALLOW_PM | cfg::ALLOW_PRIVATE_MESSAGES => {
                (FieldType::ListSingle, self.allow_private_messages.values())
            }
            cfg::ALLOW_INVITES | cfg::ALLOW_MEMBER_INVITES => {
                bool_field(self.occupants_can_invite)
            }
            cfg::CHANGE_SUBJECT => bool_field(self.occupants_can_change_subject),
            cfg::ENABLE_LOGGING | cfg::ENABLE_ARCHIVING => bool_field(self.logged),
            cfg::GET_MEMBER_LIST => (
                FieldType::ListMulti,
                self.retrieve_members_list.values.clone(),
            ),
            cfg::LANG => (FieldType::TextSingle, vec![self.language.clone()]),
            cfg::PUBSUB => (FieldType::TextSingle, vec![self.pubsub_node.clone()]),
            cfg::MAX_USERS => (FieldType::ListSingle, self.max_occupants.values()),
            cfg::MEMBERS_ONLY => bool_field(self.members_only),
            cfg::MODERATED_ROOM => bool_field(self.moderated),
            cfg::PASSWORD_PROTECTED_ROOM => bool_field(self.password_protected),
            cfg::PERSISTENT_ROOM => bool_field(self.persistent),
            cfg::PRESENCE_BROADCAST => (
                FieldType::ListMulti,
                self.presence_broadcast.values.clone(),
            ),
            cfg::PUBLIC_ROOM => bool_field(self.public),
            cfg::ROOM_ADMINS => (FieldType::JidMulti, jid_strings(&self.admins)),
            cfg::ROOM_DESC => (FieldType::TextSingle, vec![self.description.clone()]),
            cfg::ROOM_NAME => (FieldType::TextSingle, vec![self.title.clone()]),
            cfg::ROOM_OWNERS => (FieldType::JidMulti, jid_strings(&self.owners)),
            cfg::ROOM_SECRET => (FieldType::TextPrivate, vec![self.password.clone()]),
            cfg::WHOIS => (FieldType::ListSingle, self.whois.values()),
            _ => return None,
        };

        Some(submit_field(name, type_, values))
    }
}

fn bool_value(var: &str, values: &[String]) -> bool {
    single_bool(values).unwrap_or_else(|value| {
        warn!("Treating non-boolean value '{}' of {} as false.", value, var);
        None
    }) == Some(true)
}

fn bool_field(value: bool) -> (FieldType, Vec<String>) {
    (FieldType::Boolean, vec![value.to_string()])
}

fn jid_strings(jids: &[Jid]) -> Vec<String> {
    jids.iter().map(|jid| jid.to_string()).collect()
}
