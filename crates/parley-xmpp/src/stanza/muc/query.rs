// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use minidom::{Element, NSChoice};
use xmpp_parsers::data_forms::DataForm;
use xmpp_parsers::iq::{IqGetPayload, IqResultPayload, IqSetPayload};

use crate::ns;
use crate::util::{ElementExt, ParseError};

/// The namespace a MUC query is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRole {
    Owner,
    Admin,
}

/// `<query/>` element of the muc#owner and muc#admin namespaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub role: QueryRole,
    pub payloads: Vec<Element>,
}

impl Query {
    pub fn new(role: QueryRole) -> Self {
        Query {
            role,
            payloads: Default::default(),
        }
    }

    pub fn with_payload(mut self, payload: impl MucQueryPayload) -> Self {
        self.payloads.push(payload.into());
        self
    }

    /// Returns the first data form contained in the query, if any.
    pub fn data_form(&self) -> Result<Option<DataForm>, ParseError> {
        self.payloads
            .iter()
            .find(|payload| payload.is("x", ns::DATA_FORMS))
            .map(|payload| DataForm::try_from(payload.clone()).map_err(ParseError::xmpp))
            .transpose()
    }
}

impl From<Query> for Element {
    fn from(value: Query) -> Self {
        Element::builder("query", value.role.to_string())
            .append_all(value.payloads)
            .build()
    }
}

impl TryFrom<Element> for Query {
    type Error = ParseError;

    fn try_from(root: Element) -> Result<Self, Self::Error> {
        root.expect_is("query", NSChoice::AnyOf(&[ns::MUC_OWNER, ns::MUC_ADMIN]))?;

        let payloads = root
            .children()
            .map(|child| match child {
                _ if child.is("item", ns::MUC_USER) => Ok(child.clone()),
                _ if child.is("item", ns::MUC_ADMIN) => Ok(child.clone()),
                _ if child.is("x", ns::DATA_FORMS) => Ok(child.clone()),
                _ => Err(ParseError::Generic {
                    msg: format!(
                        "Encountered unexpected payload {} in muc query.",
                        child.name()
                    ),
                }),
            })
            .collect::<Result<Vec<Element>, _>>()?;

        Ok(Query {
            role: QueryRole::from_str(&root.ns())?,
            payloads,
        })
    }
}

impl IqSetPayload for Query {}
impl IqGetPayload for Query {}
impl IqResultPayload for Query {}

pub trait MucQueryPayload: Into<Element> {}

impl MucQueryPayload for DataForm {}
impl MucQueryPayload for xmpp_parsers::muc::user::Item {}

impl FromStr for QueryRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ns::MUC_OWNER => Ok(Self::Owner),
            ns::MUC_ADMIN => Ok(Self::Admin),
            _ => Err(ParseError::Generic {
                msg: format!("Unknown muc query namespace {}", s),
            }),
        }
    }
}

impl Display for QueryRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Owner => ns::MUC_OWNER,
            Self::Admin => ns::MUC_ADMIN,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xmpp_parsers::data_forms::{DataFormType, Field, FieldType};

    use super::*;

    #[test]
    fn test_serializes_instant_room_submission() {
        let query = Query::new(QueryRole::Owner).with_payload(DataForm {
            type_: DataFormType::Submit,
            form_type: None,
            title: None,
            instructions: None,
            fields: vec![],
        });

        let elem = Element::from(query);
        assert!(elem.is("query", ns::MUC_OWNER));

        let form = elem.get_child("x", ns::DATA_FORMS).unwrap();
        assert_eq!(form.attr("type"), Some("submit"));
        assert_eq!(form.children().count(), 0);
    }

    #[test]
    fn test_parses_config_form() {
        let form = DataForm {
            type_: DataFormType::Form,
            form_type: Some(ns::MUC_ROOMCONFIG.to_string()),
            title: Some("Configuration".to_string()),
            instructions: None,
            fields: vec![Field::new("muc#roomconfig_roomname", FieldType::TextSingle)
                .with_value("Coven")],
        };
        let elem = Element::builder("query", ns::MUC_OWNER)
            .append(Element::from(form))
            .build();

        let query = Query::try_from(elem).unwrap();
        assert_eq!(query.role, QueryRole::Owner);

        let form = query.data_form().unwrap().unwrap();
        assert_eq!(form.form_type.as_deref(), Some(ns::MUC_ROOMCONFIG));
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].values, vec!["Coven".to_string()]);
    }

    #[test]
    fn test_rejects_foreign_payload() {
        let elem = Element::builder("query", ns::MUC_OWNER)
            .append(Element::builder("destroy", "urn:example").build())
            .build();
        assert!(Query::try_from(elem).is_err());
    }
}
