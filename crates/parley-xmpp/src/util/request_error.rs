// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use xmpp_parsers::stanza_error::{DefinedCondition, StanzaError};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Request Error: Unexpected server response")]
    UnexpectedResponse,
    #[error("Request Error: Reply channel closed before a response arrived")]
    Disconnected,
    #[error("XMPP Error: {err:?}")]
    XMPP { err: StanzaError },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Parse error: {msg}")]
    Generic { msg: String },
    #[error(transparent)]
    JidParseError(#[from] jid::Error),
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl ParseError {
    /// Wraps a parser error of the xmpp-parsers family, whose concrete type varies per payload.
    pub fn xmpp(err: impl std::fmt::Display) -> Self {
        ParseError::Generic {
            msg: err.to_string(),
        }
    }
}

impl RequestError {
    pub fn defined_condition(&self) -> Option<DefinedCondition> {
        let RequestError::XMPP {
            err: StanzaError {
                defined_condition, ..
            },
        } = self
        else {
            return None;
        };
        Some(defined_condition.clone())
    }
}
