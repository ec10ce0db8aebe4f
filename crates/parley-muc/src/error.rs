// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use parley_xmpp::{ParseError, RequestError};
use xmpp_parsers::stanza_error::StanzaError;

/// Rejected construction of a model value from a protocol token.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown affiliation string: '{0}'")]
    UnknownAffiliation(String),
    #[error("unknown role string: '{0}'")]
    UnknownRole(String),
}

/// Why a room creation attempt failed. Every attempt reports at most one of these.
#[derive(Debug, thiserror::Error)]
pub enum RoomCreationError {
    /// The reservation presence could not be sent. No configuration request was made.
    #[error("Invalid reserve room request")]
    InvalidReserveRoomRequest,
    /// The configuration request could not be sent or the server answered with something
    /// other than a result or an error.
    #[error("Unexpected response")]
    UnexpectedResponse,
    /// The reply channel closed before a response arrived, usually because the connection
    /// went away.
    #[error("Invalid information query request")]
    InvalidInformationQueryRequest,
    /// The server answered the configuration request with an error.
    #[error("Information query response error: {0:?}")]
    InformationQueryResponse(StanzaError),
    /// The configuration form sent by the server could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Room creation timed out")]
    TimedOut,
    #[error("Room creation cancelled")]
    Cancelled,
}

impl From<RequestError> for RoomCreationError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Disconnected => Self::InvalidInformationQueryRequest,
            RequestError::XMPP { err } => Self::InformationQueryResponse(err),
            RequestError::UnexpectedResponse => Self::UnexpectedResponse,
        }
    }
}
