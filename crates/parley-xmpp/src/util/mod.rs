// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use element_ext::{parse_bool, ElementExt};
pub(crate) use pending_replies::PendingReplies;
pub use request_error::{ParseError, RequestError};

pub mod element_ext;
mod pending_replies;
mod request_error;
