// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use client::{Client, ClientBuilder, IqReply};
pub use connector::{
    Connection, ConnectionError, ConnectionEvent, ConnectionEventHandler, Connector,
};
pub use deps::{IDProvider, UUIDProvider};
pub use stanza::ns;
pub use util::{parse_bool, ElementExt, ParseError, RequestError};

pub mod client;
pub mod connector;
mod deps;
pub mod stanza;
mod util;

#[cfg(any(test, feature = "test"))]
pub mod test;
