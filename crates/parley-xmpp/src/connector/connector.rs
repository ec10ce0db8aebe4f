// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use async_trait::async_trait;
use jid::FullJid;
use minidom::Element;
use secrecy::Secret;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("Not connected")]
    NotConnected,
    #[error("{msg:?}")]
    Generic { msg: String },
}

pub type ConnectionEventHandler = Box<dyn Fn(ConnectionEvent) + Send + Sync>;

/// Opens the socket level connection. Stanzas received on it are reported through the
/// `event_handler`.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        jid: &FullJid,
        password: Secret<String>,
        event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn Connection>, ConnectionError>;
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Disconnected { error: Option<ConnectionError> },
    Stanza(Element),
}

pub trait Connection: Send + Sync {
    fn send_stanza(&self, stanza: Element) -> Result<(), ConnectionError>;
    fn disconnect(&self);
}
