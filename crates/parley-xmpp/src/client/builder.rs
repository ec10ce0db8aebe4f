// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use async_trait::async_trait;
use jid::FullJid;
use parking_lot::RwLock;
use secrecy::Secret;

use crate::client::client::ClientInner;
use crate::connector::{Connection, ConnectionError, ConnectionEventHandler, Connector};
use crate::deps::{IDProvider, UUIDProvider};
use crate::util::PendingReplies;
use crate::Client;

pub struct UndefinedConnector {}

pub struct ClientBuilder {
    connector: Box<dyn Connector>,
    id_provider: Box<dyn IDProvider>,
}

impl ClientBuilder {
    pub(super) fn new() -> Self {
        ClientBuilder {
            connector: Box::new(UndefinedConnector {}),
            id_provider: Box::new(UUIDProvider::new()),
        }
    }

    pub fn set_connector<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connector = Box::new(connector);
        self
    }

    pub fn set_id_provider<P: IDProvider + 'static>(mut self, id_provider: P) -> Self {
        self.id_provider = Box::new(id_provider);
        self
    }

    pub fn build(self) -> Client {
        Client {
            inner: Arc::new(ClientInner {
                connector: self.connector,
                connection: RwLock::new(None),
                pending_replies: PendingReplies::default(),
                id_provider: self.id_provider,
            }),
        }
    }
}

#[async_trait]
impl Connector for UndefinedConnector {
    async fn connect(
        &self,
        _jid: &FullJid,
        _password: Secret<String>,
        _event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn Connection>, ConnectionError> {
        Err(ConnectionError::Generic {
            msg: "No connector configured.".to_string(),
        })
    }
}
