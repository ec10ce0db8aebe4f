// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use async_trait::async_trait;
use jid::FullJid;
use minidom::Element;
use parking_lot::Mutex;
use secrecy::Secret;

use crate::connector::{
    Connection as ConnectionTrait, ConnectionError, ConnectionEvent, ConnectionEventHandler,
    Connector as ConnectorTrait,
};

pub struct Connector {
    connection: Connection,
}

impl Connector {
    pub fn new(connection: Connection) -> Self {
        Connector { connection }
    }
}

#[async_trait]
impl ConnectorTrait for Connector {
    async fn connect(
        &self,
        _jid: &FullJid,
        _password: Secret<String>,
        event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn ConnectionTrait>, ConnectionError> {
        *self.connection.inner.event_handler.lock() = Some(event_handler);
        Ok(Box::new(self.connection.clone()))
    }
}

/// Decides what happens to a sent stanza. Returned elements are delivered back to the client
/// as if the server had sent them. An error fails the send.
pub type SentStanzaHandler = dyn FnMut(&Element) -> Result<Vec<Element>, ConnectionError> + Send;

/// A scriptable in-memory connection that records every successfully sent stanza.
#[derive(Default, Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

#[derive(Default)]
struct ConnectionInner {
    sent_stanzas: Mutex<Vec<Element>>,
    stanza_handler: Mutex<Option<Box<SentStanzaHandler>>>,
    event_handler: Mutex<Option<ConnectionEventHandler>>,
}

impl Connection {
    pub fn set_stanza_handler<F>(&self, handler: F)
    where
        F: FnMut(&Element) -> Result<Vec<Element>, ConnectionError> + Send + 'static,
    {
        *self.inner.stanza_handler.lock() = Some(Box::new(handler))
    }

    pub fn sent_stanzas(&self) -> Vec<Element> {
        self.inner.sent_stanzas.lock().clone()
    }

    pub fn reset(&self) {
        self.inner.sent_stanzas.lock().clear()
    }

    /// Delivers `stanza` to the client as if it was received from the server.
    pub fn receive_stanza(&self, stanza: impl Into<Element>) {
        if let Some(event_handler) = &*self.inner.event_handler.lock() {
            (event_handler)(ConnectionEvent::Stanza(stanza.into()))
        }
    }

    /// Reports a dropped connection to the client.
    pub fn simulate_disconnect(&self, error: Option<ConnectionError>) {
        if let Some(event_handler) = &*self.inner.event_handler.lock() {
            (event_handler)(ConnectionEvent::Disconnected { error })
        }
    }
}

impl ConnectionTrait for Connection {
    fn send_stanza(&self, stanza: Element) -> Result<(), ConnectionError> {
        let responses = if let Some(handler) = self.inner.stanza_handler.lock().as_mut() {
            (handler)(&stanza)?
        } else {
            vec![]
        };

        self.inner.sent_stanzas.lock().push(stanza);

        for response in responses {
            self.receive_stanza(response)
        }
        Ok(())
    }

    fn disconnect(&self) {}
}
