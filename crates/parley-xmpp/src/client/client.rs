// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

use jid::FullJid;
use minidom::Element;
use parking_lot::RwLock;
use secrecy::Secret;
use tokio::sync::oneshot;
use tracing::{debug, error, info};
use xmpp_parsers::iq::{Iq, IqType};
use xmpp_parsers::muc::Muc;
use xmpp_parsers::presence::{self, Presence};

use crate::client::builder::ClientBuilder;
use crate::connector::{Connection, ConnectionError, ConnectionEvent, Connector};
use crate::deps::IDProvider;
use crate::ns;
use crate::util::{ParseError, PendingReplies, RequestError};

#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

/// A sent IQ together with the channel its response arrives on. The channel closes without a
/// value if the connection goes away first. Dropping the reply stops waiting for the response.
#[derive(Debug)]
pub struct IqReply {
    pub id: String,
    receiver: oneshot::Receiver<Iq>,
    client: Weak<ClientInner>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub async fn connect(
        &self,
        jid: &FullJid,
        password: Secret<String>,
    ) -> Result<(), ConnectionError> {
        self.disconnect();

        let weak_inner = Arc::downgrade(&self.inner);
        let connection = self
            .inner
            .connector
            .connect(
                jid,
                password,
                Box::new(move |event| ClientInner::handle_event(&weak_inner, event)),
            )
            .await?;

        self.inner.connection.write().replace(connection);
        info!("Connected as {}.", jid);

        Ok(())
    }

    /// Tears down the connection. Every request still waiting for a reply observes a closed
    /// reply channel.
    pub fn disconnect(&self) {
        if let Some(connection) = self.inner.connection.write().take() {
            connection.disconnect();
        }
        self.inner.pending_replies.close_all();
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connection.read().is_some()
    }

    pub fn generate_id(&self) -> String {
        self.inner.id_provider.new_id()
    }

    pub fn send_stanza(&self, stanza: impl Into<Element>) -> Result<(), ConnectionError> {
        let connection = self.inner.connection.read();
        let Some(connection) = &*connection else {
            return Err(ConnectionError::NotConnected);
        };
        connection.send_stanza(stanza.into())
    }

    /// Sends `iq` and returns the channel on which its `result` or `error` response will be
    /// delivered.
    pub fn send_iq(&self, iq: Iq) -> Result<IqReply, ConnectionError> {
        let id = iq.id.clone();
        let receiver = self.inner.pending_replies.register(id.clone());

        if let Err(err) = self.send_stanza(iq) {
            self.inner.pending_replies.cancel(&id);
            return Err(err);
        }

        Ok(IqReply {
            id,
            receiver,
            client: Arc::downgrade(&self.inner),
        })
    }

    /// Sends an available presence carrying the MUC payload to the occupant JID `to`.
    pub fn send_muc_presence(&self, to: &FullJid, muc: Muc) -> Result<(), ConnectionError> {
        let presence = Presence::new(presence::Type::None)
            .with_to(to.clone())
            .with_payloads(vec![muc.into()]);
        self.send_stanza(presence)
    }
}

impl IqReply {
    /// Waits for the response and returns its payload if it was of type `result`.
    pub async fn response(mut self) -> Result<Option<Element>, RequestError> {
        let iq = (&mut self.receiver)
            .await
            .map_err(|_| RequestError::Disconnected)?;

        match iq.payload {
            IqType::Result(payload) => Ok(payload),
            IqType::Error(err) => Err(RequestError::XMPP { err }),
            IqType::Get(_) | IqType::Set(_) => Err(RequestError::UnexpectedResponse),
        }
    }
}

impl Drop for IqReply {
    fn drop(&mut self) {
        if let Some(inner) = self.client.upgrade() {
            inner.pending_replies.cancel(&self.id);
        }
    }
}

pub(crate) struct ClientInner {
    pub connector: Box<dyn Connector>,
    pub connection: RwLock<Option<Box<dyn Connection>>>,
    pub pending_replies: PendingReplies,
    pub id_provider: Box<dyn IDProvider>,
}

impl ClientInner {
    fn handle_event(inner: &Weak<ClientInner>, event: ConnectionEvent) {
        let Some(inner) = inner.upgrade() else {
            return;
        };

        match event {
            ConnectionEvent::Disconnected { error } => {
                match error {
                    Some(err) => error!("Connection closed with error. {}", err),
                    None => info!("Connection closed."),
                }
                inner.connection.write().take();
                inner.pending_replies.close_all();
            }
            ConnectionEvent::Stanza(stanza) => {
                if let Err(err) = inner.handle_stanza(stanza) {
                    error!("Failed to handle stanza. {}", err);
                }
            }
        }
    }

    fn handle_stanza(&self, stanza: Element) -> Result<(), ParseError> {
        if !stanza.is("iq", ns::JABBER_CLIENT) {
            debug!("Ignoring {} stanza.", stanza.name());
            return Ok(());
        }

        let iq = Iq::try_from(stanza).map_err(ParseError::xmpp)?;
        self.pending_replies.resolve(iq);
        Ok(())
    }
}
