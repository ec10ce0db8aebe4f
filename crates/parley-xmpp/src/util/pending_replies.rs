// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use xmpp_parsers::iq::{Iq, IqType};

/// Routes IQ responses back to the request that is waiting for them. Every request owns one
/// oneshot channel keyed by the id of the sent IQ.
#[derive(Default)]
pub(crate) struct PendingReplies {
    senders: Mutex<HashMap<String, oneshot::Sender<Iq>>>,
}

impl PendingReplies {
    pub fn register(&self, id: impl Into<String>) -> oneshot::Receiver<Iq> {
        let id = id.into();
        let (tx, rx) = oneshot::channel();

        if self.senders.lock().insert(id.clone(), tx).is_some() {
            warn!("Replaced pending reply with duplicate id {}.", id);
        }

        rx
    }

    /// Hands `iq` to the waiting request. Returns false if nobody waits for it.
    pub fn resolve(&self, iq: Iq) -> bool {
        match &iq.payload {
            IqType::Result(_) | IqType::Error(_) => (),
            IqType::Get(_) | IqType::Set(_) => return false,
        }

        let Some(sender) = self.senders.lock().remove(&iq.id) else {
            debug!("Received IQ response {} without pending request.", iq.id);
            return false;
        };

        if sender.send(iq).is_err() {
            debug!("Dropped IQ response because its receiver is gone.");
        }
        true
    }

    pub fn cancel(&self, id: &str) {
        self.senders.lock().remove(id);
    }

    /// Drops every pending sender so that all waiters observe a closed channel.
    pub fn close_all(&self) {
        let senders = std::mem::take(&mut *self.senders.lock());
        if !senders.is_empty() {
            debug!("Closing {} pending IQ replies.", senders.len());
        }
    }

    pub fn len(&self) -> usize {
        self.senders.lock().len()
    }
}
