// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use jid::{BareJid, Jid};
use tokio::sync::oneshot;
use tracing::{info, warn};
use xmpp_parsers::data_forms::{DataForm, DataFormType};
use xmpp_parsers::iq::Iq;
use xmpp_parsers::muc::Muc;

use parley_xmpp::stanza::muc::{Query, QueryRole};
use parley_xmpp::{Client, ParseError};

use crate::error::RoomCreationError;
use crate::models::RoomConfigForm;

/// A room creation in progress. Resolves exactly once with the outcome of the exchange.
#[derive(Debug)]
pub struct RoomCreation<T> {
    result: oneshot::Receiver<Result<T, RoomCreationError>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl<T> RoomCreation<T> {
    /// Stops waiting for the server. The creation then resolves with
    /// `RoomCreationError::Cancelled` unless it completed already.
    pub fn abort(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl<T> Future for RoomCreation<T> {
    type Output = Result<T, RoomCreationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.result
            .poll_unpin(cx)
            .map(|result| result.unwrap_or(Err(RoomCreationError::Cancelled)))
    }
}

/// Reserves `room_id` with `nickname` and accepts the default configuration.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn create_instant_room(
    client: &Client,
    room_id: &BareJid,
    nickname: &str,
    timeout: Option<Duration>,
) -> RoomCreation<bool> {
    let client = client.clone();
    let room_id = room_id.clone();
    let nickname = nickname.to_string();

    spawn_creation(timeout, async move {
        reserve_room(&client, &room_id, &nickname)?;

        let submit_form = DataForm {
            type_: DataFormType::Submit,
            form_type: None,
            title: None,
            instructions: None,
            fields: vec![],
        };

        let iq = Iq::from_set(
            client.generate_id(),
            Query::new(QueryRole::Owner).with_payload(submit_form),
        )
        .with_to(Jid::from(room_id.clone()));

        let reply = client.send_iq(iq).map_err(|err| {
            warn!("Failed to send instant room configuration for {}. {}", room_id, err);
            RoomCreationError::UnexpectedResponse
        })?;
        reply.response().await?;

        info!("Created instant room {}.", room_id);
        Ok(true)
    })
}

/// Reserves `room_id` with `nickname` and requests its configuration form. The room stays
/// locked until the form is submitted.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn create_reserved_room(
    client: &Client,
    room_id: &BareJid,
    nickname: &str,
    timeout: Option<Duration>,
) -> RoomCreation<RoomConfigForm> {
    let client = client.clone();
    let room_id = room_id.clone();
    let nickname = nickname.to_string();

    spawn_creation(timeout, async move {
        reserve_room(&client, &room_id, &nickname)?;

        let iq = Iq::from_get(client.generate_id(), Query::new(QueryRole::Owner))
            .with_to(Jid::from(room_id.clone()));

        let reply = client.send_iq(iq).map_err(|err| {
            warn!("Failed to request configuration form for {}. {}", room_id, err);
            RoomCreationError::UnexpectedResponse
        })?;

        let Some(payload) = reply.response().await? else {
            return Err(ParseError::Generic {
                msg: "Missing query in room configuration response.".to_string(),
            }
            .into());
        };

        let query = Query::try_from(payload)?;
        let Some(form) = query.data_form()? else {
            return Err(ParseError::Generic {
                msg: "Missing data form in room configuration response.".to_string(),
            }
            .into());
        };

        let form = RoomConfigForm::from_data_form(&form)?;
        info!("Reserved room {}.", room_id);
        Ok(form)
    })
}

fn reserve_room(
    client: &Client,
    room_id: &BareJid,
    nickname: &str,
) -> Result<(), RoomCreationError> {
    let occupant_jid = room_id.with_resource_str(nickname).map_err(|err| {
        warn!("Invalid nickname '{}' for room {}. {}", nickname, room_id, err);
        RoomCreationError::InvalidReserveRoomRequest
    })?;

    client
        .send_muc_presence(&occupant_jid, Muc::new())
        .map_err(|err| {
            warn!("Failed to send reservation presence to {}. {}", occupant_jid, err);
            RoomCreationError::InvalidReserveRoomRequest
        })
}

fn spawn_creation<T, F>(timeout: Option<Duration>, exchange: F) -> RoomCreation<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T, RoomCreationError>> + Send + 'static,
{
    let (result_tx, result_rx) = oneshot::channel();
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let exchange = async move {
            match timeout {
                Some(duration) => tokio::time::timeout(duration, exchange)
                    .await
                    .unwrap_or(Err(RoomCreationError::TimedOut)),
                None => exchange.await,
            }
        };

        let result = tokio::select! {
            result = exchange => result,
            Ok(()) = cancel_rx => Err(RoomCreationError::Cancelled),
        };

        let _ = result_tx.send(result);
    });

    RoomCreation {
        result: result_rx,
        cancel: Some(cancel_tx),
    }
}
