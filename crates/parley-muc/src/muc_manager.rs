// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use jid::BareJid;
use minidom::Element;
use tracing::{debug, error, warn};

use parley_xmpp::stanza::muc::Query;
use parley_xmpp::Client;

use crate::config::MucConfig;
use crate::events::{MucErrorType, MucEvent, OccupantInfo};
use crate::models::{
    Actor, AffiliationRoleUpdate, AffiliationUpdate, AnonymityLevel, Occupant, RoleUpdate,
    Room, RoomConfigChange, RoomConfigForm, RoomDiscoInfo,
};
use crate::room_manager::RoomManager;
use crate::services::{self, RoomCreation};

/// Connects the room registry to the protocol layer. Incoming events are applied to the
/// affected room first and then published to its observers.
#[derive(Clone)]
pub struct MucManager {
    inner: Arc<MucManagerInner>,
}

struct MucManagerInner {
    client: Client,
    rooms: RoomManager,
    config: MucConfig,
}

#[derive(Default)]
pub struct MucManagerBuilder {
    client: Option<Client>,
    config: MucConfig,
}

impl MucManagerBuilder {
    pub fn set_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn set_config(mut self, config: MucConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<MucManager> {
        let client = self
            .client
            .ok_or_else(|| anyhow!("A MucManager needs a client."))?;

        Ok(MucManager {
            inner: Arc::new(MucManagerInner {
                client,
                rooms: RoomManager::new(),
                config: self.config,
            }),
        })
    }
}

impl MucManager {
    pub fn builder() -> MucManagerBuilder {
        MucManagerBuilder::default()
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    pub fn config(&self) -> &MucConfig {
        &self.inner.config
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.inner.rooms
    }
}

impl MucManager {
    /// Returns the room with `room_id`, registering a new one if needed.
    pub fn new_room(&self, room_id: &BareJid) -> Room {
        if let Some(room) = self.inner.rooms.get_room(room_id) {
            return room;
        }

        let room = Room::new(room_id.clone());
        if !self.inner.rooms.add_room(room.clone()) {
            // Lost a race against another registration.
            if let Some(room) = self.inner.rooms.get_room(room_id) {
                return room;
            }
        }
        room
    }

    pub fn add_room(&self, room: Room) -> bool {
        self.inner.rooms.add_room(room)
    }

    pub fn get_room(&self, room_id: &BareJid) -> Option<Room> {
        self.inner.rooms.get_room(room_id)
    }

    pub fn leave_room(&self, room_id: &BareJid) -> bool {
        self.inner.rooms.leave_room(room_id)
    }

    /// Creates `room_id` with the default configuration. See
    /// [`services::create_instant_room`].
    pub fn create_instant_room(&self, room_id: &BareJid, nickname: &str) -> RoomCreation<bool> {
        services::create_instant_room(
            &self.inner.client,
            room_id,
            nickname,
            self.inner.config.room_creation_timeout,
        )
    }

    /// Reserves `room_id` and returns its configuration form. See
    /// [`services::create_reserved_room`].
    pub fn create_reserved_room(
        &self,
        room_id: &BareJid,
        nickname: &str,
    ) -> RoomCreation<RoomConfigForm> {
        services::create_reserved_room(
            &self.inner.client,
            room_id,
            nickname,
            self.inner.config.room_creation_timeout,
        )
    }

    /// Publishes `event` to the observers of the room. Events for unknown rooms are dropped.
    pub fn publish_room_event(&self, room_id: &BareJid, event: MucEvent) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.publish(&event);
    }

    fn room_for_event(&self, room_id: &BareJid) -> Option<Room> {
        let room = self.inner.rooms.get_room(room_id);
        if room.is_none() {
            error!(
                "Trying to publish an event in room {} which does not exist.",
                room_id
            );
        }
        room
    }
}

impl MucManager {
    pub fn room_created(&self, room_id: &BareJid) {
        self.publish_room_event(
            room_id,
            MucEvent::RoomCreated {
                room: room_id.clone(),
            },
        )
    }

    pub fn room_renamed(&self, room_id: &BareJid) {
        self.publish_room_event(room_id, MucEvent::RoomRenamed)
    }

    pub fn room_destroyed(
        &self,
        room_id: &BareJid,
        reason: Option<String>,
        alternative_room: Option<BareJid>,
        password: Option<String>,
    ) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.remove_self_occupant();
        room.publish(&MucEvent::RoomDestroyed {
            reason,
            alternative_room,
            password,
        });
    }

    pub fn occupant_joined(&self, room_id: &BareJid, occupant: Occupant) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        let info = OccupantInfo::from(&occupant);
        room.roster().upsert(occupant);
        room.publish(&MucEvent::OccupantJoined { occupant: info });
    }

    pub fn occupant_updated(&self, room_id: &BareJid, occupant: Occupant) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        let info = OccupantInfo::from(&occupant);
        let status = occupant.status.clone();
        room.roster().upsert(occupant);
        room.publish(&MucEvent::OccupantUpdated {
            occupant: info,
            status,
        });
    }

    pub fn occupant_left(&self, room_id: &BareJid, nickname: &str) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        let Some(occupant) = room.roster().remove(nickname) else {
            warn!("Occupant {} left {} but was not in the room.", nickname, room_id);
            return;
        };
        room.publish(&MucEvent::OccupantLeft {
            occupant: OccupantInfo::from(&occupant),
        });
    }

    pub fn occupant_removed(&self, room_id: &BareJid, nickname: &str) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.roster().remove(nickname);
        room.publish(&MucEvent::OccupantRemoved {
            nickname: nickname.to_string(),
        });
    }

    pub fn non_member_removed(&self, room_id: &BareJid, nickname: &str) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.roster().remove(nickname);
        room.publish(&MucEvent::NonMemberRemoved {
            nickname: nickname.to_string(),
        });
    }

    pub fn self_occupant_joined(&self, room_id: &BareJid, occupant: Occupant) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        let info = OccupantInfo::from(&occupant);
        room.add_self_occupant(occupant);
        room.publish(&MucEvent::SelfOccupantJoined { occupant: info });
    }

    pub fn self_occupant_removed(&self, room_id: &BareJid) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.remove_self_occupant();
        room.publish(&MucEvent::SelfOccupantRemoved);
    }

    /// Compares the presence of `occupant` with what the roster knows and publishes the
    /// matching join, affiliation, role or presence event.
    pub fn occupant_presence_received(
        &self,
        room_id: &BareJid,
        occupant: Occupant,
        actor: Option<Actor>,
        reason: Option<String>,
    ) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };

        let Some(known) = room.roster().get(&occupant.nickname) else {
            self.occupant_joined(room_id, occupant);
            return;
        };

        let affiliation_changed = known.affiliation.is_different_from(&occupant.affiliation);
        let role_changed = known.role.is_different_from(&occupant.role);

        if !affiliation_changed && !role_changed {
            self.occupant_updated(room_id, occupant);
            return;
        }

        let nickname = occupant.nickname.clone();
        let (affiliation, role) = (occupant.affiliation, occupant.role);

        // Status and real JID follow the latest presence as well.
        room.roster().upsert(occupant);

        if affiliation_changed && role_changed {
            self.affiliation_role_updated(
                room_id,
                AffiliationRoleUpdate {
                    nickname,
                    previous_affiliation: known.affiliation,
                    new_affiliation: affiliation,
                    previous_role: known.role,
                    new_role: role,
                    actor,
                    reason,
                },
            )
        } else if affiliation_changed {
            self.affiliation_updated(
                room_id,
                AffiliationUpdate {
                    nickname,
                    previous: known.affiliation,
                    new: affiliation,
                    actor,
                    reason,
                },
            )
        } else {
            self.role_updated(
                room_id,
                RoleUpdate {
                    nickname,
                    previous: known.role,
                    new: role,
                    actor,
                    reason,
                },
            )
        }
    }
}

impl MucManager {
    pub fn live_message_received(
        &self,
        room_id: &BareJid,
        nickname: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) {
        self.publish_room_event(
            room_id,
            MucEvent::LiveMessageReceived {
                nickname: nickname.to_string(),
                message: message.to_string(),
                timestamp,
            },
        )
    }

    pub fn delayed_message_received(
        &self,
        room_id: &BareJid,
        nickname: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        if self.inner.config.history_enabled {
            room.add_history_message(nickname, message, timestamp);
        }
        room.publish(&MucEvent::DelayedMessageReceived {
            nickname: nickname.to_string(),
            message: message.to_string(),
            timestamp,
        });
    }

    pub fn discussion_history_received(&self, room_id: &BareJid) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.publish(&MucEvent::DiscussionHistoryReceived {
            history: room.history(),
        });
    }

    /// The subject the room sends after joining.
    pub fn subject_received(&self, room_id: &BareJid, subject: &str) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.update_subject(subject);
        room.publish(&MucEvent::SubjectReceived {
            subject: subject.to_string(),
        });
    }

    /// An occupant changed the subject. Nothing is published if the subject stayed the same.
    pub fn subject_updated(&self, room_id: &BareJid, nickname: &str, subject: &str) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        let had_subject = room.has_subject();
        if !room.update_subject(subject) && had_subject {
            debug!("Ignoring unchanged subject in {}.", room_id);
            return;
        }
        room.publish(&MucEvent::SubjectUpdated {
            nickname: nickname.to_string(),
            subject: subject.to_string(),
        });
    }
}

impl MucManager {
    pub fn logging_enabled(&self, room_id: &BareJid) {
        self.publish_room_event(room_id, MucEvent::LoggingEnabled)
    }

    pub fn logging_disabled(&self, room_id: &BareJid) {
        self.publish_room_event(room_id, MucEvent::LoggingDisabled)
    }

    pub fn non_anonymous_room(&self, room_id: &BareJid) {
        self.room_anonymity_changed(room_id, AnonymityLevel::NonAnonymous)
    }

    pub fn semi_anonymous_room(&self, room_id: &BareJid) {
        self.room_anonymity_changed(room_id, AnonymityLevel::SemiAnonymous)
    }

    fn room_anonymity_changed(&self, room_id: &BareJid, anonymity: AnonymityLevel) {
        self.publish_room_event(room_id, MucEvent::RoomAnonymityChanged { anonymity })
    }

    pub fn disco_info_received(&self, room_id: &BareJid, info: RoomDiscoInfo) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.update_properties(info.clone());
        room.publish(&MucEvent::DiscoInfoReceived { info });
    }

    /// Parses the muc#owner query sent for a reserved room and publishes its form.
    pub fn room_config_received(&self, room_id: &BareJid, payload: Element) -> Result<()> {
        let query = Query::try_from(payload)?;
        let form = query
            .data_form()?
            .ok_or_else(|| anyhow!("Room configuration query of {} has no form.", room_id))?;
        let form = RoomConfigForm::from_data_form(&form)
            .with_context(|| format!("Invalid configuration form for {}", room_id))?;

        self.publish_room_event(room_id, MucEvent::ConfigReceived { form });
        Ok(())
    }

    /// Handles a configuration change announced through `status_codes` together with the
    /// disco info fetched afterwards.
    pub fn config_changed(&self, room_id: &BareJid, status_codes: &[u16], info: RoomDiscoInfo) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };

        let changes = status_codes
            .iter()
            .filter_map(|code| RoomConfigChange::from_status_code(*code))
            .collect::<Vec<_>>();

        room.update_properties(info.clone());
        room.publish(&MucEvent::ConfigChanged { changes, info });
    }

    pub fn config_timeout(&self, room_id: &BareJid) {
        self.publish_room_event(room_id, MucEvent::ConfigTimeout)
    }

    pub fn error_received(&self, room_id: &BareJid, error: MucErrorType) {
        self.publish_room_event(room_id, MucEvent::Error { error })
    }
}

impl MucManager {
    pub fn affiliation_updated(&self, room_id: &BareJid, update: AffiliationUpdate) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.roster()
            .update_affiliation(&update.nickname, update.new);

        let event = if is_self(&room, &update.nickname) {
            MucEvent::SelfAffiliationUpdated {
                update: update.into(),
            }
        } else {
            MucEvent::AffiliationUpdated { update }
        };
        room.publish(&event);
    }

    pub fn role_updated(&self, room_id: &BareJid, update: RoleUpdate) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.roster().update_role(&update.nickname, update.new);

        let event = if is_self(&room, &update.nickname) {
            MucEvent::SelfRoleUpdated {
                update: update.into(),
            }
        } else {
            MucEvent::RoleUpdated { update }
        };
        room.publish(&event);
    }

    pub fn affiliation_role_updated(&self, room_id: &BareJid, update: AffiliationRoleUpdate) {
        let Some(room) = self.room_for_event(room_id) else {
            return;
        };
        room.roster()
            .update_affiliation(&update.nickname, update.new_affiliation);
        room.roster().update_role(&update.nickname, update.new_role);

        let event = if is_self(&room, &update.nickname) {
            MucEvent::SelfAffiliationRoleUpdated {
                update: update.into(),
            }
        } else {
            MucEvent::AffiliationRoleUpdated { update }
        };
        room.publish(&event);
    }
}

fn is_self(room: &Room, nickname: &str) -> bool {
    room.self_occupant_nickname().as_deref() == Some(nickname)
}
