// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MucConfig {
    /// How long to wait for the server during room creation. `None` waits indefinitely.
    pub room_creation_timeout: Option<Duration>,
    /// Whether delayed messages are collected into the room's discussion history.
    pub history_enabled: bool,
}

impl Default for MucConfig {
    fn default() -> Self {
        Self {
            room_creation_timeout: Some(Duration::from_secs(30)),
            history_enabled: true,
        }
    }
}
