// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use config::MucConfig;
pub use error::{ModelError, RoomCreationError};
pub use events::{MucErrorType, MucEvent, OccupantInfo};
pub use muc_manager::{MucManager, MucManagerBuilder};
pub use room_manager::RoomManager;
pub use services::RoomCreation;

mod config;
mod error;
mod events;
pub mod models;
mod muc_manager;
mod room_manager;
pub mod services;
