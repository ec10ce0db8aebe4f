// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use builder::ClientBuilder;
pub use client::{Client, IqReply};

mod builder;
mod client;
