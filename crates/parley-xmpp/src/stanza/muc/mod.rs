// parley/parley-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use query::{MucQueryPayload, Query, QueryRole};

pub mod ns;
pub mod query;
pub mod status;
