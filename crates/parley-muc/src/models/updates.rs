// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;

use super::{Affiliation, Role};

/// The occupant who caused an affiliation or role change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub nickname: String,
    pub affiliation: Affiliation,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationUpdate {
    pub nickname: String,
    pub previous: Affiliation,
    pub new: Affiliation,
    pub actor: Option<Actor>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUpdate {
    pub nickname: String,
    pub previous: Role,
    pub new: Role,
    pub actor: Option<Actor>,
    pub reason: Option<String>,
}

/// An affiliation and a role change delivered in the same presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationRoleUpdate {
    pub nickname: String,
    pub previous_affiliation: Affiliation,
    pub new_affiliation: Affiliation,
    pub previous_role: Role,
    pub new_role: Role,
    pub actor: Option<Actor>,
    pub reason: Option<String>,
}

/// An affiliation change of the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfAffiliationUpdate(pub AffiliationUpdate);

/// A role change of the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfRoleUpdate(pub RoleUpdate);

/// A combined affiliation and role change of the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfAffiliationRoleUpdate(pub AffiliationRoleUpdate);

impl AffiliationRoleUpdate {
    pub fn affiliation_update(&self) -> AffiliationUpdate {
        AffiliationUpdate {
            nickname: self.nickname.clone(),
            previous: self.previous_affiliation,
            new: self.new_affiliation,
            actor: self.actor.clone(),
            reason: self.reason.clone(),
        }
    }

    pub fn role_update(&self) -> RoleUpdate {
        RoleUpdate {
            nickname: self.nickname.clone(),
            previous: self.previous_role,
            new: self.new_role,
            actor: self.actor.clone(),
            reason: self.reason.clone(),
        }
    }
}

macro_rules! self_update {
    ($wrapper:ident, $inner:ident) => {
        impl Deref for $wrapper {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$inner> for $wrapper {
            fn from(value: $inner) -> Self {
                $wrapper(value)
            }
        }
    };
}

self_update!(SelfAffiliationUpdate, AffiliationUpdate);
self_update!(SelfRoleUpdate, RoleUpdate);
self_update!(SelfAffiliationRoleUpdate, AffiliationRoleUpdate);
