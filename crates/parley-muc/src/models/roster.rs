// parley/parley-muc
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use indexmap::IndexMap;
use parking_lot::Mutex;

use super::{Affiliation, Occupant, Role};

/// The occupants of one room keyed by nickname. Nicknames are compared exactly.
#[derive(Debug, Default)]
pub struct RoomRoster {
    occupants: Mutex<IndexMap<String, Occupant>>,
}

/// The occupants of a roster grouped by role. Each group keeps the order in which its occupants
/// were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupantsByRole {
    pub none: Vec<Occupant>,
    pub visitors: Vec<Occupant>,
    pub participants: Vec<Occupant>,
    pub moderators: Vec<Occupant>,
}

impl OccupantsByRole {
    /// Returns the groups in the order Moderator, Participant, Visitor, None.
    pub fn in_presentation_order(&self) -> [(Role, &[Occupant]); 4] {
        [
            (Role::Moderator, self.moderators.as_slice()),
            (Role::Participant, self.participants.as_slice()),
            (Role::Visitor, self.visitors.as_slice()),
            (Role::None, self.none.as_slice()),
        ]
    }
}

impl RoomRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `occupant` or replaces the occupant with the same nickname. A replaced occupant
    /// keeps its position. Returns true if the nickname was not present before.
    pub fn upsert(&self, occupant: Occupant) -> bool {
        let mut occupants = self.occupants.lock();
        occupants.insert(occupant.nickname.clone(), occupant).is_none()
    }

    pub fn remove(&self, nickname: &str) -> Option<Occupant> {
        self.occupants.lock().shift_remove(nickname)
    }

    pub fn get(&self, nickname: &str) -> Option<Occupant> {
        self.occupants.lock().get(nickname).cloned()
    }

    pub fn contains(&self, nickname: &str) -> bool {
        self.occupants.lock().contains_key(nickname)
    }

    pub fn len(&self) -> usize {
        self.occupants.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.lock().is_empty()
    }

    pub fn all_occupants(&self) -> Vec<Occupant> {
        self.occupants.lock().values().cloned().collect()
    }

    pub fn occupants_by_role(&self) -> OccupantsByRole {
        let occupants = self.occupants.lock();
        let mut result = OccupantsByRole::default();

        for occupant in occupants.values() {
            let group = match occupant.role {
                Role::None => &mut result.none,
                Role::Visitor => &mut result.visitors,
                Role::Participant => &mut result.participants,
                Role::Moderator => &mut result.moderators,
            };
            group.push(occupant.clone());
        }

        result
    }

    /// Sets the affiliation of an existing occupant and returns the previous one.
    pub fn update_affiliation(
        &self,
        nickname: &str,
        affiliation: Affiliation,
    ) -> Option<Affiliation> {
        let mut occupants = self.occupants.lock();
        let occupant = occupants.get_mut(nickname)?;
        Some(std::mem::replace(&mut occupant.affiliation, affiliation))
    }

    /// Sets the role of an existing occupant and returns the previous one.
    pub fn update_role(&self, nickname: &str, role: Role) -> Option<Role> {
        let mut occupants = self.occupants.lock();
        let occupant = occupants.get_mut(nickname)?;
        Some(std::mem::replace(&mut occupant.role, role))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn occupant(nickname: &str, role: Role) -> Occupant {
        Occupant::new(nickname, Affiliation::None, role)
    }

    #[test]
    fn test_upsert_then_get() {
        let roster = RoomRoster::new();

        assert!(roster.upsert(occupant("hag66", Role::Participant)));
        assert_eq!(
            roster.get("hag66"),
            Some(occupant("hag66", Role::Participant))
        );
        assert_eq!(roster.get("Hag66"), None);
    }

    #[test]
    fn test_upsert_overwrites() {
        let roster = RoomRoster::new();

        roster.upsert(occupant("a", Role::Participant));
        roster.upsert(occupant("b", Role::Participant));
        assert!(!roster.upsert(
            occupant("a", Role::Moderator).with_real_jid(parley_xmpp::bare!("a@prose.org"))
        ));

        assert_eq!(roster.len(), 2);
        let all = roster.all_occupants();
        assert_eq!(all[0].nickname, "a");
        assert_eq!(all[0].role, Role::Moderator);
        assert!(all[0].real_jid.is_some());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let roster = RoomRoster::new();
        roster.upsert(occupant("a", Role::Participant));

        assert!(roster.remove("a").is_some());
        assert!(roster.remove("a").is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn test_occupants_by_role() {
        let roster = RoomRoster::new();
        roster.upsert(occupant("v1", Role::Visitor));
        roster.upsert(occupant("m1", Role::Moderator));
        roster.upsert(occupant("p1", Role::Participant));
        roster.upsert(occupant("v2", Role::Visitor));
        roster.upsert(occupant("n1", Role::None));
        roster.upsert(occupant("m2", Role::Moderator));

        let groups = roster.occupants_by_role();
        let nicknames = |occupants: &[Occupant]| {
            occupants
                .iter()
                .map(|o| o.nickname.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(nicknames(&groups.moderators), vec!["m1", "m2"]);
        assert_eq!(nicknames(&groups.participants), vec!["p1"]);
        assert_eq!(nicknames(&groups.visitors), vec!["v1", "v2"]);
        assert_eq!(nicknames(&groups.none), vec!["n1"]);

        let order = groups
            .in_presentation_order()
            .iter()
            .map(|(role, _)| *role)
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![Role::Moderator, Role::Participant, Role::Visitor, Role::None]
        );
    }

    #[test]
    fn test_update_role_and_affiliation() {
        let roster = RoomRoster::new();
        roster.upsert(occupant("a", Role::Visitor));

        assert_eq!(roster.update_role("a", Role::Participant), Some(Role::Visitor));
        assert_eq!(
            roster.update_affiliation("a", Affiliation::Member),
            Some(Affiliation::None)
        );
        assert_eq!(roster.update_role("unknown", Role::Participant), None);

        let a = roster.get("a").unwrap();
        assert_eq!(a.role, Role::Participant);
        assert_eq!(a.affiliation, Affiliation::Member);
    }
}
