//! Card ID to member lookup, plus per-section registration order.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ClubError, Result};
use crate::models::{Member, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRegistry {
    /// Card ID -> member.
    pub members: BTreeMap<String, Member>,
    /// Card IDs per section, in registration order.
    pub sections: BTreeMap<Section, Vec<String>>,
}

fn empty_sections() -> BTreeMap<Section, Vec<String>> {
    Section::ALL.into_iter().map(|s| (s, Vec::new())).collect()
}

impl Default for MemberRegistry {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
            sections: empty_sections(),
        }
    }
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card, or re-register it with a new name/section.
    ///
    /// The section is validated before anything is written. A card that moves
    /// to a different section is taken out of its old section list.
    pub fn register(&mut self, card_id: &str, name: &str, section: &str) -> Result<&Member> {
        let section: Section = section.parse()?;

        if let Some(previous) = self.members.get(card_id) {
            if previous.section != section {
                let old = previous.section;
                if let Some(cards) = self.sections.get_mut(&old) {
                    cards.retain(|c| c != card_id);
                }
                debug!(card = %card_id, from = %old, to = %section, "Member changed section");
            }
        }

        let cards = self.sections.entry(section).or_default();
        if !cards.iter().any(|c| c == card_id) {
            cards.push(card_id.to_string());
        }

        debug!(card = %card_id, name = %name, section = %section, "Registered member");
        let member = Member::new(card_id, name, section);
        let stored = match self.members.entry(card_id.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(member);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(member),
        };
        Ok(stored)
    }

    pub fn resolve_by_card(&self, card_id: &str) -> Result<&Member> {
        self.members
            .get(card_id)
            .ok_or_else(|| ClubError::NotFound(card_id.to_string()))
    }

    /// Exact-name lookup. With duplicate names, the first member in report
    /// order wins.
    pub fn resolve_by_name(&self, name: &str) -> Result<&Member> {
        self.iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ClubError::NotFound(name.to_string()))
    }

    /// Members of one section, in registration order.
    pub fn members_in(&self, section: Section) -> impl Iterator<Item = &Member> + '_ {
        self.sections
            .get(&section)
            .into_iter()
            .flatten()
            .filter_map(|card| self.members.get(card))
    }

    /// All members in report order: section order, then registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Member> + '_ {
        self.sections
            .values()
            .flatten()
            .filter_map(|card| self.members.get(card))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve_agree() {
        let mut reg = MemberRegistry::new();
        reg.register("C1", "Alice", "T1").unwrap();
        reg.register("C2", "Bob", "Bass").unwrap();
        reg.register("C3", "Carl", "bari").unwrap();

        for member in reg.iter() {
            let by_card = reg.resolve_by_card(&member.card_id).unwrap();
            let by_name = reg.resolve_by_name(&member.name).unwrap();
            assert_eq!(by_card.name, by_name.name);
            assert_eq!(by_card.section, by_name.section);
        }
    }

    #[test]
    fn test_invalid_section_leaves_registry_unchanged() {
        let mut reg = MemberRegistry::new();
        let err = reg.register("C1", "Alice", "Alto").unwrap_err();
        assert_eq!(err, ClubError::InvalidSection("Alto".to_string()));
        assert!(reg.is_empty());
        assert_eq!(reg, MemberRegistry::new());
    }

    #[test]
    fn test_reregister_overwrites_without_duplicating() {
        let mut reg = MemberRegistry::new();
        let first = reg.register("C1", "Alice", "T1").unwrap().clone();
        assert_eq!(first, Member::new("C1", "Alice", Section::T1));
        let updated = reg.register("C1", "Alicia", "T1").unwrap();
        assert_eq!(updated.name, "Alicia");

        assert_eq!(reg.sections[&Section::T1], vec!["C1".to_string()]);
        assert_eq!(reg.resolve_by_card("C1").unwrap().name, "Alicia");
        assert!(reg.resolve_by_name("Alice").is_err());
    }

    #[test]
    fn test_reregister_into_new_section_moves_card() {
        let mut reg = MemberRegistry::new();
        reg.register("C1", "Alice", "T1").unwrap();
        reg.register("C1", "Alice", "T2").unwrap();

        assert!(reg.sections[&Section::T1].is_empty());
        assert_eq!(reg.sections[&Section::T2], vec!["C1".to_string()]);
        assert_eq!(reg.iter().count(), 1);
    }

    #[test]
    fn test_iter_follows_section_then_registration_order() {
        let mut reg = MemberRegistry::new();
        reg.register("C1", "Bass1", "Bass").unwrap();
        reg.register("C2", "Tenor1", "T1").unwrap();
        reg.register("C3", "Tenor2", "T1").unwrap();
        reg.register("C4", "Bari1", "Bari").unwrap();

        let names: Vec<&str> = reg.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Tenor1", "Tenor2", "Bari1", "Bass1"]);

        let t1: Vec<&str> = reg.members_in(Section::T1).map(|m| m.card_id.as_str()).collect();
        assert_eq!(t1, vec!["C2", "C3"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let reg = MemberRegistry::new();
        assert_eq!(
            reg.resolve_by_card("999"),
            Err(ClubError::NotFound("999".to_string()))
        );
        assert!(reg.resolve_by_name("Ghost").is_err());
    }

    #[test]
    fn test_resolve_by_name_is_exact() {
        let mut reg = MemberRegistry::new();
        reg.register("C1", "Alice", "T1").unwrap();
        assert!(reg.resolve_by_name("alice").is_err());
        assert!(reg.resolve_by_name("Alice ").is_err());
    }
}
