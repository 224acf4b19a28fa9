use std::collections::HashMap;

use crate::model::{
    Division, DivisionId, Entity, Event, EventId, Team, TeamId, WeightClass, WeightClassId,
    Wrestler, WrestlerRecordId,
};

#[derive(Debug, Default)]
pub struct IncludedIndex<'a> {
    wrestlers: HashMap<&'a WrestlerRecordId, &'a Wrestler>,
    teams: HashMap<&'a TeamId, &'a Team>,
    events: HashMap<&'a EventId, &'a Event>,
    divisions: HashMap<&'a DivisionId, &'a Division>,
    weight_classes: HashMap<&'a WeightClassId, &'a WeightClass>,
}

impl<'a> IncludedIndex<'a> {
    pub fn new(included: &'a [Entity]) -> Self {
        let mut index = Self::default();
        for entity in included {
            match entity {
                Entity::Wrestler(w) => {
                    index.wrestlers.entry(&w.id).or_insert(w);
                }
                Entity::Team(t) => {
                    index.teams.entry(&t.id).or_insert(t);
                }
                Entity::Event(e) => {
                    index.events.entry(&e.id).or_insert(e);
                }
                Entity::Division(d) => {
                    index.divisions.entry(&d.id).or_insert(d);
                }
                Entity::WeightClass(wc) => {
                    index.weight_classes.entry(&wc.id).or_insert(wc);
                }
                Entity::Bout(_) | Entity::Other => {}
            }
        }
        index
    }

    pub fn wrestler(&self, id: &WrestlerRecordId) -> Option<&'a Wrestler> {
        self.wrestlers.get(id).copied()
    }

    pub fn team(&self, id: &TeamId) -> Option<&'a Team> {
        self.teams.get(id).copied()
    }

    pub fn event(&self, id: &EventId) -> Option<&'a Event> {
        self.events.get(id).copied()
    }

    pub fn division(&self, id: &DivisionId) -> Option<&'a Division> {
        self.divisions.get(id).copied()
    }

    pub fn weight_class(&self, id: &WeightClassId) -> Option<&'a WeightClass> {
        self.weight_classes.get(id).copied()
    }

    pub fn wrestler_opt(&self, id: Option<&WrestlerRecordId>) -> Option<&'a Wrestler> {
        id.and_then(|id| self.wrestler(id))
    }

    pub fn wrestler_count(&self) -> usize {
        self.wrestlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_duplicate_wins_and_kinds_do_not_collide() {
        let raw = r#"[
            {"id":"x1","type":"wrestler","attributes":{"firstName":"First"}},
            {"id":"x1","type":"wrestler","attributes":{"firstName":"Second"}},
            {"id":"x1","type":"team","attributes":{"name":"Same id, other kind"}}
        ]"#;
        let included: Vec<Entity> = serde_json::from_str(raw).unwrap();
        let index = IncludedIndex::new(&included);

        let w = index.wrestler(&WrestlerRecordId::from("x1")).unwrap();
        assert_eq!(w.attributes.first_name.as_deref(), Some("First"));
        let t = index.team(&TeamId::from("x1")).unwrap();
        assert_eq!(t.attributes.name.as_deref(), Some("Same id, other kind"));
        assert_eq!(index.wrestler_count(), 1);
    }

    #[test]
    fn misses_are_absent_not_errors() {
        let index = IncludedIndex::new(&[]);
        assert!(index.wrestler(&WrestlerRecordId::from("nope")).is_none());
        assert!(index.wrestler_opt(None).is_none());
    }
}
