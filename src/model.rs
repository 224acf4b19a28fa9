use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Stable, cross-season identifier of a person. Every comparison between
    /// athletes keys on this.
    PersonIdentityId
);
string_id!(
    /// Season/team scoped roster entry id. Bout roles (top, bottom, winner)
    /// reference this, never the person identity.
    WrestlerRecordId
);
string_id!(BoutId);
string_id!(TeamId);
string_id!(TeamIdentityId);
string_id!(EventId);
string_id!(DivisionId);
string_id!(WeightClassId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<I, A> {
    pub id: I,
    #[serde(default)]
    pub attributes: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Value>,
}

pub type Bout = Resource<BoutId, BoutAttributes>;
pub type Wrestler = Resource<WrestlerRecordId, WrestlerAttributes>;
pub type Team = Resource<TeamId, TeamAttributes>;
pub type Event = Resource<EventId, EventAttributes>;
pub type Division = Resource<DivisionId, DivisionAttributes>;
pub type WeightClass = Resource<WeightClassId, WeightClassAttributes>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Entity {
    Bout(Bout),
    Wrestler(Wrestler),
    Team(Team),
    Event(Event),
    Division(Division),
    WeightClass(WeightClass),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoutAttributes {
    pub top_wrestler_id: Option<WrestlerRecordId>,
    pub bottom_wrestler_id: Option<WrestlerRecordId>,
    pub winner_wrestler_id: Option<WrestlerRecordId>,
    pub win_type: Option<WinType>,
    pub result: Option<String>,
    pub event_id: Option<EventId>,
    pub weight_class_id: Option<WeightClassId>,
    pub go_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

impl Bout {
    pub fn occurred_at(&self) -> Option<DateTime<FixedOffset>> {
        self.attributes
            .go_date_time
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| {
                self.attributes
                    .end_date_time
                    .as_deref()
                    .and_then(parse_timestamp)
            })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

/// How a bout was decided. Provider codes outside the known set are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WinType {
    Fall,
    TechFall,
    MajorDecision,
    Decision,
    Forfeit,
    Disqualification,
    InjuryDefault,
    Other(String),
}

impl From<String> for WinType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "F" | "FALL" | "PIN" => WinType::Fall,
            "TF" | "TECH FALL" | "TECHFALL" => WinType::TechFall,
            "MD" | "MAJOR DECISION" => WinType::MajorDecision,
            "D" | "DEC" | "DECISION" | "SV" | "TB" | "UTB" => WinType::Decision,
            "FF" | "FOR" | "FORFEIT" | "MFF" => WinType::Forfeit,
            "DQ" | "DISQUALIFICATION" => WinType::Disqualification,
            "INJ" | "DEF" | "INJURY DEFAULT" => WinType::InjuryDefault,
            _ => WinType::Other(raw),
        }
    }
}

impl From<WinType> for String {
    fn from(value: WinType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            WinType::Fall => "F",
            WinType::TechFall => "TF",
            WinType::MajorDecision => "MD",
            WinType::Decision => "DEC",
            WinType::Forfeit => "FF",
            WinType::Disqualification => "DQ",
            WinType::InjuryDefault => "INJ",
            WinType::Other(raw) => raw.as_str(),
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrestlerAttributes {
    pub identity_person_id: Option<PersonIdentityId>,
    pub team_id: Option<TeamId>,
    pub division_id: Option<DivisionId>,
    pub weight_class_id: Option<WeightClassId>,
    pub event_id: Option<EventId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    // Shape varies between endpoints: an embedded record or a bare label.
    pub grade: Option<Value>,
}

impl Wrestler {
    pub fn identity(&self) -> Option<&PersonIdentityId> {
        self.attributes.identity_person_id.as_ref()
    }

    pub fn display_name(&self) -> Option<String> {
        let attrs = &self.attributes;
        if let Some(full) = attrs.full_name.as_deref().and_then(non_empty) {
            return Some(full.to_string());
        }
        match (
            attrs.first_name.as_deref().and_then(non_empty),
            attrs.last_name.as_deref().and_then(non_empty),
        ) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        let raw = self.attributes.date_of_birth.as_deref()?.trim();
        // Usually a bare date, occasionally a full timestamp.
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    pub fn grade_name(&self) -> Option<String> {
        let grade = self.attributes.grade.as_ref()?;
        let name = match grade {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => grade
                .pointer("/attributes/name")
                .or_else(|| grade.get("name"))
                .and_then(|v| v.as_str()),
            _ => None,
        };
        name.and_then(non_empty).map(|s| s.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAttributes {
    pub identity_team_id: Option<TeamIdentityId>,
    pub name: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributes {
    pub name: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionAttributes {
    pub name: Option<String>,
    pub measurement_unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightClassAttributes {
    pub name: Option<String>,
}

/// Wire shape of a single provider page. `data` stays optional so a page
/// without its primary list can be told apart from an empty one.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Option<Vec<T>>,
    #[serde(default, deserialize_with = "vec_or_default")]
    pub included: Vec<Entity>,
    #[serde(default, deserialize_with = "links_or_default")]
    pub links: Links,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoundResponse<T> {
    pub data: Vec<T>,
    pub included: Vec<Entity>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

impl<T> Default for CompoundResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            included: Vec::new(),
            next: None,
            total: None,
        }
    }
}

impl<T> From<Page<T>> for CompoundResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.data.unwrap_or_default(),
            included: page.included,
            next: page.links.next,
            total: page.meta.and_then(|meta| meta.total),
        }
    }
}

pub type BoutsResponse = CompoundResponse<Bout>;
pub type RosterResponse = CompoundResponse<Wrestler>;

fn vec_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn links_or_default<'de, D>(deserializer: D) -> Result<Links, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Links>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_type_maps_known_codes_and_keeps_unknown() {
        assert_eq!(WinType::from("f".to_string()), WinType::Fall);
        assert_eq!(WinType::from("TF".to_string()), WinType::TechFall);
        assert_eq!(WinType::from("Dec".to_string()), WinType::Decision);
        assert_eq!(
            WinType::from("BYE".to_string()),
            WinType::Other("BYE".to_string())
        );
        assert_eq!(WinType::Other("BYE".to_string()).to_string(), "BYE");
    }

    #[test]
    fn included_entities_are_tagged_by_type() {
        let raw = r#"[
            {"id":"w1","type":"wrestler","attributes":{"identityPersonId":"p1","firstName":"Sam"}},
            {"id":"wc1","type":"weightClass","attributes":{"name":"132"}},
            {"id":"r1","type":"roundName","attributes":{"displayName":"Final"}}
        ]"#;
        let parsed: Vec<Entity> = serde_json::from_str(raw).unwrap();
        assert!(matches!(&parsed[0], Entity::Wrestler(w) if w.id.as_str() == "w1"));
        assert!(matches!(&parsed[1], Entity::WeightClass(w) if w.attributes.name.as_deref() == Some("132")));
        assert!(matches!(parsed[2], Entity::Other));
    }

    #[test]
    fn page_without_data_is_distinguishable_from_empty_page() {
        let missing: Page<Bout> = serde_json::from_str(r#"{"included":null,"links":null}"#).unwrap();
        assert!(missing.data.is_none());
        assert!(missing.included.is_empty());
        assert!(missing.links.next.is_none());

        let empty: Page<Bout> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(empty.data.map(|d| d.len()), Some(0));
    }

    #[test]
    fn wrestler_name_and_grade_fallbacks() {
        let w: Wrestler = serde_json::from_str(
            r#"{"id":"w1","attributes":{"firstName":"Sam","lastName":"Lee","grade":{"attributes":{"name":"Junior"}},"dateOfBirth":"2007-05-02T00:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(w.display_name().as_deref(), Some("Sam Lee"));
        assert_eq!(w.grade_name().as_deref(), Some("Junior"));
        assert_eq!(w.date_of_birth(), NaiveDate::from_ymd_opt(2007, 5, 2));
    }
}
