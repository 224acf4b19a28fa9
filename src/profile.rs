use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{BoutsResponse, PersonIdentityId, RosterResponse, TeamIdentityId};
use crate::reconcile::own_record;
use crate::resolve::IncludedIndex;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub grade: Option<String>,
    pub teams: Vec<TeamRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub identity_team_id: TeamIdentityId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub bouts: usize,
}

pub fn build_profile(
    athlete: &PersonIdentityId,
    roster: &RosterResponse,
    bouts: &BoutsResponse,
) -> AthleteProfile {
    let roster_index = IncludedIndex::new(&roster.included);
    let bout_index = IncludedIndex::new(&bouts.included);

    let first_name = roster
        .data
        .iter()
        .find_map(|w| w.attributes.first_name.clone().filter(|s| !s.trim().is_empty()));
    let last_name = roster
        .data
        .iter()
        .find_map(|w| w.attributes.last_name.clone().filter(|s| !s.trim().is_empty()));
    let name = match (first_name, last_name) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(first), None) => Some(first),
        _ => roster.data.iter().find_map(|w| w.display_name()),
    };

    let mut teams: Vec<TeamRecord> = Vec::new();
    for wrestler in &roster.data {
        let Some(team) = wrestler
            .attributes
            .team_id
            .as_ref()
            .and_then(|id| roster_index.team(id))
        else {
            continue;
        };
        let Some(identity) = team.attributes.identity_team_id.as_ref() else {
            continue;
        };
        if teams.iter().any(|t| &t.identity_team_id == identity) {
            continue;
        }
        teams.push(TeamRecord {
            identity_team_id: identity.clone(),
            name: team.attributes.name.clone(),
            location: team
                .attributes
                .location
                .as_ref()
                .and_then(|loc| loc.name.clone()),
            bouts: 0,
        });
    }

    for bout in &bouts.data {
        let Some(me) = own_record(bout, athlete, &bout_index) else {
            continue;
        };
        let Some(identity) = me
            .attributes
            .team_id
            .as_ref()
            .and_then(|id| bout_index.team(id))
            .and_then(|team| team.attributes.identity_team_id.as_ref())
        else {
            continue;
        };
        if let Some(record) = teams.iter_mut().find(|t| &t.identity_team_id == identity) {
            record.bouts += 1;
        }
    }

    AthleteProfile {
        name,
        date_of_birth: roster.data.iter().find_map(|w| w.date_of_birth()),
        grade: roster.data.iter().find_map(|w| w.grade_name()),
        teams,
    }
}
