use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::model::{Bout, BoutsResponse, PersonIdentityId, Wrestler};
use crate::reconcile::reconcile;
use crate::resolve::IncludedIndex;
use crate::summary::{Advantage, win_percentage};

pub const UNKNOWN_OPPONENT: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoutWithMetadata {
    pub bout: Bout,
    pub is_win: bool,
    pub opponent: Wrestler,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOpponentData {
    pub opponent_id: PersonIdentityId,
    pub opponent_name: String,
    pub athlete1_bouts: Vec<BoutWithMetadata>,
    pub athlete2_bouts: Vec<BoutWithMetadata>,
    pub athlete1_wins: usize,
    pub athlete1_losses: usize,
    pub athlete2_wins: usize,
    pub athlete2_losses: usize,
    pub total_bouts: usize,
}

impl CommonOpponentData {
    pub fn advantage(&self) -> Advantage {
        Advantage::compare(
            win_percentage(self.athlete1_wins, self.athlete1_losses),
            win_percentage(self.athlete2_wins, self.athlete2_losses),
        )
    }
}

pub fn opponent_ids(bouts: &BoutsResponse, athlete: &PersonIdentityId) -> BTreeSet<PersonIdentityId> {
    let index = IncludedIndex::new(&bouts.included);
    bouts
        .data
        .iter()
        .filter_map(|bout| reconcile(bout, athlete, &index))
        .map(|sides| sides.opponent_identity.clone())
        .collect()
}

pub fn bouts_by_opponent(
    bouts: &BoutsResponse,
    athlete: &PersonIdentityId,
) -> HashMap<PersonIdentityId, Vec<BoutWithMetadata>> {
    let index = IncludedIndex::new(&bouts.included);
    let mut grouped: HashMap<PersonIdentityId, Vec<BoutWithMetadata>> = HashMap::new();
    let mut skipped = 0usize;
    for bout in &bouts.data {
        let Some(sides) = reconcile(bout, athlete, &index) else {
            skipped += 1;
            continue;
        };
        grouped
            .entry(sides.opponent_identity.clone())
            .or_default()
            .push(BoutWithMetadata {
                bout: bout.clone(),
                is_win: sides.won,
                opponent: sides.opponent.clone(),
            });
    }
    if skipped > 0 {
        log::warn!("{skipped} bouts of {athlete} could not be attributed to an opponent");
    }
    grouped
}

/// Opponents both athletes have faced, with each athlete's full record
/// against them. Sorted by total bouts descending, then opponent id.
pub fn find_common_opponents(
    athlete1_bouts: &BoutsResponse,
    athlete2_bouts: &BoutsResponse,
    athlete1: &PersonIdentityId,
    athlete2: &PersonIdentityId,
) -> Vec<CommonOpponentData> {
    let mut first = bouts_by_opponent(athlete1_bouts, athlete1);
    let mut second = bouts_by_opponent(athlete2_bouts, athlete2);

    let shared: Vec<PersonIdentityId> = first
        .keys()
        .filter(|id| second.contains_key(*id))
        .cloned()
        .collect();

    let mut common: Vec<CommonOpponentData> = shared
        .into_iter()
        .map(|opponent_id| {
            let a1 = first.remove(&opponent_id).unwrap_or_default();
            let a2 = second.remove(&opponent_id).unwrap_or_default();
            build_entry(opponent_id, a1, a2)
        })
        .collect();

    common.sort_by(|a, b| {
        b.total_bouts
            .cmp(&a.total_bouts)
            .then_with(|| a.opponent_id.cmp(&b.opponent_id))
    });
    common
}

fn build_entry(
    opponent_id: PersonIdentityId,
    athlete1_bouts: Vec<BoutWithMetadata>,
    athlete2_bouts: Vec<BoutWithMetadata>,
) -> CommonOpponentData {
    let (athlete1_wins, athlete1_losses) = tally(&athlete1_bouts);
    let (athlete2_wins, athlete2_losses) = tally(&athlete2_bouts);
    let opponent_name = athlete1_bouts
        .iter()
        .chain(athlete2_bouts.iter())
        .find_map(|b| b.opponent.display_name())
        .unwrap_or_else(|| UNKNOWN_OPPONENT.to_string());
    let total_bouts = athlete1_bouts.len() + athlete2_bouts.len();

    CommonOpponentData {
        opponent_id,
        opponent_name,
        athlete1_bouts,
        athlete2_bouts,
        athlete1_wins,
        athlete1_losses,
        athlete2_wins,
        athlete2_losses,
        total_bouts,
    }
}

fn tally(bouts: &[BoutWithMetadata]) -> (usize, usize) {
    let wins = bouts.iter().filter(|b| b.is_win).count();
    (wins, bouts.len() - wins)
}
