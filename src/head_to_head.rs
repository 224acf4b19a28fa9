use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Bout, BoutsResponse, PersonIdentityId, Wrestler};
use crate::reconcile::reconcile;
use crate::resolve::IncludedIndex;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadMatch {
    pub bout: Bout,
    pub winner: Wrestler,
    pub loser: Wrestler,
    pub athlete1_won: bool,
}

/// Bouts in which `athlete1` wrestled `athlete2`, most recent first.
///
/// Only athlete 1's listing is scanned: a direct bout shows up in both
/// listings, so one side is enough and nothing is counted twice.
pub fn find_head_to_head(
    athlete1_bouts: &BoutsResponse,
    athlete1: &PersonIdentityId,
    athlete2: &PersonIdentityId,
) -> Vec<HeadToHeadMatch> {
    let index = IncludedIndex::new(&athlete1_bouts.included);
    let mut matches: Vec<HeadToHeadMatch> = athlete1_bouts
        .data
        .iter()
        .filter_map(|bout| {
            let sides = reconcile(bout, athlete1, &index)?;
            if sides.opponent_identity != athlete2 {
                return None;
            }
            let (winner, loser) = if sides.won {
                (sides.me, sides.opponent)
            } else {
                (sides.opponent, sides.me)
            };
            Some(HeadToHeadMatch {
                bout: bout.clone(),
                winner: winner.clone(),
                loser: loser.clone(),
                athlete1_won: sides.won,
            })
        })
        .collect();

    sort_most_recent_first(&mut matches);
    matches
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadRecord {
    pub athlete1_wins: usize,
    pub athlete2_wins: usize,
}

pub fn head_to_head_record(matches: &[HeadToHeadMatch]) -> HeadToHeadRecord {
    let athlete1_wins = matches.iter().filter(|m| m.athlete1_won).count();
    HeadToHeadRecord {
        athlete1_wins,
        athlete2_wins: matches.len() - athlete1_wins,
    }
}

fn sort_most_recent_first(matches: &mut [HeadToHeadMatch]) {
    // Stable: undated bouts keep listing order at the end.
    matches.sort_by(|a, b| match (a.bout.occurred_at(), b.bout.occurred_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
