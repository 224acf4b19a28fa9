use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::career::{CareerStats, career_stats};
use crate::common_opponents::{CommonOpponentData, find_common_opponents};
use crate::config::ProviderConfig;
use crate::fetch::{CancelToken, fetch_all_bouts, fetch_roster};
use crate::head_to_head::{
    HeadToHeadMatch, HeadToHeadRecord, find_head_to_head, head_to_head_record,
};
use crate::model::{BoutsResponse, PersonIdentityId, RosterResponse};
use crate::profile::{AthleteProfile, build_profile};
use crate::progress::{ProgressCoordinator, ProgressSink};
use crate::summary::{CommonOpponentsSummary, summarize};
use crate::transport::PageSource;

pub const ATHLETE1_BOUTS: &str = "athlete1-bouts";
pub const ATHLETE1_ROSTER: &str = "athlete1-wrestlers";
pub const ATHLETE2_BOUTS: &str = "athlete2-bouts";
pub const ATHLETE2_ROSTER: &str = "athlete2-wrestlers";

#[derive(Debug, Clone)]
pub struct AthleteData {
    pub id: PersonIdentityId,
    pub bouts: BoutsResponse,
    pub roster: RosterResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteSide {
    pub id: PersonIdentityId,
    pub profile: AthleteProfile,
    pub bout_count: usize,
    pub career: CareerStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub athlete1: AthleteSide,
    pub athlete2: AthleteSide,
    pub head_to_head: Vec<HeadToHeadMatch>,
    pub head_to_head_record: HeadToHeadRecord,
    pub common_opponents: Vec<CommonOpponentData>,
    pub summary: CommonOpponentsSummary,
}

/// Fetches both athletes' bouts and rosters at once, reporting through
/// `progress`. The four operations must already be registered.
///
/// Any failed fetch fails the whole load; nothing partial is returned.
pub fn load_athletes(
    source: &dyn PageSource,
    config: &ProviderConfig,
    athlete1: &PersonIdentityId,
    athlete2: &PersonIdentityId,
    progress: &ProgressCoordinator,
    cancel: &CancelToken,
) -> Result<(AthleteData, AthleteData)> {
    let a1_bouts = progress.callback(ATHLETE1_BOUTS);
    let a1_roster = progress.callback(ATHLETE1_ROSTER);
    let a2_bouts = progress.callback(ATHLETE2_BOUTS);
    let a2_roster = progress.callback(ATHLETE2_ROSTER);

    let ((bouts1, roster1), (bouts2, roster2)) =
        with_fetch_pool(config.fetch_parallelism, || {
            rayon::join(
                || {
                    rayon::join(
                        || fetch_all_bouts(source, config, athlete1, cancel, &a1_bouts),
                        || fetch_roster(source, config, athlete1, cancel, &a1_roster),
                    )
                },
                || {
                    rayon::join(
                        || fetch_all_bouts(source, config, athlete2, cancel, &a2_bouts),
                        || fetch_roster(source, config, athlete2, cancel, &a2_roster),
                    )
                },
            )
        });

    let first = AthleteData {
        id: athlete1.clone(),
        bouts: bouts1.with_context(|| format!("bouts fetch failed for {athlete1}"))?,
        roster: roster1.with_context(|| format!("roster fetch failed for {athlete1}"))?,
    };
    let second = AthleteData {
        id: athlete2.clone(),
        bouts: bouts2.with_context(|| format!("bouts fetch failed for {athlete2}"))?,
        roster: roster2.with_context(|| format!("roster fetch failed for {athlete2}"))?,
    };
    Ok((first, second))
}

pub fn analyze(athlete1: &AthleteData, athlete2: &AthleteData) -> Comparison {
    let common_opponents =
        find_common_opponents(&athlete1.bouts, &athlete2.bouts, &athlete1.id, &athlete2.id);
    let head_to_head = find_head_to_head(&athlete1.bouts, &athlete1.id, &athlete2.id);
    let summary = summarize(&common_opponents);
    let head_to_head_record = head_to_head_record(&head_to_head);

    Comparison {
        athlete1: side(athlete1),
        athlete2: side(athlete2),
        head_to_head,
        head_to_head_record,
        common_opponents,
        summary,
    }
}

fn side(data: &AthleteData) -> AthleteSide {
    AthleteSide {
        id: data.id.clone(),
        profile: build_profile(&data.id, &data.roster, &data.bouts),
        bout_count: data.bouts.data.len(),
        career: career_stats(&data.bouts, &data.id),
    }
}

pub fn compare_athletes(
    source: &dyn PageSource,
    config: &ProviderConfig,
    athlete1: &PersonIdentityId,
    athlete2: &PersonIdentityId,
    sink: Arc<dyn ProgressSink>,
    cancel: &CancelToken,
) -> Result<(Comparison, AthleteData, AthleteData)> {
    let progress = ProgressCoordinator::new(sink, config.progress_interval);
    for name in [ATHLETE1_BOUTS, ATHLETE1_ROSTER, ATHLETE2_BOUTS, ATHLETE2_ROSTER] {
        progress.register(name, 0.25)?;
    }
    progress.start();

    let loaded = load_athletes(source, config, athlete1, athlete2, &progress, cancel);
    progress.complete();
    let (first, second) = loaded?;

    let comparison = analyze(&first, &second);
    log::info!(
        "{athlete1} vs {athlete2}: {} head-to-head, {} common opponents",
        comparison.head_to_head.len(),
        comparison.common_opponents.len()
    );
    Ok((comparison, first, second))
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
