use serde::Serialize;

use crate::model::{Bout, BoutsResponse, PersonIdentityId, WinType};
use crate::reconcile::own_record;
use crate::resolve::IncludedIndex;
use crate::summary::win_percentage;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerStats {
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub pins: usize,
    pub techs: usize,
    pub win_loss_ratio: (usize, usize),
    pub win_percentage: f64,
    pub quickest_win: Option<QuickFinish>,
    pub quickest_loss: Option<QuickFinish>,
    pub finish_types: Vec<FinishTypeRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFinish {
    pub minutes: u32,
    pub seconds: u32,
    pub bout: Bout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishTypeRecord {
    pub win_type: Option<WinType>,
    pub wins: usize,
    pub losses: usize,
}

/// Career record of `athlete` over every bout they appear in. A bout with no
/// resolvable winner is a loss.
pub fn career_stats(bouts: &BoutsResponse, athlete: &PersonIdentityId) -> CareerStats {
    let index = IncludedIndex::new(&bouts.included);
    let mut stats = CareerStats::default();

    for bout in &bouts.data {
        if own_record(bout, athlete, &index).is_none() {
            continue;
        }
        let attrs = &bout.attributes;
        let won = index
            .wrestler_opt(attrs.winner_wrestler_id.as_ref())
            .is_some_and(|w| w.identity() == Some(athlete));

        stats.matches += 1;
        if won {
            stats.wins += 1;
            match attrs.win_type {
                Some(WinType::Fall) => stats.pins += 1,
                Some(WinType::TechFall) => stats.techs += 1,
                _ => {}
            }
        } else {
            stats.losses += 1;
        }

        match stats
            .finish_types
            .iter_mut()
            .find(|f| f.win_type == attrs.win_type)
        {
            Some(finish) if won => finish.wins += 1,
            Some(finish) => finish.losses += 1,
            None => stats.finish_types.push(FinishTypeRecord {
                win_type: attrs.win_type.clone(),
                wins: usize::from(won),
                losses: usize::from(!won),
            }),
        }

        if let Some((minutes, seconds)) = attrs.result.as_deref().and_then(parse_elapsed) {
            let slot = if won {
                &mut stats.quickest_win
            } else {
                &mut stats.quickest_loss
            };
            let quicker = slot
                .as_ref()
                .is_none_or(|q| (minutes, seconds) < (q.minutes, q.seconds));
            if quicker {
                *slot = Some(QuickFinish {
                    minutes,
                    seconds,
                    bout: bout.clone(),
                });
            }
        }
    }

    stats.win_loss_ratio = reduce(stats.wins, stats.losses);
    stats.win_percentage = win_percentage(stats.wins, stats.losses);
    stats
}

/// Elapsed time from a result like `"1:48"` or `"Fall 0:59"`. Scores such as
/// `"5-2"` have none.
pub fn parse_elapsed(result: &str) -> Option<(u32, u32)> {
    let (before, after) = result.split_once(':')?;
    let seconds = after
        .get(..2)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))?;
    let minute_digits = before
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count()
        .min(2);
    let minutes = match &before[before.len() - minute_digits..] {
        "" => 0,
        digits => digits.parse().ok()?,
    };
    Some((minutes, seconds.parse().ok()?))
}

fn reduce(wins: usize, losses: usize) -> (usize, usize) {
    let divisor = gcd(wins, losses);
    if divisor == 0 {
        (0, 0)
    } else {
        (wins / divisor, losses / divisor)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_read_from_minute_second_results() {
        assert_eq!(parse_elapsed("1:48"), Some((1, 48)));
        assert_eq!(parse_elapsed("Fall 0:59"), Some((0, 59)));
        assert_eq!(parse_elapsed("TF 17-2 5:30"), Some((5, 30)));
        assert_eq!(parse_elapsed(":07"), Some((0, 7)));
        assert_eq!(parse_elapsed("17-2"), None);
        assert_eq!(parse_elapsed("2:5"), None);
    }

    #[test]
    fn ratio_is_reduced_and_zero_safe() {
        assert_eq!(reduce(6, 4), (3, 2));
        assert_eq!(reduce(3, 0), (1, 0));
        assert_eq!(reduce(0, 0), (0, 0));
    }

    #[test]
    fn no_bouts_is_an_empty_record() {
        let stats = career_stats(&BoutsResponse::default(), &PersonIdentityId::from("p-1"));
        assert_eq!(stats.matches, 0);
        assert_eq!(stats.win_percentage, 0.0);
        assert_eq!(stats.win_loss_ratio, (0, 0));
        assert!(stats.quickest_win.is_none());
        assert!(stats.finish_types.is_empty());
    }
}
