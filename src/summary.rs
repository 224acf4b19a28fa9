use serde::Serialize;

use crate::common_opponents::CommonOpponentData;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOpponentsSummary {
    pub total_common_opponents: usize,
    pub athlete1_total_wins: usize,
    pub athlete1_total_losses: usize,
    pub athlete1_win_percentage: f64,
    pub athlete2_total_wins: usize,
    pub athlete2_total_losses: usize,
    pub athlete2_win_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advantage {
    Athlete1,
    Athlete2,
    Even,
}

impl Advantage {
    pub fn compare(athlete1_pct: f64, athlete2_pct: f64) -> Self {
        if athlete1_pct > athlete2_pct {
            Advantage::Athlete1
        } else if athlete2_pct > athlete1_pct {
            Advantage::Athlete2
        } else {
            Advantage::Even
        }
    }
}

impl CommonOpponentsSummary {
    pub fn advantage(&self) -> Advantage {
        Advantage::compare(self.athlete1_win_percentage, self.athlete2_win_percentage)
    }
}

pub fn summarize(common: &[CommonOpponentData]) -> CommonOpponentsSummary {
    let mut summary = CommonOpponentsSummary {
        total_common_opponents: common.len(),
        ..Default::default()
    };
    for opponent in common {
        summary.athlete1_total_wins += opponent.athlete1_wins;
        summary.athlete1_total_losses += opponent.athlete1_losses;
        summary.athlete2_total_wins += opponent.athlete2_wins;
        summary.athlete2_total_losses += opponent.athlete2_losses;
    }
    summary.athlete1_win_percentage =
        win_percentage(summary.athlete1_total_wins, summary.athlete1_total_losses);
    summary.athlete2_win_percentage =
        win_percentage(summary.athlete2_total_wins, summary.athlete2_total_losses);
    summary
}

pub fn win_percentage(wins: usize, losses: usize) -> f64 {
    let total = wins + losses;
    if total == 0 {
        return 0.0;
    }
    wins as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_percentage_handles_empty_record() {
        assert_eq!(win_percentage(0, 0), 0.0);
        assert_eq!(win_percentage(3, 1), 75.0);
        assert_eq!(win_percentage(0, 4), 0.0);
    }

    #[test]
    fn empty_input_is_an_even_zero_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary, CommonOpponentsSummary::default());
        assert_eq!(summary.advantage(), Advantage::Even);
    }
}
