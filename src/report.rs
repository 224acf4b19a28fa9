use std::fmt::Write;

use crate::career::QuickFinish;
use crate::common_opponents::BoutWithMetadata;
use crate::comparison::{AthleteData, AthleteSide, Comparison};
use crate::model::Bout;
use crate::resolve::IncludedIndex;
use crate::summary::Advantage;

pub fn describe_bout(bout: &Bout, index: &IncludedIndex<'_>) -> String {
    let attrs = &bout.attributes;
    let date = bout
        .occurred_at()
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let decision = [
        attrs.win_type.as_ref().map(|w| w.to_string()),
        attrs.result.clone(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let weight = attrs
        .weight_class_id
        .as_ref()
        .and_then(|id| index.weight_class(id))
        .and_then(|wc| wc.attributes.name.clone());
    let unit = attrs
        .top_wrestler_id
        .as_ref()
        .and_then(|id| index.wrestler(id))
        .and_then(|w| w.attributes.division_id.as_ref())
        .and_then(|id| index.division(id))
        .and_then(|d| d.attributes.measurement_unit.clone());
    let weight = match (weight, unit) {
        (Some(w), Some(u)) => format!("{w} {u}"),
        (Some(w), None) => w,
        _ => "-".to_string(),
    };
    let event = attrs
        .event_id
        .as_ref()
        .and_then(|id| index.event(id))
        .and_then(|e| e.attributes.name.clone())
        .unwrap_or_else(|| "-".to_string());

    let decision = if decision.is_empty() {
        "-".to_string()
    } else {
        decision
    };
    format!("{date}  {decision:<14} {weight:<10} {event}")
}

pub fn render_text(comparison: &Comparison, athlete1: &AthleteData, athlete2: &AthleteData) -> String {
    let index1 = IncludedIndex::new(&athlete1.bouts.included);
    let index2 = IncludedIndex::new(&athlete2.bouts.included);
    let name1 = display_name(&comparison.athlete1, "Athlete 1");
    let name2 = display_name(&comparison.athlete2, "Athlete 2");

    let mut out = String::new();
    let _ = writeln!(out, "{name1} vs {name2}");
    let _ = writeln!(out);
    write_side(&mut out, &comparison.athlete1, &name1);
    write_side(&mut out, &comparison.athlete2, &name2);

    let record = comparison.head_to_head_record;
    let _ = writeln!(
        out,
        "Head-to-head ({}): {name1} {} - {} {name2}",
        comparison.head_to_head.len(),
        record.athlete1_wins,
        record.athlete2_wins
    );
    if comparison.head_to_head.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for m in &comparison.head_to_head {
        let winner = if m.athlete1_won { &name1 } else { &name2 };
        let _ = writeln!(out, "  {}  won by {winner}", describe_bout(&m.bout, &index1));
    }
    let _ = writeln!(out);

    let s = &comparison.summary;
    let _ = writeln!(out, "Common opponents: {}", s.total_common_opponents);
    if s.total_common_opponents == 0 {
        let _ = writeln!(out, "  These wrestlers have not faced any of the same opponents.");
        return out;
    }
    let _ = writeln!(
        out,
        "  {name1}: {}-{} ({:.1}%)",
        s.athlete1_total_wins, s.athlete1_total_losses, s.athlete1_win_percentage
    );
    let _ = writeln!(
        out,
        "  {name2}: {}-{} ({:.1}%)",
        s.athlete2_total_wins, s.athlete2_total_losses, s.athlete2_win_percentage
    );
    let _ = writeln!(out, "  edge: {}", edge(s.advantage(), &name1, &name2));
    let _ = writeln!(out);

    for opp in &comparison.common_opponents {
        let _ = writeln!(
            out,
            "{} ({} bouts)  {name1} {}-{}  {name2} {}-{}  edge: {}",
            opp.opponent_name,
            opp.total_bouts,
            opp.athlete1_wins,
            opp.athlete1_losses,
            opp.athlete2_wins,
            opp.athlete2_losses,
            edge(opp.advantage(), &name1, &name2)
        );
        write_bouts(&mut out, &name1, &opp.athlete1_bouts, &index1);
        write_bouts(&mut out, &name2, &opp.athlete2_bouts, &index2);
    }
    out
}

fn write_side(out: &mut String, side: &AthleteSide, name: &str) {
    let p = &side.profile;
    let _ = writeln!(out, "{name} ({} bouts)", side.bout_count);
    if let Some(dob) = p.date_of_birth {
        let _ = writeln!(out, "  born {dob}");
    }
    let _ = writeln!(out, "  grade {}", p.grade.as_deref().unwrap_or("Unknown"));
    let c = &side.career;
    let _ = writeln!(
        out,
        "  record {}-{} ({:.1}%), ratio {}:{}, {} pins, {} techs",
        c.wins, c.losses, c.win_percentage, c.win_loss_ratio.0, c.win_loss_ratio.1, c.pins, c.techs
    );
    let _ = writeln!(
        out,
        "  quickest win {}, quickest loss {}",
        quick_finish(c.quickest_win.as_ref()),
        quick_finish(c.quickest_loss.as_ref())
    );
    let finishes: Vec<String> = c
        .finish_types
        .iter()
        .map(|f| {
            let kind = f.win_type.as_ref().map_or("?".to_string(), |w| w.to_string());
            format!("{kind} {}-{}", f.wins, f.losses)
        })
        .collect();
    if !finishes.is_empty() {
        let _ = writeln!(out, "  finishes {}", finishes.join(", "));
    }
    for team in &p.teams {
        let _ = writeln!(
            out,
            "  {} {} - {} bouts",
            team.name.as_deref().unwrap_or("?"),
            team.location
                .as_deref()
                .map(|l| format!("({l})"))
                .unwrap_or_default(),
            team.bouts
        );
    }
    let _ = writeln!(out);
}

fn write_bouts(out: &mut String, name: &str, bouts: &[BoutWithMetadata], index: &IncludedIndex<'_>) {
    for b in bouts {
        let result = if b.is_win { "W" } else { "L" };
        let _ = writeln!(out, "    {name} {result}  {}", describe_bout(&b.bout, index));
    }
}

fn quick_finish(finish: Option<&QuickFinish>) -> String {
    match finish {
        Some(q) => {
            let kind = q
                .bout
                .attributes
                .win_type
                .as_ref()
                .map(|w| format!(" {w}"))
                .unwrap_or_default();
            format!("{}:{:02}{kind}", q.minutes, q.seconds)
        }
        None => "n/a".to_string(),
    }
}

fn edge(advantage: Advantage, name1: &str, name2: &str) -> String {
    match advantage {
        Advantage::Athlete1 => name1.to_string(),
        Advantage::Athlete2 => name2.to_string(),
        Advantage::Even => "even".to_string(),
    }
}

fn display_name(side: &AthleteSide, fallback: &str) -> String {
    side.profile
        .name
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}
