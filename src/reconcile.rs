use crate::model::{Bout, PersonIdentityId, Wrestler};
use crate::resolve::IncludedIndex;

#[derive(Debug, Clone, Copy)]
pub struct BoutSides<'a> {
    pub me: &'a Wrestler,
    pub opponent: &'a Wrestler,
    pub opponent_identity: &'a PersonIdentityId,
    pub winner: Option<&'a Wrestler>,
    pub won: bool,
}

/// The athlete's own wrestler record in `bout`, if either side resolves to
/// their identity. Top is checked first.
pub fn own_record<'a>(
    bout: &Bout,
    athlete: &PersonIdentityId,
    index: &IncludedIndex<'a>,
) -> Option<&'a Wrestler> {
    let top = index.wrestler_opt(bout.attributes.top_wrestler_id.as_ref());
    let bottom = index.wrestler_opt(bout.attributes.bottom_wrestler_id.as_ref());
    [top, bottom]
        .into_iter()
        .flatten()
        .find(|w| w.identity() == Some(athlete))
}

/// Splits `bout` into self and opponent for `athlete`, or `None` when it
/// cannot be attributed to a distinct opponent.
pub fn reconcile<'a>(
    bout: &Bout,
    athlete: &PersonIdentityId,
    index: &IncludedIndex<'a>,
) -> Option<BoutSides<'a>> {
    let attrs = &bout.attributes;
    let top = index.wrestler_opt(attrs.top_wrestler_id.as_ref());
    let bottom = index.wrestler_opt(attrs.bottom_wrestler_id.as_ref());

    let (me, opponent) = if top.and_then(|w| w.identity()) == Some(athlete) {
        (top?, bottom?)
    } else if bottom.and_then(|w| w.identity()) == Some(athlete) {
        (bottom?, top?)
    } else {
        return None;
    };

    let opponent_identity = opponent.identity()?;
    if opponent_identity == athlete {
        return None;
    }

    let winner = index.wrestler_opt(attrs.winner_wrestler_id.as_ref());
    // A missing or unresolvable winner counts as a loss. The athlete's own
    // record always resolves, so an unresolved winner is never them.
    let won = winner.is_some_and(|w| w.identity() == Some(athlete));

    Some(BoutSides {
        me,
        opponent,
        opponent_identity,
        winner,
        won,
    })
}
