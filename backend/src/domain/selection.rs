//! Consultant selection policy.
//!
//! One policy, applied consistently: least-loaded-today with a uniformly
//! random tie-break. The daily attribution count is the only ordering
//! input; issuance timestamps are informational and never influence
//! ordering. Under a sustained tie a deterministic tie-break would keep
//! favouring the same consultant, so the tie-break must be random.
//!
//! Concurrent selections may pick the same consultant; fairness is measured
//! over the scale of a day, not per-request exclusivity, which is why no
//! soft lock is taken on the chosen roster entry.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Consultant, MatchKey};

/// A roster entry joined with its attribution count for today.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultantLoad {
    /// The roster entry.
    pub consultant: Consultant,
    /// Inbound contacts attributed to this consultant's matching key today.
    pub today: u64,
}

/// Join active roster entries with today's per-key attribution counts.
///
/// Keys missing from `counts` contribute zero; matching is exact on the
/// normalized [`MatchKey`], which already folds case and whitespace.
pub fn attach_today_counts(
    consultants: Vec<Consultant>,
    counts: &HashMap<MatchKey, u64>,
) -> Vec<ConsultantLoad> {
    consultants
        .into_iter()
        .map(|consultant| {
            let today = counts.get(consultant.match_key()).copied().unwrap_or(0);
            ConsultantLoad { consultant, today }
        })
        .collect()
}

/// Pick the candidate with the fewest contacts today, breaking ties
/// uniformly at random.
///
/// Returns `None` when `candidates` is empty; the caller decides between
/// the configured backup number and a no-consultant failure.
///
/// # Examples
/// ```rust,ignore
/// # let candidates = sample_loads();
/// let mut rng = rand::thread_rng();
/// let chosen = backend::domain::pick_least_loaded(&candidates, &mut rng);
/// assert!(chosen.is_some());
/// ```
pub fn pick_least_loaded<'a, R>(
    candidates: &'a [ConsultantLoad],
    rng: &mut R,
) -> Option<&'a ConsultantLoad>
where
    R: Rng + ?Sized,
{
    let minimum = candidates.iter().map(|load| load.today).min()?;
    let tied: Vec<&ConsultantLoad> = candidates
        .iter()
        .filter(|load| load.today == minimum)
        .collect();
    tied.choose(rng).copied()
}

/// Aggregate balance figures across a set of loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// Lowest per-consultant count today.
    pub min: u64,
    /// Highest per-consultant count today.
    pub max: u64,
    /// `max - min`; zero means perfectly even distribution.
    pub spread: u64,
}

/// Compute min/max/spread across the loads, or `None` for an empty roster.
pub fn balance_snapshot(loads: &[ConsultantLoad]) -> Option<BalanceSnapshot> {
    let min = loads.iter().map(|load| load.today).min()?;
    let max = loads.iter().map(|load| load.today).max()?;
    Some(BalanceSnapshot {
        min,
        max,
        spread: max - min,
    })
}

#[cfg(test)]
mod tests {
    //! Fairness and tie-break behaviour of the selection policy.

    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::domain::{ConsultantDraft, ConsultantId, Platform};

    fn consultant(name: &str) -> Consultant {
        Consultant::new(ConsultantDraft {
            id: ConsultantId::random(),
            platform: Platform::new("whatsapp").expect("valid tag"),
            display_name: name.to_owned(),
            email: None,
            contact_number: "+55 11 90000-0000".to_owned(),
            match_key: MatchKey::new(name),
            active: true,
            lifetime_uses: 0,
            last_used_at: None,
        })
        .expect("valid consultant")
    }

    fn loads(entries: &[(&str, u64)]) -> Vec<ConsultantLoad> {
        entries
            .iter()
            .map(|(name, today)| ConsultantLoad {
                consultant: consultant(name),
                today: *today,
            })
            .collect()
    }

    #[test]
    fn empty_roster_yields_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(pick_least_loaded(&[], &mut rng).is_none());
    }

    #[test]
    fn lowest_count_wins() {
        let candidates = loads(&[("ana", 3), ("bruno", 1), ("carla", 2)]);
        let mut rng = SmallRng::seed_from_u64(7);

        let chosen = pick_least_loaded(&candidates, &mut rng).expect("candidate");
        assert_eq!(chosen.consultant.display_name(), "bruno");
    }

    #[test]
    fn busiest_candidate_is_never_picked() {
        let candidates = loads(&[("ana", 3), ("bruno", 1), ("carla", 1)]);
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..200 {
            let chosen = pick_least_loaded(&candidates, &mut rng).expect("candidate");
            assert_ne!(chosen.consultant.display_name(), "ana");
        }
    }

    #[test]
    fn ties_are_broken_across_the_whole_group() {
        let candidates = loads(&[("ana", 0), ("bruno", 0), ("carla", 0)]);
        let mut rng = SmallRng::seed_from_u64(42);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let chosen = pick_least_loaded(&candidates, &mut rng).expect("candidate");
            seen.insert(chosen.consultant.display_name().to_owned());
        }
        assert_eq!(seen.len(), 3, "every tied candidate should be reachable");
    }

    #[test]
    fn repeated_selection_keeps_spread_within_one() {
        let mut candidates = loads(&[("ana", 0), ("bruno", 0), ("carla", 0), ("davi", 0)]);
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..1000 {
            let index = {
                let chosen = pick_least_loaded(&candidates, &mut rng).expect("candidate");
                candidates
                    .iter()
                    .position(|load| load.consultant.id() == chosen.consultant.id())
                    .expect("chosen came from candidates")
            };
            if let Some(load) = candidates.get_mut(index) {
                load.today += 1;
            }

            let snapshot = balance_snapshot(&candidates).expect("non-empty roster");
            assert!(snapshot.spread <= 1, "spread exceeded 1: {snapshot:?}");
        }
    }

    #[test]
    fn counts_join_on_normalized_keys() {
        let roster = vec![consultant("Ana Souza"), consultant("Bruno")];
        let mut counts = HashMap::new();
        counts.insert(MatchKey::new("  ANA souza "), 4_u64);

        let joined = attach_today_counts(roster, &counts);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.first().map(|load| load.today), Some(4));
        assert_eq!(joined.get(1).map(|load| load.today), Some(0));
    }

    #[test]
    fn balance_snapshot_summarizes_spread() {
        let candidates = loads(&[("ana", 5), ("bruno", 2), ("carla", 3)]);
        let snapshot = balance_snapshot(&candidates).expect("non-empty roster");

        assert_eq!(
            snapshot,
            BalanceSnapshot {
                min: 2,
                max: 5,
                spread: 3
            }
        );
    }

    #[test]
    fn balance_snapshot_of_empty_roster_is_none() {
        assert!(balance_snapshot(&[]).is_none());
    }
}
