//! Picks the questions for one mock panel.
//!
//! A panel is 2 freestyle questions plus 3 principle questions that span at
//! least two principles, presented in random order. All randomness goes
//! through `RandomSource`.

use prep_core::model::{LeadershipPrinciple, Question};

use crate::error::ComposeError;
use crate::random::{RandomSource, shuffle, shuffled};

pub const FREESTYLE_PER_PANEL: usize = 2;
pub const PRINCIPLES_PER_PANEL: usize = 3;
pub const MIN_DISTINCT_PRINCIPLES: usize = 2;

/// Select a panel from the full question list. The list is only read.
///
/// Preconditions are checked in order: freestyle count, principle count,
/// principle variety. The first failure is returned and nothing is selected.
///
/// # Errors
///
/// Returns the matching `ComposeError` when the question pool cannot support
/// a panel.
pub fn compose_panel(
    questions: &[Question],
    rng: &mut dyn RandomSource,
) -> Result<Vec<Question>, ComposeError> {
    let freestyle: Vec<&Question> = questions
        .iter()
        .filter(|q| q.principle().is_none())
        .collect();
    let principled: Vec<(LeadershipPrinciple, &Question)> = questions
        .iter()
        .filter_map(|q| q.principle().map(|p| (p, q)))
        .collect();

    if freestyle.len() < FREESTYLE_PER_PANEL {
        return Err(reject(ComposeError::NotEnoughFreestyle {
            found: freestyle.len(),
        }));
    }
    if principled.len() < PRINCIPLES_PER_PANEL {
        return Err(reject(ComposeError::NotEnoughPrinciple {
            found: principled.len(),
        }));
    }

    // first-seen order before shuffling
    let mut principles: Vec<LeadershipPrinciple> = Vec::new();
    for (principle, _) in &principled {
        if !principles.contains(principle) {
            principles.push(*principle);
        }
    }
    if principles.len() < MIN_DISTINCT_PRINCIPLES {
        return Err(reject(ComposeError::NotEnoughPrincipleVariety {
            found: principles.len(),
        }));
    }

    let selected_freestyle: Vec<&Question> = shuffled(&freestyle, rng)
        .into_iter()
        .take(FREESTYLE_PER_PANEL)
        .collect();

    shuffle(&mut principles, rng);
    let (cat_a, cat_b) = (principles[0], principles[1]);
    let group = |wanted: LeadershipPrinciple| -> Vec<&Question> {
        principled
            .iter()
            .filter(|(p, _)| *p == wanted)
            .map(|(_, q)| *q)
            .collect()
    };
    let group_a = shuffled(&group(cat_a), rng);
    let group_b = shuffled(&group(cat_b), rng);

    let selected_principles: Vec<&Question> = if group_a.len() >= 2 && !group_b.is_empty() {
        vec![group_a[0], group_a[1], group_b[0]]
    } else if !group_a.is_empty() && group_b.len() >= 2 {
        vec![group_a[0], group_b[0], group_b[1]]
    } else {
        pooled_principles(&group_a, &group_b, rng)?
    };

    let mut panel: Vec<Question> = selected_freestyle
        .into_iter()
        .chain(selected_principles)
        .cloned()
        .collect();
    shuffle(&mut panel, rng);

    tracing::debug!(
        questions = panel.len(),
        first = %cat_a,
        second = %cat_b,
        "composed panel"
    );
    Ok(panel)
}

/// Both picked principles are thin: draw from their union. Questions of
/// other principles are never used, so a short pool aborts the panel.
fn pooled_principles<'a>(
    group_a: &[&'a Question],
    group_b: &[&'a Question],
    rng: &mut dyn RandomSource,
) -> Result<Vec<&'a Question>, ComposeError> {
    let mut pool: Vec<&Question> = group_a.iter().chain(group_b).copied().collect();
    if pool.len() < PRINCIPLES_PER_PANEL {
        return Err(reject(ComposeError::InsufficientCoverage));
    }
    shuffle(&mut pool, rng);
    pool.truncate(PRINCIPLES_PER_PANEL);
    Ok(pool)
}

fn reject(err: ComposeError) -> ComposeError {
    tracing::debug!(reason = ?err, "panel composition rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use prep_core::model::{QuestionDraft, QuestionId, QuestionKind, Starl};
    use prep_core::time::fixed_now;

    use crate::random::{ScriptedRandom, SystemRandom};

    fn principle(text: &str, p: LeadershipPrinciple) -> Question {
        QuestionDraft::principle(text, p, Starl::default())
            .validate()
            .unwrap()
            .assign_id(QuestionId::generate(), fixed_now())
    }

    fn freestyle(text: &str) -> Question {
        QuestionDraft::freestyle(text, "Fit", "")
            .validate()
            .unwrap()
            .assign_id(QuestionId::generate(), fixed_now())
    }

    fn assert_valid_panel(panel: &[Question], pool: &[Question]) {
        assert_eq!(panel.len(), 5);
        let freestyle = panel
            .iter()
            .filter(|q| q.kind() == QuestionKind::Freestyle)
            .count();
        assert_eq!(freestyle, 2);
        let principles: HashSet<_> = panel.iter().filter_map(Question::principle).collect();
        assert_eq!(panel.len() - freestyle, 3);
        assert!(principles.len() >= 2);

        let ids: HashSet<_> = panel.iter().map(Question::id).collect();
        assert_eq!(ids.len(), 5, "no question is picked twice");
        assert!(panel.iter().all(|q| pool.contains(q)));
    }

    fn skewed_pool() -> Vec<Question> {
        vec![
            freestyle("F1"),
            freestyle("F2"),
            principle("A1", LeadershipPrinciple::Ownership),
            principle("A2", LeadershipPrinciple::Ownership),
            principle("B1", LeadershipPrinciple::DiveDeep),
            principle("C1", LeadershipPrinciple::ThinkBig),
        ]
    }

    #[test]
    fn identity_random_takes_two_from_first_principle() {
        let pool = skewed_pool();
        let panel = compose_panel(&pool, &mut ScriptedRandom::identity()).unwrap();
        let texts: Vec<_> = panel.iter().map(Question::text).collect();
        assert_eq!(texts, vec!["F1", "F2", "A1", "A2", "B1"]);
    }

    #[test]
    fn two_thin_principles_abort_without_borrowing_others() {
        let pool = vec![
            freestyle("F1"),
            freestyle("F2"),
            principle("B1", LeadershipPrinciple::DiveDeep),
            principle("C1", LeadershipPrinciple::ThinkBig),
            principle("A1", LeadershipPrinciple::Ownership),
            principle("A2", LeadershipPrinciple::Ownership),
        ];
        // identity order picks DiveDeep and ThinkBig: one question each
        assert_eq!(
            compose_panel(&pool, &mut ScriptedRandom::identity()),
            Err(ComposeError::InsufficientCoverage)
        );
    }

    #[test]
    fn pooled_fallback_draws_only_from_the_picked_principles() {
        let a = principle("A1", LeadershipPrinciple::Ownership);
        let b = principle("B1", LeadershipPrinciple::DiveDeep);
        let c = principle("C1", LeadershipPrinciple::ThinkBig);
        let mut rng = ScriptedRandom::identity();

        assert_eq!(
            pooled_principles(&[&a], &[&b], &mut rng),
            Err(ComposeError::InsufficientCoverage)
        );
        let picked = pooled_principles(&[&a, &c], &[&b], &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|q| [&a, &b, &c].contains(q)));
    }

    #[test]
    fn one_and_two_split_takes_both_from_the_second_principle() {
        let pool = vec![
            freestyle("F1"),
            freestyle("F2"),
            principle("A1", LeadershipPrinciple::Ownership),
            principle("B1", LeadershipPrinciple::DiveDeep),
            principle("B2", LeadershipPrinciple::DiveDeep),
        ];
        let panel = compose_panel(&pool, &mut ScriptedRandom::identity()).unwrap();
        assert_valid_panel(&panel, &pool);
        let texts: HashSet<_> = panel.iter().map(Question::text).collect();
        assert!(texts.contains("B1") && texts.contains("B2") && texts.contains("A1"));
    }

    #[test]
    fn every_seed_yields_a_valid_panel_or_a_coverage_failure() {
        let pool = skewed_pool();
        let (mut composed, mut aborted) = (0, 0);
        for seed in 0..200 {
            match compose_panel(&pool, &mut SystemRandom::seeded(seed)) {
                Ok(panel) => {
                    assert_valid_panel(&panel, &pool);
                    composed += 1;
                }
                Err(err) => {
                    assert_eq!(err, ComposeError::InsufficientCoverage);
                    aborted += 1;
                }
            }
        }
        assert!(composed > 0 && aborted > 0);
    }

    #[test]
    fn larger_pools_stay_within_the_rules() {
        let mut pool: Vec<Question> = (0..6).map(|i| freestyle(&format!("F{i}"))).collect();
        for (i, p) in LeadershipPrinciple::ALL.iter().take(4).enumerate() {
            for j in 0..=i {
                pool.push(principle(&format!("{p}-{j}"), *p));
            }
        }
        for seed in 0..100 {
            let panel = compose_panel(&pool, &mut SystemRandom::seeded(seed)).unwrap();
            assert_valid_panel(&panel, &pool);
        }
    }

    #[test]
    fn preconditions_are_checked_in_order() {
        let mut rng = ScriptedRandom::identity();

        let none: Vec<Question> = Vec::new();
        assert_eq!(
            compose_panel(&none, &mut rng),
            Err(ComposeError::NotEnoughFreestyle { found: 0 })
        );

        let few_principles = vec![
            freestyle("F1"),
            freestyle("F2"),
            principle("A1", LeadershipPrinciple::Ownership),
            principle("B1", LeadershipPrinciple::DiveDeep),
        ];
        assert_eq!(
            compose_panel(&few_principles, &mut rng),
            Err(ComposeError::NotEnoughPrinciple { found: 2 })
        );

        let one_principle = vec![
            freestyle("F1"),
            freestyle("F2"),
            principle("A1", LeadershipPrinciple::Ownership),
            principle("A2", LeadershipPrinciple::Ownership),
            principle("A3", LeadershipPrinciple::Ownership),
        ];
        assert_eq!(
            compose_panel(&one_principle, &mut rng),
            Err(ComposeError::NotEnoughPrincipleVariety { found: 1 })
        );
    }

    #[test]
    fn freestyle_shortage_wins_over_other_failures() {
        let pool = vec![freestyle("F1")];
        let err = compose_panel(&pool, &mut ScriptedRandom::identity()).unwrap_err();
        assert_eq!(err, ComposeError::NotEnoughFreestyle { found: 1 });
        assert!(err.to_string().starts_with("Not enough Freestyle questions"));
    }
}
