//! Directional-motion rules between the two voices.

use crate::interval::{class_name, direction, interval_class, Direction};
use crate::note::Voice;
use crate::report::{Finding, Rule, Verdict};

/// Perfect interval classes: unison/octave, fourth, fifth.
const PERFECT_CLASSES: [i32; 3] = [0, 5, 7];

/// Flag adjacent position pairs where both voices hold the same perfect
/// interval class and approach it in similar motion. Oblique motion (one
/// voice holding) into a perfect interval is allowed.
pub fn find_parallel_perfect_intervals(upper: &Voice, lower: &Voice) -> Verdict {
    let mut findings = Vec::new();
    let length = upper.len().min(lower.len());

    for i in 0..length.saturating_sub(1) {
        let (Some(class_a), Some(class_b)) = (
            interval_class(upper.pitch(i), lower.pitch(i)),
            interval_class(upper.pitch(i + 1), lower.pitch(i + 1)),
        ) else {
            continue; // a rest somewhere in the pair
        };

        if class_a != class_b || !PERFECT_CLASSES.contains(&class_a) {
            continue;
        }

        let (Some(dir_upper), Some(dir_lower)) = (
            direction(upper.pitch(i), upper.pitch(i + 1)),
            direction(lower.pitch(i), lower.pitch(i + 1)),
        ) else {
            continue;
        };

        if dir_upper == Direction::Level || dir_lower == Direction::Level || dir_upper != dir_lower
        {
            continue;
        }

        findings.push(Finding::span(
            i + 1,
            i + 2,
            format!("parallel {} in similar motion", class_name(class_a)),
        ));
    }

    Verdict::new(Rule::ParallelPerfectIntervals, findings)
}

/// Flag windows of `min_moves` consecutive steps where both voices move
/// in the same non-level direction on every step. The default window is 3
/// moves (4 notes); a rest anywhere in a window disqualifies it.
pub fn find_parallel_motives(upper: &Voice, lower: &Voice, min_moves: usize) -> Verdict {
    let length = upper.len().min(lower.len());

    if min_moves == 0 || length < min_moves + 1 {
        return Verdict::clean(Rule::ParallelMotives);
    }

    let mut findings = Vec::new();

    for start in 0..=(length - min_moves - 1) {
        let parallel = (0..min_moves).all(|step| {
            let i = start + step;
            match (
                direction(upper.pitch(i), upper.pitch(i + 1)),
                direction(lower.pitch(i), lower.pitch(i + 1)),
            ) {
                (Some(du), Some(dl)) => du == dl && du != Direction::Level,
                _ => false, // rests break the chain
            }
        });

        if parallel {
            findings.push(Finding::span(
                start + 1,
                start + min_moves + 1,
                format!(
                    "both voices move in the same direction for {} consecutive steps",
                    min_moves
                ),
            ));
        }
    }

    Verdict::new(Rule::ParallelMotives, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Pitch;
    use pretty_assertions::assert_eq;

    #[test]
    fn parallel_fifths_in_similar_motion_flagged() {
        // Fifths over every position, both voices ascending
        let upper = Voice::from_midi(&[67, 69, 71]);
        let lower = Voice::from_midi(&[60, 62, 64]);

        let verdict = find_parallel_perfect_intervals(&upper, &lower);
        assert_eq!(verdict.findings.len(), 2);
        assert_eq!(verdict.findings[0], Finding::span(1, 2, "parallel perfect fifth in similar motion"));
        assert_eq!(verdict.findings[1].start, 2);
        assert_eq!(verdict.findings[1].end, 3);
    }

    #[test]
    fn one_finding_per_qualifying_adjacent_pair() {
        // Octaves approached in similar motion, then contrary motion
        let upper = Voice::from_midi(&[72, 74, 72]);
        let lower = Voice::from_midi(&[60, 62, 60]);

        let verdict = find_parallel_perfect_intervals(&upper, &lower);
        // Both pairs are similar-motion octaves (up then down together)
        assert_eq!(verdict.findings.len(), 2);
    }

    #[test]
    fn oblique_motion_into_a_perfect_interval_allowed() {
        // Lower voice holds while upper moves into the fifth
        let upper = Voice::from_midi(&[72, 67]);
        let lower = Voice::from_midi(&[60, 60]);

        // First pair is octave then fifth: classes differ anyway, so build
        // a real oblique case: fifth to fifth with one voice level
        let verdict = find_parallel_perfect_intervals(&upper, &lower);
        assert!(verdict.is_clean());

        let upper = Voice::from_midi(&[67, 67]);
        let lower = Voice::from_midi(&[60, 60]);
        let verdict = find_parallel_perfect_intervals(&upper, &lower);
        assert!(verdict.is_clean());
    }

    #[test]
    fn contrary_motion_between_perfect_intervals_allowed() {
        // Fifth to fifth an octave apart, voices moving opposite ways
        let upper = Voice::from_midi(&[67, 79]);
        let lower = Voice::from_midi(&[60, 72]);
        assert!(!find_parallel_perfect_intervals(&upper, &lower).is_clean());

        let contrary_upper = Voice::from_midi(&[79, 71]);
        let contrary_lower = Voice::from_midi(&[60, 64]);
        // Upper falls while lower rises: fifth classes both times, but
        // contrary motion is fine
        assert!(find_parallel_perfect_intervals(&contrary_upper, &contrary_lower).is_clean());
    }

    #[test]
    fn rests_suppress_parallel_interval_findings() {
        let upper = Voice::new(vec![Pitch::Note(67), Pitch::Rest, Pitch::Note(71)]);
        let lower = Voice::from_midi(&[60, 62, 64]);
        assert!(find_parallel_perfect_intervals(&upper, &lower).is_clean());
    }

    #[test]
    fn imperfect_parallel_intervals_allowed() {
        // Parallel thirds are the bread and butter of counterpoint
        let upper = Voice::from_midi(&[64, 66, 68]);
        let lower = Voice::from_midi(&[60, 62, 64]);
        assert!(find_parallel_perfect_intervals(&upper, &lower).is_clean());
    }

    #[test]
    fn motive_window_flags_each_qualifying_start() {
        // Five notes, both voices ascending throughout: windows at 1 and 2
        let upper = Voice::from_midi(&[64, 66, 68, 70, 72]);
        let lower = Voice::from_midi(&[60, 62, 64, 66, 68]);

        let verdict = find_parallel_motives(&upper, &lower, 3);
        assert_eq!(verdict.findings.len(), 2);
        assert_eq!(verdict.findings[0].start, 1);
        assert_eq!(verdict.findings[0].end, 4);
        assert_eq!(verdict.findings[1].start, 2);
        assert_eq!(verdict.findings[1].end, 5);
    }

    #[test]
    fn short_voices_produce_no_motive_findings() {
        let upper = Voice::from_midi(&[64, 66, 68]);
        let lower = Voice::from_midi(&[60, 62, 64]);
        // Three notes cannot hold three moves
        assert!(find_parallel_motives(&upper, &lower, 3).is_clean());
        assert!(find_parallel_motives(&Voice::default(), &Voice::default(), 3).is_clean());
    }

    #[test]
    fn a_level_step_breaks_the_motive() {
        let upper = Voice::from_midi(&[64, 66, 66, 70]);
        let lower = Voice::from_midi(&[60, 62, 64, 66]);
        assert!(find_parallel_motives(&upper, &lower, 3).is_clean());
    }

    #[test]
    fn a_rest_breaks_the_motive() {
        let upper = Voice::new(vec![
            Pitch::Note(64),
            Pitch::Note(66),
            Pitch::Rest,
            Pitch::Note(70),
        ]);
        let lower = Voice::from_midi(&[60, 62, 64, 66]);
        assert!(find_parallel_motives(&upper, &lower, 3).is_clean());
    }
}
