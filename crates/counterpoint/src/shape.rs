//! Distributional checks on the counterpoint line: note variety and the
//! placement of the melodic climax.

use std::collections::HashMap;

use crate::note::{note_name, Voice};
use crate::report::{Finding, Rule, Verdict};

/// Earliest allowed apex position as a fraction of voice length.
const APEX_WINDOW_START: f64 = 0.5;

/// Latest allowed apex position as a fraction of voice length.
const APEX_WINDOW_END: f64 = 0.9;

/// Default cap on the share of the melody a single pitch may occupy.
/// The threshold is a parameter of [`crate::CheckConfig`], not a fixed
/// rule of the style.
pub const DEFAULT_VARIETY_THRESHOLD: f64 = 0.4;

/// Check that no pitch dominates the line and that the single highest
/// note arrives exactly once, past the midpoint but before the cadence.
///
/// Unlike the other analyzers, a voice with nothing sounding in it is
/// itself a violation: there is no melody to judge.
pub fn analyze_melody_shape(voice: &Voice, variety_threshold: f64) -> Verdict {
    let sounding: Vec<(usize, i32)> = voice.sounding().collect();

    if sounding.is_empty() {
        return Verdict::new(
            Rule::MelodyShape,
            vec![Finding::at(1, "no sounding notes; compose a melody first")],
        );
    }

    let mut findings = Vec::new();
    let total = sounding.len();

    let mut counts: HashMap<i32, usize> = HashMap::new();
    let mut first_seen: HashMap<i32, usize> = HashMap::new();
    for &(position, pitch) in &sounding {
        *counts.entry(pitch).or_insert(0) += 1;
        first_seen.entry(pitch).or_insert(position);
    }

    let mut over_represented: Vec<(i32, usize)> = counts
        .into_iter()
        .filter(|&(_, count)| count as f64 / total as f64 > variety_threshold)
        .collect();
    over_represented.sort_unstable(); // deterministic report order

    for (pitch, count) in over_represented {
        let share = 100.0 * count as f64 / total as f64;
        let limit = 100.0 * variety_threshold;
        findings.push(Finding::at(
            first_seen.get(&pitch).copied().unwrap_or(0) + 1,
            format!(
                "{} accounts for {:.0}% of the sounding notes (limit {:.0}%)",
                note_name(pitch),
                share,
                limit
            ),
        ));
    }

    let apex = sounding.iter().map(|&(_, p)| p).max().unwrap_or(0);
    let apex_positions: Vec<usize> = sounding
        .iter()
        .filter(|&&(_, p)| p == apex)
        .map(|&(i, _)| i)
        .collect();

    if apex_positions.len() > 1 {
        findings.push(Finding::at(
            apex_positions[1] + 1,
            format!(
                "the highest note {} occurs {} times; the climax should be reached exactly once",
                note_name(apex),
                apex_positions.len()
            ),
        ));
    } else {
        let length = voice.len();
        let lo = (APEX_WINDOW_START * length as f64).floor() as usize;
        let hi = (APEX_WINDOW_END * length as f64).floor() as usize;
        let position = apex_positions[0];

        if position < lo || position > hi {
            findings.push(Finding::at(
                position + 1,
                format!(
                    "climax {} at m {} falls outside mm {}-{}",
                    note_name(apex),
                    position + 1,
                    lo + 1,
                    hi + 1
                ),
            ));
        }
    }

    Verdict::new(Rule::MelodyShape, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Pitch;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_voice_is_a_violation() {
        let verdict = analyze_melody_shape(&Voice::default(), DEFAULT_VARIETY_THRESHOLD);
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("compose a melody first"));

        let all_rests = Voice::new(vec![Pitch::Rest, Pitch::Rest]);
        assert!(!analyze_melody_shape(&all_rests, DEFAULT_VARIETY_THRESHOLD).is_clean());
    }

    #[test]
    fn fifty_fifty_split_flags_both_pitches() {
        let voice = Voice::from_midi(&[60, 60, 60, 60, 60, 62, 62, 62, 62, 62]);
        let verdict = analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD);

        let variety: Vec<&Finding> = verdict
            .findings
            .iter()
            .filter(|f| f.message.contains("sounding notes"))
            .collect();
        assert_eq!(variety.len(), 2);
        assert!(variety[0].message.contains("C4 accounts for 50%"));
        assert!(variety[1].message.contains("D4 accounts for 50%"));
    }

    #[test]
    fn share_at_the_threshold_is_allowed() {
        // 2 of 5 notes is 40%: at the limit, not over it
        let voice = Voice::from_midi(&[60, 62, 60, 64, 72]);
        let verdict = analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD);
        assert!(verdict.is_clean());
    }

    #[test]
    fn repeated_apex_flagged() {
        let voice = Voice::from_midi(&[60, 72, 62, 72, 60]);
        let verdict = analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD);
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("occurs 2 times"));
        assert_eq!(verdict.findings[0].start, 4);
    }

    #[test]
    fn early_apex_flagged() {
        // Highest note first: well before the window
        let voice = Voice::from_midi(&[72, 62, 64, 65, 67]);
        let verdict = analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD);
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("falls outside mm 3-5"));
    }

    #[test]
    fn apex_inside_the_window_accepted() {
        // Length 5: window is 0-indexed positions 2..=4
        let voice = Voice::from_midi(&[60, 62, 64, 72, 67]);
        assert!(analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD).is_clean());
    }

    #[test]
    fn rests_do_not_count_toward_variety() {
        // Three sounding notes, one of each pitch; rests fill the rest
        let voice = Voice::new(vec![
            Pitch::Note(60),
            Pitch::Rest,
            Pitch::Note(64),
            Pitch::Note(72),
            Pitch::Rest,
        ]);
        // Apex at 0-indexed 3, window for length 5 is 2..=4
        assert!(analyze_melody_shape(&voice, DEFAULT_VARIETY_THRESHOLD).is_clean());
    }

    #[test]
    fn threshold_is_configurable() {
        let voice = Voice::from_midi(&[60, 62, 60, 64, 72]);
        // At a 30% threshold the two C4s (40%) are over the line
        let verdict = analyze_melody_shape(&voice, 0.3);
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("C4 accounts for 40%"));
    }
}
