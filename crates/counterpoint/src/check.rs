//! The aggregating rule set: every analyzer over one composition.

use serde::{Deserialize, Serialize};

use crate::melodic::{find_dissonant_leaps, find_repeated_notes};
use crate::motion::{find_parallel_motives, find_parallel_perfect_intervals};
use crate::note::Composition;
use crate::report::AggregateReport;
use crate::shape::{analyze_melody_shape, DEFAULT_VARIETY_THRESHOLD};
use crate::spacing::{check_voice_spacing, DEFAULT_MAX_SPACING};
use crate::tonality::{check_key_adherence, Key};
use crate::vertical::{check_octave_unison_placement, find_dissonant_intervals};

/// Tunable parameters for the rule set. Passed in at construction; there
/// is no process-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub key: Key,
    /// Consecutive same-direction steps that count as a parallel motive
    pub motive_window: usize,
    /// Largest share of the melody a single pitch may occupy (0.0-1.0)
    pub variety_threshold: f64,
    /// Widest allowed vertical interval in semitones
    pub max_spacing: i32,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            key: Key::default(),
            motive_window: 3,
            variety_threshold: DEFAULT_VARIETY_THRESHOLD,
            max_spacing: DEFAULT_MAX_SPACING,
        }
    }
}

/// Runs the full rule set over a composition.
///
/// Analyzers are pure and independent of each other, so they could run in
/// any order or concurrently; they run sequentially here and the report
/// always comes back in rule-table order.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Checker { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run every analyzer and collect the verdicts. Differing voice
    /// lengths are warned about and analysis proceeds over the shared
    /// prefix.
    pub fn check(&self, composition: &Composition) -> AggregateReport {
        if let Some((counterpoint, cantus_firmus)) = composition.length_mismatch() {
            tracing::warn!(
                counterpoint,
                cantus_firmus,
                "voice lengths differ; checking the shared prefix"
            );
        }

        let cp = &composition.counterpoint;
        let cf = &composition.cantus_firmus;

        let verdicts = vec![
            find_parallel_perfect_intervals(cp, cf),
            find_parallel_motives(cp, cf, self.config.motive_window),
            check_voice_spacing(cp, cf, self.config.max_spacing),
            find_dissonant_leaps(cp),
            find_repeated_notes(cp),
            find_dissonant_intervals(cp, cf),
            check_octave_unison_placement(cp, cf),
            check_key_adherence(cp, &self.config.key),
            analyze_melody_shape(cp, self.config.variety_threshold),
        ];

        AggregateReport { verdicts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Voice;
    use crate::report::Rule;
    use pretty_assertions::assert_eq;

    fn clean_composition() -> Composition {
        // A short exercise that satisfies all nine rules in C major
        Composition::new(
            Voice::from_midi(&[67, 65, 67, 71, 72]),
            Voice::from_midi(&[60, 62, 64, 62, 60]),
        )
    }

    #[test]
    fn clean_composition_accepted() {
        let report = Checker::default().check(&clean_composition());
        assert!(report.accepted(), "unexpected findings: {}", report.feedback());
        assert_eq!(report.verdicts.len(), 9);
    }

    #[test]
    fn verdicts_come_back_in_rule_table_order() {
        let report = Checker::default().check(&clean_composition());
        let rules: Vec<Rule> = report.verdicts.iter().map(|v| v.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::ParallelPerfectIntervals,
                Rule::ParallelMotives,
                Rule::VoiceSpacing,
                Rule::DissonantLeaps,
                Rule::RepeatedNotes,
                Rule::DissonantIntervals,
                Rule::OctaveUnisonPlacement,
                Rule::KeyAdherence,
                Rule::MelodyShape,
            ]
        );
    }

    #[test]
    fn checking_is_idempotent() {
        let checker = Checker::default();
        let composition = Composition::new(
            Voice::from_midi(&[60, 66, 60, 60]),
            Voice::from_midi(&[60, 62, 64, 62]),
        );

        let first = checker.check(&composition);
        let second = checker.check(&composition);
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_lengths_use_the_shared_prefix() {
        // Extra cantus measures beyond the counterpoint are ignored
        let long_cantus = Composition::new(
            Voice::from_midi(&[67, 65, 67, 71, 72]),
            Voice::from_midi(&[60, 62, 64, 62, 60, 59, 57]),
        );
        let report = Checker::default().check(&long_cantus);
        // The two-voice rules stay clean; melody shape still sees the full
        // counterpoint
        assert!(report.accepted(), "unexpected findings: {}", report.feedback());
    }

    #[test]
    fn violations_from_several_rules_are_all_reported() {
        // Unison throughout: octave placement and repeated verticals plus
        // a chromatic note and a tritone leap in the counterpoint
        let composition = Composition::new(
            Voice::from_midi(&[60, 66, 66, 60]),
            Voice::from_midi(&[60, 62, 64, 60]),
        );
        let report = Checker::default().check(&composition);
        assert!(!report.accepted());

        let failing: Vec<Rule> = report.violations().map(|v| v.rule).collect();
        assert!(failing.contains(&Rule::DissonantLeaps));
        assert!(failing.contains(&Rule::RepeatedNotes));
        assert!(failing.contains(&Rule::KeyAdherence));
    }
}
