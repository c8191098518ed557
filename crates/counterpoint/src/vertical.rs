//! Vertical (harmonic) interval rules between the two voices.

use crate::interval::{class_name, interval_class};
use crate::note::Voice;
use crate::report::{Finding, Rule, Verdict};

/// Dissonant vertical interval classes: seconds, tritone, sevenths.
/// The perfect fourth is treated as consonant here, matching its handling
/// in the perfect-interval motion rule.
const DISSONANT_CLASSES: [i32; 5] = [1, 2, 6, 10, 11];

/// Flag positions where the voices form a dissonant vertical interval.
pub fn find_dissonant_intervals(upper: &Voice, lower: &Voice) -> Verdict {
    let mut findings = Vec::new();
    let length = upper.len().min(lower.len());

    for i in 0..length {
        let Some(class) = interval_class(upper.pitch(i), lower.pitch(i)) else {
            continue;
        };

        if DISSONANT_CLASSES.contains(&class) {
            findings.push(Finding::at(
                i + 1,
                format!("dissonant {} between the voices", class_name(class)),
            ));
        }
    }

    Verdict::new(Rule::DissonantIntervals, findings)
}

/// Octaves and unisons may frame the piece but not appear inside it, and
/// the final vertical interval must be one of them. Compositions shorter
/// than two shared positions are left alone.
pub fn check_octave_unison_placement(upper: &Voice, lower: &Voice) -> Verdict {
    let length = upper.len().min(lower.len());
    if length < 2 {
        return Verdict::clean(Rule::OctaveUnisonPlacement);
    }

    let mut findings = Vec::new();

    for i in 1..length - 1 {
        if interval_class(upper.pitch(i), lower.pitch(i)) == Some(0) {
            findings.push(Finding::at(
                i + 1,
                "octave or unison before the final measure",
            ));
        }
    }

    let last = length - 1;
    if let Some(class) = interval_class(upper.pitch(last), lower.pitch(last)) {
        if class != 0 {
            findings.push(Finding::at(
                last + 1,
                format!(
                    "piece ends on a {}; the final interval must be an octave or unison",
                    class_name(class)
                ),
            ));
        }
    }

    Verdict::new(Rule::OctaveUnisonPlacement, findings)
}
