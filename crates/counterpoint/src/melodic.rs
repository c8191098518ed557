//! Melodic rules over a single voice: dissonant leaps and repeated notes.

use crate::note::{note_name, Voice};
use crate::report::{Finding, Rule, Verdict};

/// Leap sizes that are melodically dissonant regardless of direction.
fn leap_quality(semitones: i32) -> Option<&'static str> {
    match semitones {
        6 => Some("a tritone"),
        10 => Some("a minor seventh"),
        11 => Some("a major seventh"),
        d if d > 12 => Some("more than an octave"),
        _ => None,
    }
}

/// Flag dissonant leaps between consecutive sounding notes: tritones,
/// sevenths, and anything wider than an octave.
pub fn find_dissonant_leaps(voice: &Voice) -> Verdict {
    let mut findings = Vec::new();

    for i in 0..voice.len().saturating_sub(1) {
        let (Some(a), Some(b)) = (voice.note(i), voice.note(i + 1)) else {
            continue;
        };

        if let Some(quality) = leap_quality((b - a).abs()) {
            findings.push(Finding::span(
                i + 1,
                i + 2,
                format!(
                    "dissonant leap of {} from {} to {}",
                    quality,
                    note_name(a),
                    note_name(b)
                ),
            ));
        }
    }

    Verdict::new(Rule::DissonantLeaps, findings)
}

/// Flag immediately consecutive identical sounding pitches.
pub fn find_repeated_notes(voice: &Voice) -> Verdict {
    let mut findings = Vec::new();

    for i in 0..voice.len().saturating_sub(1) {
        let (Some(a), Some(b)) = (voice.note(i), voice.note(i + 1)) else {
            continue;
        };

        if a == b {
            findings.push(Finding::span(
                i + 1,
                i + 2,
                format!("note {} repeated", note_name(a)),
            ));
        }
    }

    Verdict::new(Rule::RepeatedNotes, findings)
}
