//! Voice spacing, crossing, and overlap.

use crate::interval::interval;
use crate::note::{note_name, Voice};
use crate::report::{Finding, Rule, Verdict};

/// Widest allowed vertical interval: an octave plus a major third.
pub const DEFAULT_MAX_SPACING: i32 = 16;

/// Per-position spacing and ordering checks between the two voices:
/// the vertical interval may not exceed `max_span`, the cantus firmus may
/// not sound above the counterpoint, and neither voice may move past the
/// other voice's note from the previous measure.
pub fn check_voice_spacing(upper: &Voice, lower: &Voice, max_span: i32) -> Verdict {
    let mut findings = Vec::new();
    let length = upper.len().min(lower.len());

    for i in 0..length {
        if let Some(span) = interval(upper.pitch(i), lower.pitch(i)) {
            if span > max_span {
                findings.push(Finding::at(
                    i + 1,
                    format!("voices are {} semitones apart (limit {})", span, max_span),
                ));
            }
        }

        if let (Some(u), Some(l)) = (upper.note(i), lower.note(i)) {
            if l > u {
                findings.push(Finding::at(
                    i + 1,
                    format!(
                        "voice crossing: cantus firmus {} sounds above counterpoint {}",
                        note_name(l),
                        note_name(u)
                    ),
                ));
            }
        }

        if i == 0 {
            continue;
        }

        if let (Some(u), Some(prev_l)) = (upper.note(i), lower.note(i - 1)) {
            if u < prev_l {
                findings.push(Finding::span(
                    i,
                    i + 1,
                    format!(
                        "voice overlap: counterpoint {} falls below the previous cantus firmus note {}",
                        note_name(u),
                        note_name(prev_l)
                    ),
                ));
            }
        }

        if let (Some(l), Some(prev_u)) = (lower.note(i), upper.note(i - 1)) {
            if l > prev_u {
                findings.push(Finding::span(
                    i,
                    i + 1,
                    format!(
                        "voice overlap: cantus firmus {} rises above the previous counterpoint note {}",
                        note_name(l),
                        note_name(prev_u)
                    ),
                ));
            }
        }
    }

    Verdict::new(Rule::VoiceSpacing, findings)
}
