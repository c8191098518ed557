use serde::{Deserialize, Serialize};

use crate::note::Pitch;

/// Direction of melodic motion between two pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    /// Repeated pitch (oblique motion when the other voice moves)
    Level,
}

/// Absolute interval in semitones. `None` when either side is a rest:
/// comparisons involving a rest are skipped, never flagged.
pub fn interval(a: Pitch, b: Pitch) -> Option<i32> {
    Some((a.note()? - b.note()?).abs())
}

/// Interval reduced mod 12, collapsing octave doublings into one class
/// (0 = unison/octave, 5 = fourth, 7 = fifth, ...).
pub fn interval_class(a: Pitch, b: Pitch) -> Option<i32> {
    interval(a, b).map(|iv| iv % 12)
}

/// Direction of motion from `a` to `b`; `None` when either side is a rest.
pub fn direction(a: Pitch, b: Pitch) -> Option<Direction> {
    let (a, b) = (a.note()?, b.note()?);
    Some(match b.cmp(&a) {
        std::cmp::Ordering::Greater => Direction::Up,
        std::cmp::Ordering::Less => Direction::Down,
        std::cmp::Ordering::Equal => Direction::Level,
    })
}

const CLASS_NAMES: [&str; 12] = [
    "unison or octave",
    "minor second",
    "major second",
    "minor third",
    "major third",
    "perfect fourth",
    "tritone",
    "perfect fifth",
    "minor sixth",
    "major sixth",
    "minor seventh",
    "major seventh",
];

/// Human name for an interval class, for report text.
pub fn class_name(class: i32) -> &'static str {
    CLASS_NAMES[class.rem_euclid(12) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_absolute() {
        assert_eq!(interval(Pitch::Note(60), Pitch::Note(67)), Some(7));
        assert_eq!(interval(Pitch::Note(67), Pitch::Note(60)), Some(7));
    }

    #[test]
    fn rests_make_intervals_undefined() {
        assert_eq!(interval(Pitch::Rest, Pitch::Note(60)), None);
        assert_eq!(interval_class(Pitch::Note(60), Pitch::Rest), None);
        assert_eq!(direction(Pitch::Rest, Pitch::Rest), None);
    }

    #[test]
    fn interval_class_collapses_octaves() {
        // A twelfth (octave + fifth) is a fifth
        assert_eq!(interval_class(Pitch::Note(60), Pitch::Note(79)), Some(7));
        assert_eq!(interval_class(Pitch::Note(60), Pitch::Note(72)), Some(0));
    }

    #[test]
    fn direction_classifies_motion() {
        assert_eq!(direction(Pitch::Note(60), Pitch::Note(62)), Some(Direction::Up));
        assert_eq!(direction(Pitch::Note(62), Pitch::Note(60)), Some(Direction::Down));
        assert_eq!(direction(Pitch::Note(60), Pitch::Note(60)), Some(Direction::Level));
    }

    #[test]
    fn class_names_cover_perfects() {
        assert_eq!(class_name(0), "unison or octave");
        assert_eq!(class_name(5), "perfect fourth");
        assert_eq!(class_name(7), "perfect fifth");
        assert_eq!(class_name(19), "perfect fifth");
    }
}
