use serde::{Deserialize, Serialize};

/// A single metrical position: a sounding pitch in absolute semitones
/// (MIDI numbering, 60 = middle C) or an explicit rest.
///
/// Serializes as `Option<i32>`, so a JSON `null` inside a note array is a
/// rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i32>", into = "Option<i32>")]
pub enum Pitch {
    Note(i32),
    Rest,
}

impl Pitch {
    pub fn is_rest(&self) -> bool {
        matches!(self, Pitch::Rest)
    }

    /// The semitone value, or `None` for a rest.
    pub fn note(&self) -> Option<i32> {
        match *self {
            Pitch::Note(n) => Some(n),
            Pitch::Rest => None,
        }
    }
}

impl From<Option<i32>> for Pitch {
    fn from(value: Option<i32>) -> Self {
        match value {
            Some(n) => Pitch::Note(n),
            None => Pitch::Rest,
        }
    }
}

impl From<Pitch> for Option<i32> {
    fn from(value: Pitch) -> Self {
        value.note()
    }
}

impl From<i32> for Pitch {
    fn from(value: i32) -> Self {
        Pitch::Note(value)
    }
}

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note name with octave for report text: 60 becomes "C4".
pub fn note_name(pitch: i32) -> String {
    let pc = pitch.rem_euclid(12) as usize;
    let octave = pitch.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES_SHARP[pc], octave)
}

/// An ordered sequence of pitches, one per measure (first species: one
/// note against each cantus firmus note).
///
/// Positions are 0-indexed internally; reports cite them as 1-indexed
/// measures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice(pub Vec<Pitch>);

impl Voice {
    pub fn new(positions: Vec<Pitch>) -> Self {
        Voice(positions)
    }

    /// Build from plain MIDI note numbers (no rests).
    pub fn from_midi(notes: &[i32]) -> Self {
        Voice(notes.iter().map(|&n| Pitch::Note(n)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn positions(&self) -> &[Pitch] {
        &self.0
    }

    /// Pitch at a 0-indexed position; out of range reads as a rest.
    pub fn pitch(&self, idx: usize) -> Pitch {
        self.0.get(idx).copied().unwrap_or(Pitch::Rest)
    }

    /// Sounding semitone value at a position. `None` for rests and
    /// out-of-range positions.
    pub fn note(&self, idx: usize) -> Option<i32> {
        self.pitch(idx).note()
    }

    /// `(position, semitone)` pairs for every sounding note.
    pub fn sounding(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.note().map(|n| (i, n)))
    }
}

/// A counterpoint line paired with the fixed cantus firmus it is written
/// against, aligned position-by-position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// The upper, newly composed voice
    pub counterpoint: Voice,
    /// The lower, given reference voice
    pub cantus_firmus: Voice,
}

impl Composition {
    pub fn new(counterpoint: Voice, cantus_firmus: Voice) -> Self {
        Composition {
            counterpoint,
            cantus_firmus,
        }
    }

    /// Two-voice analyzers operate over the shared prefix.
    pub fn shared_len(&self) -> usize {
        self.counterpoint.len().min(self.cantus_firmus.len())
    }

    /// Differing voice lengths, if any. A warning condition, not an error.
    pub fn length_mismatch(&self) -> Option<(usize, usize)> {
        if self.counterpoint.len() == self.cantus_firmus.len() {
            None
        } else {
            Some((self.counterpoint.len(), self.cantus_firmus.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pitch_serde_maps_null_to_rest() {
        let voice: Voice = serde_json::from_str("[60, null, 62]").unwrap();
        assert_eq!(
            voice,
            Voice::new(vec![Pitch::Note(60), Pitch::Rest, Pitch::Note(62)])
        );

        let json = serde_json::to_string(&voice).unwrap();
        assert_eq!(json, "[60,null,62]");
    }

    #[test]
    fn out_of_range_positions_read_as_rests() {
        let voice = Voice::from_midi(&[60]);
        assert_eq!(voice.pitch(5), Pitch::Rest);
        assert_eq!(voice.note(5), None);
    }

    #[test]
    fn sounding_skips_rests() {
        let voice = Voice::new(vec![Pitch::Note(60), Pitch::Rest, Pitch::Note(64)]);
        let sounding: Vec<_> = voice.sounding().collect();
        assert_eq!(sounding, vec![(0, 60), (2, 64)]);
    }

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(59), "B3");
        assert_eq!(note_name(69), "A4");
    }

    #[test]
    fn shared_length_and_mismatch() {
        let composition = Composition::new(Voice::from_midi(&[60, 62]), Voice::from_midi(&[60, 62, 64]));
        assert_eq!(composition.shared_len(), 2);
        assert_eq!(composition.length_mismatch(), Some((2, 3)));

        let even = Composition::new(Voice::from_midi(&[60]), Voice::from_midi(&[60]));
        assert_eq!(even.length_mismatch(), None);
    }
}
