//! Key adherence: every counterpoint note must belong to the declared
//! scale.

use serde::{Deserialize, Serialize};

use crate::interval::{direction, Direction};
use crate::note::{note_name, Voice};
use crate::report::{Finding, Rule, Verdict};

/// Scale degrees (semitones above the root) of the major scale.
const MAJOR_DEGREES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Natural minor degrees.
const NATURAL_MINOR_DEGREES: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Melodic minor with the 6th and 7th raised, admitted on ascending
/// approaches.
const MELODIC_MINOR_ASC_DEGREES: [i32; 7] = [0, 2, 3, 5, 7, 9, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

impl Default for KeyMode {
    fn default() -> Self {
        KeyMode::Major
    }
}

/// The declared key: a root pitch class and a mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Key {
    /// Root pitch class. Absolute pitches are accepted and reduced mod 12,
    /// so a root of 60 means C.
    pub root: i32,
    pub mode: KeyMode,
}

impl Key {
    pub fn new(root: i32, mode: KeyMode) -> Self {
        Key {
            root: root.rem_euclid(12),
            mode,
        }
    }

    pub fn major(root: i32) -> Self {
        Key::new(root, KeyMode::Major)
    }

    pub fn minor(root: i32) -> Self {
        Key::new(root, KeyMode::Minor)
    }

    /// Scale degree of an absolute pitch relative to the root, 0-11.
    pub fn degree(&self, pitch: i32) -> i32 {
        (pitch - self.root).rem_euclid(12)
    }
}

/// Flag counterpoint notes outside the declared scale. Major keys use the
/// plain major scale; minor keys use natural minor, switching to the
/// melodic-minor ascending form for any note reached by upward motion
/// from its sounding predecessor.
pub fn check_key_adherence(voice: &Voice, key: &Key) -> Verdict {
    let mut findings = Vec::new();

    for i in 0..voice.len() {
        let Some(pitch) = voice.note(i) else {
            continue;
        };

        let scale: &[i32] = match key.mode {
            KeyMode::Major => &MAJOR_DEGREES,
            KeyMode::Minor => {
                let ascending = i > 0
                    && direction(voice.pitch(i - 1), voice.pitch(i)) == Some(Direction::Up);
                if ascending {
                    &MELODIC_MINOR_ASC_DEGREES
                } else {
                    &NATURAL_MINOR_DEGREES
                }
            }
        };

        let degree = key.degree(pitch);
        if !scale.contains(&degree) {
            findings.push(Finding::at(
                i + 1,
                format!(
                    "{} is outside the key (scale degree {})",
                    note_name(pitch),
                    degree
                ),
            ));
        }
    }

    Verdict::new(Rule::KeyAdherence, findings)
}
