//! Renderer seam.
//!
//! The loop hands a finished composition and a short status label to a
//! renderer; producing an actual score document is an external concern.

use counterpoint::{note_name, Composition, Voice};

pub trait ScoreRenderer {
    fn render(&self, composition: &Composition, status: &str) -> String;
}

/// Plain-text rendering: the status line, then one line per staff with
/// note names.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextScore;

impl TextScore {
    fn staff_line(voice: &Voice) -> String {
        voice
            .positions()
            .iter()
            .map(|pitch| match pitch.note() {
                Some(note) => note_name(note),
                None => "rest".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ScoreRenderer for TextScore {
    fn render(&self, composition: &Composition, status: &str) -> String {
        format!(
            "{status}\ncounterpoint:  {}\ncantus firmus: {}",
            Self::staff_line(&composition.counterpoint),
            Self::staff_line(&composition.cantus_firmus),
        )
    }
}
