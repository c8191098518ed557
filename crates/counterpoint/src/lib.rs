//! First-species counterpoint rule analysis.
//!
//! Evaluates a counterpoint line against a fixed cantus firmus using nine
//! independent analyzers: parallel perfect intervals, parallel motives,
//! voice spacing/crossing/overlap, dissonant melodic leaps, repeated notes,
//! dissonant vertical intervals, octave/unison placement, key adherence,
//! and melody shape.
//!
//! Each analyzer is a pure function from one or two [`Voice`]s to a
//! [`Verdict`] with 1-indexed measure citations. [`Checker`] runs the full
//! set in a fixed order and merges the verdicts into an
//! [`AggregateReport`] whose text doubles as corrective feedback for a
//! melody generator.
//!
//! Rests and mismatched voice lengths are data conditions, not errors:
//! comparisons involving a rest are skipped, and two-voice analyzers work
//! over the shared prefix of the voices.

pub mod check;
pub mod interval;
pub mod melodic;
pub mod motion;
pub mod note;
pub mod report;
pub mod shape;
pub mod spacing;
pub mod tonality;
pub mod vertical;

pub use check::{CheckConfig, Checker};
pub use interval::{direction, interval, interval_class, Direction};
pub use note::{note_name, Composition, Pitch, Voice};
pub use report::{AggregateReport, Finding, Rule, Verdict};
pub use tonality::{Key, KeyMode};
