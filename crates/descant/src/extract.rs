//! Oracle-response extraction and staff-name normalization.
//!
//! Responses arrive as free text that usually contains a JSON object
//! mapping staff names to MIDI note arrays, but models wrap the payload
//! in prose, code fences, or single-quoted pseudo-JSON. Extraction is
//! generous: a fenced code block is preferred, then the first bare JSON
//! object, then a regex sweep over quoted staff names. Staff-name
//! spelling is normalized here and nowhere else; the core data model only
//! ever sees the two canonical voices.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use counterpoint::{Composition, Pitch, Voice};
use regex::Regex;

use crate::oracle::OracleError;

/// Voices pulled out of an oracle response; either staff may be absent.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedVoices {
    pub counterpoint: Option<Voice>,
    pub cantus_firmus: Option<Voice>,
}

impl ExtractedVoices {
    /// Pair the extracted counterpoint with a reference cantus firmus when
    /// the response omitted its own. A missing counterpoint is an error.
    pub fn into_composition(self, reference: &Voice) -> Result<Composition, OracleError> {
        let counterpoint = self
            .counterpoint
            .ok_or(OracleError::MissingVoice("counterpoint"))?;
        let cantus_firmus = self.cantus_firmus.unwrap_or_else(|| reference.clone());
        Ok(Composition::new(counterpoint, cantus_firmus))
    }
}

/// Canonical staff identity: lowercase, underscores removed, so
/// "CantusFirmus", "cantus_firmus", and "cantusfirmus" all match.
fn canonical_staff(name: &str) -> String {
    name.to_lowercase().replace('_', "")
}

fn voice_from_value(value: &serde_json::Value) -> Option<Voice> {
    let entries = value.as_array()?;
    let mut positions = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.is_null() {
            positions.push(Pitch::Rest);
        } else {
            positions.push(Pitch::Note(entry.as_i64()? as i32));
        }
    }
    Some(Voice::new(positions))
}

fn staves_from_value(value: &serde_json::Value) -> Option<ExtractedVoices> {
    let object = value.as_object()?;
    let mut voices = ExtractedVoices::default();

    for (name, entry) in object {
        let Some(voice) = voice_from_value(entry) else {
            continue;
        };
        match canonical_staff(name).as_str() {
            "counterpoint" => voices.counterpoint = Some(voice),
            "cantusfirmus" => voices.cantus_firmus = Some(voice),
            _ => {}
        }
    }

    if voices.counterpoint.is_some() || voices.cantus_firmus.is_some() {
        Some(voices)
    } else {
        None
    }
}

fn fenced_json(text: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("static regex")
    });
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn bare_object(text: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)\{[^{}]*\}").expect("static regex"));
    re.find(text).map(|m| m.as_str())
}

fn numbers_to_voice(list: &str) -> Voice {
    Voice::new(
        list.split(',')
            .filter_map(|part| part.trim().parse::<i32>().ok())
            .map(Pitch::Note)
            .collect(),
    )
}

/// Last resort: quoted staff names followed by bracketed number lists,
/// which also catches single-quoted pseudo-JSON.
fn regex_sweep(text: &str) -> Option<ExtractedVoices> {
    static CP_RE: OnceLock<Regex> = OnceLock::new();
    static CF_RE: OnceLock<Regex> = OnceLock::new();
    let cp_re = CP_RE.get_or_init(|| {
        Regex::new(r#"['"](?i:counterpoint)['"]\s*:\s*\[([\d\s,]*)\]"#).expect("static regex")
    });
    let cf_re = CF_RE.get_or_init(|| {
        Regex::new(r#"['"](?i:cantus_?firmus)['"]\s*:\s*\[([\d\s,]*)\]"#).expect("static regex")
    });

    let mut voices = ExtractedVoices::default();
    if let Some(captures) = cp_re.captures(text) {
        voices.counterpoint = Some(numbers_to_voice(&captures[1]));
    }
    if let Some(captures) = cf_re.captures(text) {
        voices.cantus_firmus = Some(numbers_to_voice(&captures[1]));
    }

    if voices.counterpoint.is_some() || voices.cantus_firmus.is_some() {
        Some(voices)
    } else {
        None
    }
}

/// Extract staves from free-form oracle response text.
pub fn extract_voices(text: &str) -> Result<ExtractedVoices, OracleError> {
    if text.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }

    if let Some(block) = fenced_json(text) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(block) {
            if let Some(voices) = staves_from_value(&value) {
                return Ok(voices);
            }
        }
    }

    if let Some(object) = bare_object(text) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(object) {
            if let Some(voices) = staves_from_value(&value) {
                return Ok(voices);
            }
        }
    }

    if let Some(voices) = regex_sweep(text) {
        return Ok(voices);
    }

    Err(OracleError::Malformed(
        "no staff data found in response".into(),
    ))
}

/// Notation-importer entry point: a staff-name to pitch-sequence mapping
/// becomes a [`Composition`], with the same name normalization the oracle
/// adapter uses. `None` entries are rests. Both staves are required here:
/// an imported score has no reference voice to fall back on.
pub fn composition_from_staves(
    staves: &BTreeMap<String, Vec<Option<i32>>>,
) -> Result<Composition, OracleError> {
    let mut voices = ExtractedVoices::default();

    for (name, notes) in staves {
        let voice = Voice::new(notes.iter().map(|&n| Pitch::from(n)).collect());
        match canonical_staff(name).as_str() {
            "counterpoint" => voices.counterpoint = Some(voice),
            "cantusfirmus" => voices.cantus_firmus = Some(voice),
            _ => {}
        }
    }

    let counterpoint = voices
        .counterpoint
        .ok_or(OracleError::MissingVoice("counterpoint"))?;
    let cantus_firmus = voices
        .cantus_firmus
        .ok_or(OracleError::MissingVoice("cantus firmus"))?;
    Ok(Composition::new(counterpoint, cantus_firmus))
}
