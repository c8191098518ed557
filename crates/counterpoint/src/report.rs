//! Findings, per-rule verdicts, and the aggregated report.
//!
//! A finding cites measures 1-indexed, the way a musician would read them.
//! The aggregated feedback text is what the refinement loop sends back to
//! the melody generator, so every message is written to stand on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The nine first-species rules, in the fixed order reports are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ParallelPerfectIntervals,
    ParallelMotives,
    VoiceSpacing,
    DissonantLeaps,
    RepeatedNotes,
    DissonantIntervals,
    OctaveUnisonPlacement,
    KeyAdherence,
    MelodyShape,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::ParallelPerfectIntervals => "parallel perfect intervals",
            Rule::ParallelMotives => "parallel motives",
            Rule::VoiceSpacing => "voice spacing",
            Rule::DissonantLeaps => "dissonant melodic leaps",
            Rule::RepeatedNotes => "repeated notes",
            Rule::DissonantIntervals => "dissonant vertical intervals",
            Rule::OctaveUnisonPlacement => "octave/unison placement",
            Rule::KeyAdherence => "key adherence",
            Rule::MelodyShape => "melody shape",
        }
    }
}

/// One rule violation with its measure citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// First measure of the violation (1-indexed)
    pub start: usize,
    /// Last measure, inclusive; equal to `start` for single positions
    pub end: usize,
    pub message: String,
}

impl Finding {
    pub fn at(measure: usize, message: impl Into<String>) -> Self {
        Finding {
            start: measure,
            end: measure,
            message: message.into(),
        }
    }

    pub fn span(start: usize, end: usize, message: impl Into<String>) -> Self {
        Finding {
            start,
            end,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "m {}: {}", self.start, self.message)
        } else {
            write!(f, "mm {}-{}: {}", self.start, self.end, self.message)
        }
    }
}

/// Outcome of running one analyzer over a composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub rule: Rule,
    pub findings: Vec<Finding>,
}

impl Verdict {
    pub fn new(rule: Rule, findings: Vec<Finding>) -> Self {
        Verdict { rule, findings }
    }

    pub fn clean(rule: Rule) -> Self {
        Verdict {
            rule,
            findings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// One line per finding, each prefixed with the rule name.
    pub fn report(&self) -> String {
        self.findings
            .iter()
            .map(|finding| format!("{}: {}", self.rule.name(), finding))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Union of all verdicts for one composition, in fixed analyzer order.
/// Empty of findings means the composition is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub verdicts: Vec<Verdict>,
}

impl AggregateReport {
    /// True iff no analyzer reported a violation.
    pub fn accepted(&self) -> bool {
        self.verdicts.iter().all(Verdict::is_clean)
    }

    /// Verdicts that carry findings.
    pub fn violations(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.is_clean())
    }

    pub fn finding_count(&self) -> usize {
        self.verdicts.iter().map(|v| v.findings.len()).sum()
    }

    /// Combined corrective feedback: each failing analyzer's report as its
    /// own block, in analyzer order.
    pub fn feedback(&self) -> String {
        self.violations()
            .map(Verdict::report)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
