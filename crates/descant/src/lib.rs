//! LLM-assisted first-species counterpoint.
//!
//! The `counterpoint` crate judges candidate compositions; this crate
//! obtains them. An [`Oracle`] proposes a counterpoint line for a fixed
//! cantus firmus; the [`Refiner`] checks each proposal and feeds the
//! violation report back as corrective guidance until the oracle produces
//! a clean composition, the attempt budget runs out, or the oracle itself
//! fails.

pub mod config;
pub mod extract;
pub mod oracle;
pub mod provider;
pub mod refine;
pub mod render;

pub use config::DescantConfig;
pub use oracle::{Oracle, OracleError};
pub use provider::{OpenAiOracle, OracleConfig};
pub use refine::{RefineConfig, RefineOutcome, Refiner};
pub use render::{ScoreRenderer, TextScore};
