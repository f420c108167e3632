//! `br-scoring` — node urgency in `[0, 1]`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`weights`] | `UrgencyWeights` (term weights and distance cap)             |
//! | [`rules`]   | The deterministic rule formula, `RuleTerms`                  |
//! | [`scorer`]  | `UrgencyScorer`, `Scored`, `RankedNode`, `ModelUnavailable`  |
//! | [`trainer`] | `ModelTrainer`, `TrainerConfig`                              |
//! | [`error`]   | `ScoringError`, `ScoringResult<T>`                           |
//!
//! # Model fallback
//!
//! A scorer with a model tries it first and falls back to the rule formula
//! when there is no model or prediction fails.  The fallback is logged at
//! `debug` and never surfaces as an error.

pub mod error;
pub mod rules;
pub mod scorer;
pub mod trainer;
pub mod weights;

#[cfg(test)]
mod tests;

pub use error::{ScoringError, ScoringResult};
pub use rules::{RuleTerms, rule_score};
pub use scorer::{ModelUnavailable, RankedNode, ScoreSource, Scored, UrgencyScorer};
pub use trainer::{ModelTrainer, TrainerConfig};
pub use weights::UrgencyWeights;
