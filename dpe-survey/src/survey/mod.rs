//! Survey domain types
//!
//! Question definitions, per-question selection state, and the running
//! human-vs-AI identification score.

pub mod questions;
pub mod responses;
pub mod scoring;

pub use questions::Question;
pub use responses::ResponseStore;
pub use scoring::ScoringTracker;
