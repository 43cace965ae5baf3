#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod auxiliary;
pub mod classify;
pub mod extract;
pub mod segment;

pub use classify::{
    LineClassifier, LineFacts, extract_parenthesized, is_known_noise, is_mark_line,
    matches_name_script, parse_block_start,
};
pub use extract::{BloodlineStep, ExtractorConfig, SequentialExtractor};
pub use segment::{RaceCardParser, Records};
