//! Block segmentation over a full race-card paste.
//!
//! A paste holds one block per participant, each opened by a block-start
//! line (draw and horse number). The parser locates the starts, runs the
//! sequential extractor over every span, and yields records in order.

use tracing::{debug, info};

use shutsuba_core::{KnownNameRegistry, ParticipantRecord};

use crate::classify::{self, LineClassifier};
use crate::extract::{ExtractorConfig, SequentialExtractor};

/// Parser over whole race-card pastes.
///
/// Owns the registry and extractor configuration. Each call to [`parse`]
/// or [`records`] runs an independent scan; no state is retained between
/// invocations, so one parser can serve many pastes.
///
/// [`parse`]: RaceCardParser::parse
/// [`records`]: RaceCardParser::records
#[derive(Debug, Clone)]
pub struct RaceCardParser {
    registry: KnownNameRegistry,
    config: ExtractorConfig,
}

impl RaceCardParser {
    /// Create a parser over the given registry and config.
    #[must_use]
    pub const fn new(registry: KnownNameRegistry, config: ExtractorConfig) -> Self {
        Self { registry, config }
    }

    /// Parser over the builtin registry with default recovery passes.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(KnownNameRegistry::builtin(), ExtractorConfig::default())
    }

    /// The registry this parser consults.
    #[must_use]
    pub const fn registry(&self) -> &KnownNameRegistry {
        &self.registry
    }

    /// The extractor configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Lazily iterate the participant records of a paste.
    ///
    /// Lines are trimmed and blank lines dropped before segmentation.
    #[must_use]
    pub fn records<'a>(&'a self, text: &'a str) -> Records<'a> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Records {
            parser: self,
            lines,
            position: 0,
        }
    }

    /// Parse a paste eagerly into a record list.
    ///
    /// A paste with no block-start lines yields an empty list; this is not
    /// an error.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<ParticipantRecord> {
        let records: Vec<ParticipantRecord> = self.records(text).collect();
        let filled: usize = records.iter().map(ParticipantRecord::filled_slots).sum();
        info!(
            "parsed {} participant blocks, {} bloodline fields recovered",
            records.len(),
            filled
        );
        records
    }
}

impl Default for RaceCardParser {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Iterator over the participant blocks of one paste.
#[derive(Debug)]
pub struct Records<'a> {
    parser: &'a RaceCardParser,
    lines: Vec<&'a str>,
    position: usize,
}

impl Iterator for Records<'_> {
    type Item = ParticipantRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.lines.len() {
            let Some((draw, number)) = classify::parse_block_start(self.lines[self.position])
            else {
                self.position += 1;
                continue;
            };

            // The span runs to the next block start or end of input.
            let start = self.position + 1;
            let mut end = start;
            while end < self.lines.len() && classify::parse_block_start(self.lines[end]).is_none()
            {
                end += 1;
            }
            self.position = end;

            let mut record = ParticipantRecord::new(draw, number);
            let classifier = LineClassifier::new(&self.parser.registry);
            let extractor = SequentialExtractor::new(classifier, &self.parser.config);
            extractor.run(&self.lines[start..end], &mut record);
            debug!(
                "block {draw}-{number}: {} bloodline slots filled",
                record.filled_slots()
            );
            return Some(record);
        }
        None
    }
}
