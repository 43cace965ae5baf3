//! Sequential bloodline extraction over one participant block.
//!
//! The extractor walks the lines of a block once, advancing a step counter
//! through the expected bloodline order (mark, sire, name, dam) and filling
//! record slots via the classifier. Three recovery mechanisms cover blocks
//! that deviate from the expected layout: step-skip correction when an
//! expected line never shows up, a registry fallback for out-of-order
//! names, and a positional backfill pass for the subject name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use shutsuba_core::{BloodlineSlot, ParticipantRecord, Provenance};

use crate::auxiliary;
use crate::classify::{self, LineClassifier, LineFacts};

/// Position in the expected bloodline order for one block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BloodlineStep {
    /// No annotation mark seen yet; ordered extraction is inactive.
    #[default]
    AwaitingMark = 0,
    /// A sire line is expected next.
    SireExpected = 1,
    /// The subject name is expected next.
    NameExpected = 2,
    /// A dam line is expected next.
    DamExpected = 3,
    /// Ordered extraction is finished; only the fallback still applies.
    Free = 4,
}

impl BloodlineStep {
    /// Returns the string representation of this step.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::AwaitingMark => "awaiting_mark",
            Self::SireExpected => "sire_expected",
            Self::NameExpected => "name_expected",
            Self::DamExpected => "dam_expected",
            Self::Free => "free",
        }
    }
}

/// Tunable recovery passes for the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Re-check registry names at any step once ordered extraction has
    /// moved past the sire.
    #[serde(default = "default_enabled")]
    pub fallback: bool,

    /// Re-scan the head of the block for a missed subject name.
    #[serde(default = "default_enabled")]
    pub backfill: bool,

    /// How many leading block lines the backfill pass examines.
    #[serde(default = "default_backfill_window")]
    pub backfill_window: usize,
}

const fn default_enabled() -> bool {
    true
}

const fn default_backfill_window() -> usize {
    5
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fallback: true,
            backfill: true,
            backfill_window: default_backfill_window(),
        }
    }
}

/// Resolved outcome for one line.
#[derive(Debug)]
enum Action {
    /// Annotation mark: reset the step, consume the line.
    Reset,
    /// Write one slot and move to the given step.
    Assign {
        slot: BloodlineSlot,
        value: String,
        provenance: Provenance,
        next: BloodlineStep,
    },
    /// The line contributes nothing to the bloodline.
    Skip,
}

/// One-shot scanner for the lines of a single participant block.
#[derive(Debug)]
pub struct SequentialExtractor<'a> {
    classifier: LineClassifier<'a>,
    config: &'a ExtractorConfig,
    step: BloodlineStep,
}

impl<'a> SequentialExtractor<'a> {
    /// Create an extractor over a classifier and config.
    #[must_use]
    pub const fn new(classifier: LineClassifier<'a>, config: &'a ExtractorConfig) -> Self {
        Self {
            classifier,
            config,
            step: BloodlineStep::AwaitingMark,
        }
    }

    /// Scan every line of one block into `record`, then run the backfill
    /// pass. Lines must be trimmed and non-empty.
    pub fn run(mut self, lines: &[&str], record: &mut ParticipantRecord) {
        for line in lines {
            self.feed(line, record);
        }
        if self.config.backfill {
            self.backfill(lines, record);
        }
    }

    fn feed(&mut self, line: &str, record: &mut ParticipantRecord) {
        let facts = self.classifier.classify(line);

        // Auxiliary attributes are read independently of the bloodline
        // steps and never fire on mark lines.
        if !facts.is_mark {
            auxiliary::apply(line, record);
        }

        match self.resolve(line, &facts, record) {
            Action::Reset => {
                debug!("annotation mark {line:?}, step reset to sire_expected");
                self.step = BloodlineStep::SireExpected;
            }
            Action::Assign {
                slot,
                value,
                provenance,
                next,
            } => {
                debug!(
                    "{} <- {value:?} ({}, step {} -> {})",
                    slot.as_str(),
                    provenance.as_str(),
                    self.step.as_str(),
                    next.as_str()
                );
                record.fill(slot, value, provenance);
                self.step = next;
            }
            Action::Skip => {}
        }
    }

    /// Dispatch over (step, line facts) into an explicit transition.
    fn resolve(&self, line: &str, facts: &LineFacts, record: &ParticipantRecord) -> Action {
        use BloodlineSlot::{Dam, DamSire, Name, Sire};

        if facts.is_mark {
            return Action::Reset;
        }

        // Ordered extraction at the expected step.
        match self.step {
            BloodlineStep::SireExpected
                if record.slot_empty(Sire) && (facts.known_sire || facts.potential_sire) =>
            {
                return Action::Assign {
                    slot: Sire,
                    value: line.to_string(),
                    provenance: registry_or_pattern(facts.known_sire),
                    next: BloodlineStep::NameExpected,
                };
            }
            BloodlineStep::NameExpected
                if record.slot_empty(Name)
                    && (facts.known_subject || facts.potential_subject) =>
            {
                return Action::Assign {
                    slot: Name,
                    value: line.to_string(),
                    provenance: registry_or_pattern(facts.known_subject),
                    next: BloodlineStep::DamExpected,
                };
            }
            BloodlineStep::DamExpected
                if record.slot_empty(Dam) && (facts.known_dam || facts.potential_dam) =>
            {
                return Action::Assign {
                    slot: Dam,
                    value: line.to_string(),
                    provenance: registry_or_pattern(facts.known_dam),
                    next: BloodlineStep::Free,
                };
            }
            _ => {}
        }

        // Broodmare sire is independent of the step counter: the first
        // parenthesized line wins while the slot is empty.
        if record.slot_empty(DamSire) {
            if let Some(inner) = &facts.parenthesized {
                return Action::Assign {
                    slot: DamSire,
                    value: inner.clone(),
                    provenance: Provenance::Parenthesized,
                    next: self.step,
                };
            }
        }

        // Step-skip correction: the expected line never showed up.
        match self.step {
            BloodlineStep::SireExpected
                if record.slot_empty(Name)
                    && (facts.known_subject || facts.potential_subject) =>
            {
                return Action::Assign {
                    slot: Name,
                    value: line.to_string(),
                    provenance: Provenance::StepSkip,
                    next: BloodlineStep::DamExpected,
                };
            }
            BloodlineStep::NameExpected
                if record.slot_empty(Dam) && (facts.known_dam || facts.potential_dam) =>
            {
                return Action::Assign {
                    slot: Dam,
                    value: line.to_string(),
                    provenance: Provenance::StepSkip,
                    next: BloodlineStep::Free,
                };
            }
            _ => {}
        }

        // Out-of-order registry recovery, step unchanged.
        if self.config.fallback && self.step >= BloodlineStep::NameExpected {
            if facts.known_sire && record.slot_empty(Sire) {
                return Action::Assign {
                    slot: Sire,
                    value: line.to_string(),
                    provenance: Provenance::Fallback,
                    next: self.step,
                };
            }
            if facts.known_dam && record.slot_empty(Dam) {
                return Action::Assign {
                    slot: Dam,
                    value: line.to_string(),
                    provenance: Provenance::Fallback,
                    next: self.step,
                };
            }
        }

        Action::Skip
    }

    /// Re-scan the head of the block for a missed subject name.
    fn backfill(&self, lines: &[&str], record: &mut ParticipantRecord) {
        if !record.slot_empty(BloodlineSlot::Name) {
            return;
        }

        for line in lines.iter().take(self.config.backfill_window) {
            if !self.classifier.is_potential_subject_name(line) || classify::is_known_noise(line)
            {
                continue;
            }
            let duplicate = record
                .sire
                .as_ref()
                .is_some_and(|field| field.value == *line)
                || record
                    .dam
                    .as_ref()
                    .is_some_and(|field| field.value == *line);
            if duplicate {
                continue;
            }
            debug!("backfill: name <- {line:?}");
            record.fill(BloodlineSlot::Name, *line, Provenance::Backfill);
            return;
        }
    }
}

const fn registry_or_pattern(known: bool) -> Provenance {
    if known {
        Provenance::Registry
    } else {
        Provenance::Pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutsuba_core::KnownNameRegistry;

    fn registry() -> KnownNameRegistry {
        let mut registry = KnownNameRegistry::empty();
        registry.add_sire("ロードカナロア");
        registry.add_dam("レキシールー");
        registry.add_subject("ダノンキラウェア");
        registry.add_subject("タイトルホルダー");
        registry
    }

    fn run_block(
        registry: &KnownNameRegistry,
        config: &ExtractorConfig,
        lines: &[&str],
    ) -> ParticipantRecord {
        let mut record = ParticipantRecord::new(1, 1);
        let extractor = SequentialExtractor::new(LineClassifier::new(registry), config);
        extractor.run(lines, &mut record);
        record
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn ordered_block_extracts_full_bloodline() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &[
                "--",
                "ロードカナロア",
                "ダノンキラウェア",
                "レキシールー",
                "(Sligo Bay)",
            ],
        );

        let sire = record.sire.as_ref().expect("sire should fill");
        assert_eq!(sire.value, "ロードカナロア");
        assert_eq!(sire.provenance, Provenance::Registry);

        let name = record.name.as_ref().expect("name should fill");
        assert_eq!(name.value, "ダノンキラウェア");
        assert_eq!(name.provenance, Provenance::Registry);

        let dam = record.dam.as_ref().expect("dam should fill");
        assert_eq!(dam.value, "レキシールー");
        assert_eq!(dam.provenance, Provenance::Registry);

        let dam_sire = record.dam_sire.as_ref().expect("dam sire should fill");
        assert_eq!(dam_sire.value, "Sligo Bay");
        assert_eq!(dam_sire.provenance, Provenance::Parenthesized);

        assert!(record.bloodline_complete());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn pattern_candidates_fill_in_order() {
        let registry = KnownNameRegistry::empty();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &[
                "◎",
                "キズナ",
                "テストホース",
                "エアグルーヴ",
                "(ノーザンテースト)",
            ],
        );

        assert_eq!(record.sire.expect("sire").provenance, Provenance::Pattern);
        assert_eq!(record.name.expect("name").provenance, Provenance::Pattern);
        assert_eq!(record.dam.expect("dam").provenance, Provenance::Pattern);
        assert_eq!(
            record.dam_sire.expect("dam sire").provenance,
            Provenance::Parenthesized
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn lines_before_the_mark_are_ignored() {
        let registry = registry();
        let config = ExtractorConfig {
            backfill: false,
            ..ExtractorConfig::default()
        };
        let record = run_block(&registry, &config, &["ハーツクライ", "--", "ロードカナロア"]);

        assert_eq!(record.sire.expect("sire").value, "ロードカナロア");
        assert!(record.name.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn step_skip_names_when_sire_is_missing() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["--", "ダノンキラウェア", "レキシールー"],
        );

        let name = record.name.expect("name should fill via skip");
        assert_eq!(name.value, "ダノンキラウェア");
        assert_eq!(name.provenance, Provenance::StepSkip);

        let dam = record.dam.expect("dam should fill");
        assert_eq!(dam.provenance, Provenance::Registry);

        assert!(record.sire.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn subject_precedence_leaves_dam_empty() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["--", "ロードカナロア", "ダノンキラウェア", "タイトルホルダー"],
        );

        assert_eq!(record.name.expect("name").value, "ダノンキラウェア");
        // A known subject name is never classified as a dam.
        assert!(record.dam.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn step_skip_dam_at_name_expected() {
        let mut registry = registry();
        // A name listed as both sire and dam is name-scriptish but blocked
        // as a subject candidate, so only the dam skip can take it.
        registry.add_sire("シーザリオ");
        registry.add_dam("シーザリオ");
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["--", "ロードカナロア", "シーザリオ"],
        );

        let dam = record.dam.expect("dam should fill via skip");
        assert_eq!(dam.value, "シーザリオ");
        assert_eq!(dam.provenance, Provenance::StepSkip);
        assert!(record.name.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn fallback_recovers_out_of_order_sire() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["--", "ダノンキラウェア", "レキシールー", "ロードカナロア"],
        );

        let sire = record.sire.expect("sire should fill via fallback");
        assert_eq!(sire.value, "ロードカナロア");
        assert_eq!(sire.provenance, Provenance::Fallback);
    }

    #[test]
    fn fallback_can_be_disabled() {
        let registry = registry();
        let config = ExtractorConfig {
            fallback: false,
            ..ExtractorConfig::default()
        };
        let record = run_block(
            &registry,
            &config,
            &["--", "ダノンキラウェア", "レキシールー", "ロードカナロア"],
        );

        assert!(record.sire.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn backfill_names_a_markless_block() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["タイトルホルダー", "単勝5.3", "3番人気"],
        );

        let name = record.name.expect("name should backfill");
        assert_eq!(name.value, "タイトルホルダー");
        assert_eq!(name.provenance, Provenance::Backfill);

        // Auxiliary extraction ran even though no mark was seen.
        assert_eq!(record.popularity, Some(3));
        assert!(record.odds.is_some());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn backfill_never_reuses_the_sire() {
        let registry = KnownNameRegistry::empty();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["--", "ハーツクライ", "2023.04.16"],
        );

        assert_eq!(record.sire.expect("sire").value, "ハーツクライ");
        assert!(record.name.is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn backfill_respects_the_window() {
        let registry = registry();
        let lines = ["504", "478", "1:58.2", "2023.04.16", "3着", "タイトルホルダー"];

        let record = run_block(&registry, &ExtractorConfig::default(), &lines);
        assert!(record.name.is_none());

        let wide = ExtractorConfig {
            backfill_window: 6,
            ..ExtractorConfig::default()
        };
        let record = run_block(&registry, &wide, &lines);
        assert_eq!(record.name.expect("name").value, "タイトルホルダー");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn first_parenthesized_group_wins() {
        let registry = registry();
        let record = run_block(
            &registry,
            &ExtractorConfig::default(),
            &["(Sligo Bay)", "--", "ロードカナロア", "(Halo)"],
        );

        // The broodmare sire is step-independent and first-write-wins.
        assert_eq!(record.dam_sire.expect("dam sire").value, "Sligo Bay");
    }

    #[test]
    fn step_labels() {
        assert_eq!(BloodlineStep::AwaitingMark.as_str(), "awaiting_mark");
        assert_eq!(BloodlineStep::Free.as_str(), "free");
        assert!(BloodlineStep::SireExpected < BloodlineStep::NameExpected);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn config_defaults_from_empty_json() {
        let config: ExtractorConfig =
            serde_json::from_str("{}").expect("empty config should deserialize");
        assert!(config.fallback);
        assert!(config.backfill);
        assert_eq!(config.backfill_window, 5);
    }
}
