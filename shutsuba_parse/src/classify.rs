//! Line-level classification for race-card text.
//!
//! Every predicate here operates on one trimmed line. Registry-independent
//! checks (block starts, annotation marks, noise, scripts, parentheses) are
//! free functions; checks that consult the known-name sets live on
//! [`LineClassifier`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::OnceLock;

use shutsuba_core::KnownNameRegistry;

/// Annotation marks that prefix a participant's bloodline section.
const MARK_GLYPHS: &[&str] = &[
    "◎", "○", "〇", "▲", "△", "☆", "✓", "✔", "×", "消", "--",
];

/// Minimum character count for a sire or dam candidate.
const MIN_PEDIGREE_CHARS: usize = 3;

/// Minimum character count for a subject-name candidate.
const MIN_SUBJECT_CHARS: usize = 2;

/// Name-script pattern for horse names.
/// Katakana (with the prolonged sound mark, which is Script=Common),
/// CJK ideographs, Latin letters, and spaces. No digits, no punctuation.
static NAME_SCRIPT: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn name_script() -> &'static Regex {
    NAME_SCRIPT.get_or_init(|| {
        Regex::new(r"^[\p{Katakana}\p{Han}\p{Latin}ー\s]+$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Statistic lines that must never be mistaken for a horse name.
/// Closed set; anything not matched here is left to the script check.
#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Bare integers and decimals (weights, odds, margins).
        r"^\d+$",
        r"^\d+\.\d+$",
        // Lines that are one parenthesized group and nothing else.
        r"^[（(][^）)]*[）)]$",
        // Race times such as 1:58.2.
        r"^\d{1,2}:\d{2}(?:\.\d)?$",
        // Dates: 2023.04.16 or 2023/4/16.
        r"^\d{4}[./]\d{1,2}[./]\d{1,2}$",
        // Body weight with delta: 504(+8), 478(±0), full-width variants.
        r"^\d{3}[（(][+\-±−＋－]?\d+[）)]$",
        // Popularity and finish position: 1番人気, 3着.
        r"^\d+番人気$",
        r"^\d+着$",
        // Training centres, optionally followed by a trainer name.
        r"^(?:美浦|栗東)",
        // Surface and distance: 芝1600m, ダ1200.
        r"^[芝ダ]\d{3,4}m?$",
        // Going.
        r"^(?:良|稍重|重|不良)$",
        // Grade codes.
        r"^(?:G[1-3ⅠⅡⅢ]|OP|L)$",
    ]
    .iter()
    .map(|pattern| {
        Regex::new(pattern).expect("Static regex pattern is guaranteed to be valid")
    })
    .collect()
});

/// Parse a block-start line: exactly two whitespace-separated positive
/// integers (draw and horse number). Anything else is `None`.
#[must_use]
pub fn parse_block_start(line: &str) -> Option<(u32, u32)> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let draw = parse_positive(first)?;
    let number = parse_positive(second)?;
    Some((draw, number))
}

fn parse_positive(token: &str) -> Option<u32> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = token.parse::<u32>().ok()?;
    (value > 0).then_some(value)
}

/// Whether the line is an annotation mark (equals or starts with one of
/// the mark glyphs).
#[must_use]
pub fn is_mark_line(line: &str) -> bool {
    MARK_GLYPHS.iter().any(|mark| line.starts_with(mark))
}

/// Whether the line matches one of the known statistic patterns.
#[must_use]
pub fn is_known_noise(line: &str) -> bool {
    NOISE_PATTERNS.iter().any(|pattern| pattern.is_match(line))
}

/// Whether the line is plausible as a horse name script-wise.
#[must_use]
pub fn matches_name_script(line: &str) -> bool {
    !line.is_empty() && name_script().is_match(line)
}

/// Trimmed contents of the first `(…)` or `（…）` group, if any.
///
/// Mixed ASCII and full-width delimiters are accepted. Empty or
/// whitespace-only groups yield `None`. Never fails on any input.
#[must_use]
pub fn extract_parenthesized(line: &str) -> Option<String> {
    let open = line.find(['(', '（'])?;
    let opener_len = line[open..].chars().next()?.len_utf8();
    let rest = &line[open + opener_len..];
    let close = rest.find([')', '）'])?;
    let inner = rest[..close].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Everything the extractor needs to know about one line, computed once.
#[derive(Debug, Clone, Default)]
pub struct LineFacts {
    /// Annotation mark line.
    pub is_mark: bool,

    /// Matches a known statistic pattern.
    pub is_noise: bool,

    /// Exact hit in the sire registry.
    pub known_sire: bool,

    /// Exact hit in the dam registry, with subject precedence applied.
    pub known_dam: bool,

    /// Exact hit in the subject registry.
    pub known_subject: bool,

    /// Script-plausible sire by pattern alone.
    pub potential_sire: bool,

    /// Script-plausible dam by pattern alone.
    pub potential_dam: bool,

    /// Script-plausible subject name by pattern alone.
    pub potential_subject: bool,

    /// First parenthesized group, if present.
    pub parenthesized: Option<String>,
}

/// Registry-aware line classifier.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'a> {
    registry: &'a KnownNameRegistry,
}

impl<'a> LineClassifier<'a> {
    /// Create a classifier over the given registry.
    #[must_use]
    pub const fn new(registry: &'a KnownNameRegistry) -> Self {
        Self { registry }
    }

    /// Exact sire-registry membership. Carries no precedence guard.
    #[must_use]
    pub fn is_known_sire(&self, line: &str) -> bool {
        self.registry.contains_sire(line)
    }

    /// Exact dam-registry membership. A known subject name is never
    /// classified as a dam, even when both sets list it.
    #[must_use]
    pub fn is_known_dam(&self, line: &str) -> bool {
        self.registry.contains_dam(line) && !self.registry.contains_subject(line)
    }

    /// Exact subject-registry membership.
    #[must_use]
    pub fn is_known_subject(&self, line: &str) -> bool {
        self.registry.contains_subject(line)
    }

    /// Script-plausible sire: name script, at least three characters, not
    /// noise, and not claimed by the subject or dam registries.
    #[must_use]
    pub fn is_potential_sire(&self, line: &str) -> bool {
        matches_name_script(line)
            && line.chars().count() >= MIN_PEDIGREE_CHARS
            && !is_known_noise(line)
            && !self.registry.contains_subject(line)
            && !self.registry.contains_dam(line)
    }

    /// Script-plausible dam: name script, at least three characters, not
    /// noise, and not claimed by the sire or subject registries.
    #[must_use]
    pub fn is_potential_dam(&self, line: &str) -> bool {
        matches_name_script(line)
            && line.chars().count() >= MIN_PEDIGREE_CHARS
            && !is_known_noise(line)
            && !self.registry.contains_sire(line)
            && !self.registry.contains_subject(line)
    }

    /// Subject-name candidate: a known subject, or a script-plausible line
    /// of at least two characters that is neither noise nor a known sire.
    #[must_use]
    pub fn is_potential_subject_name(&self, line: &str) -> bool {
        self.is_known_subject(line)
            || (matches_name_script(line)
                && line.chars().count() >= MIN_SUBJECT_CHARS
                && !is_known_noise(line)
                && !self.registry.contains_sire(line))
    }

    /// Compute all facts for one trimmed line.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineFacts {
        let chars = line.chars().count();
        let script = matches_name_script(line);
        let noise = is_known_noise(line);
        let known_sire = self.registry.contains_sire(line);
        let known_subject = self.registry.contains_subject(line);
        let known_dam = self.registry.contains_dam(line) && !known_subject;

        LineFacts {
            is_mark: is_mark_line(line),
            is_noise: noise,
            known_sire,
            known_dam,
            known_subject,
            potential_sire: script
                && chars >= MIN_PEDIGREE_CHARS
                && !noise
                && !known_subject
                && !self.registry.contains_dam(line),
            potential_dam: script
                && chars >= MIN_PEDIGREE_CHARS
                && !noise
                && !known_sire
                && !known_subject,
            potential_subject: script
                && chars >= MIN_SUBJECT_CHARS
                && !noise
                && !known_sire,
            parenthesized: extract_parenthesized(line),
        }
    }
}
