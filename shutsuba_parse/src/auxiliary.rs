//! Auxiliary attribute extraction: odds, popularity, weight, running style.
//!
//! These patterns run on every non-mark line, independently of the
//! bloodline steps. Each record field keeps its first extracted value.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use shutsuba_core::{ParticipantRecord, RunningStyle, WeightChange};

/// Combined odds and popularity: `5.3(2人気)`.
static ODDS_POPULARITY: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn odds_popularity_pattern() -> &'static Regex {
    ODDS_POPULARITY.get_or_init(|| {
        Regex::new(r"^(\d+\.\d+)\s*[（(](\d+)人気[）)]$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Win odds with the 単勝 prefix: `単勝5.3`.
static WIN_ODDS: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn win_odds_pattern() -> &'static Regex {
    WIN_ODDS.get_or_init(|| {
        Regex::new(r"^単勝\s*(\d+(?:\.\d+)?)$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Standalone popularity: `3番人気` or `(2人気)`.
static POPULARITY: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn popularity_pattern() -> &'static Regex {
    POPULARITY.get_or_init(|| {
        Regex::new(r"^(?:(\d+)番人気|[（(](\d+)人気[）)])$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Body weight with delta: `504(+8)`, optional 馬体重 prefix, full-width
/// signs and parentheses accepted.
static WEIGHT: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn weight_pattern() -> &'static Regex {
    WEIGHT.get_or_init(|| {
        Regex::new(r"^(?:馬体重)?(\d{3})[（(]([+＋\-－−±]?\d+)[）)]$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Parse `N.N(M人気)` into (odds, popularity).
#[must_use]
pub fn parse_odds_with_popularity(line: &str) -> Option<(f64, u32)> {
    let caps = odds_popularity_pattern().captures(line)?;
    let odds = caps.get(1)?.as_str().parse().ok()?;
    let popularity = caps.get(2)?.as_str().parse().ok()?;
    Some((odds, popularity))
}

/// Parse `単勝N.N` into win odds.
///
/// Bare decimals are deliberately not treated as odds: on a race card
/// they are ambiguous with closing-furlong times.
#[must_use]
pub fn parse_win_odds(line: &str) -> Option<f64> {
    let caps = win_odds_pattern().captures(line)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Parse `M番人気` or `(M人気)` into a popularity rank.
#[must_use]
pub fn parse_popularity(line: &str) -> Option<u32> {
    let caps = popularity_pattern().captures(line)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    digits.as_str().parse().ok()
}

/// Parse `NNN(±D)` into a body weight and delta.
#[must_use]
pub fn parse_weight(line: &str) -> Option<WeightChange> {
    let caps = weight_pattern().captures(line)?;
    let body = caps.get(1)?.as_str().parse().ok()?;
    let delta = parse_delta(caps.get(2)?.as_str())?;
    Some(WeightChange { body, delta })
}

/// Normalize full-width signs and parse the delta. `±` means no change.
fn parse_delta(raw: &str) -> Option<i32> {
    let normalized: String = raw
        .chars()
        .map(|c| match c {
            '＋' => '+',
            '－' | '−' => '-',
            other => other,
        })
        .collect();
    if normalized.starts_with('±') {
        return Some(0);
    }
    normalized.parse().ok()
}

/// Run every auxiliary pattern over one line, filling only empty fields.
pub fn apply(line: &str, record: &mut ParticipantRecord) {
    if let Some(style) = RunningStyle::from_token(line) {
        if record.running_style.is_none() {
            debug!("running style {} from {line:?}", style.as_str());
            record.running_style = Some(style);
        }
        return;
    }

    if let Some((odds, popularity)) = parse_odds_with_popularity(line) {
        if record.odds.is_none() {
            debug!("odds {odds} from {line:?}");
            record.odds = Some(odds);
        }
        if record.popularity.is_none() {
            debug!("popularity {popularity} from {line:?}");
            record.popularity = Some(popularity);
        }
    } else if let Some(odds) = parse_win_odds(line) {
        if record.odds.is_none() {
            debug!("odds {odds} from {line:?}");
            record.odds = Some(odds);
        }
    } else if let Some(popularity) = parse_popularity(line) {
        if record.popularity.is_none() {
            debug!("popularity {popularity} from {line:?}");
            record.popularity = Some(popularity);
        }
    } else if let Some(weight) = parse_weight(line) {
        if record.weight.is_none() {
            debug!(
                "weight {}({:+}) from {line:?}",
                weight.body, weight.delta
            );
            record.weight = Some(weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odds_with_popularity() {
        let (odds, popularity) = parse_odds_with_popularity("5.3(2人気)").unwrap_or((0.0, 0));
        assert!((odds - 5.3).abs() < f64::EPSILON);
        assert_eq!(popularity, 2);

        assert!(parse_odds_with_popularity("5.3（2人気）").is_some());
        assert!(parse_odds_with_popularity("5.3").is_none());
        assert!(parse_odds_with_popularity("(2人気)").is_none());
    }

    #[test]
    fn win_odds_requires_prefix() {
        assert!(parse_win_odds("単勝5.3").is_some());
        assert!(parse_win_odds("単勝 12").is_some());
        // Bare decimals stay ambiguous with closing-furlong times.
        assert!(parse_win_odds("33.8").is_none());
    }

    #[test]
    fn popularity_forms() {
        assert_eq!(parse_popularity("3番人気"), Some(3));
        assert_eq!(parse_popularity("(2人気)"), Some(2));
        assert_eq!(parse_popularity("（7人気）"), Some(7));
        assert_eq!(parse_popularity("人気"), None);
        assert_eq!(parse_popularity("3番人気だった"), None);
    }

    #[test]
    fn weight_deltas() {
        assert_eq!(
            parse_weight("504(+8)"),
            Some(WeightChange { body: 504, delta: 8 })
        );
        assert_eq!(
            parse_weight("460(-6)"),
            Some(WeightChange { body: 460, delta: -6 })
        );
        assert_eq!(
            parse_weight("478（±0）"),
            Some(WeightChange { body: 478, delta: 0 })
        );
        assert_eq!(
            parse_weight("馬体重502（＋10）"),
            Some(WeightChange { body: 502, delta: 10 })
        );
        assert_eq!(
            parse_weight("490（－4）"),
            Some(WeightChange { body: 490, delta: -4 })
        );
        // Two-digit bodies are not horse weights.
        assert_eq!(parse_weight("50(+8)"), None);
        assert_eq!(parse_weight("504(+8) 良"), None);
    }

    #[test]
    fn apply_keeps_first_value() {
        let mut record = ParticipantRecord::new(1, 1);
        apply("5.3(2人気)", &mut record);
        apply("単勝9.9", &mut record);
        apply("4番人気", &mut record);

        let odds = record.odds.unwrap_or(0.0);
        assert!((odds - 5.3).abs() < f64::EPSILON);
        assert_eq!(record.popularity, Some(2));
    }

    #[test]
    fn apply_running_style() {
        let mut record = ParticipantRecord::new(1, 1);
        apply("先行", &mut record);
        assert_eq!(record.running_style, Some(RunningStyle::Stalker));

        apply("逃げ", &mut record);
        assert_eq!(record.running_style, Some(RunningStyle::Stalker));
    }

    #[test]
    fn apply_ignores_plain_lines() {
        let mut record = ParticipantRecord::new(1, 1);
        apply("ロードカナロア", &mut record);
        apply("33.8", &mut record);
        apply("2023.04.16", &mut record);

        assert!(record.odds.is_none());
        assert!(record.popularity.is_none());
        assert!(record.weight.is_none());
        assert!(record.running_style.is_none());
    }
}
