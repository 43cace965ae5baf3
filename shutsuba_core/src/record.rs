//! Participant record types.
//!
//! A `ParticipantRecord` collects everything the scanner recovers for one
//! horse from one race-card block: the four bloodline fields, each tagged
//! with how it was recovered, plus a few auxiliary attributes read off the
//! same lines.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a bloodline field was recovered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Provenance {
    /// Exact match against the known-name registry.
    Registry = 0,
    /// Script-pattern match at the expected bloodline step.
    Pattern = 1,
    /// Recovered from a parenthesized group (broodmare sire).
    Parenthesized = 2,
    /// Assigned by the step-skip correction (a slot was presumed missing).
    StepSkip = 3,
    /// Registry re-check outside the expected step order.
    Fallback = 4,
    /// Positional re-scan after the block was consumed.
    Backfill = 5,
}

impl Provenance {
    /// Returns the string representation of this provenance.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Registry => "registry",
            Self::Pattern => "pattern",
            Self::Parenthesized => "parenthesized",
            Self::StepSkip => "step_skip",
            Self::Fallback => "fallback",
            Self::Backfill => "backfill",
        }
    }

    /// Fixed confidence for a field recovered this way.
    ///
    /// Registry hits are near-certain; positional backfill is speculative.
    /// Consumers that only want high-confidence fields can cut at 0.7.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        match self {
            Self::Registry => 0.9,
            Self::Parenthesized => 0.75,
            Self::Pattern => 0.7,
            Self::Fallback => 0.65,
            Self::StepSkip => 0.6,
            Self::Backfill => 0.4,
        }
    }
}

impl FromStr for Provenance {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "registry" => Ok(Self::Registry),
            "pattern" => Ok(Self::Pattern),
            "parenthesized" => Ok(Self::Parenthesized),
            "step_skip" => Ok(Self::StepSkip),
            "fallback" => Ok(Self::Fallback),
            "backfill" => Ok(Self::Backfill),
            _ => Err("unknown provenance"),
        }
    }
}

/// One of the four bloodline output slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BloodlineSlot {
    Sire = 0,
    Name = 1,
    Dam = 2,
    DamSire = 3,
}

impl BloodlineSlot {
    /// Returns the string representation of this slot.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Sire => "sire",
            Self::Name => "name",
            Self::Dam => "dam",
            Self::DamSire => "dam_sire",
        }
    }
}

/// A recovered field value together with its provenance tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedField {
    /// The extracted text, trimmed.
    pub value: String,

    /// How the value was recovered.
    pub provenance: Provenance,
}

impl ExtractedField {
    /// Create a new extracted field.
    #[must_use]
    pub fn new(value: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            value: value.into(),
            provenance,
        }
    }

    /// Confidence derived from the provenance tag.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        self.provenance.confidence()
    }
}

/// Running style of a participant (脚質).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RunningStyle {
    /// 逃げ — leads from the gate.
    FrontRunner = 0,
    /// 先行 — races just off the pace.
    Stalker = 1,
    /// 差し — midfield, closes in the straight.
    Closer = 2,
    /// 追込 — held up, one late run.
    DeepCloser = 3,
    /// 自在 — no fixed pattern.
    Versatile = 4,
}

impl RunningStyle {
    /// Returns the string representation of this style.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::FrontRunner => "front_runner",
            Self::Stalker => "stalker",
            Self::Closer => "closer",
            Self::DeepCloser => "deep_closer",
            Self::Versatile => "versatile",
        }
    }

    /// The token used for this style in race-card text.
    #[must_use]
    pub const fn token(&self) -> &str {
        match self {
            Self::FrontRunner => "逃げ",
            Self::Stalker => "先行",
            Self::Closer => "差し",
            Self::DeepCloser => "追込",
            Self::Versatile => "自在",
        }
    }

    /// Parse the race-card token for a style.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "逃げ" => Some(Self::FrontRunner),
            "先行" => Some(Self::Stalker),
            "差し" => Some(Self::Closer),
            "追込" => Some(Self::DeepCloser),
            "自在" => Some(Self::Versatile),
            _ => None,
        }
    }
}

impl FromStr for RunningStyle {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front_runner" => Ok(Self::FrontRunner),
            "stalker" => Ok(Self::Stalker),
            "closer" => Ok(Self::Closer),
            "deep_closer" => Ok(Self::DeepCloser),
            "versatile" => Ok(Self::Versatile),
            _ => Err("unknown running style"),
        }
    }
}

/// Body weight reading with its change from the previous start.
///
/// The source site prints these as `504(+8)`; `±0` parses to a delta of 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightChange {
    /// Body weight in kilograms.
    pub body: u32,

    /// Change since the previous start, in kilograms.
    pub delta: i32,
}

/// Everything recovered for one participant from one race-card block.
///
/// Built incrementally by the scanner. Every bloodline slot is
/// first-write-wins; unfilled slots stay `None` and are never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Draw (frame) number from the block-start line.
    pub draw: u32,

    /// Horse number from the block-start line.
    pub number: u32,

    /// The participant's own name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ExtractedField>,

    /// Paternal bloodline name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sire: Option<ExtractedField>,

    /// Maternal bloodline name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dam: Option<ExtractedField>,

    /// Maternal grandsire, recovered from parenthesized text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dam_sire: Option<ExtractedField>,

    /// Running style (脚質) if present in the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_style: Option<RunningStyle>,

    /// Win odds if present in the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds: Option<f64>,

    /// Popularity rank (1 = favourite) if present in the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,

    /// Body weight and delta if present in the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightChange>,
}

impl ParticipantRecord {
    /// Create an empty record for the participant at `draw`/`number`.
    #[must_use]
    pub const fn new(draw: u32, number: u32) -> Self {
        Self {
            draw,
            number,
            name: None,
            sire: None,
            dam: None,
            dam_sire: None,
            running_style: None,
            odds: None,
            popularity: None,
            weight: None,
        }
    }

    /// Access a bloodline slot by tag.
    #[must_use]
    pub const fn slot(&self, slot: BloodlineSlot) -> Option<&ExtractedField> {
        match slot {
            BloodlineSlot::Sire => self.sire.as_ref(),
            BloodlineSlot::Name => self.name.as_ref(),
            BloodlineSlot::Dam => self.dam.as_ref(),
            BloodlineSlot::DamSire => self.dam_sire.as_ref(),
        }
    }

    /// Whether a bloodline slot is still unfilled.
    #[must_use]
    pub const fn slot_empty(&self, slot: BloodlineSlot) -> bool {
        self.slot(slot).is_none()
    }

    /// Fill a bloodline slot, first write wins.
    ///
    /// Returns `true` if the slot was written, `false` if it was already
    /// occupied (the new value is discarded).
    pub fn fill(
        &mut self,
        slot: BloodlineSlot,
        value: impl Into<String>,
        provenance: Provenance,
    ) -> bool {
        let target = match slot {
            BloodlineSlot::Sire => &mut self.sire,
            BloodlineSlot::Name => &mut self.name,
            BloodlineSlot::Dam => &mut self.dam,
            BloodlineSlot::DamSire => &mut self.dam_sire,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(ExtractedField::new(value, provenance));
        true
    }

    /// Number of filled bloodline slots (0..=4).
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        [
            self.sire.is_some(),
            self.name.is_some(),
            self.dam.is_some(),
            self.dam_sire.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count()
    }

    /// Whether all four bloodline slots are filled.
    #[must_use]
    pub fn bloodline_complete(&self) -> bool {
        self.filled_slots() == 4
    }
}
