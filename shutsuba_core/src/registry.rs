//! Known-name registry.
//!
//! Three enumerated name sets — known sires, known dams, known subject
//! horses — that the line classifier consults for exact matches. The
//! registry is an explicit value handed to the parser, so tests and
//! callers can run with their own vocabulary instead of the builtin one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Well-known sire names, exact race-card spellings.
const BUILTIN_SIRES: &[&str] = &[
    "ディープインパクト",
    "ロードカナロア",
    "キングカメハメハ",
    "ハーツクライ",
    "オルフェーヴル",
    "ドゥラメンテ",
    "キズナ",
    "エピファネイア",
    "モーリス",
    "ルーラーシップ",
    "ダイワメジャー",
    "ハービンジャー",
    "ゴールドシップ",
    "スクリーンヒーロー",
    "ジャスタウェイ",
    "キタサンブラック",
    "ステイゴールド",
    "サンデーサイレンス",
    "シンボリクリスエス",
    "マンハッタンカフェ",
    "ブラックタイド",
    "ヘニーヒューズ",
    "シニスターミニスター",
    "パイロ",
    "ドレフォン",
    "リアルスティール",
    "サートゥルナーリア",
    "スワーヴリチャード",
    "ブリックスアンドモルタル",
    "ミッキーアイル",
    "イスラボニータ",
    "サトノダイヤモンド",
    "レイデオロ",
    "ニューイヤーズデイ",
    "マインドユアビスケッツ",
];

/// Notable broodmare names.
const BUILTIN_DAMS: &[&str] = &[
    "レキシールー",
    "シーザリオ",
    "エアグルーヴ",
    "ウインドインハーヘア",
    "ダンシングキイ",
    "シラユキヒメ",
    "ビワハイジ",
    "ハルーワスウィート",
    "ラドラーダ",
    "アドマイヤグルーヴ",
    "マルペンサ",
    "ロカ",
    "パシオンルージュ",
    "シャンペンルーム",
    "クロウキャニオン",
    "ハッピーパス",
    "リッスン",
    "スタセリタ",
    "シーヴ",
    "ポトリザリス",
];

/// Active and recent subject horses.
const BUILTIN_SUBJECTS: &[&str] = &[
    "ダノンキラウェア",
    "イクイノックス",
    "ドウデュース",
    "タイトルホルダー",
    "ジャックドール",
    "スターズオンアース",
    "リバティアイランド",
    "ソールオリエンス",
    "タスティエーラ",
    "ジャスティンパレス",
    "プログノーシス",
    "ジオグリフ",
    "セリフォス",
    "シャフリヤール",
    "エフフォーリア",
    "パンサラッサ",
    "ヴェラアズール",
    "ディープボンド",
    "スルーセブンシーズ",
    "ウシュバテソーロ",
];

/// Error raised when building a registry from configuration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A configured name entry is empty or whitespace-only.
    #[error("blank {set} name at index {index}")]
    BlankName {
        /// Which set the entry belongs to.
        set: &'static str,
        /// Position of the offending entry in the configured list.
        index: usize,
    },
}

/// User-supplied registry extension, loaded from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Extra sire names.
    #[serde(default)]
    pub sires: Vec<String>,

    /// Extra dam names.
    #[serde(default)]
    pub dams: Vec<String>,

    /// Extra subject names.
    #[serde(default)]
    pub subjects: Vec<String>,

    /// Start from empty sets instead of the builtin vocabulary.
    #[serde(default)]
    pub replace_builtin: bool,
}

/// Read-only name sets consulted by the line classifier.
#[derive(Debug, Clone)]
pub struct KnownNameRegistry {
    sires: HashSet<String>,
    dams: HashSet<String>,
    subjects: HashSet<String>,
}

impl KnownNameRegistry {
    /// Registry with no entries, for test-local vocabularies.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sires: HashSet::new(),
            dams: HashSet::new(),
            subjects: HashSet::new(),
        }
    }

    /// Registry preloaded with the builtin vocabulary.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for name in BUILTIN_SIRES {
            registry.sires.insert((*name).to_string());
        }
        for name in BUILTIN_DAMS {
            registry.dams.insert((*name).to_string());
        }
        for name in BUILTIN_SUBJECTS {
            registry.subjects.insert((*name).to_string());
        }
        registry
    }

    /// Build a registry from configuration.
    ///
    /// Entries are trimmed before insertion. With `replace_builtin` unset
    /// the configured names extend the builtin sets.
    ///
    /// # Errors
    /// Returns [`RegistryError::BlankName`] if any configured entry is
    /// empty or whitespace-only.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut registry = if config.replace_builtin {
            Self::empty()
        } else {
            Self::builtin()
        };

        Self::extend_set(&mut registry.sires, &config.sires, "sire")?;
        Self::extend_set(&mut registry.dams, &config.dams, "dam")?;
        Self::extend_set(&mut registry.subjects, &config.subjects, "subject")?;

        debug!(
            "registry built: {} sires, {} dams, {} subjects (replace_builtin={})",
            registry.sires.len(),
            registry.dams.len(),
            registry.subjects.len(),
            config.replace_builtin
        );
        Ok(registry)
    }

    fn extend_set(
        set: &mut HashSet<String>,
        entries: &[String],
        kind: &'static str,
    ) -> Result<(), RegistryError> {
        for (index, entry) in entries.iter().enumerate() {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                return Err(RegistryError::BlankName { set: kind, index });
            }
            set.insert(trimmed.to_string());
        }
        Ok(())
    }

    /// Exact membership in the sire set.
    #[must_use]
    pub fn contains_sire(&self, name: &str) -> bool {
        self.sires.contains(name)
    }

    /// Exact membership in the dam set.
    #[must_use]
    pub fn contains_dam(&self, name: &str) -> bool {
        self.dams.contains(name)
    }

    /// Exact membership in the subject set.
    #[must_use]
    pub fn contains_subject(&self, name: &str) -> bool {
        self.subjects.contains(name)
    }

    /// Add a sire name.
    pub fn add_sire(&mut self, name: impl Into<String>) {
        self.sires.insert(name.into());
    }

    /// Add a dam name.
    pub fn add_dam(&mut self, name: impl Into<String>) {
        self.dams.insert(name.into());
    }

    /// Add a subject name.
    pub fn add_subject(&mut self, name: impl Into<String>) {
        self.subjects.insert(name.into());
    }

    /// Set sizes as (sires, dams, subjects).
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.sires.len(), self.dams.len(), self.subjects.len())
    }
}

impl Default for KnownNameRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
