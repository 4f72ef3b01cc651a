//! Configuration surface for the bazaar store.
//!
//! All values have sensible defaults so an absent or partial config file is
//! valid. Accessors apply the same lower bounds the store has always
//! enforced, so a hostile or mistyped config cannot schedule a save every
//! millisecond or turn off backups entirely.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{MarketError, MarketResult};

/// Top-level store configuration, loadable from a kebab-case TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MarketConfig {
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
    pub idempotency: IdempotencyConfig,
    pub repricing: RepricingConfig,
    pub safety: SafetyBounds,
}

impl MarketConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> MarketResult<Self> {
        let body = std::fs::read_to_string(path)?;
        toml::from_str(&body)
            .map_err(|e| MarketError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}

/// Listing and history limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LimitsConfig {
    /// Maximum active listings per seller.
    pub max_active_per_seller: usize,
    /// How long a new listing stays active, in hours.
    pub listing_duration_hours: u64,
    /// Maximum retained transaction records.
    pub transactions_max: usize,
    /// Maximum accepted search string length.
    pub max_search_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_active_per_seller: 20,
            listing_duration_hours: 24,
            transactions_max: 200,
            max_search_length: 32,
        }
    }
}

impl LimitsConfig {
    pub fn listing_duration(&self) -> Duration {
        Duration::from_secs(self.listing_duration_hours * 3600)
    }

    /// Search length bound, floored at 8.
    pub fn max_search_length(&self) -> usize {
        self.max_search_length.max(8)
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Primary data file name, resolved against the data directory.
    pub data_file: String,
    /// Backup directory name, resolved against the data directory.
    pub backup_dir: String,
    /// Seconds between autosaves.
    pub autosave_interval_secs: u64,
    /// Number of rotated backups to retain.
    pub backup_keep: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: "auction-data.json".to_string(),
            backup_dir: "backups".to_string(),
            autosave_interval_secs: 60,
            backup_keep: 5,
        }
    }
}

impl StorageConfig {
    /// Autosave period, floored at one second.
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    /// Backup retention, floored at one.
    pub fn backup_keep(&self) -> usize {
        self.backup_keep.max(1)
    }
}

/// Duplicate-submission guard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IdempotencyConfig {
    /// Seconds an operation id stays marked as processed.
    pub ttl_secs: u64,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

impl IdempotencyConfig {
    pub fn ttl_millis(&self) -> u64 {
        self.ttl_secs * 1000
    }
}

/// Dynamic repricing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RepricingConfig {
    pub enabled: bool,
    /// Seconds between repricing sweeps.
    pub interval_secs: u64,
    /// Minimum price delta (currency units) before a price is replaced.
    pub epsilon: f64,
    /// Recompute a listing's price just before evaluating a purchase.
    pub refresh_before_purchase: bool,
}

impl Default for RepricingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            epsilon: 0.0001,
            refresh_before_purchase: true,
        }
    }
}

impl RepricingConfig {
    /// Repricing period, floored at five seconds.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(5))
    }
}

/// Size/shape bounds on item metadata. Defends against oversized persisted
/// payloads and display exploits; the caller is expected to validate basic
/// non-emptiness, the store re-checks these bounds independently.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SafetyBounds {
    pub max_display_name_length: usize,
    pub max_lore_lines: usize,
    pub max_lore_line_length: usize,
    pub max_tag_keys: usize,
}

impl Default for SafetyBounds {
    fn default() -> Self {
        Self {
            max_display_name_length: 96,
            max_lore_lines: 20,
            max_lore_line_length: 160,
            max_tag_keys: 16,
        }
    }
}

impl SafetyBounds {
    pub fn display_name_limit(&self) -> usize {
        self.max_display_name_length.max(16)
    }

    pub fn lore_lines_limit(&self) -> usize {
        self.max_lore_lines.max(4)
    }

    pub fn lore_line_length_limit(&self) -> usize {
        self.max_lore_line_length.max(16)
    }

    pub fn tag_keys_limit(&self) -> usize {
        self.max_tag_keys.max(2)
    }
}
