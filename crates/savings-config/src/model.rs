use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use savings_core::DEFAULT_PLANS_KEY;
use savings_domain::DEFAULT_BUDGET_TIMEFRAME_WEEKS;

const DEFAULT_BACKUP_RETENTION: usize = 5;
const DATA_DIR_NAME: &str = "SunnySavings";

/// User preferences. Every field has a default so older or partial files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage key the plan list is persisted under.
    pub plans_key: String,
    /// Review timeframe given to newly created plans.
    pub default_budget_timeframe_weeks: u32,
    pub backup_retention: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for plan data. Defaults to `~/Documents/SunnySavings`.
    pub data_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for backups. Defaults to `~/Documents/SunnySavings/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plans_key: DEFAULT_PLANS_KEY.into(),
            default_budget_timeframe_weeks: DEFAULT_BUDGET_TIMEFRAME_WEEKS,
            backup_retention: DEFAULT_BACKUP_RETENTION,
            data_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    /// Plans key with blanks falling back to the default key.
    pub fn effective_plans_key(&self) -> &str {
        let key = self.plans_key.trim();
        if key.is_empty() {
            DEFAULT_PLANS_KEY
        } else {
            key
        }
    }

    /// Timeframe for new plans; zero means the four-week default.
    pub fn effective_timeframe_weeks(&self) -> u32 {
        if self.default_budget_timeframe_weeks == 0 {
            DEFAULT_BUDGET_TIMEFRAME_WEEKS
        } else {
            self.default_budget_timeframe_weeks
        }
    }

    pub fn effective_retention(&self) -> usize {
        self.backup_retention.max(1)
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        default_base().join(DATA_DIR_NAME)
    }

    pub fn resolve_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.backup_root {
            return path.clone();
        }
        self.resolve_data_root().join("backups")
    }
}

fn default_base() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
