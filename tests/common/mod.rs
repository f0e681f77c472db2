#![allow(dead_code)]

use std::sync::Mutex;

use once_cell::sync::Lazy;
use sunny_savings::{Config, ConfigManager, PlanManager};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory that outlives the calling test.
pub fn test_base_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Config pointing every root into `base`.
pub fn config_in(base: &std::path::Path) -> Config {
    Config {
        data_root: Some(base.join("data")),
        backup_root: Some(base.join("backups")),
        backup_retention: 3,
        ..Config::default()
    }
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (PlanManager, ConfigManager, Config) {
    let base = test_base_dir();
    let config = config_in(&base);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    config_manager.save(&config).expect("save test config");
    let plan_manager = PlanManager::from_config(&config).expect("create plan manager");
    (plan_manager, config_manager, config)
}
