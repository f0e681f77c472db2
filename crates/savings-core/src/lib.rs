//! savings-core
//!
//! Business logic and services for Sunny Savings.
//! Depends on savings-domain. No terminal I/O, no direct filesystem access;
//! persistence goes through the [`storage::KeyValueStore`] trait.

pub mod budget_service;
pub mod calculator;
pub mod category_service;
pub mod error;
pub mod format;
pub mod goal_service;
pub mod savings_service;
pub mod storage;
pub mod store;
pub mod summary_service;

pub use budget_service::*;
pub use calculator::*;
pub use category_service::*;
pub use error::CoreError;
pub use format::*;
pub use goal_service::*;
pub use savings_service::*;
pub use storage::{KeyValueStore, MemoryKeyValueStore, DEFAULT_PLANS_KEY};
pub use store::PlanStore;
pub use summary_service::*;
