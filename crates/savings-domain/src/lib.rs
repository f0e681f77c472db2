//! savings-domain
//!
//! Pure domain models (Plan, frequencies, line items, budgets, Totals).
//! No I/O, no storage. Only data types, enums, and the lenient numeric rules
//! shared by every layer that reads a plan.

pub mod common;
pub mod frequency;
pub mod lenient;
pub mod plan;
pub mod totals;

pub use common::*;
pub use frequency::*;
pub use plan::*;
pub use totals::*;
