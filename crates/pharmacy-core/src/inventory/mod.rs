//! Stock status classification and in-memory views over the ledger.
//!
//! Status is always derived from `(current, min, max)`; nothing here touches
//! the database.

mod filter;

pub use filter::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of four mutually exclusive stock levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Normal,
    Full,
}

impl StockStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out of stock",
            StockStatus::LowStock => "low stock",
            StockStatus::Normal => "normal",
            StockStatus::Full => "full",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a stock level. Rules are checked in order, first match wins:
///
/// 1. `current == 0` → out of stock
/// 2. `current <= min` → low stock
/// 3. `current >= max` → full
/// 4. otherwise → normal
pub fn classify(current: i64, min: i64, max: i64) -> StockStatus {
    if current == 0 {
        StockStatus::OutOfStock
    } else if current <= min {
        StockStatus::LowStock
    } else if current >= max {
        StockStatus::Full
    } else {
        StockStatus::Normal
    }
}
