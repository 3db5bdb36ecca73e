//! Keyword search, status filters and aggregate stats over loaded rows.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::StockStatus;
use crate::models::{InventoryStats, Medicine, MedicineCount, MedicineStatus, StockEntry};

/// Inventory view filter, as offered by the stock screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    /// Anything with `currentStock > 0`
    InStock,
    LowStock,
    OutOfStock,
    Normal,
    Full,
}

impl StockFilter {
    pub fn matches(&self, entry: &StockEntry) -> bool {
        match self {
            StockFilter::InStock => entry.record.current_stock > 0,
            StockFilter::LowStock => entry.status == StockStatus::LowStock,
            StockFilter::OutOfStock => entry.status == StockStatus::OutOfStock,
            StockFilter::Normal => entry.status == StockStatus::Normal,
            StockFilter::Full => entry.status == StockStatus::Full,
        }
    }
}

impl FromStr for StockFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "in-stock" => Ok(StockFilter::InStock),
            "low-stock" => Ok(StockFilter::LowStock),
            "out-of-stock" => Ok(StockFilter::OutOfStock),
            "normal" => Ok(StockFilter::Normal),
            "full" => Ok(StockFilter::Full),
            other => Err(format!(
                "unknown stock filter {:?} (expected in-stock, low-stock, out-of-stock, normal or full)",
                other
            )),
        }
    }
}

/// Medicines matching `keyword` on name, code or generic name. A blank keyword
/// keeps everything.
pub fn search_medicines(medicines: &[Medicine], keyword: &str) -> Vec<Medicine> {
    medicines
        .iter()
        .filter(|m| m.matches_keyword(keyword))
        .cloned()
        .collect()
}

pub fn filter_medicines_by_status(medicines: &[Medicine], status: MedicineStatus) -> Vec<Medicine> {
    medicines
        .iter()
        .filter(|m| m.status == status)
        .cloned()
        .collect()
}

/// Ledger entries whose medicine matches `keyword`.
pub fn search_entries(entries: &[StockEntry], keyword: &str) -> Vec<StockEntry> {
    entries
        .iter()
        .filter(|e| e.medicine.matches_keyword(keyword))
        .cloned()
        .collect()
}

/// Ledger entries with exactly the given derived status.
pub fn filter_by_status(entries: &[StockEntry], status: StockStatus) -> Vec<StockEntry> {
    entries
        .iter()
        .filter(|e| e.status == status)
        .cloned()
        .collect()
}

pub fn apply_filter(entries: &[StockEntry], filter: StockFilter) -> Vec<StockEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Counts per status plus total units on hand. `total_units` saturates at `i64::MAX`.
pub fn inventory_stats(entries: &[StockEntry]) -> InventoryStats {
    let mut stats = InventoryStats {
        total_items: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        if entry.record.current_stock > 0 {
            stats.in_stock_items += 1;
        }
        stats.total_units = stats.total_units.saturating_add(entry.record.current_stock);
        match entry.status {
            StockStatus::OutOfStock => stats.out_of_stock_items += 1,
            StockStatus::LowStock => stats.low_stock_items += 1,
            StockStatus::Normal => stats.normal_items += 1,
            StockStatus::Full => stats.full_items += 1,
        }
    }
    stats
}

pub fn medicine_count(medicines: &[Medicine]) -> MedicineCount {
    MedicineCount {
        total_medicines: medicines.len(),
        active_medicines: medicines.iter().filter(|m| m.is_active()).count(),
    }
}
