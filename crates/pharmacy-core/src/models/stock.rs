//! Stock ledger models.

use serde::{Deserialize, Serialize};

use super::{lenient, Medicine};
use crate::inventory::{classify, StockStatus};

/// Per-medicine stock counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: i64,
    /// Owning medicine (one record per medicine)
    pub medicine_id: i64,
    /// Units on hand, never negative
    pub current_stock: i64,
    /// At or below this level the item is "low stock"
    pub min_stock: i64,
    /// At or above this level the item is "full"
    pub max_stock: i64,
    /// Shelf or warehouse location
    pub location: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl StockRecord {
    /// Derived status; never stored.
    pub fn status(&self) -> StockStatus {
        classify(self.current_stock, self.min_stock, self.max_stock)
    }
}

/// Fields for opening a ledger row for a medicine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStockRecord {
    #[serde(deserialize_with = "lenient::i64")]
    pub medicine_id: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub current_stock: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub min_stock: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub max_stock: i64,
    pub location: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<String>,
}

impl NewStockRecord {
    pub fn new(medicine_id: i64, current_stock: i64, min_stock: i64, max_stock: i64) -> Self {
        Self {
            medicine_id,
            current_stock,
            min_stock,
            max_stock,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.current_stock < 0 {
            return Err(format!(
                "currentStock must not be negative, got {}",
                self.current_stock
            ));
        }
        self.thresholds().validate()
    }

    pub fn thresholds(&self) -> StockThresholds {
        StockThresholds {
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            location: self.location.clone(),
            batch_number: self.batch_number.clone(),
            expiry_date: self.expiry_date.clone(),
        }
    }
}

/// Fields a generic ledger update may replace. `currentStock` is deliberately
/// absent: it changes only through add/reduce.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StockThresholds {
    #[serde(deserialize_with = "lenient::i64")]
    pub min_stock: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub max_stock: i64,
    pub location: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<String>,
}

impl StockThresholds {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_stock < 0 || self.max_stock < 0 {
            return Err("minStock and maxStock must not be negative".into());
        }
        if self.min_stock > self.max_stock {
            return Err(format!(
                "minStock ({}) must not exceed maxStock ({})",
                self.min_stock, self.max_stock
            ));
        }
        Ok(())
    }
}

/// A ledger row joined with its medicine, as shown in inventory views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    #[serde(flatten)]
    pub record: StockRecord,
    pub status: StockStatus,
    pub medicine: Medicine,
}

impl StockEntry {
    pub fn new(record: StockRecord, medicine: Medicine) -> Self {
        Self {
            status: record.status(),
            record,
            medicine,
        }
    }
}

/// Aggregate counts over the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    pub in_stock_items: usize,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    pub normal_items: usize,
    pub full_items: usize,
    /// Sum of `currentStock` over all records, capped at `i64::MAX`
    pub total_units: i64,
}

/// Catalog counts for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineCount {
    pub total_medicines: usize,
    pub active_medicines: usize,
}
