//! Pharmacy Core Library
//!
//! Medicine catalog and stock ledger for a single pharmacy, backed by SQLite.
//!
//! # Architecture
//!
//! ```text
//!          caller (HTTP handler, script, test)
//!                         │
//!                ┌────────▼────────┐
//!                │  PharmacyCore   │  validation, logging, error mapping
//!                └───┬─────────┬───┘
//!                    │         │
//!          ┌─────────▼──┐   ┌──▼──────────────┐
//!          │  medicines │   │  stock_records  │   one row per medicine,
//!          │  (catalog) │◄──┤  (ledger)       │   status derived on read
//!          └─────┬──────┘   └─────────────────┘
//!                │ category_id (optional)
//!          ┌─────▼──────┐
//!          │ categories │   unique names, case-insensitive
//!          └────────────┘
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Category, Medicine, StockRecord, StockEntry, ...)
//! - [`inventory`]: Stock classification, search and filters

pub mod db;
pub mod inventory;
pub mod models;

// Re-export commonly used types
pub use db::Database;
pub use inventory::{classify, StockFilter, StockStatus};
pub use models::{
    Category, CategoryInput, InventoryStats, Medicine, MedicineCount, MedicineInput, MedicineStatus, NewStockRecord,
    StockEntry, StockRecord, StockThresholds,
};

use std::path::Path;
use std::sync::Mutex;

use db::DbError;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum PharmacyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    Capacity { requested: i64, available: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type PharmacyResult<T> = Result<T, PharmacyError>;

impl From<DbError> for PharmacyError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => PharmacyError::NotFound(what),
            DbError::InsufficientStock {
                requested,
                available,
            } => PharmacyError::Capacity {
                requested,
                available,
            },
            DbError::StockOverflow {
                requested,
                available,
            } => PharmacyError::Validation(format!(
                "adding {} to {} units would overflow the stock counter",
                requested, available
            )),
            e if e.is_constraint_violation() => {
                PharmacyError::Conflict("constraint violation".into())
            }
            e => PharmacyError::Storage(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PharmacyError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PharmacyError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry point for catalog and ledger operations.
///
/// Every call holds the connection lock for exactly one operation, so stock
/// adjustments from concurrent requests are applied one after another.
pub struct PharmacyCore {
    db: Mutex<Database>,
}

impl PharmacyCore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> PharmacyResult<Self> {
        let db = Database::open(path)?;
        Ok(Self::from_database(db))
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> PharmacyResult<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::from_database(db))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// All medicines, most recently created first.
    pub fn list_medicines(&self) -> PharmacyResult<Vec<Medicine>> {
        let db = self.db.lock()?;
        Ok(db.list_medicines()?)
    }

    /// Medicines with status `ACTIVE`, most recently created first.
    pub fn list_active_medicines(&self) -> PharmacyResult<Vec<Medicine>> {
        let db = self.db.lock()?;
        Ok(db.list_medicines_by_status(MedicineStatus::Active)?)
    }

    /// Keyword search (name, code, generic name) with an optional status filter.
    pub fn search_medicines(
        &self,
        keyword: Option<&str>,
        status: Option<MedicineStatus>,
    ) -> PharmacyResult<Vec<Medicine>> {
        let mut medicines = self.list_medicines()?;
        if let Some(keyword) = keyword {
            medicines = inventory::search_medicines(&medicines, keyword);
        }
        if let Some(status) = status {
            medicines = inventory::filter_medicines_by_status(&medicines, status);
        }
        Ok(medicines)
    }

    pub fn get_medicine(&self, id: i64) -> PharmacyResult<Medicine> {
        let db = self.db.lock()?;
        db.get_medicine(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("medicine {}", id)))
    }

    /// Validate and insert a medicine, returning its new id.
    pub fn create_medicine(&self, input: MedicineInput) -> PharmacyResult<i64> {
        input.validate().map_err(PharmacyError::Validation)?;
        let input = input.normalized();

        let db = self.db.lock()?;
        ensure_category(&db, input.category_id)?;
        let id = db
            .insert_medicine(&input)
            .map_err(|e| duplicate_code(e, &input.code))?;

        tracing::info!(medicine_id = id, code = %input.code, "medicine created");
        Ok(id)
    }

    /// Replace every field of medicine `id` with `input`.
    pub fn update_medicine(&self, id: i64, input: MedicineInput) -> PharmacyResult<()> {
        input.validate().map_err(PharmacyError::Validation)?;
        let input = input.normalized();

        let db = self.db.lock()?;
        ensure_category(&db, input.category_id)?;
        let updated = db
            .update_medicine(id, &input)
            .map_err(|e| duplicate_code(e, &input.code))?;
        if !updated {
            return Err(PharmacyError::NotFound(format!("medicine {}", id)));
        }

        tracing::info!(medicine_id = id, code = %input.code, "medicine updated");
        Ok(())
    }

    /// Delete medicine `id`. Returns whether a row was removed; a missing id is not an error.
    pub fn delete_medicine(&self, id: i64) -> PharmacyResult<bool> {
        let db = self.db.lock()?;
        let deleted = db.delete_medicine(id).map_err(|e| {
            if e.is_constraint_violation() {
                PharmacyError::Conflict(format!(
                    "medicine {} still has a stock record; delete it first",
                    id
                ))
            } else {
                e.into()
            }
        })?;

        tracing::info!(medicine_id = id, deleted, "medicine delete requested");
        Ok(deleted)
    }

    pub fn medicine_count(&self) -> PharmacyResult<MedicineCount> {
        let medicines = self.list_medicines()?;
        Ok(inventory::medicine_count(&medicines))
    }

    // =========================================================================
    // Category Operations
    // =========================================================================

    /// All categories ordered by name.
    pub fn list_categories(&self) -> PharmacyResult<Vec<Category>> {
        let db = self.db.lock()?;
        Ok(db.list_categories()?)
    }

    /// Categories whose name contains `keyword`, ignoring case.
    pub fn search_categories(&self, keyword: &str) -> PharmacyResult<Vec<Category>> {
        let db = self.db.lock()?;
        Ok(db.search_categories(keyword)?)
    }

    pub fn get_category(&self, id: i64) -> PharmacyResult<Category> {
        let db = self.db.lock()?;
        db.get_category(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("category {}", id)))
    }

    /// Exact name lookup, ignoring case.
    pub fn find_category_by_name(&self, name: &str) -> PharmacyResult<Category> {
        let db = self.db.lock()?;
        db.find_category_by_name(name)?
            .ok_or_else(|| PharmacyError::NotFound(format!("category named {:?}", name.trim())))
    }

    pub fn create_category(&self, input: CategoryInput) -> PharmacyResult<i64> {
        input.validate().map_err(PharmacyError::Validation)?;
        let input = input.normalized();

        let db = self.db.lock()?;
        if db.category_exists_by_name(&input.name)? {
            return Err(duplicate_category(&input.name));
        }
        let id = db.insert_category(&input).map_err(|e| {
            if e.is_constraint_violation() {
                duplicate_category(&input.name)
            } else {
                e.into()
            }
        })?;

        tracing::info!(category_id = id, name = %input.name, "category created");
        Ok(id)
    }

    pub fn update_category(&self, id: i64, input: CategoryInput) -> PharmacyResult<()> {
        input.validate().map_err(PharmacyError::Validation)?;
        let input = input.normalized();

        let db = self.db.lock()?;
        let updated = db.update_category(id, &input).map_err(|e| {
            if e.is_constraint_violation() {
                duplicate_category(&input.name)
            } else {
                e.into()
            }
        })?;
        if !updated {
            return Err(PharmacyError::NotFound(format!("category {}", id)));
        }

        tracing::info!(category_id = id, name = %input.name, "category updated");
        Ok(())
    }

    /// Delete category `id`. Returns whether a row was removed; a category
    /// still linked from medicines is a `Conflict`.
    pub fn delete_category(&self, id: i64) -> PharmacyResult<bool> {
        let db = self.db.lock()?;
        let deleted = db.delete_category(id).map_err(|e| {
            if e.is_constraint_violation() {
                PharmacyError::Conflict(format!("category {} is still used by medicines", id))
            } else {
                e.into()
            }
        })?;

        tracing::info!(category_id = id, deleted, "category delete requested");
        Ok(deleted)
    }

    // =========================================================================
    // Stock Ledger Operations
    // =========================================================================

    /// Open the ledger row for a medicine, returning its id.
    pub fn create_stock_record(&self, record: NewStockRecord) -> PharmacyResult<i64> {
        record.validate().map_err(PharmacyError::Validation)?;
        let record = NewStockRecord {
            location: normalize_text(record.location),
            batch_number: normalize_text(record.batch_number),
            expiry_date: normalize_text(record.expiry_date),
            ..record
        };

        let db = self.db.lock()?;
        if !db.medicine_exists(record.medicine_id)? {
            return Err(PharmacyError::Validation(format!(
                "unknown medicine {}",
                record.medicine_id
            )));
        }
        let id = db.insert_stock_record(&record).map_err(|e| {
            if e.is_constraint_violation() {
                PharmacyError::Conflict(format!(
                    "medicine {} already has a stock record",
                    record.medicine_id
                ))
            } else {
                e.into()
            }
        })?;

        tracing::info!(
            stock_id = id,
            medicine_id = record.medicine_id,
            current_stock = record.current_stock,
            "stock record created"
        );
        Ok(id)
    }

    /// Replace thresholds and descriptive fields of ledger row `id`.
    pub fn update_stock_record(&self, id: i64, thresholds: StockThresholds) -> PharmacyResult<()> {
        thresholds.validate().map_err(PharmacyError::Validation)?;
        let thresholds = StockThresholds {
            location: normalize_text(thresholds.location),
            batch_number: normalize_text(thresholds.batch_number),
            expiry_date: normalize_text(thresholds.expiry_date),
            ..thresholds
        };

        let db = self.db.lock()?;
        if !db.update_stock_thresholds(id, &thresholds)? {
            return Err(PharmacyError::NotFound(format!("stock record {}", id)));
        }

        tracing::info!(
            stock_id = id,
            min_stock = thresholds.min_stock,
            max_stock = thresholds.max_stock,
            "stock thresholds updated"
        );
        Ok(())
    }

    pub fn delete_stock_record(&self, id: i64) -> PharmacyResult<bool> {
        let db = self.db.lock()?;
        let deleted = db.delete_stock_record(id)?;
        tracing::info!(stock_id = id, deleted, "stock record delete requested");
        Ok(deleted)
    }

    pub fn get_stock_entry(&self, id: i64) -> PharmacyResult<StockEntry> {
        let db = self.db.lock()?;
        db.get_stock_entry(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("stock record {}", id)))
    }

    pub fn get_stock_entry_for_medicine(&self, medicine_id: i64) -> PharmacyResult<StockEntry> {
        let db = self.db.lock()?;
        db.get_stock_entry_by_medicine(medicine_id)?.ok_or_else(|| {
            PharmacyError::NotFound(format!("stock record for medicine {}", medicine_id))
        })
    }

    /// Ledger entries, optionally narrowed by keyword and view filter.
    pub fn list_stock_entries(
        &self,
        keyword: Option<&str>,
        filter: Option<StockFilter>,
    ) -> PharmacyResult<Vec<StockEntry>> {
        let mut entries = {
            let db = self.db.lock()?;
            db.list_stock_entries()?
        };
        if let Some(keyword) = keyword {
            entries = inventory::search_entries(&entries, keyword);
        }
        if let Some(filter) = filter {
            entries = inventory::apply_filter(&entries, filter);
        }
        Ok(entries)
    }

    /// Ledger entries with stock on hand.
    pub fn list_in_stock(&self) -> PharmacyResult<Vec<StockEntry>> {
        let db = self.db.lock()?;
        Ok(db.list_in_stock_entries()?)
    }

    pub fn inventory_stats(&self) -> PharmacyResult<InventoryStats> {
        let entries = self.list_stock_entries(None, None)?;
        Ok(inventory::inventory_stats(&entries))
    }

    /// Receive `quantity` units of a medicine.
    pub fn add_stock(&self, medicine_id: i64, quantity: i64) -> PharmacyResult<StockEntry> {
        ensure_positive(quantity)?;

        let db = self.db.lock()?;
        ensure_ledger_row(&db, medicine_id)?;
        let record = db.add_stock(medicine_id, quantity)?;

        tracing::info!(
            medicine_id,
            quantity,
            current_stock = record.current_stock,
            "stock added"
        );
        entry_for(&db, medicine_id)
    }

    /// Issue `quantity` units of a medicine. Fails with `Capacity` and leaves
    /// the ledger untouched if fewer units are on hand.
    pub fn reduce_stock(&self, medicine_id: i64, quantity: i64) -> PharmacyResult<StockEntry> {
        ensure_positive(quantity)?;

        let db = self.db.lock()?;
        ensure_ledger_row(&db, medicine_id)?;
        let record = match db.reduce_stock(medicine_id, quantity) {
            Ok(record) => record,
            Err(e) => {
                if let DbError::InsufficientStock { available, .. } = &e {
                    tracing::warn!(
                        medicine_id,
                        quantity,
                        available = *available,
                        "stock reduction rejected"
                    );
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            medicine_id,
            quantity,
            current_stock = record.current_stock,
            "stock reduced"
        );
        entry_for(&db, medicine_id)
    }
}

fn ensure_positive(quantity: i64) -> PharmacyResult<()> {
    if quantity <= 0 {
        return Err(PharmacyError::Validation(format!(
            "quantity must be a positive integer, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Unknown medicines and medicines without a ledger row are caller errors.
fn ensure_ledger_row(db: &Database, medicine_id: i64) -> PharmacyResult<()> {
    if !db.medicine_exists(medicine_id)? {
        return Err(PharmacyError::Validation(format!(
            "unknown medicine {}",
            medicine_id
        )));
    }
    if db.get_stock_record_by_medicine(medicine_id)?.is_none() {
        return Err(PharmacyError::Validation(format!(
            "medicine {} has no stock record",
            medicine_id
        )));
    }
    Ok(())
}

fn entry_for(db: &Database, medicine_id: i64) -> PharmacyResult<StockEntry> {
    db.get_stock_entry_by_medicine(medicine_id)?.ok_or_else(|| {
        PharmacyError::NotFound(format!("stock record for medicine {}", medicine_id))
    })
}

fn ensure_category(db: &Database, category_id: Option<i64>) -> PharmacyResult<()> {
    if let Some(id) = category_id {
        if !db.category_exists(id)? {
            return Err(PharmacyError::Validation(format!("unknown category {}", id)));
        }
    }
    Ok(())
}

fn duplicate_category(name: &str) -> PharmacyError {
    PharmacyError::Conflict(format!("a category named {:?} already exists", name))
}

fn duplicate_code(e: DbError, code: &str) -> PharmacyError {
    if e.is_constraint_violation() {
        PharmacyError::Conflict(format!("a medicine with code {:?} already exists", code))
    } else {
        e.into()
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_with_stock(current: i64) -> (PharmacyCore, i64) {
        let core = PharmacyCore::open_in_memory().unwrap();
        let medicine_id = core
            .create_medicine(MedicineInput::new("VITC", "Vitamin C 500mg"))
            .unwrap();
        core.create_stock_record(NewStockRecord::new(medicine_id, current, 5, 100))
            .unwrap();
        (core, medicine_id)
    }

    #[test]
    fn test_db_error_mapping() {
        assert!(matches!(
            PharmacyError::from(DbError::NotFound("x".into())),
            PharmacyError::NotFound(_)
        ));
        assert!(matches!(
            PharmacyError::from(DbError::InsufficientStock {
                requested: 3,
                available: 1
            }),
            PharmacyError::Capacity {
                requested: 3,
                available: 1
            }
        ));
        assert!(matches!(
            PharmacyError::from(DbError::Constraint("x".into())),
            PharmacyError::Conflict(_)
        ));
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let (core, medicine_id) = core_with_stock(10);
        assert!(matches!(
            core.add_stock(medicine_id, 0),
            Err(PharmacyError::Validation(_))
        ));
        assert!(matches!(
            core.reduce_stock(medicine_id, -4),
            Err(PharmacyError::Validation(_))
        ));
        assert_eq!(
            core.get_stock_entry_for_medicine(medicine_id)
                .unwrap()
                .record
                .current_stock,
            10
        );
    }

    #[test]
    fn test_medicine_without_ledger_row() {
        let core = PharmacyCore::open_in_memory().unwrap();
        let medicine_id = core
            .create_medicine(MedicineInput::new("ZINC", "Zinc"))
            .unwrap();
        let err = core.add_stock(medicine_id, 5).unwrap_err();
        assert!(matches!(err, PharmacyError::Validation(msg) if msg.contains("no stock record")));
    }

    #[test]
    fn test_stock_record_for_unknown_medicine() {
        let core = PharmacyCore::open_in_memory().unwrap();
        let err = core
            .create_stock_record(NewStockRecord::new(77, 0, 1, 10))
            .unwrap_err();
        assert!(matches!(err, PharmacyError::Validation(_)));
    }

    #[test]
    fn test_duplicate_stock_record_conflicts() {
        let (core, medicine_id) = core_with_stock(0);
        let err = core
            .create_stock_record(NewStockRecord::new(medicine_id, 0, 1, 10))
            .unwrap_err();
        assert!(matches!(err, PharmacyError::Conflict(_)));
    }

    #[test]
    fn test_update_stock_record_missing() {
        let core = PharmacyCore::open_in_memory().unwrap();
        let err = core
            .update_stock_record(3, StockThresholds::default())
            .unwrap_err();
        assert!(matches!(err, PharmacyError::NotFound(_)));
    }
}
