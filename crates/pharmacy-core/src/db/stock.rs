//! Stock ledger database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::medicines::{MedicineRow, MEDICINE_COLUMNS};
use super::{now, Database, DbError, DbResult};
use crate::models::{NewStockRecord, StockEntry, StockRecord, StockThresholds};

const STOCK_COLUMNS: &str = "s.id, s.medicine_id, s.current_stock, s.min_stock, s.max_stock, \
     s.location, s.batch_number, s.expiry_date, s.created_at, s.updated_at";

fn entry_query(filter: &str) -> String {
    format!(
        "SELECT {}, {} FROM stock_records s JOIN medicines m ON m.id = s.medicine_id {}",
        STOCK_COLUMNS, MEDICINE_COLUMNS, filter
    )
}

impl Database {
    /// Open a ledger row for a medicine and return its id.
    pub fn insert_stock_record(&self, record: &NewStockRecord) -> DbResult<i64> {
        let ts = now();
        self.conn.execute(
            r#"
            INSERT INTO stock_records (
                medicine_id, current_stock, min_stock, max_stock,
                location, batch_number, expiry_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                record.medicine_id,
                record.current_stock,
                record.min_stock,
                record.max_stock,
                record.location,
                record.batch_number,
                record.expiry_date,
                ts,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Replace thresholds and descriptive fields. `current_stock` is left alone.
    pub fn update_stock_thresholds(&self, id: i64, thresholds: &StockThresholds) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE stock_records SET
                min_stock = ?2,
                max_stock = ?3,
                location = ?4,
                batch_number = ?5,
                expiry_date = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                thresholds.min_stock,
                thresholds.max_stock,
                thresholds.location,
                thresholds.batch_number,
                thresholds.expiry_date,
                now(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a ledger row by its own id.
    pub fn get_stock_record(&self, id: i64) -> DbResult<Option<StockRecord>> {
        let sql = format!("SELECT {} FROM stock_records s WHERE s.id = ?", STOCK_COLUMNS);
        self.conn
            .query_row(&sql, [id], read_stock_record)
            .optional()
            .map_err(Into::into)
    }

    /// Get the ledger row owned by a medicine.
    pub fn get_stock_record_by_medicine(&self, medicine_id: i64) -> DbResult<Option<StockRecord>> {
        let sql = format!(
            "SELECT {} FROM stock_records s WHERE s.medicine_id = ?",
            STOCK_COLUMNS
        );
        self.conn
            .query_row(&sql, [medicine_id], read_stock_record)
            .optional()
            .map_err(Into::into)
    }

    /// Get a ledger row joined with its medicine.
    pub fn get_stock_entry(&self, id: i64) -> DbResult<Option<StockEntry>> {
        self.query_one_entry(&entry_query("WHERE s.id = ?"), id)
    }

    /// Get the ledger row for a medicine, joined with the medicine.
    pub fn get_stock_entry_by_medicine(&self, medicine_id: i64) -> DbResult<Option<StockEntry>> {
        self.query_one_entry(&entry_query("WHERE s.medicine_id = ?"), medicine_id)
    }

    /// Every ledger row, ordered by medicine name.
    pub fn list_stock_entries(&self) -> DbResult<Vec<StockEntry>> {
        self.query_entries(&entry_query("ORDER BY m.name COLLATE NOCASE, s.id"))
    }

    /// Ledger rows with stock on hand, ordered by medicine name.
    pub fn list_in_stock_entries(&self) -> DbResult<Vec<StockEntry>> {
        self.query_entries(&entry_query(
            "WHERE s.current_stock > 0 ORDER BY m.name COLLATE NOCASE, s.id",
        ))
    }

    /// Delete a ledger row. Returns whether a row was removed.
    pub fn delete_stock_record(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM stock_records WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Increase a medicine's stock by `quantity`.
    ///
    /// The increment is one statement, so it cannot lose a concurrent update.
    pub fn add_stock(&self, medicine_id: i64, quantity: i64) -> DbResult<StockRecord> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE stock_records
            SET current_stock = current_stock + ?2, updated_at = ?3
            WHERE medicine_id = ?1 AND current_stock <= ?4
            "#,
            params![medicine_id, quantity, now(), i64::MAX.saturating_sub(quantity)],
        )?;

        let record = self.require_stock_record(medicine_id)?;
        if rows_affected == 0 {
            return Err(DbError::StockOverflow {
                requested: quantity,
                available: record.current_stock,
            });
        }
        Ok(record)
    }

    /// Decrease a medicine's stock by `quantity`, refusing to go below zero.
    ///
    /// The floor check and the decrement are one statement; a failed check
    /// leaves the row untouched.
    pub fn reduce_stock(&self, medicine_id: i64, quantity: i64) -> DbResult<StockRecord> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE stock_records
            SET current_stock = current_stock - ?2, updated_at = ?3
            WHERE medicine_id = ?1 AND current_stock >= ?2
            "#,
            params![medicine_id, quantity, now()],
        )?;

        let record = self.require_stock_record(medicine_id)?;
        if rows_affected == 0 {
            return Err(DbError::InsufficientStock {
                requested: quantity,
                available: record.current_stock,
            });
        }
        Ok(record)
    }

    fn require_stock_record(&self, medicine_id: i64) -> DbResult<StockRecord> {
        self.get_stock_record_by_medicine(medicine_id)?
            .ok_or_else(|| DbError::NotFound(format!("stock record for medicine {}", medicine_id)))
    }

    fn query_one_entry(&self, sql: &str, id: i64) -> DbResult<Option<StockEntry>> {
        self.conn
            .query_row(sql, [id], read_entry_row)
            .optional()?
            .map(|(record, medicine)| -> DbResult<StockEntry> {
                Ok(StockEntry::new(record, medicine.try_into()?))
            })
            .transpose()
    }

    fn query_entries(&self, sql: &str) -> DbResult<Vec<StockEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], read_entry_row)?;

        let mut entries = Vec::new();
        for row in rows {
            let (record, medicine) = row?;
            entries.push(StockEntry::new(record, medicine.try_into()?));
        }
        Ok(entries)
    }
}

const STOCK_COLUMN_COUNT: usize = 10;

fn read_stock_record(row: &Row<'_>) -> rusqlite::Result<StockRecord> {
    Ok(StockRecord {
        id: row.get(0)?,
        medicine_id: row.get(1)?,
        current_stock: row.get(2)?,
        min_stock: row.get(3)?,
        max_stock: row.get(4)?,
        location: row.get(5)?,
        batch_number: row.get(6)?,
        expiry_date: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Stock columns come first, medicine columns follow at `STOCK_COLUMN_COUNT`.
fn read_entry_row(row: &Row<'_>) -> rusqlite::Result<(StockRecord, MedicineRow)> {
    Ok((
        read_stock_record(row)?,
        MedicineRow::read(row, STOCK_COLUMN_COUNT)?,
    ))
}
