//! Medicine catalog database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{now, Database, DbError, DbResult};
use crate::models::{Medicine, MedicineInput, MedicineStatus};

/// Column list shared by every medicine query, in `MedicineRow` order.
pub(super) const MEDICINE_COLUMNS: &str = "m.id, m.code, m.name, m.generic_name, m.category, \
     m.category_id, m.unit, m.form, m.manufacturer, m.ingredients, m.specification, \
     m.strength, m.barcode, m.description, m.usage_instruction, m.storage_instruction, \
     m.image, m.price, m.cost_price, m.status, m.created_at, m.updated_at";

impl Database {
    /// Insert a new medicine and return its id.
    pub fn insert_medicine(&self, input: &MedicineInput) -> DbResult<i64> {
        let ts = now();
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                code, name, generic_name, category, category_id, unit, form, manufacturer,
                ingredients, specification, strength, barcode, description,
                usage_instruction, storage_instruction, image, price, cost_price,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?20)
            "#,
            params![
                input.code,
                input.name,
                input.generic_name,
                input.category,
                input.category_id,
                input.unit,
                input.form,
                input.manufacturer,
                input.ingredients,
                input.specification,
                input.strength,
                input.barcode,
                input.description,
                input.usage_instruction,
                input.storage_instruction,
                input.image,
                input.price,
                input.cost_price,
                input.status.as_str(),
                ts,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Replace every caller-owned field of a medicine. Returns false if no row has `id`.
    pub fn update_medicine(&self, id: i64, input: &MedicineInput) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                code = ?2,
                name = ?3,
                generic_name = ?4,
                category = ?5,
                category_id = ?6,
                unit = ?7,
                form = ?8,
                manufacturer = ?9,
                ingredients = ?10,
                specification = ?11,
                strength = ?12,
                barcode = ?13,
                description = ?14,
                usage_instruction = ?15,
                storage_instruction = ?16,
                image = ?17,
                price = ?18,
                cost_price = ?19,
                status = ?20,
                updated_at = ?21
            WHERE id = ?1
            "#,
            params![
                id,
                input.code,
                input.name,
                input.generic_name,
                input.category,
                input.category_id,
                input.unit,
                input.form,
                input.manufacturer,
                input.ingredients,
                input.specification,
                input.strength,
                input.barcode,
                input.description,
                input.usage_instruction,
                input.storage_instruction,
                input.image,
                input.price,
                input.cost_price,
                input.status.as_str(),
                now(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: i64) -> DbResult<Option<Medicine>> {
        let sql = format!("SELECT {} FROM medicines m WHERE m.id = ?", MEDICINE_COLUMNS);
        self.conn
            .query_row(&sql, [id], |row| MedicineRow::read(row, 0))
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Whether a medicine with `id` exists.
    pub fn medicine_exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM medicines WHERE id = ?", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// All medicines, newest first.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!("SELECT {} FROM medicines m ORDER BY m.id DESC", MEDICINE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| MedicineRow::read(row, 0))?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        Ok(medicines)
    }

    /// Medicines with the given status, newest first.
    pub fn list_medicines_by_status(&self, status: MedicineStatus) -> DbResult<Vec<Medicine>> {
        let sql = format!(
            "SELECT {} FROM medicines m WHERE m.status = ? ORDER BY m.id DESC",
            MEDICINE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([status.as_str()], |row| MedicineRow::read(row, 0))?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        Ok(medicines)
    }

    /// Delete a medicine. Returns whether a row was removed.
    pub fn delete_medicine(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
pub(super) struct MedicineRow {
    id: i64,
    code: String,
    name: String,
    generic_name: Option<String>,
    category: Option<String>,
    category_id: Option<i64>,
    unit: Option<String>,
    form: Option<String>,
    manufacturer: Option<String>,
    ingredients: Option<String>,
    specification: Option<String>,
    strength: Option<String>,
    barcode: Option<String>,
    description: Option<String>,
    usage_instruction: Option<String>,
    storage_instruction: Option<String>,
    image: Option<String>,
    price: f64,
    cost_price: Option<f64>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl MedicineRow {
    /// Read the medicine columns starting at `offset`.
    pub(super) fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            code: row.get(offset + 1)?,
            name: row.get(offset + 2)?,
            generic_name: row.get(offset + 3)?,
            category: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
            unit: row.get(offset + 6)?,
            form: row.get(offset + 7)?,
            manufacturer: row.get(offset + 8)?,
            ingredients: row.get(offset + 9)?,
            specification: row.get(offset + 10)?,
            strength: row.get(offset + 11)?,
            barcode: row.get(offset + 12)?,
            description: row.get(offset + 13)?,
            usage_instruction: row.get(offset + 14)?,
            storage_instruction: row.get(offset + 15)?,
            image: row.get(offset + 16)?,
            price: row.get(offset + 17)?,
            cost_price: row.get(offset + 18)?,
            status: row.get(offset + 19)?,
            created_at: row.get(offset + 20)?,
            updated_at: row.get(offset + 21)?,
        })
    }
}

impl TryFrom<MedicineRow> for Medicine {
    type Error = DbError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        let status = MedicineStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown medicine status: {}", row.status)))?;

        Ok(Medicine {
            id: row.id,
            code: row.code,
            name: row.name,
            generic_name: row.generic_name,
            category: row.category,
            category_id: row.category_id,
            unit: row.unit,
            form: row.form,
            manufacturer: row.manufacturer,
            ingredients: row.ingredients,
            specification: row.specification,
            strength: row.strength,
            barcode: row.barcode,
            description: row.description,
            usage_instruction: row.usage_instruction,
            storage_instruction: row.storage_instruction,
            image: row.image,
            price: row.price,
            cost_price: row.cost_price,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
