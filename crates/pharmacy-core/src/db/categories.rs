//! Category database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{now, Database, DbResult};
use crate::models::{Category, CategoryInput};

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

impl Database {
    /// Insert a category and return its id.
    pub fn insert_category(&self, input: &CategoryInput) -> DbResult<i64> {
        let ts = now();
        self.conn.execute(
            "INSERT INTO categories (name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![input.name, input.description, ts],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Replace name and description. Returns false if no row has `id`.
    pub fn update_category(&self, id: i64, input: &CategoryInput) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE categories SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![id, input.name, input.description, now()],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], read_category).optional()?)
    }

    /// Exact name lookup, ignoring case.
    pub fn find_category_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE name = ?", CATEGORY_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, [name.trim()], read_category)
            .optional()?)
    }

    pub fn category_exists_by_name(&self, name: &str) -> DbResult<bool> {
        Ok(self.find_category_by_name(name)?.is_some())
    }

    pub fn category_exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM categories WHERE id = ?", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// All categories ordered by name.
    pub fn list_categories(&self) -> DbResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY name COLLATE NOCASE",
            CATEGORY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Categories whose name contains `keyword`, ignoring case. Wildcard
    /// characters in `keyword` match literally.
    pub fn search_categories(&self, keyword: &str) -> DbResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories WHERE instr(lower(name), lower(?1)) > 0 \
             ORDER BY name COLLATE NOCASE",
            CATEGORY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([keyword.trim()], read_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a category. Fails with a constraint violation while medicines reference it.
    pub fn delete_category(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn read_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicineInput;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_find_by_name() {
        let db = setup_db();
        let mut input = CategoryInput::new("Antibiotics");
        input.description = Some("Prescription only".into());
        let id = db.insert_category(&input).unwrap();

        let found = db.find_category_by_name("antibiotics").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Antibiotics");
        assert_eq!(found.description.as_deref(), Some("Prescription only"));
        assert!(db.category_exists_by_name("ANTIBIOTICS").unwrap());
        assert!(!db.category_exists_by_name("Vitamins").unwrap());
    }

    #[test]
    fn test_duplicate_name_is_constraint_violation() {
        let db = setup_db();
        db.insert_category(&CategoryInput::new("Vitamins")).unwrap();
        let err = db.insert_category(&CategoryInput::new("vitamins")).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let db = setup_db();
        for name in ["Antibiotics", "Antihistamines", "Vitamins", "100% Natural"] {
            db.insert_category(&CategoryInput::new(name)).unwrap();
        }

        let hits = db.search_categories("ANTI").unwrap();
        let names: Vec<_> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Antibiotics", "Antihistamines"]);

        assert_eq!(db.search_categories("%").unwrap().len(), 1);
        assert!(db.search_categories("zinc").unwrap().is_empty());
    }

    #[test]
    fn test_list_ordered_by_name() {
        let db = setup_db();
        db.insert_category(&CategoryInput::new("vitamins")).unwrap();
        db.insert_category(&CategoryInput::new("Analgesics")).unwrap();

        let names: Vec<_> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Analgesics", "vitamins"]);
    }

    #[test]
    fn test_update_and_delete() {
        let db = setup_db();
        let id = db.insert_category(&CategoryInput::new("Analgesic")).unwrap();

        assert!(db
            .update_category(id, &CategoryInput::new("Analgesics"))
            .unwrap());
        assert_eq!(db.get_category(id).unwrap().unwrap().name, "Analgesics");
        assert!(!db.update_category(99, &CategoryInput::new("X")).unwrap());

        assert!(db.delete_category(id).unwrap());
        assert!(db.get_category(id).unwrap().is_none());
        assert!(!db.delete_category(id).unwrap());
    }

    #[test]
    fn test_referenced_category_delete_fails() {
        let db = setup_db();
        let category_id = db.insert_category(&CategoryInput::new("Vitamins")).unwrap();
        let mut medicine = MedicineInput::new("VITC", "Vitamin C");
        medicine.category_id = Some(category_id);
        let medicine_id = db.insert_medicine(&medicine).unwrap();

        assert_eq!(
            db.get_medicine(medicine_id).unwrap().unwrap().category_id,
            Some(category_id)
        );
        let err = db.delete_category(category_id).unwrap_err();
        assert!(err.is_constraint_violation());
    }
}
