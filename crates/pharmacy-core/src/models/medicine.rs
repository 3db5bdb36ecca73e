//! Medicine catalog models.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Lifecycle status of a catalog entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicineStatus {
    /// Sellable
    #[default]
    Active,
    /// Withdrawn from sale
    Inactive,
    /// Past its expiry date
    Expired,
}

impl MedicineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicineStatus::Active => "ACTIVE",
            MedicineStatus::Inactive => "INACTIVE",
            MedicineStatus::Expired => "EXPIRED",
        }
    }

    /// Parse a stored or user-supplied status (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(MedicineStatus::Active),
            "INACTIVE" => Some(MedicineStatus::Inactive),
            "EXPIRED" => Some(MedicineStatus::Expired),
            _ => None,
        }
    }
}

/// A medicine row as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    /// Store-assigned identifier
    pub id: i64,
    /// Human-readable SKU, unique across the catalog
    pub code: String,
    /// Display name
    pub name: String,
    /// International non-proprietary name (e.g., "paracetamol")
    pub generic_name: Option<String>,
    /// Free-text category label
    pub category: Option<String>,
    /// Linked row in `categories`, if any
    pub category_id: Option<i64>,
    /// Selling unit (e.g., "box", "blister", "bottle")
    pub unit: Option<String>,
    /// Dosage form (e.g., "tablet", "syrup")
    pub form: Option<String>,
    pub manufacturer: Option<String>,
    pub ingredients: Option<String>,
    /// Pack specification (e.g., "10 blisters x 10 tablets")
    pub specification: Option<String>,
    /// Strength (e.g., "500mg")
    pub strength: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub usage_instruction: Option<String>,
    pub storage_instruction: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Selling price per unit
    pub price: f64,
    /// Purchase price per unit
    pub cost_price: Option<f64>,
    pub status: MedicineStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Caller-supplied medicine fields, used for both create and full-replace update.
///
/// Every field defaults when omitted: strings to empty, numbers to zero and the
/// status to `ACTIVE`. An update therefore resets anything the caller leaves out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MedicineInput {
    #[serde(alias = "sku")]
    pub code: String,
    pub name: String,
    #[serde(alias = "generic_name")]
    pub generic_name: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "category_id")]
    pub category_id: Option<i64>,
    pub unit: Option<String>,
    pub form: Option<String>,
    pub manufacturer: Option<String>,
    pub ingredients: Option<String>,
    pub specification: Option<String>,
    pub strength: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "usage_instruction")]
    pub usage_instruction: Option<String>,
    #[serde(alias = "storage_instruction")]
    pub storage_instruction: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::f64")]
    pub price: f64,
    #[serde(alias = "cost_price", deserialize_with = "lenient::opt_f64")]
    pub cost_price: Option<f64>,
    pub status: MedicineStatus,
}

impl MedicineInput {
    /// Create an input with the two required fields set.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check field rules. Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if self.code.trim().is_empty() {
            return Err("code (sku) is required".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("price must be a non-negative number, got {}", self.price));
        }
        if let Some(cost) = self.cost_price {
            if !cost.is_finite() || cost < 0.0 {
                return Err(format!("costPrice must be a non-negative number, got {}", cost));
            }
        }
        Ok(())
    }

    /// Trim text fields and turn blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        Self {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            generic_name: blank_to_none(self.generic_name),
            category: blank_to_none(self.category),
            category_id: self.category_id,
            unit: blank_to_none(self.unit),
            form: blank_to_none(self.form),
            manufacturer: blank_to_none(self.manufacturer),
            ingredients: blank_to_none(self.ingredients),
            specification: blank_to_none(self.specification),
            strength: blank_to_none(self.strength),
            barcode: blank_to_none(self.barcode),
            description: blank_to_none(self.description),
            usage_instruction: blank_to_none(self.usage_instruction),
            storage_instruction: blank_to_none(self.storage_instruction),
            image: blank_to_none(self.image),
            price: self.price,
            cost_price: self.cost_price,
            status: self.status,
        }
    }
}

impl Medicine {
    /// Case-insensitive substring match on name, code and generic name.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.code.to_lowercase().contains(&needle)
            || self
                .generic_name
                .as_deref()
                .is_some_and(|g| g.to_lowercase().contains(&needle))
    }

    pub fn is_active(&self) -> bool {
        self.status == MedicineStatus::Active
    }
}

impl From<Medicine> for MedicineInput {
    fn from(m: Medicine) -> Self {
        Self {
            code: m.code,
            name: m.name,
            generic_name: m.generic_name,
            category: m.category,
            category_id: m.category_id,
            unit: m.unit,
            form: m.form,
            manufacturer: m.manufacturer,
            ingredients: m.ingredients,
            specification: m.specification,
            strength: m.strength,
            barcode: m.barcode,
            description: m.description,
            usage_instruction: m.usage_instruction,
            storage_instruction: m.storage_instruction,
            image: m.image,
            price: m.price,
            cost_price: m.cost_price,
            status: m.status,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Medicine {
        Medicine {
            id: 1,
            code: "PARA500".into(),
            name: "Panadol Extra".into(),
            generic_name: Some("Paracetamol".into()),
            category: None,
            category_id: None,
            unit: Some("box".into()),
            form: None,
            manufacturer: None,
            ingredients: None,
            specification: None,
            strength: Some("500mg".into()),
            barcode: None,
            description: None,
            usage_instruction: None,
            storage_instruction: None,
            image: None,
            price: 25000.0,
            cost_price: None,
            status: MedicineStatus::Active,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_validate_requires_name_and_code() {
        assert!(MedicineInput::new("SKU1", "").validate().is_err());
        assert!(MedicineInput::new("", "Aspirin").validate().is_err());
        assert!(MedicineInput::new("   ", "Aspirin").validate().is_err());
        assert!(MedicineInput::new("SKU1", "Aspirin").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut input = MedicineInput::new("SKU1", "Aspirin");
        input.price = -1.0;
        assert!(input.validate().is_err());

        input.price = f64::NAN;
        assert!(input.validate().is_err());

        input.price = 0.0;
        input.cost_price = Some(-3.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_normalized_blanks_become_none() {
        let mut input = MedicineInput::new("  SKU1 ", " Aspirin ");
        input.category = Some("   ".into());
        input.unit = Some(" box ".into());

        let n = input.normalized();
        assert_eq!(n.code, "SKU1");
        assert_eq!(n.name, "Aspirin");
        assert_eq!(n.category, None);
        assert_eq!(n.unit, Some("box".into()));
    }

    #[test]
    fn test_matches_keyword() {
        let m = sample();
        assert!(m.matches_keyword("panadol"));
        assert!(m.matches_keyword("PARA"));
        assert!(m.matches_keyword("cetamol"));
        assert!(m.matches_keyword("  "));
        assert!(!m.matches_keyword("ibuprofen"));
    }

    #[test]
    fn test_input_deserialize_accepts_sku_alias() {
        let input: MedicineInput =
            serde_json::from_str(r#"{"sku": "A1", "name": "Aspirin", "price": 12.5}"#).unwrap();
        assert_eq!(input.code, "A1");
        assert_eq!(input.price, 12.5);
        assert_eq!(input.status, MedicineStatus::Active);
        assert_eq!(input.category, None);
    }

    #[test]
    fn test_input_coerces_form_strings() {
        let input: MedicineInput = serde_json::from_str(
            r#"{"sku": "A1", "name": "Aspirin", "price": "15000", "usage_instruction": "after meals"}"#,
        )
        .unwrap();
        assert_eq!(input.price, 15000.0);
        assert_eq!(input.usage_instruction, Some("after meals".into()));
    }

    #[test]
    fn test_input_rejects_unknown_fields() {
        let result: Result<MedicineInput, _> =
            serde_json::from_str(r#"{"code": "A1", "name": "Aspirin", "colour": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [
            MedicineStatus::Active,
            MedicineStatus::Inactive,
            MedicineStatus::Expired,
        ] {
            assert_eq!(MedicineStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MedicineStatus::parse("inactive"), Some(MedicineStatus::Inactive));
        assert_eq!(MedicineStatus::parse("gone"), None);
    }
}
