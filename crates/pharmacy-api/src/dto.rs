use serde::{Deserialize, Serialize};

use pharmacy_core::{MedicineStatus, StockFilter};

use crate::errors;

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListMedicinesQuery {
    pub keyword: Option<String>,
    pub status: Option<String>,
}

impl ListMedicinesQuery {
    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.keyword)
    }

    pub fn status(&self) -> Result<Option<MedicineStatus>, axum::response::Response> {
        match non_blank(&self.status) {
            None => Ok(None),
            Some(raw) => MedicineStatus::parse(raw).map(Some).ok_or_else(|| {
                errors::json_error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "validation_error",
                    "status must be one of: ACTIVE, INACTIVE, EXPIRED",
                )
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    pub keyword: Option<String>,
}

impl ListCategoriesQuery {
    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.keyword)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInventoryQuery {
    pub keyword: Option<String>,
    pub status: Option<String>,
}

impl ListInventoryQuery {
    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.keyword)
    }

    pub fn filter(&self) -> Result<Option<StockFilter>, axum::response::Response> {
        match non_blank(&self.status) {
            None => Ok(None),
            Some(raw) => raw.parse::<StockFilter>().map(Some).map_err(|msg| {
                errors::json_error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "validation_error",
                    msg,
                )
            }),
        }
    }
}

/// `?quantity=N` on add-stock and reduce-stock. Kept as text so a missing or
/// non-numeric value gets the same JSON error shape as other validation failures.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityQuery {
    pub quantity: Option<String>,
}

impl QuantityQuery {
    pub fn quantity(&self) -> Result<i64, axum::response::Response> {
        let raw = non_blank(&self.quantity).ok_or_else(|| {
            errors::json_error(
                axum::http::StatusCode::BAD_REQUEST,
                "validation_error",
                "quantity is required",
            )
        })?;
        raw.parse::<i64>().map_err(|_| {
            errors::json_error(
                axum::http::StatusCode::BAD_REQUEST,
                "validation_error",
                format!("quantity must be an integer, got {:?}", raw),
            )
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
