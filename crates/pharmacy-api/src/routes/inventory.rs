use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use pharmacy_core::{NewStockRecord, PharmacyCore, StockThresholds};

use crate::dto::{self, CreatedResponse, DeletedResponse, MessageResponse};
use crate::errors;
use crate::routes::run_blocking;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_inventory)
                .post(create_stock_record)
                .put(missing_stock_id)
                .delete(missing_stock_id),
        )
        .route("/in-stock", get(list_in_stock))
        .route("/stats", get(inventory_stats))
        .route("/medicine/:medicine_id", get(get_stock_by_medicine))
        .route("/medicine/:medicine_id/add-stock", post(add_stock))
        .route("/medicine/:medicine_id/reduce-stock", post(reduce_stock))
        .route(
            "/:id",
            get(get_stock_entry)
                .put(update_stock_record)
                .delete(delete_stock_record),
        )
}

pub async fn list_inventory(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Query(query): Query<dto::ListInventoryQuery>,
) -> axum::response::Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(res) => return res,
    };
    let keyword = query.keyword().map(str::to_string);

    match run_blocking(core, move |core| {
        core.list_stock_entries(keyword.as_deref(), filter)
    })
    .await
    {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn missing_stock_id() -> axum::response::Response {
    errors::missing_id("stock record id")
}

pub async fn list_in_stock(
    Extension(core): Extension<Arc<PharmacyCore>>,
) -> axum::response::Response {
    match run_blocking(core, |core| core.list_in_stock()).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn inventory_stats(
    Extension(core): Extension<Arc<PharmacyCore>>,
) -> axum::response::Response {
    match run_blocking(core, |core| core.inventory_stats()).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn get_stock_entry(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "stock record id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.get_stock_entry(id)).await {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn get_stock_by_medicine(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(medicine_id): Path<String>,
) -> axum::response::Response {
    let medicine_id = match errors::parse_id(&medicine_id, "medicine id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| {
        core.get_stock_entry_for_medicine(medicine_id)
    })
    .await
    {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn create_stock_record(
    Extension(core): Extension<Arc<PharmacyCore>>,
    body: Result<Json<NewStockRecord>, JsonRejection>,
) -> axum::response::Response {
    let Json(record) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.create_stock_record(record)).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreatedResponse {
                message: "stock record created".into(),
                id,
            }),
        )
            .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn update_stock_record(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
    body: Result<Json<StockThresholds>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "stock record id") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(thresholds) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.update_stock_record(id, thresholds)).await {
        Ok(()) => Json(MessageResponse {
            message: "stock record updated".into(),
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn delete_stock_record(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "stock record id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.delete_stock_record(id)).await {
        Ok(deleted) => Json(DeletedResponse {
            message: if deleted {
                "stock record deleted".into()
            } else {
                "stock record did not exist".into()
            },
            deleted,
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn add_stock(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(medicine_id): Path<String>,
    Query(query): Query<dto::QuantityQuery>,
) -> axum::response::Response {
    let (medicine_id, quantity) = match adjustment_params(&medicine_id, &query) {
        Ok(p) => p,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.add_stock(medicine_id, quantity)).await {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn reduce_stock(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(medicine_id): Path<String>,
    Query(query): Query<dto::QuantityQuery>,
) -> axum::response::Response {
    let (medicine_id, quantity) = match adjustment_params(&medicine_id, &query) {
        Ok(p) => p,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.reduce_stock(medicine_id, quantity)).await {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

fn adjustment_params(
    medicine_id: &str,
    query: &dto::QuantityQuery,
) -> Result<(i64, i64), axum::response::Response> {
    let medicine_id = errors::parse_id(medicine_id, "medicine id")?;
    let quantity = query.quantity()?;
    Ok((medicine_id, quantity))
}
