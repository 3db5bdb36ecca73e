use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use pharmacy_core::{MedicineInput, PharmacyCore};

use crate::dto::{self, CreatedResponse, DeletedResponse, MessageResponse};
use crate::errors;
use crate::routes::run_blocking;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_medicines)
                .post(create_medicine)
                .put(missing_medicine_id)
                .delete(missing_medicine_id),
        )
        .route("/active", get(list_active_medicines))
        .route("/stats/count", get(medicine_count))
        .route(
            "/:id",
            get(get_medicine).put(update_medicine).delete(delete_medicine),
        )
}

pub async fn list_medicines(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Query(query): Query<dto::ListMedicinesQuery>,
) -> axum::response::Response {
    let status = match query.status() {
        Ok(s) => s,
        Err(res) => return res,
    };
    let keyword = query.keyword().map(str::to_string);

    match run_blocking(core, move |core| {
        core.search_medicines(keyword.as_deref(), status)
    })
    .await
    {
        Ok(medicines) => Json(medicines).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn missing_medicine_id() -> axum::response::Response {
    errors::missing_id("medicine id")
}

pub async fn list_active_medicines(
    Extension(core): Extension<Arc<PharmacyCore>>,
) -> axum::response::Response {
    match run_blocking(core, |core| core.list_active_medicines()).await {
        Ok(medicines) => Json(medicines).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn medicine_count(
    Extension(core): Extension<Arc<PharmacyCore>>,
) -> axum::response::Response {
    match run_blocking(core, |core| core.medicine_count()).await {
        Ok(count) => Json(count).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn get_medicine(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "medicine id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.get_medicine(id)).await {
        Ok(medicine) => Json(medicine).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn create_medicine(
    Extension(core): Extension<Arc<PharmacyCore>>,
    body: Result<Json<MedicineInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.create_medicine(input)).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreatedResponse {
                message: "medicine created".into(),
                id,
            }),
        )
            .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn update_medicine(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
    body: Result<Json<MedicineInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "medicine id") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(input) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.update_medicine(id, input)).await {
        Ok(()) => Json(MessageResponse {
            message: "medicine updated".into(),
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn delete_medicine(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "medicine id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.delete_medicine(id)).await {
        Ok(deleted) => Json(DeletedResponse {
            message: if deleted {
                "medicine deleted".into()
            } else {
                "medicine did not exist".into()
            },
            deleted,
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}
