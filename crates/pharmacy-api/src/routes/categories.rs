use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use pharmacy_core::{CategoryInput, PharmacyCore};

use crate::dto::{self, CreatedResponse, DeletedResponse, MessageResponse};
use crate::errors;
use crate::routes::run_blocking;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_categories)
                .post(create_category)
                .put(missing_category_id)
                .delete(missing_category_id),
        )
        .route("/by-name/:name", get(get_category_by_name))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn missing_category_id() -> axum::response::Response {
    errors::missing_id("category id")
}

pub async fn list_categories(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Query(query): Query<dto::ListCategoriesQuery>,
) -> axum::response::Response {
    let keyword = query.keyword().map(str::to_string);

    match run_blocking(core, move |core| match keyword {
        Some(keyword) => core.search_categories(&keyword),
        None => core.list_categories(),
    })
    .await
    {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "category id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.get_category(id)).await {
        Ok(category) => Json(category).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn get_category_by_name(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match run_blocking(core, move |core| core.find_category_by_name(&name)).await {
        Ok(category) => Json(category).into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(core): Extension<Arc<PharmacyCore>>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.create_category(input)).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreatedResponse {
                message: "category created".into(),
                id,
            }),
        )
            .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "category id") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(input) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(core, move |core| core.update_category(id, input)).await {
        Ok(()) => Json(MessageResponse {
            message: "category updated".into(),
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(core): Extension<Arc<PharmacyCore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "category id") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match run_blocking(core, move |core| core.delete_category(id)).await {
        Ok(deleted) => Json(DeletedResponse {
            message: if deleted {
                "category deleted".into()
            } else {
                "category did not exist".into()
            },
            deleted,
        })
        .into_response(),
        Err(e) => errors::pharmacy_error_to_response(e),
    }
}
