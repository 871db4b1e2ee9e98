//! HTTP handlers for the Locations API

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    AppError, ValidatedJson,
    errors::responses::{BadRequestValidationResponse, NotFoundResponse, StorageUnavailableResponse},
};
use observability::{Operation, OperationRecord, RequestContext};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{ListQuery, Location, LocationInput, LocationPage};
use crate::service::LocationService;
use crate::store::LocationStore;

/// OpenAPI documentation for Locations API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_locations,
        create_location,
        get_location,
        upsert_location,
        delete_location,
    ),
    components(
        schemas(Location, LocationInput, LocationPage),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            StorageUnavailableResponse
        )
    ),
    tags(
        (name = "Locations", description = "Location management endpoints")
    )
)]
pub struct ApiDoc;

/// Error half of a handler result. Carries the [`OperationRecord`] so the
/// request scope can name the operation on failed requests too.
type Failure = (Extension<OperationRecord>, Response);

fn failure(record: &OperationRecord, error: impl IntoResponse) -> Failure {
    (Extension(record.clone()), error.into_response())
}

/// Create the locations router
///
/// `POST` and `PUT` are interchangeable on both paths: without an id they
/// create, with an id they upsert.
pub fn router<S: LocationStore + 'static>(service: LocationService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_locations::<S>)
                .post(create_location::<S>)
                .put(create_location::<S>),
        )
        .route(
            "/{id}",
            get(get_location::<S>)
                .put(upsert_location::<S>)
                .post(upsert_location::<S>)
                .delete(delete_location::<S>),
        )
        .with_state(shared_service)
}

/// List locations, one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = "Locations",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of locations", body = LocationPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = StorageUnavailableResponse)
    )
)]
async fn list_locations<S: LocationStore>(
    State(service): State<Arc<LocationService<S>>>,
    ctx: RequestContext,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, Failure> {
    let record = OperationRecord::new(Operation::List);
    let Query(query) =
        query.map_err(|e| failure(&record, AppError::BadRequest(e.body_text())))?;

    let page = service
        .list_locations(&ctx, query.cursor, query.limit)
        .await
        .map_err(|e| failure(&record, e))?;

    Ok((Extension(record), Json(page)))
}

/// Create a location under a generated id
#[utoipa::path(
    post,
    path = "",
    tag = "Locations",
    request_body = LocationInput,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = StorageUnavailableResponse)
    )
)]
async fn create_location<S: LocationStore>(
    State(service): State<Arc<LocationService<S>>>,
    ctx: RequestContext,
    payload: Result<ValidatedJson<LocationInput>, Response>,
) -> Result<impl IntoResponse, Failure> {
    let record = OperationRecord::new(Operation::Create);
    let ValidatedJson(input) = payload.map_err(|e| failure(&record, e))?;

    let location = service
        .create_location(&ctx, input)
        .await
        .map_err(|e| failure(&record, e))?;
    let record = record.with_resource_id(&location.id);

    Ok((StatusCode::CREATED, Extension(record), Json(location)))
}

/// Get a location by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Locations",
    params(
        ("id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location found", body = Location),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = StorageUnavailableResponse)
    )
)]
async fn get_location<S: LocationStore>(
    State(service): State<Arc<LocationService<S>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Failure> {
    let record = OperationRecord::new(Operation::Get).with_resource_id(&id);
    let location = service
        .get_location(&ctx, &id)
        .await
        .map_err(|e| failure(&record, e))?;

    Ok((Extension(record), Json(location)))
}

/// Create or fully replace the location with this id
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Locations",
    params(
        ("id" = String, Path, description = "Location ID (1 to 128 characters)")
    ),
    request_body = LocationInput,
    responses(
        (status = 201, description = "Location stored", body = Location),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = StorageUnavailableResponse)
    )
)]
async fn upsert_location<S: LocationStore>(
    State(service): State<Arc<LocationService<S>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<ValidatedJson<LocationInput>, Response>,
) -> Result<impl IntoResponse, Failure> {
    let record = OperationRecord::new(Operation::Upsert).with_resource_id(&id);
    let ValidatedJson(input) = payload.map_err(|e| failure(&record, e))?;

    let location = service
        .upsert_location(&ctx, Some(id), input)
        .await
        .map_err(|e| failure(&record, e))?;

    Ok((StatusCode::CREATED, Extension(record), Json(location)))
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Locations",
    params(
        ("id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location deleted, or did not exist"),
        (status = 500, response = StorageUnavailableResponse)
    )
)]
async fn delete_location<S: LocationStore>(
    State(service): State<Arc<LocationService<S>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Failure> {
    let record = OperationRecord::new(Operation::Delete).with_resource_id(&id);
    service
        .delete_location(&ctx, &id)
        .await
        .map_err(|e| failure(&record, e))?;

    Ok((StatusCode::OK, Extension(record)))
}
