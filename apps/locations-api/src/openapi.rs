//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Locations API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Locations API",
        version = "0.1.0",
        description = "CRUD service for locations with cursor pagination and idempotent upsert",
        license(name = "MIT-0")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/locations", api = domain_locations::ApiDoc)
    ),
    tags(
        (name = "Locations", description = "Location management endpoints")
    )
)]
pub struct ApiDoc;
