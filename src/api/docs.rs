use axum::{http::header, response::IntoResponse};

/// Serves the `OpenAPI` document with the running crate version stamped in.
pub async fn openapi_yaml() -> impl IntoResponse {
    let spec = include_str!("../../openapi.yaml");
    let version = env!("CARGO_PKG_VERSION");
    let spec_with_version = spec.replace("version: 0.0.0", &format!("version: {version}"));

    ([(header::CONTENT_TYPE, "text/yaml")], spec_with_version)
}
