use crate::ServerConfig;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, header},
};
use docgen_core::{
    DocgenError, DocumentType, ForwardedCredentials, GenerateDocumentBody, GenerationOutput,
    Template, TemplateRegistry, TemplateSummary,
};
use docgen_telemetry::{Instrument, generation_request_span};
use serde::Serialize;

#[derive(Clone)]
pub struct DocumentationController {
    config: ServerConfig,
}

impl DocumentationController {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    fn reject(&self, error: DocgenError) -> ApiError {
        ApiError::from_error(error, self.config.security.expose_error_details)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypesResponse {
    pub success: bool,
    pub document_types: Vec<TemplateSummary>,
    pub categories: Vec<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResponse {
    pub success: bool,
    pub document_type: DocumentType,
    pub structure: &'static Template,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub output: GenerationOutput,
}

/// Caller's `Authorization` and `Cookie` headers, relayed to the project backend.
fn forwarded_credentials(headers: &HeaderMap) -> ForwardedCredentials {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let cookies: Vec<&str> =
        headers.get_all(header::COOKIE).iter().filter_map(|value| value.to_str().ok()).collect();
    let cookie = (!cookies.is_empty()).then(|| cookies.join("; "));

    ForwardedCredentials::new(authorization, cookie)
}

pub async fn list_types() -> Json<TypesResponse> {
    let registry = TemplateRegistry::builtin();
    Json(TypesResponse {
        success: true,
        document_types: registry.list_types(),
        categories: registry.categories(),
    })
}

pub async fn get_structure(
    State(controller): State<DocumentationController>,
    Path(document_type): Path<String>,
) -> Result<Json<StructureResponse>, ApiError> {
    let template = TemplateRegistry::builtin()
        .get_template(&document_type)
        .map_err(|e| controller.reject(e))?;
    Ok(Json(StructureResponse { success: true, document_type: template.key, structure: template }))
}

pub async fn generate_document(
    State(controller): State<DocumentationController>,
    headers: HeaderMap,
    payload: Result<Json<GenerateDocumentBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = payload?;
    let credentials = forwarded_credentials(&headers);

    let span = generation_request_span(
        body.document_type.as_deref().unwrap_or_default(),
        body.project_id.as_deref().unwrap_or_default(),
    );
    let timeout = controller.config.security.request_timeout;
    let run = controller.config.pipeline.generate(body, &credentials).instrument(span);
    let output = match tokio::time::timeout(timeout, run).await {
        Ok(result) => result.map_err(|e| controller.reject(e))?,
        Err(_) => {
            return Err(controller.reject(DocgenError::generation_timeout(format!(
                "Document generation exceeded the {}s request timeout",
                timeout.as_secs_f32()
            ))));
        }
    };

    Ok(Json(GenerateResponse { success: true, output }))
}
