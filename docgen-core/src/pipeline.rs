use crate::context::ProjectContext;
use crate::prompt::{compose, expected_outline};
use crate::structure::structure_outline;
use crate::types::{
    ForwardedCredentials, GenerateDocumentBody, GeneratedDocument, GenerationRequest,
    ResponseMetadata,
};
use crate::{DocgenError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Source of project facts, usually the project backend.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn fetch(
        &self,
        project_id: &str,
        sprint_id: Option<&str>,
        credentials: &ForwardedCredentials,
    ) -> Result<ProjectContext>;
}

/// A generative text model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier reported in response metadata.
    fn model_id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub document: GeneratedDocument,
    pub metadata: ResponseMetadata,
}

/// Validate → fetch → compose → generate → structure, once per request.
#[derive(Clone)]
pub struct DocumentPipeline {
    context: Arc<dyn ContextSource>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl DocumentPipeline {
    pub fn new(context: Arc<dyn ContextSource>) -> Self {
        Self { context, generator: None }
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn is_generation_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model_id())
    }

    /// Validates an inbound body and runs the full pipeline.
    pub async fn generate(
        &self,
        body: GenerateDocumentBody,
        credentials: &ForwardedCredentials,
    ) -> Result<GenerationOutput> {
        let request = body.validate()?;
        self.run(&request, credentials).await
    }

    #[tracing::instrument(
        name = "docgen.pipeline",
        skip_all,
        fields(document_type = %request.document_type, project_id = %request.project_id)
    )]
    pub async fn run(
        &self,
        request: &GenerationRequest,
        credentials: &ForwardedCredentials,
    ) -> Result<GenerationOutput> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            DocgenError::Config("No generation model is configured; set GEMINI_API_KEY".into())
        })?;

        let prompt = self.prompt(request, credentials).await?;
        tracing::debug!(prompt_chars = prompt.len(), "prompt composed");

        let raw = generator.generate(&prompt).await?;
        let template = request.template();
        let outline = expected_outline(template, request);
        let document = structure_outline(&raw, template, &outline);

        if document.structure_degraded {
            tracing::warn!(
                document_type = %request.document_type,
                "model output did not follow the expected outline"
            );
        }
        tracing::info!(
            word_count = document.word_count,
            sections = document.sections.len(),
            "document generated"
        );

        Ok(GenerationOutput {
            document,
            metadata: ResponseMetadata::for_request(request, generator.model_id()),
        })
    }

    /// Fetches project context and composes the prompt without calling the model.
    pub async fn prompt(
        &self,
        request: &GenerationRequest,
        credentials: &ForwardedCredentials,
    ) -> Result<String> {
        let context = self
            .context
            .fetch(&request.project_id, request.sprint_id.as_deref(), credentials)
            .await?;
        Ok(compose(request.template(), &context, request))
    }
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("model", &self.model_id())
            .finish_non_exhaustive()
    }
}
