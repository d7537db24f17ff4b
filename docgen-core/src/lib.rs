//! # docgen-core
//!
//! Templates, project context, prompt composition and document structuring
//! for the docgen documentation service.
//!
//! ## Overview
//!
//! - [`TemplateRegistry`] - The built-in document templates
//! - [`ProjectContext`] - Project facts and statistics used to ground a document
//! - [`compose`] - Renders the generation prompt
//! - [`structure`] / [`structure_outline`] - Splits model output into sections
//! - [`DocumentPipeline`] - Runs one request end to end over a
//!   [`ContextSource`] and a [`TextGenerator`]
//! - [`DocgenError`] / [`Result`] - Unified error handling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docgen_core::{DocumentPipeline, ForwardedCredentials, GenerationRequest, DocumentType};
//!
//! let pipeline = DocumentPipeline::new(backend).with_generator(gemini);
//! let request = GenerationRequest::new(DocumentType::SprintReport, "p1").with_sprint("s7");
//! let output = pipeline.run(&request, &ForwardedCredentials::default()).await?;
//! println!("{}", output.document.content);
//! ```

pub mod context;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod structure;
pub mod template;
pub mod types;

pub use context::{
    ActivityLog, Blocker, ContextParts, Member, ProjectContext, ProjectInfo, Sprint, SprintStats,
    Task, TaskStats, TeamStats,
};
pub use error::{DocgenError, ErrorKind, Result};
pub use pipeline::{ContextSource, DocumentPipeline, GenerationOutput, TextGenerator};
pub use prompt::{compose, expected_outline};
pub use structure::{structure, structure_outline};
pub use template::{DocumentType, Template, TemplateRegistry, TemplateSection, TemplateSummary};
pub use types::{
    CustomSection, ForwardedCredentials, GenerateDocumentBody, GeneratedDocument,
    GenerationRequest, ResponseMetadata, Section, SelectedSection,
};
