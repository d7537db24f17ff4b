//! One-shot commands that print to stdout and exit.

use crate::serve::pipeline_from_env;
use anyhow::Result;
use docgen_core::{DocumentType, ForwardedCredentials, GenerationRequest, TemplateRegistry};

pub fn list_types() {
    let registry = TemplateRegistry::builtin();
    for summary in registry.list_types() {
        println!("{:<20} {:<36} {}", summary.id.as_ref(), summary.name, summary.category);
    }
    println!();
    println!("Categories: {}", registry.categories().join(", "));
}

pub fn print_structure(document_type: &str) -> Result<()> {
    let template = TemplateRegistry::builtin().get_template(document_type)?;
    println!("{}", serde_json::to_string_pretty(template)?);
    Ok(())
}

pub async fn print_prompt(
    document_type: &str,
    project: String,
    sprint: Option<String>,
    requirements: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let mut request = GenerationRequest::new(DocumentType::parse(document_type)?, project);
    if let Some(sprint) = sprint {
        request = request.with_sprint(sprint);
    }
    if let Some(requirements) = requirements {
        request = request.with_requirements(requirements);
    }
    let credentials = token.map(ForwardedCredentials::bearer).unwrap_or_default();

    let prompt = pipeline_from_env()?.prompt(&request, &credentials).await?;
    println!("{prompt}");
    Ok(())
}
