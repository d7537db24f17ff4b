//! Built-in document templates.
//!
//! Each [`DocumentType`] maps to one static [`Template`] describing the
//! section layout the generated document must follow. The registry is
//! immutable and lives for the whole process.

mod catalog;

use crate::{DocgenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Supported professional document types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DocumentType {
    Srs,
    SprintReport,
    ArchitectureDoc,
    UserManual,
    ApiDocumentation,
    TestPlan,
    ProjectCharter,
    DesignDocument,
    TechnicalSpec,
}

impl DocumentType {
    /// Parses a document type key, mapping unknown keys to [`DocgenError::NotFound`].
    pub fn parse(key: &str) -> Result<Self> {
        Self::from_str(key.trim())
            .map_err(|_| DocgenError::not_found(format!("Document type '{key}' not found")))
    }

    pub fn template(self) -> &'static Template {
        TemplateRegistry::builtin().template(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub required: bool,
    /// Whether callers may pick this subsection individually; validation rejects it otherwise.
    pub selectable: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSection {
    /// Section label as printed in the document ("1", "2", "Appendix").
    #[serde(rename = "section")]
    pub number: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub subsections: &'static [Subsection],
}

impl TemplateSection {
    pub fn subsection(&self, id: &str) -> Option<&'static Subsection> {
        self.subsections.iter().find(|sub| sub.id == id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(rename = "id")]
    pub key: DocumentType,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    /// Industry standard the layout follows, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<&'static str>,
    #[serde(rename = "structure")]
    pub sections: &'static [TemplateSection],
}

impl Template {
    pub fn section_titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|section| section.title)
    }

    /// Returns the section holding the subsection `id`, if any.
    pub fn section_of(&self, subsection_id: &str) -> Option<&'static TemplateSection> {
        self.sections.iter().find(|section| section.subsection(subsection_id).is_some())
    }

    pub fn find_section(&self, title: &str) -> Option<&'static TemplateSection> {
        let wanted = title.trim();
        self.sections.iter().find(|section| section.title.eq_ignore_ascii_case(wanted))
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.key,
            name: self.name,
            description: self.description,
            category: self.category,
            icon: self.icon,
            standard: self.standard,
            sections: self.section_titles().collect(),
        }
    }
}

/// Listing entry for a document type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: DocumentType,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<&'static str>,
    pub sections: Vec<&'static str>,
}

/// Read-only lookup over the built-in templates.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: &'static [&'static Template],
}

static BUILTIN: TemplateRegistry = TemplateRegistry { templates: catalog::TEMPLATES };

impl TemplateRegistry {
    pub fn builtin() -> &'static TemplateRegistry {
        &BUILTIN
    }

    /// Looks up a template by its (case-insensitive) key.
    pub fn get_template(&self, key: &str) -> Result<&'static Template> {
        let document_type = DocumentType::parse(key)?;
        Ok(self.template(document_type))
    }

    pub fn template(&self, document_type: DocumentType) -> &'static Template {
        catalog::lookup(document_type)
    }

    /// All templates in declaration order.
    pub fn list_types(&self) -> Vec<TemplateSummary> {
        DocumentType::iter().map(|key| self.template(key).summary()).collect()
    }

    /// Unique category names, sorted.
    pub fn categories(&self) -> Vec<&'static str> {
        self.templates
            .iter()
            .map(|template| template.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
