use crate::template::{DocumentType, Template};
use crate::{DocgenError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trims `value` and drops it when nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A template subsection picked by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A caller-defined section. When its title matches a template section it
/// acts as guidance for that section instead of an extra one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSection {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CustomSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Inbound JSON body of a generation request, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateDocumentBody {
    pub document_type: Option<String>,
    pub project_id: Option<String>,
    pub sprint_id: Option<String>,
    pub user_requirements: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_sections: Vec<SelectedSection>,
    #[serde(deserialize_with = "null_as_default")]
    pub custom_sections: Vec<CustomSection>,
    pub additional_notes: Option<String>,
    pub include_data_summary: Option<bool>,
}

impl GenerateDocumentBody {
    /// Checks the body against the template catalog and produces the typed
    /// request. Runs before any outbound call.
    pub fn validate(self) -> Result<GenerationRequest> {
        let key = non_blank(self.document_type)
            .ok_or_else(|| DocgenError::validation("documentType is required"))?;
        let document_type = DocumentType::parse(&key)?;

        let project_id = non_blank(self.project_id)
            .ok_or_else(|| DocgenError::validation("projectId is required"))?;

        let template = document_type.template();
        let mut selected_sections = Vec::with_capacity(self.selected_sections.len());
        for selected in self.selected_sections {
            let id = selected.id.trim().to_string();
            let Some(subsection) = template.section_of(&id).and_then(|s| s.subsection(&id)) else {
                return Err(DocgenError::validation(format!(
                    "Section '{id}' does not exist in {}",
                    template.name
                )));
            };
            if !subsection.selectable {
                return Err(DocgenError::validation(format!(
                    "Section '{id}' of {} cannot be selected individually",
                    template.name
                )));
            }
            selected_sections.push(SelectedSection { id, title: non_blank(selected.title) });
        }

        let mut custom_sections = Vec::with_capacity(self.custom_sections.len());
        for custom in self.custom_sections {
            let title = custom.title.trim();
            if title.is_empty() {
                return Err(DocgenError::validation("Custom sections require a title"));
            }
            custom_sections.push(CustomSection {
                title: title.to_string(),
                description: non_blank(custom.description),
            });
        }

        Ok(GenerationRequest {
            document_type,
            project_id,
            sprint_id: non_blank(self.sprint_id),
            user_requirements: non_blank(self.user_requirements),
            selected_sections,
            custom_sections,
            additional_notes: non_blank(self.additional_notes),
            include_data_summary: self.include_data_summary.unwrap_or(true),
        })
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub document_type: DocumentType,
    pub project_id: String,
    pub sprint_id: Option<String>,
    pub user_requirements: Option<String>,
    pub selected_sections: Vec<SelectedSection>,
    pub custom_sections: Vec<CustomSection>,
    pub additional_notes: Option<String>,
    pub include_data_summary: bool,
}

impl GenerationRequest {
    pub fn new(document_type: DocumentType, project_id: impl Into<String>) -> Self {
        Self {
            document_type,
            project_id: project_id.into(),
            sprint_id: None,
            user_requirements: None,
            selected_sections: Vec::new(),
            custom_sections: Vec::new(),
            additional_notes: None,
            include_data_summary: true,
        }
    }

    pub fn with_sprint(mut self, sprint_id: impl Into<String>) -> Self {
        self.sprint_id = Some(sprint_id.into());
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.user_requirements = Some(requirements.into());
        self
    }

    pub fn with_selected_section(mut self, id: impl Into<String>) -> Self {
        self.selected_sections.push(SelectedSection { id: id.into(), title: None });
        self
    }

    pub fn with_custom_section(mut self, section: CustomSection) -> Self {
        self.custom_sections.push(section);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.additional_notes = Some(notes.into());
        self
    }

    pub fn with_data_summary(mut self, include: bool) -> Self {
        self.include_data_summary = include;
        self
    }

    pub fn template(&self) -> &'static Template {
        self.document_type.template()
    }

    pub fn is_selected(&self, subsection_id: &str) -> bool {
        self.selected_sections.iter().any(|s| s.id == subsection_id)
    }
}

/// Caller credentials relayed verbatim to the project backend.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ForwardedCredentials {
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

impl ForwardedCredentials {
    pub fn new(authorization: Option<String>, cookie: Option<String>) -> Self {
        Self { authorization, cookie }
    }

    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self { authorization: Some(format!("Bearer {}", token.as_ref())), cookie: None }
    }

    pub fn is_empty(&self) -> bool {
        self.authorization.is_none() && self.cookie.is_none()
    }
}

// Credentials must never reach the logs.
impl fmt::Debug for ForwardedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardedCredentials")
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading text without the leading `#` markers; empty for the fallback section.
    pub heading: String,
    /// ATX heading level, 0 for the fallback section.
    pub level: u8,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub title: String,
    pub content: String,
    pub sections: Vec<Section>,
    pub word_count: usize,
    pub document_type: DocumentType,
    pub document_name: String,
    pub category: String,
    /// Set when the model output did not follow the expected outline.
    pub structure_degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub document_type: DocumentType,
    #[serde(serialize_with = "rfc3339")]
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
}

impl ResponseMetadata {
    pub fn for_request(request: &GenerationRequest, model: impl Into<String>) -> Self {
        Self {
            document_type: request.document_type,
            generated_at: Utc::now(),
            model: model.into(),
            project_id: request.project_id.clone(),
            sprint_id: request.sprint_id.clone(),
        }
    }
}

fn rfc3339<S: serde::Serializer>(
    at: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> GenerateDocumentBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validate_minimal_body() {
        let request = body(json!({"documentType": "sprint_report", "projectId": " p1 "}))
            .validate()
            .unwrap();
        assert_eq!(request.document_type, DocumentType::SprintReport);
        assert_eq!(request.project_id, "p1");
        assert!(request.include_data_summary);
        assert!(request.sprint_id.is_none());
    }

    #[test]
    fn blank_optionals_are_absent() {
        let request = body(json!({
            "documentType": "SRS",
            "projectId": "p1",
            "sprintId": "   ",
            "userRequirements": "",
            "selectedSections": null,
            "includeDataSummary": false
        }))
        .validate()
        .unwrap();
        assert!(request.sprint_id.is_none());
        assert!(request.user_requirements.is_none());
        assert!(request.selected_sections.is_empty());
        assert!(!request.include_data_summary);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = body(json!({"projectId": "p1"})).validate().unwrap_err();
        assert!(matches!(err, DocgenError::Validation(_)));

        let err = body(json!({"documentType": "SRS", "projectId": "  "})).validate().unwrap_err();
        assert!(matches!(err, DocgenError::Validation(_)));
    }

    #[test]
    fn unknown_type_is_not_found() {
        let err = body(json!({"documentType": "NOVEL", "projectId": "p1"})).validate().unwrap_err();
        assert!(matches!(err, DocgenError::NotFound(_)));
    }

    #[test]
    fn selected_sections_must_exist() {
        let request = body(json!({
            "documentType": "SPRINT_REPORT",
            "projectId": "p1",
            "selectedSections": [{"id": "4.2", "title": "Blockers"}]
        }))
        .validate()
        .unwrap();
        assert!(request.is_selected("4.2"));

        let err = body(json!({
            "documentType": "SPRINT_REPORT",
            "projectId": "p1",
            "selectedSections": [{"id": "42.1"}]
        }))
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("42.1"));
    }

    #[test]
    fn non_selectable_sections_are_rejected() {
        let err = body(json!({
            "documentType": "SRS",
            "projectId": "p1",
            "selectedSections": [{"id": "1.1"}]
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, DocgenError::Validation(_)));
        assert!(err.to_string().contains("cannot be selected"));
    }

    #[test]
    fn custom_sections_need_a_title() {
        let err = body(json!({
            "documentType": "SRS",
            "projectId": "p1",
            "customSections": [{"title": " ", "description": "x"}]
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, DocgenError::Validation(_)));
    }

    #[test]
    fn credentials_are_redacted_in_debug() {
        let credentials = ForwardedCredentials::bearer("secret-token");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn metadata_wire_format() {
        let request = GenerationRequest::new(DocumentType::SprintReport, "p1").with_sprint("s1");
        let json = serde_json::to_value(ResponseMetadata::for_request(&request, "gemini-2.0-flash"))
            .unwrap();
        assert_eq!(json["documentType"], "SPRINT_REPORT");
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["sprintId"], "s1");
        let generated_at = json["generatedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(generated_at).is_ok());
        assert!(generated_at.ends_with('Z'));
    }
}
