//! Prompt composition.
//!
//! [`compose`] is a pure function of the template, the project context and
//! the request: the same inputs always render the same prompt text.

use crate::context::{ProjectContext, Sprint};
use crate::template::{Template, TemplateSection};
use crate::types::{CustomSection, GenerationRequest};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Directive that keeps the model grounded in the supplied project facts.
pub const GROUNDING_DIRECTIVE: &str = "Only use information from the project context provided";

const KEY_TASKS: usize = 15;
const LISTED_MEMBERS: usize = 10;
const LISTED_BLOCKERS: usize = 10;
const LISTED_ACTIVITY: usize = 10;
const NOT_AVAILABLE: &str = "N/A";

const WRITER_ROLE: &str = "You are a professional technical writer and software documentation \
expert familiar with industry standards (IEEE 830-1998, ISO, arc42, Agile practices).";

const WRITING_GUIDELINES: &str = "\
**WRITING GUIDELINES:**
1. **Professional tone**: clear and authoritative, in the register of IEEE or ISO documentation
2. **Formatting**: use `#` for main sections (`# 1. Introduction`), `##` for subsections \
(`## 1.1 Purpose`) and `###` below that; keep the section numbering
3. **Depth**: write full paragraphs, at least 3-5 sentences per subsection
4. **Structured data**: bullet points for lists, tables for tabular data, code blocks for technical detail
5. **Specifics**: cite concrete numbers, dates and names from the project context
6. **Accuracy**: base all content on the project data below; mark missing information as \"[To be determined]\"
7. **Consistency**: keep terminology and formatting uniform throughout
";

const OUTPUT_RULES: &str = "\
## OUTPUT FORMAT REQUIREMENTS

Generate the complete document in Markdown:

1. **Structure**: follow the document structure above exactly, one top-level heading per section, in order
2. **Formatting**: bold for emphasis, tables for structured data, bullet and numbered lists for clarity
3. **Completeness**: fill every required section with actual project data
4. **Missing data**: write \"[To be determined - requires stakeholder input]\" where data is unavailable
5. **No preamble**: start directly with the document title (`# Title`) and content
";

/// Template sections the prompt asks for: every section, or only those
/// holding a selected subsection.
fn outlined_sections<'t>(
    template: &'t Template,
    request: &GenerationRequest,
) -> Vec<&'t TemplateSection> {
    if request.selected_sections.is_empty() {
        return template.sections.iter().collect();
    }
    template
        .sections
        .iter()
        .filter(|section| section.subsections.iter().any(|sub| request.is_selected(sub.id)))
        .collect()
}

fn overrides<'r>(section: &TemplateSection, request: &'r GenerationRequest) -> Vec<&'r CustomSection> {
    request
        .custom_sections
        .iter()
        .filter(|custom| custom.title.trim().eq_ignore_ascii_case(section.title))
        .collect()
}

/// Custom sections that do not replace an outlined template section.
fn extra_sections<'r>(
    outlined: &[&TemplateSection],
    request: &'r GenerationRequest,
) -> Vec<&'r CustomSection> {
    request
        .custom_sections
        .iter()
        .filter(|custom| {
            !outlined
                .iter()
                .any(|section| custom.title.trim().eq_ignore_ascii_case(section.title))
        })
        .collect()
}

/// Ordered section titles the model is asked to produce.
pub fn expected_outline(template: &Template, request: &GenerationRequest) -> Vec<String> {
    let outlined = outlined_sections(template, request);
    let mut titles: Vec<String> = outlined.iter().map(|s| s.title.to_string()).collect();
    titles.extend(extra_sections(&outlined, request).into_iter().map(|c| c.title.clone()));
    titles
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn distribution(counts: &BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts.iter().map(|(key, count)| format!("{key}: {count}")).collect::<Vec<_>>().join(", ")
}

fn number(value: Option<f64>) -> String {
    let value = value.unwrap_or(0.0);
    if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value}") }
}

/// Builds the full prompt for one generation request.
pub fn compose(template: &Template, context: &ProjectContext, request: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(8 * 1024);

    // `write!` into a String cannot fail.
    let _ = writeln!(
        prompt,
        "{WRITER_ROLE} Generate a comprehensive, accurate and professional {}.\n",
        template.name
    );
    prompt.push_str(WRITING_GUIDELINES);
    prompt.push_str("\n---\n\n");

    write_header(&mut prompt, template);
    let outlined = outlined_sections(template, request);
    write_outline(&mut prompt, &outlined, request);

    prompt.push_str("\n---\n\n## PROJECT CONTEXT AND DATA\n\n");
    write_project(&mut prompt, context);
    if request.include_data_summary {
        write_tasks(&mut prompt, context);
        write_sprints(&mut prompt, context);
        write_team(&mut prompt, context);
        write_activity(&mut prompt, context);
    }
    write_blockers(&mut prompt, context);
    if let (Some(_), Some(detail)) = (&request.sprint_id, &context.sprint_detail) {
        write_sprint_detail(&mut prompt, detail);
    }

    if let Some(requirements) = &request.user_requirements {
        let _ = write!(prompt, "\n---\n\n## USER REQUIREMENTS AND FOCUS AREAS\n\n{requirements}\n\n");
    }

    let extras = extra_sections(&outlined, request);
    if !extras.is_empty() {
        prompt.push_str("\n---\n\n## CUSTOM SECTIONS REQUESTED BY USER\n\n");
        prompt.push_str("Add each of these as its own top-level section after the sections above:\n\n");
        for (idx, custom) in extras.iter().enumerate() {
            let _ = writeln!(prompt, "{}. **{}**", idx + 1, custom.title);
            if let Some(description) = &custom.description {
                let _ = writeln!(prompt, "   Description: {description}");
            }
        }
        prompt.push('\n');
    }

    if let Some(notes) = &request.additional_notes {
        let _ = write!(prompt, "\n---\n\n## ADDITIONAL INSTRUCTIONS FROM USER\n\n{notes}\n\n");
    }

    prompt.push_str("\n---\n\n");
    prompt.push_str(OUTPUT_RULES);
    let _ = writeln!(prompt, "6. **Accuracy**: {GROUNDING_DIRECTIVE}");
    prompt.push_str("\n**BEGIN THE DOCUMENT NOW:**\n");
    prompt
}

fn write_header(prompt: &mut String, template: &Template) {
    let _ = writeln!(prompt, "## DOCUMENT TYPE: {}", template.name);
    let _ = writeln!(prompt, "**Category:** {}", template.category);
    let _ = writeln!(prompt, "**Description:** {}", template.description);
    if let Some(standard) = template.standard {
        let _ = writeln!(prompt, "**Standard:** {standard}");
    }
    prompt.push_str("\n---\n\n## DOCUMENT STRUCTURE TO GENERATE\n");
}

fn write_outline(prompt: &mut String, outlined: &[&TemplateSection], request: &GenerationRequest) {
    let restricted = !request.selected_sections.is_empty();
    if restricted {
        prompt.push_str("\n**GENERATE ONLY THE FOLLOWING SECTIONS (user-selected):**\n");
    }

    for section in outlined {
        let _ = writeln!(prompt, "\n### Section {}: {}", section.number, section.title);
        if let Some(description) = section.description {
            let _ = writeln!(prompt, "*{description}*");
        }
        for sub in section.subsections {
            if restricted && !request.is_selected(sub.id) {
                continue;
            }
            let tag = if sub.required { "**[REQUIRED]**" } else { "[OPTIONAL]" };
            let _ = writeln!(prompt, "- **{} {}** {tag}", sub.id, sub.title);
            if let Some(description) = sub.description {
                let _ = writeln!(prompt, "  _{description}_");
            }
        }
        for custom in overrides(section, request) {
            let guidance = custom.description.as_deref().unwrap_or("Give this section extra emphasis.");
            let _ = writeln!(prompt, "> User guidance for this section: {guidance}");
        }
    }

    if restricted {
        prompt.push_str(
            "\n**IMPORTANT**: Generate ONLY the sections listed above. Do NOT include any other template sections.\n",
        );
    }
}

fn write_project(prompt: &mut String, context: &ProjectContext) {
    let project = &context.project;
    prompt.push_str("### Project Information\n");
    let _ = writeln!(prompt, "- **Project Name:** {}", or_na(project.name.as_deref()));
    let _ = writeln!(prompt, "- **Description:** {}", or_na(project.description.as_deref()));
    let _ = writeln!(prompt, "- **Created:** {}\n", or_na(project.created_at.as_deref()));
}

fn write_tasks(prompt: &mut String, context: &ProjectContext) {
    let stats = &context.tasks.stats;
    prompt.push_str("### Tasks Overview\n");
    let _ = writeln!(prompt, "- **Total Tasks:** {}", stats.total);
    let _ = writeln!(prompt, "- **Completion Rate:** {:.1}%", stats.completion_rate);
    let _ = writeln!(prompt, "- **Status Distribution:** {}", distribution(&stats.by_status));
    let _ = writeln!(prompt, "- **Priority Distribution:** {}", distribution(&stats.by_priority));
    let _ = writeln!(prompt, "- **Total Estimated Hours:** {}\n", number(Some(stats.total_estimated_hours)));

    let key_tasks = context.tasks.items.iter().take(KEY_TASKS);
    if !context.tasks.items.is_empty() {
        prompt.push_str("**Key Tasks:**\n");
        for (idx, task) in key_tasks.enumerate() {
            let _ = writeln!(
                prompt,
                "{}. **{}** [{}] - {} priority, {}hrs",
                idx + 1,
                or_na(task.title.as_deref()),
                or_na(task.status.as_deref()),
                task.priority.as_deref().unwrap_or("medium"),
                number(task.estimated_hours),
            );
        }
        prompt.push('\n');
    }
}

fn write_sprints(prompt: &mut String, context: &ProjectContext) {
    let stats = &context.sprints.stats;
    prompt.push_str("### Sprint Information\n");
    let _ = writeln!(prompt, "- **Total Sprints:** {}", stats.total);
    let _ = writeln!(prompt, "- **Completed:** {}", stats.completed);
    let _ = writeln!(prompt, "- **Active:** {}", stats.active);
    let _ = writeln!(prompt, "- **Average Velocity:** {:.1}", stats.avg_velocity);
    let _ = writeln!(prompt, "- **Average Capacity:** {:.1} hours\n", stats.avg_capacity);

    if let Some(latest) = &context.sprints.latest {
        prompt.push_str("**Latest Sprint:**\n");
        let _ = writeln!(prompt, "- Sprint ID: {}", or_na(latest.label()));
        let _ = writeln!(prompt, "- Summary: {}", or_na(latest.summary.as_deref()));
        let _ = writeln!(prompt, "- Status: {}", or_na(latest.status.as_deref()));
        let _ = writeln!(
            prompt,
            "- Duration: {} to {}",
            or_na(latest.start_date.as_deref()),
            or_na(latest.end_date.as_deref())
        );
        let goals = if latest.goals.is_empty() { NOT_AVAILABLE.to_string() } else { latest.goals.join(", ") };
        let _ = writeln!(prompt, "- Goals: {goals}");
        let _ = writeln!(prompt, "- Total Effort: {} hours", number(latest.total_effort));
        let _ = writeln!(prompt, "- Predicted Velocity: {}\n", number(latest.predicted_velocity));
    }
}

fn write_team(prompt: &mut String, context: &ProjectContext) {
    let stats = &context.members.stats;
    prompt.push_str("### Team Information\n");
    let _ = writeln!(prompt, "- **Total Members:** {}", stats.total);
    let _ = writeln!(prompt, "- **Role Distribution:** {}\n", distribution(&stats.by_role));

    if !context.members.items.is_empty() {
        prompt.push_str("**Team Members:**\n");
        for member in context.members.items.iter().take(LISTED_MEMBERS) {
            let _ = writeln!(
                prompt,
                "- {} ({})",
                or_na(member.name()),
                member.role.as_deref().unwrap_or("Member")
            );
        }
        prompt.push('\n');
    }
}

fn write_activity(prompt: &mut String, context: &ProjectContext) {
    if context.activity.recent.is_empty() {
        return;
    }
    let _ = writeln!(prompt, "### Recent Activity ({} events total)", context.activity.total);
    for activity in context.activity.recent.iter().take(LISTED_ACTIVITY) {
        let _ = writeln!(
            prompt,
            "- {} {} {}",
            activity.user_name().unwrap_or("Unknown"),
            or_na(activity.action.as_deref()),
            or_na(activity.entity_type.as_deref()),
        );
    }
    prompt.push('\n');
}

fn write_blockers(prompt: &mut String, context: &ProjectContext) {
    if context.blockers.total == 0 {
        return;
    }
    prompt.push_str("### Current Blockers\n");
    let _ = writeln!(prompt, "- **Total Active Blockers:** {}\n", context.blockers.total);
    prompt.push_str("**Active Blockers:**\n");
    for blocker in context.blockers.items.iter().take(LISTED_BLOCKERS) {
        let _ = writeln!(
            prompt,
            "- [{}] {}",
            blocker.severity.as_deref().unwrap_or("Medium"),
            or_na(blocker.reason.as_deref())
        );
    }
    prompt.push('\n');
}

fn write_sprint_detail(prompt: &mut String, sprint: &Sprint) {
    prompt.push_str("### DETAILED SPRINT DATA\n\n");
    let _ = writeln!(prompt, "**Sprint:** {}", or_na(sprint.label()));
    let _ = writeln!(prompt, "**Summary:** {}", or_na(sprint.summary.as_deref()));
    let _ = writeln!(prompt, "**Status:** {}", or_na(sprint.status.as_deref()));
    let _ = writeln!(
        prompt,
        "**Period:** {} to {}\n",
        or_na(sprint.start_date.as_deref()),
        or_na(sprint.end_date.as_deref())
    );

    if !sprint.goals.is_empty() {
        prompt.push_str("**Sprint Goals:**\n");
        for (idx, goal) in sprint.goals.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {goal}", idx + 1);
        }
        prompt.push('\n');
    }

    if let Some(capacity) = &sprint.capacity {
        prompt.push_str("**Capacity:**\n");
        let _ = writeln!(prompt, "- Total Capacity: {} hours", number(capacity.total_capacity_hours));
        if !capacity.member_capacities.is_empty() {
            let _ = writeln!(prompt, "- Team Members: {}", capacity.member_capacities.len());
        }
        prompt.push('\n');
    }

    if let Some(risk) = &sprint.risk_analysis {
        let list = |items: &[String]| if items.is_empty() { "None".to_string() } else { items.join(", ") };
        prompt.push_str("**Risk Analysis:**\n");
        let _ = writeln!(prompt, "- Delay Risk: {}%", number(risk.delay_risk_percent));
        let _ = writeln!(prompt, "- Overloaded Members: {}", list(&risk.overloaded_members));
        let _ = writeln!(prompt, "- Critical Dependencies: {}\n", list(&risk.critical_dependencies));
    }

    prompt.push_str("**Tasks:**\n");
    let _ = writeln!(prompt, "- Selected: {} tasks", sprint.selected_tasks.len());
    let _ = writeln!(prompt, "- Deferred: {} tasks\n", sprint.deferred_tasks.len());

    if let Some(score) = sprint.blocker_health_score {
        prompt.push_str("**Blocker Health:**\n");
        let _ = writeln!(prompt, "- Health Score: {}", number(Some(score)));
        let _ = writeln!(prompt, "- Status: {}\n", or_na(sprint.blocker_status.as_deref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Blocker, ContextParts, ProjectInfo, Task};
    use crate::template::DocumentType;

    fn context() -> ProjectContext {
        let parts = ContextParts {
            project: ProjectInfo {
                name: Some("Apollo".to_string()),
                description: Some("Mission control dashboard".to_string()),
                ..ProjectInfo::default()
            },
            tasks: vec![
                Task { title: Some("Login page".into()), status: Some("Done".into()), ..Task::default() },
                Task { title: Some("Audit log".into()), status: Some("To Do".into()), ..Task::default() },
            ],
            sprint_detail: Some(Sprint {
                sprint_id: Some("Sprint 7".into()),
                goals: vec!["Ship auth".into()],
                ..Sprint::default()
            }),
            ..ContextParts::default()
        };
        ProjectContext::assemble("p1", Some("s7".into()), parts)
    }

    #[test]
    fn compose_is_deterministic() {
        let request = GenerationRequest::new(DocumentType::Srs, "p1");
        let template = request.template();
        let ctx = context();
        assert_eq!(compose(template, &ctx, &request), compose(template, &ctx, &request));
    }

    #[test]
    fn compose_contains_outline_and_grounding() {
        let request = GenerationRequest::new(DocumentType::SprintReport, "p1").with_sprint("s7");
        let template = request.template();
        let prompt = compose(template, &context(), &request);

        for title in template.section_titles() {
            assert!(prompt.contains(title), "missing section {title}");
        }
        assert!(prompt.to_lowercase().contains("only use information from the project context provided"));
        assert!(prompt.contains("Apollo"));
        assert!(prompt.contains("Completion Rate:** 50.0%"));
        assert!(prompt.contains("DETAILED SPRINT DATA"));
        assert!(prompt.contains("1. Ship auth"));
    }

    #[test]
    fn data_summary_can_be_disabled() {
        let request = GenerationRequest::new(DocumentType::Srs, "p1").with_data_summary(false);
        let prompt = compose(request.template(), &context(), &request);
        assert!(!prompt.contains("Tasks Overview"));
        assert!(prompt.contains("Project Information"));
        assert!(!prompt.contains("DETAILED SPRINT DATA"));
    }

    #[test]
    fn blockers_render_even_without_summary() {
        let mut ctx = context();
        ctx.blockers.items = vec![Blocker { severity: Some("High".into()), reason: Some("API outage".into()) }];
        ctx.blockers.total = 1;
        let request = GenerationRequest::new(DocumentType::Srs, "p1").with_data_summary(false);
        let prompt = compose(request.template(), &ctx, &request);
        assert!(prompt.contains("- [High] API outage"));
    }

    #[test]
    fn selection_restricts_outline() {
        let request = GenerationRequest::new(DocumentType::SprintReport, "p1").with_selected_section("4.2");
        let template = request.template();
        let prompt = compose(template, &context(), &request);

        assert!(prompt.contains("GENERATE ONLY THE FOLLOWING SECTIONS"));
        assert!(prompt.contains("Challenges and Blockers"));
        assert!(!prompt.contains("Section 1: Executive Summary"));
        assert_eq!(expected_outline(template, &request), vec!["Challenges and Blockers".to_string()]);
    }

    #[test]
    fn matching_custom_section_overrides_instead_of_appending() {
        let request = GenerationRequest::new(DocumentType::SprintReport, "p1")
            .with_custom_section(CustomSection::new("next steps").with_description("Focus on Q3 hiring"))
            .with_custom_section(CustomSection::new("Budget"));
        let template = request.template();
        let prompt = compose(template, &context(), &request);

        assert!(prompt.contains("User guidance for this section: Focus on Q3 hiring"));
        assert!(prompt.contains("1. **Budget**"));
        assert!(!prompt.contains("**next steps**"));

        let outline = expected_outline(template, &request);
        assert_eq!(outline.len(), template.sections.len() + 1);
        assert_eq!(outline.last().map(String::as_str), Some("Budget"));
    }

    #[test]
    fn requirements_and_notes_are_included() {
        let request = GenerationRequest::new(DocumentType::UserManual, "p1")
            .with_requirements("Focus on onboarding")
            .with_notes("Keep it short");
        let prompt = compose(request.template(), &context(), &request);
        let requirements = prompt.find("Focus on onboarding").unwrap();
        let notes = prompt.find("Keep it short").unwrap();
        assert!(requirements < notes);
        assert!(notes < prompt.find("OUTPUT FORMAT REQUIREMENTS").unwrap());
    }
}
