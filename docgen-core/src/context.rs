//! Project facts fetched from the project backend.
//!
//! The backend is not under our control, so every record deserializes
//! leniently: unknown fields are ignored and missing or `null` values fall
//! back to defaults. Aggregated statistics are computed once when the
//! context is assembled and use ordered maps so that prompt rendering stays
//! deterministic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MAX_TASKS: usize = 50;
pub const MAX_SPRINTS: usize = 10;
pub const MAX_RECENT_ACTIVITY: usize = 30;

/// Status counted as finished when computing the completion rate.
pub const DONE_STATUS: &str = "Done";

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Strings, numbers and booleans as text; any other shape is `None`.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_string(Value::deserialize(deserializer)?))
}

/// Numbers and numeric strings; any other shape is `None`.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        _ => None,
    })
}

/// Scalar array entries as text; non-arrays are empty.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_string).collect(),
        _ => Vec::new(),
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// A nested record, or `None` when the value does not have its shape.
fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => serde_json::from_value(value).ok(),
    })
}

fn name_of(value: Option<&Value>) -> Option<&str> {
    value?.as_object()?.get("name")?.as_str()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// MongoDB `_id`; documents serialized with virtuals carry both ids.
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    pub owner: Option<Value>,
}

impl ProjectInfo {
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.mongo_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub estimated_hours: Option<f64>,
}

impl Task {
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.mongo_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SprintCapacity {
    #[serde(deserialize_with = "lenient_number")]
    pub total_capacity_hours: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub member_capacities: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAnalysis {
    #[serde(deserialize_with = "lenient_number")]
    pub delay_risk_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_strings")]
    pub overloaded_members: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub critical_dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sprint {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub mongo_id: Option<String>,
    /// Human-facing sprint label ("Sprint 4"), distinct from the record id.
    #[serde(deserialize_with = "lenient_string")]
    pub sprint_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub goals: Vec<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_effort: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub predicted_velocity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub velocity: Option<f64>,
    #[serde(deserialize_with = "lenient_record")]
    pub capacity: Option<SprintCapacity>,
    #[serde(deserialize_with = "lenient_record")]
    pub risk_analysis: Option<RiskAnalysis>,
    #[serde(deserialize_with = "lenient_list")]
    pub selected_tasks: Vec<Value>,
    #[serde(deserialize_with = "lenient_list")]
    pub deferred_tasks: Vec<Value>,
    #[serde(deserialize_with = "lenient_number")]
    pub blocker_health_score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub blocker_status: Option<String>,
}

impl Sprint {
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.mongo_id.as_deref())
    }

    pub fn label(&self) -> Option<&str> {
        self.sprint_id.as_deref().or(self.record_id())
    }

    fn effective_velocity(&self) -> Option<f64> {
        [self.predicted_velocity, self.velocity].into_iter().flatten().find(|v| *v != 0.0)
    }

    fn capacity_hours(&self) -> Option<f64> {
        self.capacity.as_ref()?.total_capacity_hours.filter(|hours| *hours != 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    /// Populated user record (`{name, email, ...}`) or a bare id.
    pub member_id: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub role: Option<String>,
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        name_of(self.member_id.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityLog {
    pub user: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub entity_type: Option<String>,
}

impl ActivityLog {
    pub fn user_name(&self) -> Option<&str> {
        name_of(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Blocker {
    #[serde(deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub total_estimated_hours: f64,
    /// Percentage of tasks in [`DONE_STATUS`].
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self { total: tasks.len(), ..Self::default() };

        for task in tasks {
            let status = task.status.clone().unwrap_or_else(|| "Unassigned".to_string());
            *stats.by_status.entry(status).or_default() += 1;

            let priority = task.priority.clone().unwrap_or_else(|| "medium".to_string());
            *stats.by_priority.entry(priority).or_default() += 1;

            stats.total_estimated_hours += task.estimated_hours.unwrap_or(0.0);
        }

        if stats.total > 0 {
            let done = stats.by_status.get(DONE_STATUS).copied().unwrap_or(0);
            stats.completion_rate = done as f64 / stats.total as f64 * 100.0;
        }

        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub planned: usize,
    pub avg_velocity: f64,
    pub avg_capacity: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

impl SprintStats {
    pub fn from_sprints(sprints: &[Sprint]) -> Self {
        let mut stats = Self { total: sprints.len(), ..Self::default() };

        for sprint in sprints {
            match sprint.status.as_deref() {
                Some("Completed") => stats.completed += 1,
                Some("Active") => stats.active += 1,
                _ => stats.planned += 1,
            }
        }

        stats.avg_velocity = mean(sprints.iter().filter_map(Sprint::effective_velocity));
        stats.avg_capacity = mean(sprints.iter().filter_map(Sprint::capacity_hours));
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total: usize,
    pub by_role: BTreeMap<String, usize>,
}

impl TeamStats {
    pub fn from_members(members: &[Member]) -> Self {
        let mut by_role = BTreeMap::new();
        for member in members {
            let role = member.role.clone().unwrap_or_else(|| "Member".to_string());
            *by_role.entry(role).or_default() += 1;
        }
        Self { total: members.len(), by_role }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSummary {
    pub items: Vec<Task>,
    pub stats: TaskStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SprintSummary {
    pub items: Vec<Sprint>,
    pub stats: SprintStats,
    pub latest: Option<Sprint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSummary {
    pub items: Vec<Member>,
    pub stats: TeamStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub recent: Vec<ActivityLog>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockerSummary {
    pub items: Vec<Blocker>,
    pub total: usize,
}

/// Raw backend records, before truncation and aggregation.
#[derive(Debug, Clone, Default)]
pub struct ContextParts {
    pub project: ProjectInfo,
    pub tasks: Vec<Task>,
    pub sprints: Vec<Sprint>,
    pub members: Vec<Member>,
    pub activity: Vec<ActivityLog>,
    pub blockers: Vec<Blocker>,
    pub sprint_detail: Option<Sprint>,
}

/// Request-scoped bag of project facts used to ground a generated document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub project_id: String,
    pub sprint_id: Option<String>,
    pub project: ProjectInfo,
    pub tasks: TaskSummary,
    pub sprints: SprintSummary,
    pub members: TeamSummary,
    pub activity: ActivitySummary,
    pub blockers: BlockerSummary,
    pub sprint_detail: Option<Sprint>,
}

impl ProjectContext {
    /// Aggregates statistics over the full record sets, then keeps only the
    /// most relevant slice of each list.
    pub fn assemble(
        project_id: impl Into<String>,
        sprint_id: Option<String>,
        parts: ContextParts,
    ) -> Self {
        let ContextParts {
            project,
            mut tasks,
            mut sprints,
            members,
            mut activity,
            blockers,
            sprint_detail,
        } = parts;

        let task_stats = TaskStats::from_tasks(&tasks);
        let sprint_stats = SprintStats::from_sprints(&sprints);
        let team_stats = TeamStats::from_members(&members);
        let latest = sprints.first().cloned();
        let activity_total = activity.len();
        let blocker_total = blockers.len();

        tasks.truncate(MAX_TASKS);
        sprints.truncate(MAX_SPRINTS);
        activity.truncate(MAX_RECENT_ACTIVITY);

        Self {
            project_id: project_id.into(),
            sprint_id,
            project,
            tasks: TaskSummary { items: tasks, stats: task_stats },
            sprints: SprintSummary { items: sprints, stats: sprint_stats, latest },
            members: TeamSummary { items: members, stats: team_stats },
            activity: ActivitySummary { recent: activity, total: activity_total },
            blockers: BlockerSummary { items: blockers, total: blocker_total },
            sprint_detail,
        }
    }
}
