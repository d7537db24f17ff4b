//! HTTP client for the project backend.

use crate::config::BackendConfig;
use crate::retry::execute_with_retry;
use async_trait::async_trait;
use docgen_core::context::{ActivityLog, Blocker, ContextParts, Member, ProjectInfo, Sprint, Task};
use docgen_core::{ContextSource, DocgenError, ForwardedCredentials, ProjectContext, Result};
use docgen_telemetry::{Instrument, backend_fetch_span, debug, warn};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Upper bound on upstream body text carried into error messages.
const MAX_ERROR_BODY: usize = 512;

/// Outcome of one failed HTTP attempt, before mapping to [`DocgenError`].
#[derive(Debug, thiserror::Error)]
enum RequestFailure {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: StatusCode, body: String },
}

impl RequestFailure {
    /// Connect failures and timeouts are worth one more attempt; anything the
    /// backend actually answered is not.
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_connect() || err.is_timeout(),
            Self::Status { .. } => false,
        }
    }

    fn into_error(self, route: &str, subject: &str) -> DocgenError {
        match self {
            Self::Transport(err) if err.is_timeout() => {
                DocgenError::fetch_timeout(format!("Project backend timed out on {route}"))
            }
            Self::Transport(err) if err.is_decode() => DocgenError::fetch(format!(
                "Project backend returned an unreadable response for {route}: {err}"
            )),
            Self::Transport(err) => {
                DocgenError::fetch(format!("Project backend unreachable ({route}): {err}"))
            }
            Self::Status { status: StatusCode::UNAUTHORIZED, .. } => {
                DocgenError::unauthorized("Project backend rejected the supplied credentials")
            }
            Self::Status { status: StatusCode::FORBIDDEN, .. } => {
                DocgenError::forbidden(format!("Access to {subject} is forbidden"))
            }
            Self::Status { status: StatusCode::NOT_FOUND, .. } => {
                DocgenError::not_found(format!("{subject} not found"))
            }
            Self::Status { status, body } => DocgenError::fetch(format!(
                "Project backend returned {status} for {route}: {body}"
            )),
        }
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

#[derive(Deserialize)]
struct ProjectEnvelope {
    project: Option<ProjectInfo>,
}

#[derive(Deserialize)]
struct TasksEnvelope {
    tasks: Option<Vec<Task>>,
}

#[derive(Deserialize)]
struct SprintsEnvelope {
    sprints: Option<Vec<Sprint>>,
}

#[derive(Deserialize)]
struct MembersEnvelope {
    members: Option<Vec<Member>>,
}

#[derive(Deserialize)]
struct SprintEnvelope {
    success: Option<bool>,
    sprint: Option<Sprint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityEnvelope {
    activity_logs: Option<Vec<ActivityLog>>,
}

#[derive(Deserialize)]
struct BlockersEnvelope {
    blockers: Option<Vec<Blocker>>,
}

/// Reads project facts from the project backend, forwarding the caller's
/// credentials on every call.
///
/// # Example
///
/// ```rust,ignore
/// use docgen_backend::{BackendClient, BackendConfig};
///
/// let backend = BackendClient::new(BackendConfig::from_env())?;
/// let context = backend.fetch("p1", None, &credentials).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DocgenError::Config(format!("Invalid backend URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DocgenError::Config(format!(
                "Backend URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DocgenError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DocgenError::Config("Backend URL cannot be used as a base".into()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GETs `url` and decodes the JSON body. `route` is the templated path
    /// used in logs; `subject` names the resource in not-found messages.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        route: &'static str,
        subject: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<T> {
        let attempt = || {
            let mut request = self.client.get(url.clone()).header(header::ACCEPT, "application/json");
            if let Some(authorization) = &credentials.authorization {
                request = request.header(header::AUTHORIZATION, authorization);
            }
            if let Some(cookie) = &credentials.cookie {
                request = request.header(header::COOKIE, cookie);
            }
            async move {
                let response = request.send().await.map_err(RequestFailure::Transport)?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(RequestFailure::Status { status, body: truncate(body) });
                }
                response.json::<T>().await.map_err(RequestFailure::Transport)
            }
        };

        execute_with_retry(&self.config.retry, RequestFailure::is_transient, attempt)
            .instrument(backend_fetch_span(route))
            .await
            .map_err(|failure| {
                debug!(route, error = %failure, "backend request failed");
                failure.into_error(route, subject)
            })
    }

    pub async fn project(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<ProjectInfo> {
        let url = self.endpoint(&["project", project_id], &[])?;
        let envelope: ProjectEnvelope =
            self.get_json(url, "/project/{id}", "Project", credentials).await?;
        envelope
            .project
            .ok_or_else(|| DocgenError::not_found(format!("Project '{project_id}' not found")))
    }

    pub async fn tasks(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Vec<Task>> {
        let url = self.endpoint(&["tasks", project_id], &[])?;
        let envelope: TasksEnvelope =
            self.get_json(url, "/tasks/{id}", "Project tasks", credentials).await?;
        Ok(envelope.tasks.unwrap_or_default())
    }

    pub async fn sprints(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Vec<Sprint>> {
        let url = self.endpoint(&["sprint", project_id], &[])?;
        let envelope: SprintsEnvelope =
            self.get_json(url, "/sprint/{id}", "Project sprints", credentials).await?;
        Ok(envelope.sprints.unwrap_or_default())
    }

    pub async fn members(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Vec<Member>> {
        let url = self.endpoint(&["projectMember", project_id], &[])?;
        let envelope: MembersEnvelope =
            self.get_json(url, "/projectMember/{id}", "Project members", credentials).await?;
        Ok(envelope.members.unwrap_or_default())
    }

    /// Detailed record of one sprint. A body carrying neither `sprint` nor
    /// `success` means the sprint does not exist.
    pub async fn sprint_detail(
        &self,
        sprint_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Option<Sprint>> {
        let url = self.endpoint(&["sprint", "sprint", sprint_id], &[])?;
        let envelope: SprintEnvelope =
            self.get_json(url, "/sprint/sprint/{id}", "Sprint", credentials).await?;
        match envelope {
            SprintEnvelope { sprint: Some(sprint), .. } => Ok(Some(sprint)),
            SprintEnvelope { success: Some(true), .. } => Ok(None),
            _ => Err(DocgenError::not_found(format!("Sprint '{sprint_id}' not found"))),
        }
    }

    pub async fn activity(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Vec<ActivityLog>> {
        let query = [
            ("project", project_id.to_string()),
            ("limit", self.config.activity_limit.to_string()),
        ];
        let url = self.endpoint(&["activity-logs"], &query)?;
        let envelope: ActivityEnvelope =
            self.get_json(url, "/activity-logs", "Activity logs", credentials).await?;
        Ok(envelope.activity_logs.unwrap_or_default())
    }

    pub async fn blockers(
        &self,
        project_id: &str,
        credentials: &ForwardedCredentials,
    ) -> Result<Vec<Blocker>> {
        let query = [("projectId", project_id.to_string()), ("resolved", "false".to_string())];
        let url = self.endpoint(&["blockers"], &query)?;
        let envelope: BlockersEnvelope =
            self.get_json(url, "/blockers", "Blockers", credentials).await?;
        Ok(envelope.blockers.unwrap_or_default())
    }
}

/// Supplementary data never fails the request.
fn best_effort<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, "{what} unavailable; continuing without them");
        T::default()
    })
}

#[async_trait]
impl ContextSource for BackendClient {
    async fn fetch(
        &self,
        project_id: &str,
        sprint_id: Option<&str>,
        credentials: &ForwardedCredentials,
    ) -> Result<ProjectContext> {
        let sprint_detail = async {
            match sprint_id {
                Some(id) => self.sprint_detail(id, credentials).await,
                None => Ok(None),
            }
        };
        let activity = async {
            Ok::<_, DocgenError>(best_effort(self.activity(project_id, credentials).await, "activity logs"))
        };
        let blockers = async {
            Ok::<_, DocgenError>(best_effort(self.blockers(project_id, credentials).await, "blockers"))
        };

        let (project, tasks, sprints, members, sprint_detail, activity, blockers) = tokio::try_join!(
            self.project(project_id, credentials),
            self.tasks(project_id, credentials),
            self.sprints(project_id, credentials),
            self.members(project_id, credentials),
            sprint_detail,
            activity,
            blockers,
        )?;

        debug!(
            tasks = tasks.len(),
            sprints = sprints.len(),
            members = members.len(),
            "project context fetched"
        );

        let parts = ContextParts { project, tasks, sprints, members, activity, blockers, sprint_detail };
        Ok(ProjectContext::assemble(project_id, sprint_id.map(str::to_string), parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(BackendConfig::new(base)).unwrap()
    }

    #[test]
    fn endpoints_join_and_escape_segments() {
        let backend = client("http://localhost:5000/api/");
        let url = backend.endpoint(&["sprint", "sprint", "s 1/2"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/sprint/sprint/s%201%2F2");

        let url = backend
            .endpoint(&["blockers"], &[("projectId", "p1".into()), ("resolved", "false".into())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/blockers?projectId=p1&resolved=false");
    }

    #[test]
    fn base_without_trailing_slash() {
        let url = client("http://backend:5000/api").endpoint(&["tasks", "p1"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://backend:5000/api/tasks/p1");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = BackendClient::new(BackendConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, DocgenError::Config(_)));
    }

    #[test]
    fn status_mapping() {
        let status = |code: u16| RequestFailure::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: "boom".into(),
        };
        assert!(matches!(
            status(401).into_error("/project/{id}", "Project"),
            DocgenError::Auth { forbidden: false, .. }
        ));
        assert!(matches!(
            status(403).into_error("/project/{id}", "Project"),
            DocgenError::Auth { forbidden: true, .. }
        ));
        assert!(matches!(status(404).into_error("/project/{id}", "Project"), DocgenError::NotFound(_)));
        let err = status(500).into_error("/tasks/{id}", "Project tasks");
        assert!(matches!(err, DocgenError::Fetch { timed_out: false, .. }));
        assert!(err.to_string().contains("boom"));
        assert!(!status(503).is_transient());
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = truncate("é".repeat(MAX_ERROR_BODY));
        assert!(body.ends_with("..."));
        assert!(body.len() <= MAX_ERROR_BODY + 3);
    }
}
