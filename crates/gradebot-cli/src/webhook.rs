//! Webhook endpoint.
//!
//! `POST /` takes a repository event, either wrapped as
//! `{"payload": "<event json>"}` or as the bare event, grades that one
//! repository and answers with its report. `GET /` is a liveness check.

use std::io::Read;

use anyhow::{Context, bail};
use gradebot_core::{ExerciseTracker, HostingPlatform};
use gradebot_pipeline::{Pipeline, PipelineError, RepositoryOutcome, Status};
use serde::Deserialize;
use serde_json::{Value, json};
use tiny_http::Method;
use tokio::runtime::Handle;

use crate::cli::RepoRef;

const RUNNING_MESSAGE: &str = "Server is running. Send POST requests to this endpoint.";
const PROCESSED_MESSAGE: &str = "Event received and processed";

#[derive(Deserialize)]
struct RepositoryEvent {
    repository: EventRepository,
}

#[derive(Deserialize)]
struct EventRepository {
    name: String,
    owner: EventOwner,
}

#[derive(Deserialize)]
struct EventOwner {
    login: String,
}

/// Status code and JSON body of one webhook response.
#[derive(Debug, Clone, PartialEq)]
struct Reply {
    status: u16,
    body: Value,
}

impl Reply {
    fn running() -> Self {
        Self {
            status: 200,
            body: json!({ "message": RUNNING_MESSAGE }),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn from_outcome(result: Result<RepositoryOutcome, PipelineError>) -> Self {
        match result {
            Ok(RepositoryOutcome { report, status }) => match status {
                Status::Created | Status::Updated | Status::Unchanged => Self {
                    status: 200,
                    body: json!({ "message": PROCESSED_MESSAGE, "result": report }),
                },
                Status::TrackerFailed { error } | Status::Failed { error } => Self {
                    status: 500,
                    body: json!({ "error": error, "result": report }),
                },
            },
            Err(error) => Self::error(500, &format!("{error:#}")),
        }
    }
}

/// Extract the repository an event refers to.
///
/// # Errors
///
/// Fails when the body is not JSON, `payload` is not a string, or the event
/// lacks `repository.name` / `repository.owner.login`.
pub fn parse_event(body: &str) -> anyhow::Result<RepoRef> {
    let envelope: Value = serde_json::from_str(body).context("body is not valid JSON")?;
    let event: RepositoryEvent = match envelope.get("payload") {
        Some(Value::String(payload)) => {
            serde_json::from_str(payload).context("payload is not a repository event")?
        }
        Some(_) => bail!("payload must be a JSON-encoded string"),
        None => serde_json::from_value(envelope).context("body is not a repository event")?,
    };
    Ok(RepoRef {
        owner: event.repository.owner.login,
        name: event.repository.name,
    })
}

/// Accept requests until the server shuts down.
///
/// Blocks the calling thread; grading futures run on `runtime`.
pub fn serve<H, T>(server: &tiny_http::Server, pipeline: &Pipeline<H, T>, runtime: &Handle)
where
    H: HostingPlatform,
    T: ExerciseTracker,
{
    for request in server.incoming_requests() {
        handle_request(request, pipeline, runtime);
    }
    tracing::info!("webhook server stopped");
}

/// Route one request and send its response.
pub fn handle_request<H, T>(mut request: tiny_http::Request, pipeline: &Pipeline<H, T>, runtime: &Handle)
where
    H: HostingPlatform,
    T: ExerciseTracker,
{
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = route(&method, &url, &mut request, pipeline, runtime);
    tracing::info!(%method, url = %url, status = reply.status, "webhook request");

    let mut response =
        tiny_http::Response::from_string(reply.body.to_string()).with_status_code(reply.status);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", "application/json") {
        response.add_header(header);
    }
    if let Err(error) = request.respond(response) {
        tracing::warn!(%error, "failed to send webhook response");
    }
}

fn route<H, T>(
    method: &Method,
    url: &str,
    request: &mut tiny_http::Request,
    pipeline: &Pipeline<H, T>,
    runtime: &Handle,
) -> Reply
where
    H: HostingPlatform,
    T: ExerciseTracker,
{
    if url.split('?').next() != Some("/") {
        return Reply::error(404, "not found");
    }

    match method {
        Method::Get => Reply::running(),
        Method::Post => {
            let mut body = String::new();
            if let Err(error) = request.as_reader().read_to_string(&mut body) {
                return Reply::error(400, &format!("failed to read body: {error}"));
            }
            let repo = match parse_event(&body) {
                Ok(repo) => repo,
                Err(error) => {
                    tracing::warn!(error = %format!("{error:#}"), "rejected webhook event");
                    return Reply::error(400, &format!("{error:#}"));
                }
            };
            tracing::info!(%repo, "event received");
            Reply::from_outcome(runtime.block_on(pipeline.grade_repository(&repo.owner, &repo.name)))
        }
        _ => Reply::error(405, "method not allowed"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::TcpStream;

    use async_trait::async_trait;
    use gradebot_core::{
        FileWrite, HostingError, IdentifierLookup, RemoteFile, RepositoryMetadata, TrackerError,
        TreeEntry,
    };
    use gradebot_pipeline::PipelineSettings;
    use pretty_assertions::assert_eq;

    use super::*;

    struct OneRepo;

    #[async_trait]
    impl HostingPlatform for OneRepo {
        async fn list_repositories(
            &self,
            _org: &str,
        ) -> Result<Vec<RepositoryMetadata>, HostingError> {
            Ok(Vec::new())
        }

        async fn get_repository(
            &self,
            owner: &str,
            name: &str,
        ) -> Result<RepositoryMetadata, HostingError> {
            if name != "git-alice" {
                return Err(HostingError::NotFound(format!("{owner}/{name}")));
            }
            Ok(RepositoryMetadata {
                owner: owner.into(),
                name: name.into(),
                default_branch: Some("main".into()),
                root_entries: vec![
                    TreeEntry::blob(".gitignore"),
                    TreeEntry::blob("LICENSE"),
                    TreeEntry::blob("README.md"),
                ],
                branches: vec!["main".into(), "task_01".into()],
                open_pull_requests: 1,
                identifier: IdentifierLookup::Found("alice@example.com\n".into()),
                ..RepositoryMetadata::default()
            })
        }

        async fn get_file(
            &self,
            _owner: &str,
            _repo: &str,
            path: &str,
            _git_ref: &str,
        ) -> Result<RemoteFile, HostingError> {
            Err(HostingError::NotFound(path.into()))
        }

        async fn create_file(
            &self,
            _owner: &str,
            _repo: &str,
            _write: &FileWrite,
        ) -> Result<(), HostingError> {
            Ok(())
        }

        async fn update_file(
            &self,
            _owner: &str,
            _repo: &str,
            _write: &FileWrite,
            _sha: &str,
        ) -> Result<(), HostingError> {
            Ok(())
        }
    }

    struct PassedFork;

    #[async_trait]
    impl ExerciseTracker for PassedFork {
        async fn fetch_passed_exercises(&self, _hash: &str) -> Result<Vec<String>, TrackerError> {
            Ok(vec!["chase-branch".into(), "fix-typo".into()])
        }
    }

    fn exchange(raw_request: String) -> (u16, Value) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let pipeline = Pipeline::new(OneRepo, PassedFork, PipelineSettings::default());
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();

        let client = std::thread::spawn(move || {
            let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
            stream.write_all(raw_request.as_bytes()).unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        let request = server.recv().unwrap();
        handle_request(request, &pipeline, runtime.handle());
        drop(server);

        let response = client.join().unwrap();
        let status = response
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .unwrap();
        let body = response.split("\r\n\r\n").nth(1).unwrap_or_default();
        (status, serde_json::from_str(body).unwrap())
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    fn post(body: &str) -> String {
        format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn parses_wrapped_payload() {
        let body = json!({
            "payload": r#"{"repository": {"name": "git-alice", "owner": {"login": "pro-classroom"}}}"#
        })
        .to_string();
        let repo = parse_event(&body).unwrap();
        assert_eq!(repo.owner, "pro-classroom");
        assert_eq!(repo.name, "git-alice");
    }

    #[test]
    fn parses_bare_event() {
        let body = r#"{"action": "opened", "repository": {"name": "git-bob", "owner": {"login": "org"}}}"#;
        assert_eq!(parse_event(body).unwrap().to_string(), "org/git-bob");
    }

    #[test]
    fn rejects_malformed_events() {
        assert!(parse_event("not json").is_err());
        assert!(parse_event(r#"{"payload": {"repository": {}}}"#).is_err());
        assert!(parse_event(r#"{"payload": "{\"zen\": \"hi\"}"}"#).is_err());
        assert!(parse_event(r#"{"repository": {"name": "x"}}"#).is_err());
    }

    #[test]
    fn outcome_failures_map_to_500() {
        let err = PipelineError::Hosting {
            repo: "org/ghost".into(),
            source: HostingError::NotFound("org/ghost".into()),
        };
        let reply = Reply::from_outcome(Err(err));
        assert_eq!(reply.status, 500);
        assert!(reply.body["error"].as_str().unwrap().contains("org/ghost"));
    }

    #[test]
    fn get_reports_running() {
        let (status, body) = exchange(get("/"));
        assert_eq!(status, 200);
        assert_eq!(body["message"], RUNNING_MESSAGE);
    }

    #[test]
    fn post_grades_the_repository() {
        let payload = json!({
            "payload": r#"{"repository": {"name": "git-alice", "owner": {"login": "pro-classroom"}}}"#
        })
        .to_string();
        let (status, body) = exchange(post(&payload));

        assert_eq!(status, 200);
        assert_eq!(body["message"], PROCESSED_MESSAGE);
        assert_eq!(body["result"]["repo"], "git-alice");
        assert_eq!(body["result"]["grade"], 2.0);
        assert_eq!(body["result"]["email"], "alice@example.com");
    }

    #[test]
    fn post_with_bad_body_is_400() {
        let (status, body) = exchange(post(r#"{"payload": 42}"#));
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
    }

    #[test]
    fn unknown_repository_is_500() {
        let payload = json!({
            "payload": r#"{"repository": {"name": "ghost", "owner": {"login": "pro-classroom"}}}"#
        })
        .to_string();
        let (status, _) = exchange(post(&payload));
        assert_eq!(status, 500);
    }

    #[test]
    fn other_paths_are_404() {
        let (status, _) =
            exchange(get("/favicon.ico"));
        assert_eq!(status, 404);
    }
}
