//! GraphQL discovery queries.
//!
//! One fragment fetches every signal the grader needs for a repository in a
//! single round trip; the organization query pages through it, the
//! repository query fetches it once.

use gradebot_core::{HostingError, IdentifierLookup, RepositoryMetadata, TreeEntry};
use serde::{Deserialize, Serialize, de::IgnoredAny};

const REPOSITORY_FRAGMENT: &str = r#"
fragment GradedRepository on Repository {
  name
  owner { login }
  defaultBranchRef { name }
  licenseInfo { name }
  hasGitignore: object(expression: "HEAD:.gitignore") { id }
  rootTree: object(expression: "HEAD:") {
    ... on Tree { entries { name type } }
  }
  reportJson: object(expression: $reportExpression) {
    ... on Blob { text }
  }
  refs(refPrefix: "refs/heads/", first: 100) { nodes { name } }
  identifierFile: object(expression: $identifierExpression) {
    ... on Blob { text }
  }
  pullRequests(states: OPEN) { totalCount }
}
"#;

const ORGANIZATION_QUERY: &str = r"
query($org: String!, $cursor: String, $first: Int!, $reportExpression: String!, $identifierExpression: String!) {
  organization(login: $org) {
    repositories(first: $first, after: $cursor) {
      pageInfo { hasNextPage endCursor }
      nodes { ...GradedRepository }
    }
  }
}
";

const REPOSITORY_QUERY: &str = r"
query($owner: String!, $name: String!, $reportExpression: String!, $identifierExpression: String!) {
  repository(owner: $owner, name: $name) { ...GradedRepository }
}
";

/// Full text of the organization page query.
pub fn organization_query() -> String {
    format!("{ORGANIZATION_QUERY}{REPOSITORY_FRAGMENT}")
}

/// Full text of the single repository query.
pub fn repository_query() -> String {
    format!("{REPOSITORY_QUERY}{REPOSITORY_FRAGMENT}")
}

/// Git object expressions shared by both queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expressions {
    /// `HEAD:<report path>`.
    pub report: String,
    /// `<target branch>:<identifier path>`.
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: String,
    pub variables: V,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationVariables<'a> {
    pub org: &'a str,
    pub cursor: Option<&'a str>,
    pub first: u32,
    pub report_expression: &'a str,
    pub identifier_expression: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub report_expression: &'a str,
    pub identifier_expression: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap `data`, turning top-level errors into [`HostingError`].
    ///
    /// Partial results (data plus errors) are accepted and the errors logged.
    pub fn into_data(self, what: &str) -> Result<T, HostingError> {
        match self.data {
            Some(data) => {
                for error in &self.errors {
                    tracing::warn!(what, message = %error.message, "partial GraphQL result");
                }
                Ok(data)
            }
            None => Err(self.errors.into_iter().next().map_or_else(
                || HostingError::Parse(format!("{what}: response had neither data nor errors")),
                |error| match error.kind.as_deref() {
                    Some("NOT_FOUND") => HostingError::NotFound(what.to_string()),
                    _ => HostingError::Api {
                        status: 200,
                        message: error.message,
                    },
                },
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganizationData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub page_info: PageInfo,
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Login {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TreeObject {
    #[serde(default)]
    entries: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct BlobObject {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    name: String,
    owner: Login,
    default_branch_ref: Option<Named>,
    license_info: Option<Named>,
    has_gitignore: Option<IgnoredAny>,
    root_tree: Option<TreeObject>,
    report_json: Option<BlobObject>,
    refs: Option<Nodes<Named>>,
    identifier_file: Option<BlobObject>,
    pull_requests: TotalCount,
}

impl RepositoryNode {
    pub fn into_metadata(self) -> RepositoryMetadata {
        RepositoryMetadata {
            owner: self.owner.login,
            name: self.name,
            default_branch: self.default_branch_ref.map(|r| r.name),
            license_name: self.license_info.map(|l| l.name),
            has_gitignore_blob: self.has_gitignore.is_some(),
            root_entries: self.root_tree.map(|t| t.entries).unwrap_or_default(),
            branches: self
                .refs
                .map(|r| r.nodes.into_iter().map(|n| n.name).collect())
                .unwrap_or_default(),
            open_pull_requests: self.pull_requests.total_count,
            identifier: IdentifierLookup::from_blob(self.identifier_file.and_then(|b| b.text)),
            existing_report: self.report_json.and_then(|b| b.text),
        }
    }
}
