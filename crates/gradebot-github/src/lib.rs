//! # gradebot-github
//!
//! GitHub client implementing [`HostingPlatform`] for gradebot.
//!
//! - Discovery goes through the GraphQL API: one paginated organization query
//!   returns every signal the grader needs per repository (license, root tree,
//!   branches, open pull request count, identifier file, current report).
//! - Reads and writes of single files use the REST contents API.

mod contents;
mod graphql;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use gradebot_core::{
    FileWrite, GradingRules, HostingError, HostingPlatform, RemoteFile, RepositoryMetadata,
};
use serde::de::DeserializeOwned;

use crate::contents::{AuthenticatedUser, ContentFile, PutContents};
use crate::graphql::{
    Expressions, GraphQlRequest, GraphQlResponse, OrganizationData, OrganizationVariables,
    RepositoryData, RepositoryVariables,
};
use crate::http::{check_response, transport};

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    page_size: u32,
    expressions: Expressions,
}

impl GithubClient {
    /// Create a client for `api_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, HostingError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gradebot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        let mut client = Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            page_size: 50,
            expressions: Expressions {
                report: String::new(),
                identifier: String::new(),
            },
        };
        client.set_paths(&GradingRules::default(), "report.json");
        Ok(client)
    }

    /// Repositories requested per discovery page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Paths of the identifier and report files fetched during discovery.
    #[must_use]
    pub fn with_paths(mut self, rules: &GradingRules, report_path: &str) -> Self {
        self.set_paths(rules, report_path);
        self
    }

    fn set_paths(&mut self, rules: &GradingRules, report_path: &str) {
        self.expressions = Expressions {
            report: format!("HEAD:{report_path}"),
            identifier: format!("{}:{}", rules.target_branch, rules.identifier_path),
        };
    }

    /// Login of the account the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError`] if the request fails or the token is rejected.
    pub async fn authenticated_login(&self) -> Result<String, HostingError> {
        let url = format!("{}/user", self.api_url);
        let resp = check_response(self.get(&url).send().await.map_err(transport)?, "user").await?;
        let user: AuthenticatedUser = resp.json().await.map_err(transport)?;
        Ok(user.login)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.authorized(self.http.get(url))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        let encoded_path: Vec<_> = path
            .trim_start_matches('/')
            .split('/')
            .map(urlencoding::encode)
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            encoded_path.join("/")
        )
    }

    /// Contents URL pinned to `git_ref`.
    fn file_url(&self, owner: &str, repo: &str, path: &str, git_ref: &str) -> String {
        format!(
            "{}?ref={}",
            self.contents_url(owner, repo, path),
            urlencoding::encode(git_ref)
        )
    }

    async fn graphql<V, T>(
        &self,
        request: &GraphQlRequest<V>,
        what: &str,
    ) -> Result<T, HostingError>
    where
        V: serde::Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = format!("{}/graphql", self.api_url);
        let resp = self
            .authorized(self.http.post(&url))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let resp = check_response(resp, what).await?;
        let body: GraphQlResponse<T> = resp
            .json()
            .await
            .map_err(|e| HostingError::Parse(format!("{what}: {e}")))?;
        body.into_data(what)
    }

    async fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
        sha: Option<&str>,
    ) -> Result<(), HostingError> {
        let url = self.contents_url(owner, repo, &write.path);
        let resp = self
            .authorized(self.http.put(&url))
            .json(&PutContents::new(write, sha))
            .send()
            .await
            .map_err(transport)?;
        match check_response(resp, &write.path).await {
            Ok(_) => Ok(()),
            // 422 means the sha was missing or did not match a file that now exists.
            Err(HostingError::Api {
                status: 422,
                message,
            }) => Err(HostingError::Conflict(format!("{}: {message}", write.path))),
            Err(error) => Err(error),
        }
    }
}

#[async_trait]
impl HostingPlatform for GithubClient {
    async fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryMetadata>, HostingError> {
        let query = graphql::organization_query();
        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let request = GraphQlRequest {
                query: query.clone(),
                variables: OrganizationVariables {
                    org,
                    cursor: cursor.as_deref(),
                    first: self.page_size,
                    report_expression: &self.expressions.report,
                    identifier_expression: &self.expressions.identifier,
                },
            };
            let data: OrganizationData = self.graphql(&request, org).await?;
            let page = data
                .organization
                .ok_or_else(|| HostingError::NotFound(format!("organization {org}")))?
                .repositories;

            tracing::debug!(org, fetched = page.nodes.len(), "discovery page");
            repositories.extend(page.nodes.into_iter().map(graphql::RepositoryNode::into_metadata));

            match (page.page_info.has_next_page, page.page_info.end_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        tracing::info!(org, total = repositories.len(), "discovered repositories");
        Ok(repositories)
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryMetadata, HostingError> {
        let what = format!("{owner}/{name}");
        let request = GraphQlRequest {
            query: graphql::repository_query(),
            variables: RepositoryVariables {
                owner,
                name,
                report_expression: &self.expressions.report,
                identifier_expression: &self.expressions.identifier,
            },
        };
        let data: RepositoryData = self.graphql(&request, &what).await?;
        data.repository
            .map(graphql::RepositoryNode::into_metadata)
            .ok_or(HostingError::NotFound(what))
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, HostingError> {
        let url = self.file_url(owner, repo, path, git_ref);
        let resp = self.get(&url).send().await.map_err(transport)?;
        let resp = check_response(resp, path).await?;
        let file: ContentFile = resp
            .json()
            .await
            .map_err(|e| HostingError::Parse(format!("{path}: {e}")))?;
        file.into_remote_file(path)
    }

    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<(), HostingError> {
        self.put_contents(owner, repo, write, None).await
    }

    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
        sha: &str,
    ) -> Result<(), HostingError> {
        self.put_contents(owner, repo, write, Some(sha)).await
    }
}
