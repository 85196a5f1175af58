//! GitHub response status handling.

use gradebot_core::HostingError;

/// Check a GitHub response for error statuses.
///
/// - **404** → [`HostingError::NotFound`] naming `what`
/// - **409** → [`HostingError::Conflict`] (stale blob sha on a contents write)
/// - **429**, or **403** with an exhausted rate limit → [`HostingError::RateLimited`]
/// - any other non-success → [`HostingError::Api`]
pub async fn check_response(
    resp: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, HostingError> {
    let status = resp.status().as_u16();
    if resp.status().is_success() {
        return Ok(resp);
    }
    if status == 429 || (status == 403 && rate_limit_exhausted(&resp)) {
        return Err(HostingError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    let message = resp.text().await.unwrap_or_default();
    Err(match status {
        404 => HostingError::NotFound(what.to_string()),
        409 => HostingError::Conflict(format!("{what}: {message}")),
        _ => HostingError::Api { status, message },
    })
}

/// Map a transport failure into the hosting error space.
#[allow(clippy::needless_pass_by_value)]
pub fn transport(error: reqwest::Error) -> HostingError {
    HostingError::Transport(error.to_string())
}

fn rate_limit_exhausted(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock(status: u16, headers: &[(&str, &str)]) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        reqwest::Response::from(builder.body(String::from("body")).unwrap())
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let err = check_response(mock(404, &[]), "report.json").await.unwrap_err();
        assert!(matches!(err, HostingError::NotFound(ref what) if what == "report.json"));
    }

    #[tokio::test]
    async fn conflict_is_distinguishable() {
        let err = check_response(mock(409, &[]), "report.json").await.unwrap_err();
        assert!(matches!(err, HostingError::Conflict(_)));
    }

    #[tokio::test]
    async fn exhausted_quota_is_rate_limited() {
        let err = check_response(
            mock(403, &[("x-ratelimit-remaining", "0"), ("retry-after", "15")]),
            "graphql",
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            HostingError::RateLimited {
                retry_after_secs: 15
            }
        ));
    }

    #[tokio::test]
    async fn plain_forbidden_is_api_error() {
        let err = check_response(mock(403, &[]), "repo").await.unwrap_err();
        assert!(matches!(err, HostingError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock(201, &[]), "repo").await.is_ok());
    }
}
