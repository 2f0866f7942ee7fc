//! Route table and URL templating
//!
//! Endpoints are written with `:name` placeholders (`assistants/threads/:threadId/messages`).
//! [`api_url`] resolves them against a base URL; parameters that are not
//! consumed by a placeholder become the query string.

use crate::error::{RelayError, Result};

/// Mount point of the relay API.
pub const API_BASE: &str = "/api/";
/// Create an assistant.
pub const ASSISTANTS: &str = "assistants";
/// Create a thread.
pub const CREATE_THREAD: &str = "assistants/threads";
/// Post a user message and stream the run.
pub const SEND_MESSAGE: &str = "assistants/threads/:threadId/messages";
/// Submit tool outputs and stream the resumed run.
pub const ACTIONS: &str = "assistants/threads/:threadId/actions";
/// Download a file produced by the assistant.
pub const FILES: &str = "files/:fileId";

const PLACEHOLDER_TOKEN: &str = "/:";

/// Link under which the relay serves a file.
///
/// Image references and resolved annotations in the transcript point here.
pub fn file_link(file_id: &str) -> String {
    format!("{API_BASE}files/{file_id}")
}

/// Router pattern of an endpoint: `assistants/threads/:threadId/messages`
/// becomes `/api/assistants/threads/{threadId}/messages`.
pub fn route_pattern(endpoint: &str) -> String {
    let path = format!("{API_BASE}{}", endpoint.trim_start_matches('/'));
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join `base` and `endpoint`, fill `:placeholders` and append leftover params as a query.
///
/// ```rust,ignore
/// let url = api_url("http://localhost:3091/api/", SEND_MESSAGE, &[("threadId", "thread_1")])?;
/// assert_eq!(url, "http://localhost:3091/api/assistants/threads/thread_1/messages");
/// ```
pub fn api_url(base: &str, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut url = String::with_capacity(base.len() + endpoint.len() + 16);
    url.push_str(base.trim_end_matches('/'));
    url.push('/');
    url.push_str(endpoint.trim_start_matches('/'));

    let mut used: Vec<&str> = Vec::new();
    let template = url.clone();
    for segment in template.split(PLACEHOLDER_TOKEN).skip(1) {
        let key = segment.split('/').next().unwrap_or_default();
        if key.is_empty() {
            continue;
        }
        let value = params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                RelayError::InvalidInput(format!("missing value for route parameter '{key}'"))
            })?;
        url = url.replacen(
            &format!("{PLACEHOLDER_TOKEN}{key}"),
            &format!("/{}", urlencoding::encode(value)),
            1,
        );
        used.push(key);
    }

    let mut first = true;
    for (key, value) in params.iter().filter(|(k, _)| !used.contains(k)) {
        url.push(if first { '?' } else { '&' });
        first = false;
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }

    Ok(url)
}
