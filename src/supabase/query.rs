//! PostgREST select builder.

use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ClientError, SupabaseClient};

/// A pending `GET /rest/v1/<table>` request.
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
}

impl<'a> QueryBuilder<'a> {
    pub(super) fn new(client: &'a SupabaseClient, table: &str) -> Self {
        Self { client, table: table.to_string(), columns: "*".to_string(), filters: Vec::new() }
    }

    /// Restrict the returned columns. Whitespace is stripped.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        let cleaned: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.columns = if cleaned.is_empty() { "*".to_string() } else { cleaned };
        self
    }

    /// Keep only rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// The URL this query will request.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn url(&self) -> Result<Url, ClientError> {
        build_url(&self.client.rest_url, &self.table, &self.columns, &self.filters)
    }

    /// Send the query and decode the JSON array of rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// body that does not decode into `T` rows.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, ClientError> {
        let url = self.url()?;
        tracing::debug!(table = %self.table, %url, "postgrest select");

        let response = self
            .client
            .http
            .get(url)
            .header("apikey", &self.client.anon_key)
            .bearer_auth(self.client.bearer_token())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !status.is_success() {
            let err = api_error(status, &text);
            tracing::warn!(table = %self.table, status = status.as_u16(), error = %err, "postgrest error");
            return Err(err);
        }
        parse_rows(&text)
    }
}

pub(crate) fn build_url(
    rest_url: &str,
    table: &str,
    columns: &str,
    filters: &[(String, String)],
) -> Result<Url, ClientError> {
    let mut url = Url::parse(rest_url).map_err(|e| ClientError::InvalidUrl(format!("{rest_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(format!("{rest_url}: cannot be a base")))?
        .pop_if_empty()
        .push(table);
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("select", columns);
        for (column, filter) in filters {
            query.append_pair(column, filter);
        }
    }
    Ok(url)
}

pub(crate) fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ClientError> {
    serde_json::from_str::<Vec<T>>(body).map_err(|e| ClientError::Parse(e.to_string()))
}

#[derive(Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Convert a non-success response into [`ClientError::Api`]. The message is
/// never empty.
pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    let parsed = serde_json::from_str::<PostgrestErrorBody>(body).ok();
    if let Some(PostgrestErrorBody { details, hint, .. }) = &parsed {
        tracing::debug!(?details, ?hint, "postgrest error detail");
    }
    let message = parsed
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {reason}", status.as_u16()),
            None => format!("HTTP {}", status.as_u16()),
        });
    ClientError::Api { status: status.as_u16(), message }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
