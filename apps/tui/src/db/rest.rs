use market_core::error::backend_message;
use market_core::{
    EditionFilter, EditionRow, Embed, MarketSource, PlaceRow, QueryError, RecordId, RestRequest,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Read-only client for the hosted market tables.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a GET request for `request` and decodes the row array
    async fn get<T>(&self, request: &RestRequest) -> Result<Vec<T>, QueryError>
    where
        T: DeserializeOwned,
    {
        let url = request.endpoint(&self.base_url);
        tracing::debug!(%url, params = ?request.params, "GET");

        let response = self
            .client
            .get(&url)
            .query(&request.params)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| QueryError::transport(request.table, e))?;

        Self::handle_response(request.table, response).await
    }

    /// Deserializes a success body, or turns the error body into a
    /// [`QueryError::Rejected`]
    async fn handle_response<T>(table: &str, response: Response) -> Result<Vec<T>, QueryError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| QueryError::decode(table, e))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(QueryError::rejected(
                table,
                status.as_u16(),
                backend_message(&body),
            ))
        }
    }
}

impl MarketSource for RestSource {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError> {
        self.get(&RestRequest::editions(filter, embed)).await
    }

    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError> {
        let rows: Vec<EditionRow> = self.get(&RestRequest::edition_detail(id)).await?;
        Ok(rows.into_iter().next())
    }

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError> {
        self.get(&RestRequest::active_places()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::query::PLACES_TABLE;

    #[test]
    fn endpoints_live_under_rest_v1() {
        let source = RestSource::new("https://demo.supabase.co", "anon");
        let request = RestRequest::active_places();

        assert_eq!(
            request.endpoint(source.base_url()),
            format!("https://demo.supabase.co/rest/v1/{PLACES_TABLE}")
        );
    }
}
