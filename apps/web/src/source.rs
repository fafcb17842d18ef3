use market_core::error::backend_message;
use market_core::query::EDITIONS_TABLE;
use market_core::{
    EditionFilter, EditionRow, Embed, MarketSource, PlaceRow, QueryError, RecordId, RestRequest,
    SnapshotSource,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Exported tables served next to the page when no backend is configured.
pub const SNAPSHOT_FILE: &str = "markets.json";

/// PostgREST from the browser.
#[derive(Debug, Clone)]
pub struct FetchSource {
    base_url: String,
    anon_key: String,
}

impl FetchSource {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Backend baked in at build time, if both values were set.
    pub fn from_build_env() -> Option<Self> {
        let url = option_env!("SUPABASE_URL").or(option_env!("VITE_SUPABASE_URL"))?;
        let key = option_env!("SUPABASE_ANON_KEY").or(option_env!("VITE_SUPABASE_ANON_KEY"))?;
        Some(Self::new(url, key))
    }

    async fn get<T>(&self, request: &RestRequest) -> Result<Vec<T>, QueryError>
    where
        T: DeserializeOwned,
    {
        let table = request.table;
        let url = format!(
            "{}?{}",
            request.endpoint(&self.base_url),
            query_string(&request.params, |value| {
                String::from(js_sys::encode_uri_component(value))
            })
        );

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let fetch_request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| QueryError::transport(table, js_message(&e)))?;
        let headers = fetch_request.headers();
        for (name, value) in [
            ("apikey", self.anon_key.clone()),
            ("Authorization", format!("Bearer {}", self.anon_key)),
            ("Accept", "application/json".to_string()),
        ] {
            headers
                .set(name, &value)
                .map_err(|e| QueryError::transport(table, js_message(&e)))?;
        }

        let (status, ok, body) = fetch_text(&fetch_request)
            .await
            .map_err(|e| QueryError::transport(table, js_message(&e)))?;
        if !ok {
            return Err(QueryError::rejected(table, status, backend_message(&body)));
        }
        serde_json::from_str(&body).map_err(|e| QueryError::decode(table, e))
    }
}

impl MarketSource for FetchSource {
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

/// Whichever source the page ended up with.
#[derive(Debug, Clone)]
pub enum WebSource {
    Rest(FetchSource),
    Snapshot(SnapshotSource),
}

impl WebSource {
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Rest(_) => "hosted",
            Self::Snapshot(_) => "snapshot",
        }
    }

    /// The build-time backend, or the snapshot file when there is none.
    pub async fn resolve() -> Result<Self, QueryError> {
        if let Some(source) = FetchSource::from_build_env() {
            return Ok(Self::Rest(source));
        }

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);
        let request = Request::new_with_str_and_init(SNAPSHOT_FILE, &opts)
            .map_err(|e| QueryError::transport(EDITIONS_TABLE, js_message(&e)))?;

        let (status, ok, body) = fetch_text(&request)
            .await
            .map_err(|e| QueryError::transport(EDITIONS_TABLE, js_message(&e)))?;
        if !ok {
            return Err(QueryError::NotConfigured(format!(
                "no backend was built in and {SNAPSHOT_FILE} answered {status}"
            )));
        }
        SnapshotSource::from_json(&body).map(Self::Snapshot)
    }
}

impl MarketSource for WebSource {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError> {
        match self {
            Self::Rest(source) => source.editions(filter, embed).await,
            Self::Snapshot(source) => source.editions(filter, embed).await,
        }
    }

    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError> {
        match self {
            Self::Rest(source) => source.edition_detail(id).await,
            Self::Snapshot(source) => source.edition_detail(id).await,
        }
    }

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError> {
        match self {
            Self::Rest(source) => source.active_places().await,
            Self::Snapshot(source) => source.active_places().await,
        }
    }
}

/// Runs `request` and returns (status, ok, body text).
async fn fetch_text(request: &Request) -> Result<(u16, bool, String), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(request))
        .await?
        .dyn_into()?;
    let body = JsFuture::from(response.text()?).await?;
    Ok((
        response.status(),
        response.ok(),
        body.as_string().unwrap_or_default(),
    ))
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Joins query parameters, encoding each value with `encode`.
fn query_string(params: &[(String, String)], encode: impl Fn(&str) -> String) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::DateWindow;

    #[test]
    fn query_string_keeps_repeated_keys_in_order() {
        let window = DateWindow::new(
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        let request = RestRequest::editions(&EditionFilter::starting_within(window), Embed::Market);

        let query = query_string(&request.params, str::to_string);

        assert!(query.starts_with("select="));
        assert!(query.contains("start_date=gte.2025-01-01&start_date=lte.2025-01-31"));
        assert!(query.contains("is_active=eq.true"));
    }

    #[test]
    fn query_string_applies_the_encoder() {
        let params = vec![("select".to_string(), "id,name".to_string())];
        let query = query_string(&params, |value| value.replace(',', "%2C"));
        assert_eq!(query, "select=id%2Cname");
    }
}
