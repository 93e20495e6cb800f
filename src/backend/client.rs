use crate::logic::{compute_winners, prefer_backend_placeholders};
use crate::models::{Round, RoundFormat, RoundId, Team, TournamentId};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Unauthorized(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(url) => write!(f, "Not found: {url}"),
            ApiError::Unauthorized(url) => write!(f, "Unauthorized: {url}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Supplies a fresh access token after the backend rejected the current one.
pub trait TokenRefresh: Send + Sync {
    fn refresh(&self) -> Option<String>;
}

impl<F> TokenRefresh for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn refresh(&self) -> Option<String> {
        self()
    }
}

#[derive(Serialize)]
struct SelectTypeBody {
    #[serde(rename = "type")]
    format: RoundFormat,
}

/// Client for the tournament backend's REST API.
///
/// Requests carry the current bearer token, if any. On a 401 the token refresher (if set) is
/// asked for a new token and the request is retried once.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: Arc<RwLock<Option<String>>>,
    refresher: Option<Arc<dyn TokenRefresh>>,
}

impl BackendClient {
    /// A client for the backend at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("tournament-bracket-web/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            token: Arc::new(RwLock::new(None)),
            refresher: None,
        }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn with_token_refresh(mut self, refresher: impl TokenRefresh + 'static) -> Self {
        self.refresher = Some(Arc::new(refresher));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|g| g.clone())
    }

    /// `GET /api/tournaments/{id}/rounds/value/{roundValue}`
    pub async fn fetch_round(
        &self,
        tournament_id: TournamentId,
        round_value: u32,
    ) -> ApiResult<Round> {
        let url = format!(
            "{}/api/tournaments/{tournament_id}/rounds/value/{round_value}",
            self.base_url
        );
        self.get_json(&url).await
    }

    /// `GET /api/teams/dummy/tournament/{tid}/round/{roundNumber}`. A round without persisted
    /// placeholders yields an empty list.
    pub async fn fetch_placeholder_teams(
        &self,
        tournament_id: TournamentId,
        round_number: u32,
    ) -> ApiResult<Vec<Team>> {
        let url = format!(
            "{}/api/teams/dummy/tournament/{tournament_id}/round/{round_number}",
            self.base_url
        );
        match self.get_json::<Vec<Team>>(&url).await {
            Ok(teams) => Ok(teams
                .into_iter()
                .map(|t| Team {
                    is_placeholder: true,
                    ..t
                })
                .collect()),
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// `POST /api/tournaments/rounds/{roundId}/select-type`: the backend generates the round's
    /// matches for `format`.
    pub async fn select_round_type(&self, round_id: RoundId, format: RoundFormat) -> ApiResult<()> {
        if format == RoundFormat::Unset {
            return Err(ApiError::Other("a round format must be chosen".into()));
        }
        let url = format!(
            "{}/api/tournaments/rounds/{round_id}/select-type",
            self.base_url
        );
        let body = SelectTypeBody { format };
        self.send(&url, |c| c.post(&url).json(&body)).await?;
        Ok(())
    }

    /// Fetch a round and compute who advances from it, preferring the placeholders the backend
    /// persisted for the following round (`round_number + 1`).
    pub async fn fetch_advancers(
        &self,
        tournament_id: TournamentId,
        round_value: u32,
        round_number: u32,
    ) -> ApiResult<Vec<Team>> {
        let round = self.fetch_round(tournament_id, round_value).await?;
        let local = compute_winners(&round).map_err(|e| ApiError::Other(e.to_string()))?;
        if !local.iter().any(|t| t.is_placeholder) {
            return Ok(local);
        }
        let persisted = self
            .fetch_placeholder_teams(tournament_id, round_number + 1)
            .await?;
        Ok(prefer_backend_placeholders(&local, &persisted))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.send(url, |c| c.get(url)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    async fn send<F>(&self, url: &str, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut response = self.execute(url, &build).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = self.refresher.as_ref().and_then(|r| r.refresh()) {
                log::debug!("Access token rejected for {url}, retrying with a refreshed token");
                self.set_token(Some(token));
                response = self.execute(url, &build).await?;
            }
        }

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(url.to_owned())),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.to_owned())),
            _ => response
                .error_for_status()
                .map_err(|e| ApiError::Api(e, url.to_owned())),
        }
    }

    async fn execute<F>(&self, url: &str, build: &F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut request = build(&self.client).timeout(self.timeout);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))
    }
}
