//! Single binary web server: fixture lifecycle and bracket computations as a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, ROUND_ROBIN_ADVANCEMENT (placeholders | standings),
//! BACKEND_URL and BACKEND_TOKEN / BACKEND_TOKEN_FILE for the remote winners view.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tournament_bracket_web::backend::BackendClient;
use tournament_bracket_web::{
    advance_round, advancers, import_roster, record_result, resolve_placeholders, round_name,
    select_round_type, set_match_status, standings, start_fixture, total_rounds_for_bracket,
    AdvancementPolicy, Fixture, MatchStatus, RoundFormat, Team, TeamId,
    TournamentId,
};

/// Per-tournament entry: fixture data + last activity time (for auto-cleanup).
struct FixtureEntry {
    fixture: Fixture,
    last_activity: Instant,
}

/// In-memory state: fixtures by tournament id. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, FixtureEntry>>>;

/// Inactivity threshold: fixtures not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Settings read from the environment at startup.
struct Settings {
    policy: AdvancementPolicy,
    backend: Option<BackendClient>,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFixtureBody {
    tournament_id: TournamentId,
    teams: Vec<Team>,
    #[serde(default)]
    shuffle: bool,
}

#[derive(Deserialize)]
struct ShuffleQuery {
    #[serde(default)]
    shuffle: bool,
}

#[derive(Deserialize)]
struct SelectTypeBody {
    #[serde(rename = "type")]
    format: RoundFormat,
}

#[derive(Deserialize)]
struct MatchStatusBody {
    status: MatchStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchResultBody {
    winner_team_id: TeamId,
    #[serde(rename = "team1Score")]
    team_1_score: Option<u32>,
    #[serde(rename = "team2Score")]
    team_2_score: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundNameQuery {
    round_number: u32,
    team_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundNumberQuery {
    round_number: u32,
}

/// Path segment: tournament id (e.g. /api/fixtures/{id})
#[derive(Deserialize)]
struct FixturePath {
    id: TournamentId,
}

/// Path segments: tournament id and round value (e.g. /api/fixtures/{id}/rounds/{round_value})
#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round_value: u32,
}

/// Path segments: tournament id, round value and match position within the round.
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    round_value: u32,
    index: usize,
}

#[derive(Deserialize)]
struct TeamCountPath {
    team_count: usize,
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn no_fixture() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No fixture" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-bracket-web",
    })
}

/// Create a fixture from a team list; its first round has no format yet.
#[post("/api/fixtures")]
async fn api_create_fixture(state: AppState, body: Json<CreateFixtureBody>) -> HttpResponse {
    let body = body.into_inner();
    let fixture = match start_fixture(body.tournament_id, body.teams, body.shuffle) {
        Ok(f) => f,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&fixture);
    g.insert(
        body.tournament_id,
        FixtureEntry {
            fixture,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Create (or replace) a fixture from a CSV roster body with an `id,name` header.
#[post("/api/fixtures/{id}/roster")]
async fn api_import_roster(
    state: AppState,
    path: Path<FixturePath>,
    query: Query<ShuffleQuery>,
    body: String,
) -> HttpResponse {
    let teams = match import_roster(body.as_bytes()) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let fixture = match start_fixture(path.id, teams, query.shuffle) {
        Ok(f) => f,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&fixture);
    g.insert(
        path.id,
        FixtureEntry {
            fixture,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a fixture by tournament id (404 if not found). Touching it refreshes last_activity.
#[get("/api/fixtures/{id}")]
async fn api_get_fixture(state: AppState, path: Path<FixturePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.fixture)
        }
        None => no_fixture(),
    }
}

/// Choose KNOCKOUT or ROUND_ROBIN for a round and generate its matches. Later rounds are dropped.
#[post("/api/fixtures/{id}/rounds/{round_value}/select-type")]
async fn api_select_round_type(
    state: AppState,
    path: Path<RoundPath>,
    body: Json<SelectTypeBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    entry.last_activity = Instant::now();
    let f = &mut entry.fixture;
    match select_round_type(f, path.round_value, body.format) {
        Ok(()) => HttpResponse::Ok().json(f),
        Err(e) => bad_request(e),
    }
}

/// Move one match along SCHEDULED -> ONGOING -> COMPLETED | CANCELLED.
#[put("/api/fixtures/{id}/rounds/{round_value}/matches/{index}/status")]
async fn api_set_match_status(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchStatusBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    entry.last_activity = Instant::now();
    let f = &mut entry.fixture;
    match set_match_status(f, path.round_value, path.index, body.status) {
        Ok(()) => HttpResponse::Ok().json(f),
        Err(e) => bad_request(e),
    }
}

/// Record a match winner (and score); placeholders in the next round are filled in.
#[put("/api/fixtures/{id}/rounds/{round_value}/matches/{index}/result")]
async fn api_record_result(
    state: AppState,
    settings: Data<Settings>,
    path: Path<MatchPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    entry.last_activity = Instant::now();
    let f = &mut entry.fixture;
    let score = body.team_1_score.zip(body.team_2_score);
    let result = record_result(f, path.round_value, path.index, body.winner_team_id, score)
        .and_then(|()| resolve_placeholders(f, settings.policy));
    match result {
        Ok(_) => HttpResponse::Ok().json(f),
        Err(e) => bad_request(e),
    }
}

/// Teams advancing from a round under the configured policy.
#[get("/api/fixtures/{id}/rounds/{round_value}/winners")]
async fn api_round_winners(
    state: AppState,
    settings: Data<Settings>,
    path: Path<RoundPath>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    match entry
        .fixture
        .round(path.round_value)
        .and_then(|r| advancers(r, settings.policy))
    {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(e) => bad_request(e),
    }
}

/// Standings table of a round from its completed matches.
#[get("/api/fixtures/{id}/rounds/{round_value}/standings")]
async fn api_round_standings(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    match entry.fixture.round(path.round_value) {
        Ok(r) => HttpResponse::Ok().json(standings(r)),
        Err(e) => bad_request(e),
    }
}

/// Generate the next round from a round's advancers.
#[post("/api/fixtures/{id}/rounds/{round_value}/advance")]
async fn api_advance_round(
    state: AppState,
    settings: Data<Settings>,
    path: Path<RoundPath>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_fixture(),
    };
    entry.last_activity = Instant::now();
    let f = &mut entry.fixture;
    match advance_round(f, path.round_value, settings.policy) {
        Ok(()) => HttpResponse::Ok().json(f),
        Err(e) => bad_request(e),
    }
}

/// Number of rounds for a bracket of `team_count` teams.
#[get("/api/bracket/rounds/{team_count}")]
async fn api_total_rounds(path: Path<TeamCountPath>) -> HttpResponse {
    match total_rounds_for_bracket(path.team_count) {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({ "totalRounds": total })),
        Err(e) => bad_request(e),
    }
}

/// Label of a round (Final, Semi Final, ...).
#[get("/api/bracket/round-name")]
async fn api_round_name(query: Query<RoundNameQuery>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "roundName": round_name(query.round_number, query.team_count)
    }))
}

/// Advancers of a round held by the backend, with backend placeholders where undecided.
#[get("/api/remote/tournaments/{id}/rounds/{round_value}/winners")]
async fn api_remote_winners(
    settings: Data<Settings>,
    path: Path<RoundPath>,
    query: Query<RoundNumberQuery>,
) -> HttpResponse {
    let Some(client) = settings.backend.as_ref() else {
        return HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": "No backend configured" }));
    };
    match client
        .fetch_advancers(path.id, path.round_value, query.round_number)
        .await
    {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(e) => {
            log::warn!("Remote winners for tournament {} failed: {}", path.id, e);
            HttpResponse::BadGateway().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn read_token_file(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()).filter(|t| !t.is_empty()),
        Err(e) => {
            log::warn!("Could not read token file {}: {}", path, e);
            None
        }
    }
}

fn settings_from_env() -> Settings {
    let policy = match std::env::var("ROUND_ROBIN_ADVANCEMENT") {
        Ok(v) => v.parse().unwrap_or_else(|e| {
            log::warn!("{}; using placeholders", e);
            AdvancementPolicy::default()
        }),
        Err(_) => AdvancementPolicy::default(),
    };

    let backend = std::env::var("BACKEND_URL")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .map(|url| {
            let mut client = BackendClient::new(url);
            if let Ok(token) = std::env::var("BACKEND_TOKEN") {
                client = client.with_token(token);
            }
            // The token file may be rotated externally; re-read it whenever a request is rejected.
            if let Ok(path) = std::env::var("BACKEND_TOKEN_FILE") {
                if let Some(token) = read_token_file(&path) {
                    client = client.with_token(token);
                }
                client = client.with_token_refresh(move || read_token_file(&path));
            }
            log::info!("Using tournament backend at {}", client.base_url());
            client
        });

    Settings { policy, backend }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let settings = Data::new(settings_from_env());
    log::info!(
        "Starting server at http://{}:{} (round robin advancement: {:?})",
        bind.0,
        bind.1,
        settings.policy
    );

    let state = Data::new(RwLock::new(HashMap::<TournamentId, FixtureEntry>::new()));

    // Background task: every 30 minutes, remove fixtures inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive fixture(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(settings.clone())
            .service(api_health)
            .service(api_create_fixture)
            .service(api_import_roster)
            .service(api_get_fixture)
            .service(api_select_round_type)
            .service(api_set_match_status)
            .service(api_record_result)
            .service(api_round_winners)
            .service(api_round_standings)
            .service(api_advance_round)
            .service(api_total_rounds)
            .service(api_round_name)
            .service(api_remote_winners)
    })
    .bind(bind)?
    .run()
    .await
}
