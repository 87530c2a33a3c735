use clap::Parser;
use forcedeck_core::{
    preload_assets, Card, Direction, EventBus, Phase, Preset, RngState, Trick, TrickConfig,
    BACK_ASSET,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "forcedeck-web", about = "Serve the card force to a browser")]
struct Options {
    #[arg(long, default_value = "0.0.0.0:7878", env = "FORCEDECK_BIND")]
    bind: String,
    /// Timing preset: classic, settle or dramatic.
    #[arg(long, default_value = "classic", value_parser = parse_preset)]
    preset: Preset,
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_preset(value: &str) -> Result<Preset, String> {
    Preset::from_name(value).ok_or_else(|| format!("unknown preset {value:?}"))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env("FORCEDECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = Options::parse();
    let state = AppState::new(options.preset, options.seed)?;
    let server = Server::http(options.bind.as_str())?;
    info!(bind = %options.bind, preset = options.preset.name(), "forcedeck web server listening");
    let state = Arc::new(Mutex::new(state));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            error!("request error: {err}");
        }
    }
    Ok(())
}

struct AppState {
    preset: Preset,
    trick: Trick,
    events: EventBus,
    clock: Instant,
}

impl AppState {
    fn new(preset: Preset, seed: Option<u64>) -> Result<Self, forcedeck_core::ConfigError> {
        let rng = seed.map_or_else(RngState::from_entropy, RngState::from_seed);
        let trick = Trick::staged(TrickConfig::preset(preset), rng)?;
        Ok(Self {
            preset,
            trick,
            events: EventBus::default(),
            clock: Instant::now(),
        })
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn log_events(&mut self) {
        for event in self.events.drain() {
            debug!(?event, "trick event");
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: UiState,
}

/// What the page needs to draw. Never carries the sequence
/// or the pending force.
#[derive(Debug, Serialize, PartialEq)]
struct UiState {
    phase: Phase,
    face: String,
    card_visible: bool,
    retry_visible: bool,
    indicator: Option<String>,
    shown: usize,
    length: usize,
    /// Milliseconds until the next scheduled change, for the page's poll.
    next_change_ms: Option<u64>,
}

#[derive(Serialize)]
struct AssetList {
    assets: Vec<String>,
    back: &'static str,
}

#[derive(Debug, Deserialize)]
struct InputRequest {
    kind: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    start_x: Option<f64>,
    #[serde(default)]
    start_y: Option<f64>,
    #[serde(default)]
    direction: Option<String>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    let method = request.method().clone();
    match (&method, url.as_str()) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/styles.css") => {
            respond_with_file(request, web_path("styles.css"), "text/css; charset=utf-8")?;
        }
        (&Method::Get, "/api/assets") => {
            let body = serde_json::to_vec(&AssetList {
                assets: preload_assets(),
                back: BACK_ASSET,
            })?;
            respond_bytes(request, body, "application/json")?;
        }
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            let app = &mut *guard;
            let now = app.now();
            app.trick.advance(now, &mut app.events);
            let response = build_response(app, None);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/input") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            let now = guard.now();
            let err = match serde_json::from_str::<InputRequest>(&body) {
                Ok(input) => apply_input(&mut guard, input, now).err(),
                Err(err) => Some(format!("bad input: {err}")),
            };
            let response = build_response(&mut guard, err);
            respond_json(request, response)?;
        }
        (&Method::Get, path) if path.starts_with("/cards/") => {
            match card_file(path).filter(|file| file.is_file()) {
                Some(file) => respond_with_file(request, file, "image/png")?,
                None => request.respond(Response::empty(StatusCode(404)))?,
            }
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("web")
        .join(file)
}

/// Maps `/cards/<code>.png` onto the image folder, accepting only real card
/// codes.
fn card_file(path: &str) -> Option<PathBuf> {
    let name = path.strip_prefix("/cards/")?.strip_suffix(".png")?;
    let card: Card = name.parse().ok()?;
    Some(web_path("cards").join(format!("{}.png", card.code())))
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read(path)?;
    respond_bytes(request, content, content_type)
}

fn respond_bytes(
    request: tiny_http::Request,
    body: Vec<u8>,
    content_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .map_err(|_| "invalid content type header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(&response)?;
    respond_bytes(request, body, "application/json")
}

fn build_response(state: &mut AppState, err: Option<String>) -> ApiResponse {
    state.log_events();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_state(&state.trick),
    }
}

fn snapshot_state(trick: &Trick) -> UiState {
    let stage = trick.presenter();
    UiState {
        phase: trick.phase(),
        face: stage.face.asset(),
        card_visible: stage.card_visible,
        retry_visible: stage.retry_visible,
        indicator: stage
            .indicator_visible
            .then(|| stage.indicator_text.clone()),
        shown: trick.index(),
        length: trick.sequence().map_or(0, |sequence| sequence.len()),
        next_change_ms: trick
            .next_due()
            .map(|due| due.saturating_sub(trick.now()).as_millis() as u64),
    }
}

fn apply_input(state: &mut AppState, input: InputRequest, now: Duration) -> Result<(), String> {
    let trick = &mut state.trick;
    let events = &mut state.events;
    match input.kind.as_str() {
        "tap" => trick.tap(now, events),
        "retry" => {
            trick.retry(now, events);
        }
        "touch_start" => {
            let (x, y) = point(&input)?;
            trick.touch_start(x, y, now, events);
        }
        "touch_end" => {
            let (x, y) = point(&input)?;
            if let (Some(sx), Some(sy)) = (input.start_x, input.start_y) {
                trick.touch_start(sx, sy, now, events);
            }
            trick.touch_end(x, y, now, events);
        }
        "swipe" => {
            let code = input
                .direction
                .as_deref()
                .ok_or_else(|| "missing direction".to_string())?;
            let mut chars = code.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(format!("direction must be one letter, got {code:?}"));
            };
            let direction = Direction::from_code(ch).map_err(|err| err.to_string())?;
            trick.swipe(direction, now, events);
        }
        "reset" => {
            trick.reset(now, events);
            debug!(preset = state.preset.name(), "trick reset");
        }
        other => return Err(format!("unknown input {other:?}")),
    }
    Ok(())
}

fn point(input: &InputRequest) -> Result<(f64, f64), String> {
    match (input.x, input.y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err("touch input needs x and y".to_string()),
    }
}
