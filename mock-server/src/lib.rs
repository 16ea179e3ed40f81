//! In-memory stub of the NewsBlur API used by the client's integration tests.
//!
//! Serves a fixed fixture (two feeds, five stories, classifiers) for one
//! account. Login sets a session cookie; every `/reader/*` and `/classifier/*`
//! route answers 403 without it. Each request the routes see is appended to
//! `Store::requests` so tests can inspect what went over the wire.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const USERNAME: &str = "demo";
pub const PASSWORD: &str = "hunter2";
pub const SESSION_COOKIE: &str = "newsblur_sessionid";
pub const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feed {
    pub id: u64,
    pub ps: u32,
    pub nt: u32,
    pub ng: u32,
    pub feed_address: String,
    pub feed_link: String,
    pub feed_title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Story {
    pub story_hash: String,
    pub story_feed_id: u64,
    pub story_title: String,
    pub story_content: String,
    pub story_authors: String,
    pub story_permalink: String,
    pub story_timestamp: i64,
    pub read_status: u8,
    pub starred: bool,
    pub has_modifications: bool,
}

impl Story {
    /// `/reader/feed` sends the timestamp as a string, the river as a number.
    fn to_json(&self, timestamp_as_string: bool) -> Value {
        let mut value = json!(self);
        if timestamp_as_string {
            value["story_timestamp"] = json!(self.story_timestamp.to_string());
        }
        value
    }
}

/// One request as seen by a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
pub struct Store {
    pub sessions: HashSet<String>,
    pub feeds: Vec<Feed>,
    pub folders: Value,
    pub stories: Vec<Story>,
    pub classifiers: HashMap<u64, Value>,
    pub requests: Vec<RecordedRequest>,
    /// Bytes of filler appended to `/reader/feed` responses as `pad`.
    pub feed_padding: usize,
}

pub type Db = Arc<RwLock<Store>>;

impl Store {
    pub fn fixture() -> Self {
        let feeds = vec![
            Feed {
                id: 1,
                ps: 1,
                nt: 3,
                ng: 0,
                feed_address: "https://blog.rust-lang.org/feed.xml".to_string(),
                feed_link: "https://blog.rust-lang.org/".to_string(),
                feed_title: "Rust Blog".to_string(),
            },
            Feed {
                id: 2,
                ps: 0,
                nt: 2,
                ng: 1,
                feed_address: "https://lwn.net/headlines/rss".to_string(),
                feed_link: "https://lwn.net/".to_string(),
                feed_title: "LWN.net".to_string(),
            },
        ];
        let story = |feed: u64, short: &str, title: &str, author: &str, ts: i64| Story {
            story_hash: format!("{feed}:{short}"),
            story_feed_id: feed,
            story_title: title.to_string(),
            story_content: format!("<p>{title}</p>"),
            story_authors: author.to_string(),
            story_permalink: format!("https://example.com/{feed}/{short}"),
            story_timestamp: ts,
            read_status: 0,
            starred: false,
            has_modifications: false,
        };
        let stories = vec![
            story(1, "a1b2c3", "Announcing Rust 1.80", "The Release Team", 1_721_779_200),
            story(1, "d4e5f6", "Sponsored: buy now", "Spammy McSpam", 1_721_692_800),
            story(1, "0a0b0c", "This Week in Rust", "Ferris", 1_721_606_400),
            story(2, "9f8e7d", "Kernel release status", "corbet", 1_721_779_300),
            story(2, "6c5b4a", "Giveaway inside", "promo", 1_721_692_900),
        ];
        let classifiers = HashMap::from([
            (
                1,
                json!({
                    "authors": {"Spammy McSpam": -1, "Ferris": 1},
                    "titles": {"Sponsored": -1},
                    "tags": {"release": 1},
                    "feeds": {"1": 0}
                }),
            ),
            (2, json!({"titles": {"Giveaway": -1}})),
        ]);
        Self {
            sessions: HashSet::new(),
            feeds,
            folders: json!([1, {"News": [2]}]),
            stories,
            classifiers,
            requests: Vec::new(),
            feed_padding: 0,
        }
    }

    fn record(&mut self, path: &str, params: Vec<(String, String)>) {
        tracing::debug!(path, params = params.len(), "request");
        self.requests.push(RecordedRequest {
            path: path.to_string(),
            params,
        });
    }

    fn story_mut(&mut self, hash: &str) -> Option<&mut Story> {
        self.stories.iter_mut().find(|s| s.story_hash == hash)
    }
}

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::fixture()))
}

pub fn app() -> Router {
    app_with_db(new_db())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/reader/feeds", get(reader_feeds))
        .route("/reader/feed/{id}", get(reader_feed))
        .route("/reader/river_stories", post(river_stories))
        .route("/reader/starred_story_hashes", get(starred_story_hashes))
        .route("/reader/mark_story_hashes_as_read", post(mark_read))
        .route("/reader/mark_story_hash_as_unread", post(mark_unread))
        .route("/reader/mark_story_hash_as_starred", post(mark_starred))
        .route("/reader/mark_story_hash_as_unstarred", post(mark_unstarred))
        .route("/classifier/{id}", get(classifier))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

fn parse_form(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn is_authenticated(store: &Store, headers: &HeaderMap) -> bool {
    session_id(headers).is_some_and(|id| store.sessions.contains(&id))
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"authenticated": false, "result": "error", "message": "Not logged in"})),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"result": "error", "message": message})),
    )
        .into_response()
}

fn parse_page(raw: Option<&str>) -> Result<usize, Response> {
    match raw {
        None => Ok(1),
        Some(raw) => match raw.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(bad_request("page must be a positive integer")),
        },
    }
}

fn paginate(stories: Vec<&Story>, page: usize, timestamp_as_string: bool) -> Vec<Value> {
    stories
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(PAGE_SIZE))
        .take(PAGE_SIZE)
        .map(|s| s.to_json(timestamp_as_string))
        .collect()
}

async fn login(State(db): State<Db>, body: Bytes) -> Response {
    let form = parse_form(&body);
    let mut store = db.write().await;
    store.record("/api/login", form.clone());

    let accepted = form_value(&form, "username") == Some(USERNAME)
        && form_value(&form, "password") == Some(PASSWORD);
    if !accepted {
        tracing::info!("login rejected");
        return Json(json!({
            "authenticated": false,
            "code": -1,
            "errors": {"__all__": ["Whoopsy-daisy, wrong password. Try again."]},
            "result": "ok"
        }))
        .into_response();
    }

    let id = Uuid::new_v4().simple().to_string();
    store.sessions.insert(id.clone());
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"authenticated": true, "code": 1, "errors": null, "result": "ok"})),
    )
        .into_response()
}

async fn reader_feeds(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let mut store = db.write().await;
    store.record("/reader/feeds", query.clone());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    if form_value(&query, "v") != Some("2") {
        return bad_request("unsupported version");
    }
    Json(json!({
        "feeds": store.feeds,
        "folders": store.folders,
        "authenticated": true,
        "result": "ok"
    }))
    .into_response()
}

async fn reader_feed(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let mut store = db.write().await;
    store.record(&format!("/reader/feed/{id}"), query.clone());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    let page = match parse_page(form_value(&query, "page")) {
        Ok(page) => page,
        Err(resp) => return resp,
    };
    let stories = store.stories.iter().filter(|s| s.story_feed_id == id).collect();
    let mut body = json!({"stories": paginate(stories, page, true), "result": "ok"});
    if store.feed_padding > 0 {
        body["pad"] = json!("x".repeat(store.feed_padding));
    }
    Json(body).into_response()
}

async fn river_stories(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    let form = parse_form(&body);
    let mut store = db.write().await;
    store.record("/reader/river_stories", form.clone());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    let page = match parse_page(form_value(&form, "page")) {
        Ok(page) => page,
        Err(resp) => return resp,
    };
    let feeds: HashSet<&str> = form
        .iter()
        .filter(|(k, _)| k == "feeds")
        .map(|(_, v)| v.as_str())
        .collect();
    let stories = store
        .stories
        .iter()
        .filter(|s| feeds.contains(s.story_feed_id.to_string().as_str()))
        .collect();
    Json(json!({"stories": paginate(stories, page, false), "result": "ok"})).into_response()
}

async fn starred_story_hashes(State(db): State<Db>, headers: HeaderMap) -> Response {
    let mut store = db.write().await;
    store.record("/reader/starred_story_hashes", Vec::new());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    let hashes: Vec<&str> = store
        .stories
        .iter()
        .filter(|s| s.starred)
        .map(|s| s.story_hash.as_str())
        .collect();
    Json(json!({
        "starred_story_hashes": hashes,
        "result": "ok",
        "authenticated": true,
        "user_id": 500000
    }))
    .into_response()
}

async fn mark_read(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    let form = parse_form(&body);
    let mut store = db.write().await;
    store.record("/reader/mark_story_hashes_as_read", form.clone());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    for (_, hash) in form.iter().filter(|(k, _)| k == "story_hash") {
        if let Some(story) = store.story_mut(hash) {
            story.read_status = 1;
        }
    }
    Json(json!({"result": "ok"})).into_response()
}

/// Shared body of the single-hash mutations: unknown hashes get `result: error`.
async fn mark_single(
    db: Db,
    path: &str,
    headers: HeaderMap,
    body: Bytes,
    apply: fn(&mut Story),
) -> Response {
    let form = parse_form(&body);
    let mut store = db.write().await;
    store.record(path, form.clone());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    let Some(hash) = form_value(&form, "story_hash") else {
        return bad_request("story_hash is required");
    };
    match store.story_mut(hash) {
        Some(story) => {
            apply(story);
            Json(json!({"result": "ok"})).into_response()
        }
        None => Json(json!({"result": "error", "message": "story not found"})).into_response(),
    }
}

async fn mark_unread(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    mark_single(db, "/reader/mark_story_hash_as_unread", headers, body, |s| {
        s.read_status = 0
    })
    .await
}

async fn mark_starred(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    mark_single(db, "/reader/mark_story_hash_as_starred", headers, body, |s| {
        s.starred = true
    })
    .await
}

async fn mark_unstarred(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    mark_single(db, "/reader/mark_story_hash_as_unstarred", headers, body, |s| {
        s.starred = false
    })
    .await
}

async fn classifier(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    let mut store = db.write().await;
    store.record(&format!("/classifier/{id}"), Vec::new());
    if !is_authenticated(&store, &headers) {
        return forbidden();
    }
    let payload = store
        .classifiers
        .get(&id)
        .cloned()
        .unwrap_or_else(|| json!({"authors": {}, "titles": {}, "tags": {}, "feeds": {}}));
    Json(json!({"payload": payload, "result": "ok"})).into_response()
}
