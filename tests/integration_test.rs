// Integration tests for user-directory

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;

const TOTAL_USERS: u64 = 25;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn user_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("User {id:02}"),
        "username": format!("user{id}"),
        "email": format!("user{id}@example.org"),
        "phone": "555-0100",
        "website": "example.org",
        "address": {
            "street": "Main St",
            "suite": "Apt. 1",
            "city": "Springfield",
            "zipcode": "12345",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "company": { "name": "Acme", "catchPhrase": "Things", "bs": "widgets" }
    })
}

async fn users(State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let page: u64 = params.get("_page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u64 = params.get("_limit").and_then(|p| p.parse().ok()).unwrap_or(10);
    seen.lock().unwrap().push(params);
    let start = (page.saturating_sub(1)) * limit + 1;
    let body: Vec<Value> = (start..start + limit)
        .filter(|id| *id <= TOTAL_USERS)
        .map(user_json)
        .collect();
    axum::Json(body)
}

async fn unavailable() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance")
}

async fn garbage() -> impl IntoResponse {
    ([("content-type", "application/json")], "{\"users\": [")
}

/// Start a mock user service on an ephemeral port.
async fn spawn_server() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/users", get(users))
        .route("/down/users", get(unavailable))
        .route("/broken/users", get(garbage))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn source_for(base_url: String) -> user_directory::source::HttpUserSource {
    use user_directory::source::{HttpUserSource, SourceConfig};
    HttpUserSource::new(SourceConfig {
        base_url,
        ..SourceConfig::default()
    })
    .expect("valid source")
}

// 1) HTTP source sends paging params and decodes records
#[tokio::test]
async fn http_source_requests_pages_with_query_params() {
    use user_directory::source::{PageRequest, UserSource};

    let (addr, seen) = spawn_server().await;
    let source = source_for(format!("http://{addr}"));

    let users = source.fetch_page(PageRequest { page: 2, limit: 10 }).await.expect("page 2");
    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, (11..=20).collect::<Vec<u64>>());
    assert_eq!(users[0].company_name(), "Acme");
    assert_eq!(
        users[0].map_link("www.google.com").as_deref(),
        Some("https://www.google.com/maps?q=-37.3159,81.1496")
    );

    let last = source.fetch_page(PageRequest { page: 3, limit: 10 }).await.expect("page 3");
    assert_eq!(last.len(), 5);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen[0].get("_page").map(String::as_str), Some("2"));
    assert_eq!(seen[0].get("_limit").map(String::as_str), Some("10"));
}

// 2) Custom parameter names are honoured
#[tokio::test]
async fn http_source_uses_configured_param_names() {
    use user_directory::source::{HttpUserSource, PageRequest, SourceConfig, UserSource};

    let (addr, seen) = spawn_server().await;
    let source = HttpUserSource::new(SourceConfig {
        base_url: format!("http://{addr}/"),
        page_param: "page".into(),
        limit_param: "per_page".into(),
        ..SourceConfig::default()
    })
    .expect("valid source");

    // the mock ignores unknown names and serves its default first page
    let users = source.fetch_page(PageRequest { page: 4, limit: 3 }).await.expect("page");
    assert_eq!(users.len(), 10);
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen[0].get("page").map(String::as_str), Some("4"));
    assert_eq!(seen[0].get("per_page").map(String::as_str), Some("3"));
}

// 3) Error statuses and malformed bodies map onto FetchError
#[tokio::test]
async fn http_source_maps_failures() {
    use user_directory::error::FetchError;
    use user_directory::source::{PageRequest, UserSource};

    let (addr, _) = spawn_server().await;
    let req = PageRequest { page: 1, limit: 10 };

    let down = source_for(format!("http://{addr}/down")).fetch_page(req).await;
    assert!(matches!(down, Err(FetchError::Status(503))));

    let broken = source_for(format!("http://{addr}/broken")).fetch_page(req).await;
    assert!(matches!(broken, Err(FetchError::Decode(_))));

    let missing = source_for(format!("http://{addr}/nowhere")).fetch_page(req).await;
    assert!(matches!(missing, Err(FetchError::Status(404))));
}

// 4) Connection failures surface as transport errors
#[tokio::test]
async fn http_source_reports_transport_errors() {
    use user_directory::error::FetchError;
    use user_directory::source::{PageRequest, UserSource};

    // bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let res = source_for(format!("http://{addr}"))
        .fetch_page(PageRequest { page: 1, limit: 10 })
        .await;
    assert!(matches!(res, Err(FetchError::Transport(_))));
}

// 5) Worker + state: paginate until the source runs dry
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_drives_directory_until_exhausted() {
    use std::time::Duration;
    use user_directory::app::update::dispatch_requests;
    use user_directory::app::{AppSettings, AppState};
    use user_directory::source::FetchWorker;

    let (addr, seen) = spawn_server().await;
    let worker = FetchWorker::spawn(source_for(format!("http://{addr}"))).expect("spawn worker");
    let mut app = AppState::new(AppSettings::default());

    for _ in 0..10 {
        dispatch_requests(&mut app, &worker);
        if !app.directory.is_loading() {
            break;
        }
        let outcome = worker.next_timeout(Duration::from_secs(5)).expect("fetch outcome");
        app.on_fetch_complete(outcome);
        app.load_more();
    }

    assert_eq!(app.directory.base().len(), TOTAL_USERS as usize);
    assert!(app.directory.is_exhausted());
    assert_eq!(app.directory.error(), None);
    let pages: Vec<String> = seen
        .lock()
        .unwrap()
        .iter()
        .filter_map(|q| q.get("_page").cloned())
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);

    app.set_search("User 2".into());
    let ids: Vec<u64> = app.directory.visible().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![20, 21, 22, 23, 24, 25]);
}

// 6) A failing service leaves the list intact and shows the message
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_failure_sets_error_message() {
    use std::time::Duration;
    use user_directory::app::update::dispatch_requests;
    use user_directory::app::{AppSettings, AppState};
    use user_directory::error::FETCH_FAILED_MESSAGE;
    use user_directory::source::FetchWorker;

    let (addr, _) = spawn_server().await;
    let worker = FetchWorker::spawn(source_for(format!("http://{addr}/down"))).expect("spawn worker");
    let mut app = AppState::new(AppSettings::default());

    dispatch_requests(&mut app, &worker);
    let outcome = worker.next_timeout(Duration::from_secs(5)).expect("fetch outcome");
    app.on_fetch_complete(outcome);

    assert!(app.directory.base().is_empty());
    assert_eq!(app.directory.error(), Some(FETCH_FAILED_MESSAGE));
    assert!(!app.directory.is_loading());
}

// 7) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};
    use user_directory::app::Theme;

    // Unique temp path
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udir_theme_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    // Roundtrip write/read
    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(t.text, t2.text);
    assert_eq!(t.badge_bg, t2.badge_bg);
    assert_eq!(t.link_fg, t2.link_fg);

    // load_or_init creates file if missing
    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());

    // Cleanup best-effort
    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 8) Keybindings file overrides defaults
#[test]
fn keybinds_override_and_roundtrip() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::{fs, time::{SystemTime, UNIX_EPOCH}};
    use user_directory::app::keymap::{KeyAction, Keymap};

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udir_keys_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    Keymap::default().write_file(&path_str).expect("write keymap");
    let reread = Keymap::from_file(&path_str).expect("read keymap");
    assert_eq!(
        reread.resolve(&KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE)),
        Some(KeyAction::OpenMap)
    );

    fs::write(&path_str, "# custom\nLoadMore = n\nOpenWebsite = Ctrl+o\nBogus = z\n").expect("write custom");
    let custom = Keymap::from_file(&path_str).expect("read custom");
    assert_eq!(
        custom.resolve(&KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)),
        Some(KeyAction::LoadMore)
    );
    assert_eq!(
        custom.resolve(&KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL)),
        Some(KeyAction::OpenWebsite)
    );
    assert_eq!(
        custom.resolve(&KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
        None
    );

    let _ = fs::remove_file(&path_str);
}
