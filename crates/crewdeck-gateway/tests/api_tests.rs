//! HTTP tests for the crewdeck gateway, run against in-memory SQLite.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use crewdeck_access::AccessGate;
use crewdeck_core::config::{CrewdeckConfig, OperatorConfig};
use crewdeck_core::Role;
use crewdeck_crew::CrewManager;
use crewdeck_gateway::{build_router, AppState};
use crewdeck_schedule::ScheduleManager;
use rusqlite::Connection;
use serde_json::{json, Value};

fn test_server() -> TestServer {
    test_server_with_schedule(Connection::open_in_memory().unwrap())
}

fn test_server_with_schedule(schedule_conn: Connection) -> TestServer {
    let mut config = CrewdeckConfig::default();
    config.access.token_secret = "test-secret".to_string();
    config.access.operators = vec![
        OperatorConfig {
            username: "skipper".to_string(),
            password: "pw-manager".to_string(),
            role: Role::Manager,
        },
        OperatorConfig {
            username: "mate".to_string(),
            password: "pw-co".to_string(),
            role: Role::CoManager,
        },
    ];

    let crew = CrewManager::new(Connection::open_in_memory().unwrap()).unwrap();
    let schedule = ScheduleManager::new(schedule_conn).unwrap();
    let access = AccessGate::new(Connection::open_in_memory().unwrap(), &config.access).unwrap();
    let state = Arc::new(AppState::new(config, crew, schedule, access));
    TestServer::new(build_router(state)).unwrap()
}

async fn login(server: &TestServer, username: &str, password: &str) -> HeaderValue {
    let response = server
        .post("/api/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    let token = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();
    format!("Bearer {token}").parse::<HeaderValue>().unwrap()
}

fn ann() -> Value {
    json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com",
        "currentCycleStart": "2025-01-06",
        "cycleLengthWeeks": 4,
        "positionsTrainedCaptain": true,
        "boatsTrainedMorningStar": true
    })
}

async fn create_crew(server: &TestServer, auth: &HeaderValue, body: Value) -> i64 {
    let response = server
        .post("/api/crew")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["_id"].as_i64().unwrap()
}

// =============================================================================
// OPEN ROUTES
// =============================================================================

#[tokio::test]
async fn root_reports_up() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "API is up");
}

#[tokio::test]
async fn health_reports_version() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert_eq!(body["bind"], "127.0.0.1:4000");
}

#[tokio::test]
async fn login_with_bad_password_is_401() {
    let server = test_server();
    let response = server
        .post("/api/login")
        .json(&json!({ "username": "skipper", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Invalid credentials");
}

// =============================================================================
// TOKEN MIDDLEWARE
// =============================================================================

#[tokio::test]
async fn missing_token_is_401() {
    let server = test_server();
    for path in ["/api/crew", "/api/schedule?date=2025-02-03"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "Missing token");
    }
}

#[tokio::test]
async fn invalid_token_is_401() {
    let server = test_server();
    let response = server
        .get("/api/crew")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer forged.token"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Invalid or expired token");
}

#[tokio::test]
async fn co_manager_cannot_touch_crew() {
    let server = test_server();
    let auth = login(&server, "mate", "pw-co").await;

    let list = server
        .get("/api/crew")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    list.assert_status(StatusCode::FORBIDDEN);
    assert!(list.json::<Value>()["error"].is_string());

    let create = server
        .post("/api/crew")
        .add_header(AUTHORIZATION, auth)
        .json(&ann())
        .await;
    create.assert_status(StatusCode::FORBIDDEN);
}

// =============================================================================
// CREW
// =============================================================================

#[tokio::test]
async fn crew_crud_flow() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;

    let id = create_crew(&server, &auth, ann()).await;

    let fetched = server
        .get(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    fetched.assert_status_ok();
    let body: Value = fetched.json();
    assert_eq!(body["firstName"], "Ann");
    assert_eq!(body["positionsTrainedCaptain"], true);
    assert_eq!(body["positionsTrainedChef"], false);
    assert_eq!(body["currentCycleEnd"], "2025-02-03");

    let mut changed = ann();
    changed["lastName"] = json!("Lee-Park");
    changed["cycleLengthWeeks"] = json!(2);
    let updated = server
        .put(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&changed)
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>(), json!({ "message": "Updated", "id": id }));

    let list = server
        .get("/api/crew")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    list.assert_status_ok();
    let all: Vec<Value> = list.json();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["lastName"], "Lee-Park");
    assert_eq!(all[0]["currentCycleEnd"], "2025-01-20");

    let deleted = server
        .delete(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>(), json!({ "message": "Deleted", "id": id }));

    let gone = server
        .get(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth)
        .await;
    gone.assert_status_not_found();
}

#[tokio::test]
async fn unknown_crew_id_is_404() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;

    let response = server
        .get("/api/crew/999")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_not_found();
    assert!(response.json::<Value>()["error"].is_string());

    let update = server
        .put("/api/crew/999")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&ann())
        .await;
    update.assert_status_not_found();

    let delete = server
        .delete("/api/crew/999")
        .add_header(AUTHORIZATION, auth)
        .await;
    delete.assert_status_not_found();
}

#[tokio::test]
async fn invalid_crew_bodies_are_400() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;

    let missing_last_name = json!({
        "firstName": "Ann",
        "currentCycleStart": "2025-01-06",
        "cycleLengthWeeks": 4
    });
    let mut zero_length = ann();
    zero_length["cycleLengthWeeks"] = json!(0);
    let mut blank_name = ann();
    blank_name["firstName"] = json!("  ");

    for body in [missing_last_name, zero_length, blank_name] {
        let response = server
            .post("/api/crew")
            .add_header(AUTHORIZATION, auth.clone())
            .json(&body)
            .await;
        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }
}

// =============================================================================
// SCHEDULE
// =============================================================================

#[tokio::test]
async fn save_then_load_week() {
    let server = test_server();
    let manager = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &manager, ann()).await;

    // co-managers edit schedules too
    let auth = login(&server, "mate", "pw-co").await;
    let saved = server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "date": "2025-02-03",
            "slots": {
                "boat1": {
                    "captain": { "crewId": id, "week": 5, "cycleLength": 4, "name": "Ann Lee" },
                    "chef": { "crewId": "" },
                    "deckhand": null
                }
            }
        }))
        .await;
    saved.assert_status_ok();
    assert_eq!(saved.json::<Value>(), json!({ "message": "Saved" }));

    let loaded = server
        .get("/api/schedule")
        .add_query_param("date", "2025-02-03")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    loaded.assert_status_ok();
    let week: Value = loaded.json();
    assert_eq!(week["boat1"]["captain"]["crewId"], id);
    assert_eq!(week["boat1"]["captain"]["name"], "Ann Lee");
    assert_eq!(week["boat1"]["captain"]["week"], 5);
    assert_eq!(week["boat1"]["captain"]["cycleLength"], 4);
    assert!(week["boat1"].get("chef").is_none());
    assert!(week["boat1"].get("deckhand").is_none());

    let other_week = server
        .get("/api/schedule?date=2025-02-10")
        .add_header(AUTHORIZATION, auth)
        .await;
    other_week.assert_status_ok();
    assert_eq!(other_week.json::<Value>(), json!({}));
}

#[tokio::test]
async fn save_fills_name_and_rotation_from_crew() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &auth, ann()).await;

    server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "date": "2025-02-03",
            "slots": { "boat2": { "engineer": { "crewId": id.to_string() } } }
        }))
        .await
        .assert_status_ok();

    let week: Value = server
        .get("/api/schedule?date=2025-02-03")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    let slot = &week["boat2"]["engineer"];
    assert_eq!(slot["name"], "Ann Lee");
    assert_eq!(slot["week"], 5);
    assert_eq!(slot["cycleLength"], 4);
    assert_eq!(slot["cycleCount"], "5/4");
}

#[tokio::test]
async fn resave_replaces_previous_week() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &auth, ann()).await;

    for position in ["captain", "chef"] {
        server
            .post("/api/schedule")
            .add_header(AUTHORIZATION, auth.clone())
            .json(&json!({
                "date": "2025-02-03",
                "slots": { "boat1": { position: { "crewId": id } } }
            }))
            .await
            .assert_status_ok();
    }

    let week: Value = server
        .get("/api/schedule?date=2025-02-03")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert!(week["boat1"].get("captain").is_none());
    assert_eq!(week["boat1"]["chef"]["crewId"], id);
}

#[tokio::test]
async fn unknown_crew_in_schedule_is_400_and_keeps_week() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &auth, ann()).await;

    server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "date": "2025-02-03",
            "slots": { "boat1": { "captain": { "crewId": id } } }
        }))
        .await
        .assert_status_ok();

    let rejected = server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "date": "2025-02-03",
            "slots": { "boat1": { "captain": { "crewId": 4242 } } }
        }))
        .await;
    rejected.assert_status_bad_request();

    let week: Value = server
        .get("/api/schedule?date=2025-02-03")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(week["boat1"]["captain"]["crewId"], id);
}

#[tokio::test]
async fn schedule_requires_valid_date() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;

    for path in ["/api/schedule", "/api/schedule?date=tomorrow"] {
        let response = server
            .get(path)
            .add_header(AUTHORIZATION, auth.clone())
            .await;
        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    let no_slots = server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth)
        .json(&json!({ "date": "2025-02-03" }))
        .await;
    no_slots.assert_status_bad_request();
}

#[tokio::test]
async fn deleted_crew_keeps_saved_entries() {
    let server = test_server();
    let auth = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &auth, ann()).await;

    server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "date": "2025-02-03",
            "slots": { "boat1": { "captain": { "crewId": id } } }
        }))
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let week: Value = server
        .get("/api/schedule?date=2025-02-03")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(week["boat1"]["captain"]["name"], "Ann Lee");
}

#[tokio::test]
async fn delete_reports_success_when_schedule_count_fails() {
    // shared in-memory database so the test can drop the table under the server
    let uri = "file:crewdeck_delete_count_fails?mode=memory&cache=shared";
    let side = Connection::open(uri).unwrap();
    let server = test_server_with_schedule(Connection::open(uri).unwrap());
    let auth = login(&server, "skipper", "pw-manager").await;
    let id = create_crew(&server, &auth, ann()).await;

    side.execute_batch("DROP TABLE schedule_entries").unwrap();

    let deleted = server
        .delete(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>(), json!({ "message": "Deleted", "id": id }));

    server
        .get(&format!("/api/crew/{id}"))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status_not_found();
}
