use axum::body::{to_bytes, Body};
use axum::http::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use notepad_core::db::open_db_in_memory;
use notepad_core::{NotepadRecord, NotepadRepository, SqliteNotepadRepository, UserId};
use notepad_server::{router, AppState, EMPTY_LIST_MESSAGE, USER_ID_HEADER};
use serde_json::{json, Value};
use tower::ServiceExt;

const USER: UserId = 1;
const OTHER_USER: UserId = 2;
const FORM_MIME: &str = "application/x-www-form-urlencoded";

fn test_app() -> (Router, AppState) {
    let state = AppState::new(open_db_in_memory().unwrap());
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn get_as(user: UserId, uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(USER_ID_HEADER, user.to_string())
        .body(Body::empty())
        .unwrap()
}

fn get_json_as(user: UserId, uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(USER_ID_HEADER, user.to_string())
        .header(ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap()
}

fn post_json_as(user: UserId, uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(USER_ID_HEADER, user.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn post_form_as(user: UserId, uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(USER_ID_HEADER, user.to_string())
        .header(CONTENT_TYPE, FORM_MIME)
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn stored(state: &AppState, owner: UserId, id: &str) -> Option<NotepadRecord> {
    let conn = state.db.lock().unwrap();
    let repo = SqliteNotepadRepository::try_new(&conn).unwrap();
    repo.get_notepad(owner, id.parse().unwrap()).unwrap()
}

fn stored_list(state: &AppState, owner: UserId) -> Vec<NotepadRecord> {
    let conn = state.db.lock().unwrap();
    let repo = SqliteNotepadRepository::try_new(&conn).unwrap();
    repo.list_notepads(owner).unwrap()
}

async fn create_json(app: &Router, user: UserId, title: &str, body: &str) -> String {
    let response = send(
        app,
        post_json_as(user, "/notepad/create", json!({ "title": title, "body": body })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let (app, _) = test_app();

    let response = send(&app, Request::get("/notepad").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::get("/notepad")
            .header(USER_ID_HEADER, "not-a-number")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_list_shows_no_notepads_message() {
    let (app, _) = test_app();

    let response = send(&app, get_as(USER, "/notepad")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(EMPTY_LIST_MESSAGE));
}

#[tokio::test]
async fn json_create_returns_201_and_persists() {
    let (app, state) = test_app();

    let id = create_json(&app, USER, "Notepad JSON", "Contenido JSON").await;

    let notepad = stored(&state, USER, &id).expect("notepad should be stored");
    assert_eq!(notepad.title, "Notepad JSON");
    assert_eq!(notepad.body, "Contenido JSON");
}

#[tokio::test]
async fn create_without_title_returns_400() {
    let (app, state) = test_app();

    let response = send(
        &app,
        post_json_as(USER, "/notepad/create", json!({ "body": "Sin título" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Title"));

    let response = send(
        &app,
        post_form_as(USER, "/notepad/create", "title=+++&body=blank"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(stored_list(&state, USER).is_empty());
}

#[tokio::test]
async fn form_create_redirects_and_list_renders_new_notepad() {
    let (app, _) = test_app();

    let response = send(
        &app,
        post_form_as(USER, "/notepad/create", "title=Notepad+HTML&body=Desde+HTML"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/notepad");

    let response = send(&app, get_as(USER, "/notepad")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Notepad HTML"));
    assert!(html.contains("Desde HTML"));
    assert!(!html.contains(EMPTY_LIST_MESSAGE));
}

#[tokio::test]
async fn created_notepad_appears_in_json_list() {
    let (app, _) = test_app();
    let id = create_json(&app, USER, "Nota API", "Contenido API").await;

    let response = send(&app, get_json_as(USER, "/notepad")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let items = listed["notepads"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["title"], "Nota API");
    assert_eq!(items[0]["body"], "Contenido API");
}

#[tokio::test]
async fn list_only_shows_own_notepads() {
    let (app, _) = test_app();
    create_json(&app, USER, "mine", "visible").await;
    create_json(&app, OTHER_USER, "theirs", "hidden").await;

    let html = body_text(send(&app, get_as(USER, "/notepad")).await).await;
    assert!(html.contains("mine"));
    assert!(!html.contains("theirs"));
    assert!(!html.contains("hidden"));
}

#[tokio::test]
async fn show_returns_title_and_body_for_owner_only() {
    let (app, _) = test_app();
    let id = create_json(&app, USER, "Show me", "Body <b>text</b>").await;

    let response = send(&app, get_as(USER, &format!("/notepad/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Show me"));
    assert!(html.contains("Body &lt;b&gt;text&lt;/b&gt;"));

    let response = send(&app, get_as(OTHER_USER, &format!("/notepad/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let (app, _) = test_app();

    let response = send(&app, get_as(USER, "/notepad/not-a-uuid")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        get_as(USER, "/notepad/6a2f41a3-c54c-4c8a-8e1e-2f2b1c0e9d11"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_edit_updates_title_and_body() {
    let (app, state) = test_app();
    let id = create_json(&app, USER, "Test Notepad", "This is a test notepad.").await;

    let response = send(
        &app,
        post_form_as(
            USER,
            &format!("/notepad/edit/{id}"),
            "title=Edited+Notepad&body=This+notepad+has+been+edited.",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/notepad/{id}").as_str());

    let edited = stored(&state, USER, &id).unwrap();
    assert_eq!(edited.title, "Edited Notepad");
    assert_eq!(edited.body, "This notepad has been edited.");
}

#[tokio::test]
async fn json_edit_returns_updated_notepad_and_rejects_missing_title() {
    let (app, _) = test_app();
    let id = create_json(&app, USER, "before", "old").await;
    let uri = format!("/notepad/edit/{id}");

    let response = send(
        &app,
        post_json_as(USER, &uri, json!({ "title": "after", "body": "new" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "after");
    assert_eq!(updated["body"], "new");

    let response = send(&app, post_json_as(USER, &uri, json!({ "body": "no title" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_of_foreign_notepad_is_not_found() {
    let (app, state) = test_app();
    let id = create_json(&app, OTHER_USER, "theirs", "secret").await;

    let response = send(
        &app,
        post_form_as(USER, &format!("/notepad/edit/{id}"), "title=hijack&body="),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(stored(&state, OTHER_USER, &id).unwrap().title, "theirs");
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let (app, _) = test_app();
    let id = create_json(&app, USER, "Prefilled", "Existing body").await;

    let response = send(&app, get_as(USER, &format!("/notepad/edit/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("value=\"Prefilled\""));
    assert!(html.contains("Existing body"));
}

#[tokio::test]
async fn delete_removes_notepad_and_is_idempotent() {
    let (app, state) = test_app();
    let id = create_json(&app, USER, "to delete", "").await;
    let uri = format!("/notepad/delete/{id}");

    let response = send(&app, post_form_as(USER, &uri, "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/notepad");
    assert!(stored(&state, USER, &id).is_none());

    let repeat = Request::post(&uri)
        .header(USER_ID_HEADER, USER.to_string())
        .header(ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, repeat).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_of_foreign_notepad_keeps_it() {
    let (app, state) = test_app();
    let id = create_json(&app, OTHER_USER, "theirs", "").await;

    send(&app, post_form_as(USER, &format!("/notepad/delete/{id}"), "")).await;
    assert!(stored(&state, OTHER_USER, &id).is_some());
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = test_app();

    let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "pong");
    assert_eq!(health["version"], notepad_core::core_version());
}
