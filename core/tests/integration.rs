//! Full CRUD lifecycle against a live service.
//!
//! # Design
//! Starts the service on a random port with the in-memory store, then
//! exercises every client operation over real HTTP using ureq.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use todo_core::{ApiError, HttpRequest, HttpResponse, TodoClient};
use todo_service::config::{AuthSettings, ReplaceSuccess, TokenCheck};
use todo_service::store::MemoryStore;
use todo_service::AppState;

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data for the core client to interpret.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut builder = ureq::http::Request::builder()
        .method(req.method.as_str())
        .uri(&req.path);
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let result = match req.body {
        Some(body) => agent.run(builder.body(body.into_bytes()).unwrap()),
        None => agent.run(builder.body(()).unwrap()),
    };
    let mut response = result.expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    HttpResponse::new(status, body)
}

fn start_service(replace_success: ReplaceSuccess) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let auth = AuthSettings {
        username: "admin".to_string(),
        password: "hunter2".to_string(),
        access_token: "secret_token".to_string(),
        token_check: TokenCheck::Exact,
    };
    let state = AppState::new(Arc::new(MemoryStore::new()), auth, replace_success);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_service::run(listener, state, std::future::pending()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn crud_lifecycle() {
    // Step 1: start the service.
    let mut client = TodoClient::new(&start_service(ReplaceSuccess::Matched));

    // Step 2: requests without a token are rejected.
    let err = client.parse_list_todos(execute(client.build_list_todos())).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    // Step 3: bad credentials.
    let req = client.build_login("admin", "wrong").unwrap();
    let err = client.parse_login(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));

    // Step 4: log in.
    let req = client.build_login("admin", "hunter2").unwrap();
    let token = client.parse_login(execute(req)).unwrap();
    assert!(client.token().is_none());
    client.set_token(token.access_token);
    assert_eq!(client.token(), Some("secret_token"));

    // Step 5: list is empty.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 6: create.
    let req = client.build_create_todo(&fields(json!({"task": "buy milk"}))).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.field("task"), Some(&json!("buy milk")));
    assert_eq!(created.id.len(), 24);
    let id = created.id.clone();

    // Step 7: get.
    let fetched = client.parse_get_todo(execute(client.build_get_todo(&id))).unwrap();
    assert_eq!(fetched, created);

    // Step 8: replace with identical content still succeeds.
    let req = client.build_replace_todo(&id, &fields(json!({"task": "buy milk"}))).unwrap();
    client.parse_replace_todo(execute(req)).unwrap();

    // Step 9: full replacement.
    let req = client
        .build_replace_todo(&id, &fields(json!({"task": "buy oat milk", "done": true})))
        .unwrap();
    let replaced = client.parse_replace_todo(execute(req)).unwrap();
    assert_eq!(replaced.id, id);
    assert_eq!(replaced.field("done"), Some(&json!(true)));

    // Step 10: list has one item.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(todos, vec![replaced]);

    // Step 11: malformed id is a bad request, not a miss.
    let err = client.parse_get_todo(execute(client.build_get_todo("nope"))).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    // Step 12: delete.
    client.parse_delete_todo(execute(client.build_delete_todo(&id))).unwrap();

    // Step 13: get and delete after delete are NotFound.
    let err = client.parse_get_todo(execute(client.build_get_todo(&id))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = client.parse_delete_todo(execute(client.build_delete_todo(&id))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 14: list is empty again.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}

#[test]
fn identical_replace_is_not_found_when_counting_modifications() {
    let client = TodoClient::new(&start_service(ReplaceSuccess::Modified)).with_token("secret_token");

    let req = client.build_create_todo(&fields(json!({"task": "same"}))).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();

    let req = client.build_replace_todo(&created.id, &fields(json!({"task": "same"}))).unwrap();
    let err = client.parse_replace_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
