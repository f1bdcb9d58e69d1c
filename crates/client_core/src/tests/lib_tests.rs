use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::protocol::host_context_menu;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Deserialize)]
struct ObjectForm {
    objuuid: String,
}

#[derive(Clone, Default)]
struct ServerState {
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

fn sample_host_json() -> Value {
    json!({
        "objuuid": "abc-1",
        "name": "HostA",
        "type": "host",
        "url": "http://x",
        "loglevel": "info",
        "enabled": true,
        "seconds": "0",
        "minutes": "5",
        "hours": "*",
        "dayofmonth": "*",
        "dayofweek": "*",
        "year": "*"
    })
}

async fn get_object(
    State(state): State<ServerState>,
    Form(form): Form<ObjectForm>,
) -> Result<Json<Value>, StatusCode> {
    state
        .seen
        .lock()
        .await
        .push(("get_object".into(), form.objuuid.clone()));
    if form.objuuid == "abc-1" {
        Ok(Json(sample_host_json()))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn wake(State(state): State<ServerState>, Form(form): Form<ObjectForm>) -> &'static str {
    state.seen.lock().await.push(("wake".into(), form.objuuid));
    ""
}

async fn context(Form(form): Form<ObjectForm>) -> Json<ContextMenu> {
    Json(host_context_menu(&ObjUuid::from(form.objuuid)))
}

async fn post_object(Json(mut record): Json<Value>) -> Json<Value> {
    record["stored"] = Value::Bool(true);
    Json(record)
}

async fn spawn_inventory_server(prefix: &str) -> (String, ServerState) {
    let state = ServerState::default();
    let routes = Router::new()
        .route("/inventory/get_object", post(get_object))
        .route("/inventory/context", post(context))
        .route("/inventory/post_object", post(post_object))
        .route("/host/wake", post(wake))
        .with_state(state.clone());
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}{prefix}"), state)
}

#[tokio::test]
async fn get_object_posts_objuuid_form_and_decodes_host() {
    let (server_url, state) = spawn_inventory_server("").await;
    let client = InventoryClient::new(&server_url).expect("client");

    let record = client
        .get_object(&ObjUuid::from("abc-1"))
        .await
        .expect("get_object");

    assert_eq!(record.name, "HostA");
    assert_eq!(record.kind, "host");
    assert_eq!(record.minutes, "5");
    assert!(record.enabled);
    assert_eq!(
        state.seen.lock().await.as_slice(),
        &[("get_object".to_string(), "abc-1".to_string())]
    );
}

#[tokio::test]
async fn server_url_path_prefix_is_kept() {
    let (server_url, _state) = spawn_inventory_server("/ctrl").await;
    let client = InventoryClient::new(&server_url).expect("client");

    let record = client
        .get_object(&ObjUuid::from("abc-1"))
        .await
        .expect("get_object under prefix");
    assert_eq!(record.objuuid, ObjUuid::from("abc-1"));
}

#[tokio::test]
async fn missing_object_surfaces_status_error() {
    let (server_url, _state) = spawn_inventory_server("").await;
    let client = InventoryClient::new(&server_url).expect("client");

    let err = client
        .get_object(&ObjUuid::from("nope"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, GatewayError::Status { status: 404, .. }));
    assert_eq!(err.api_error().code, ErrorCode::NotFound);
}

#[tokio::test]
async fn wake_ignores_response_body() {
    let (server_url, state) = spawn_inventory_server("").await;
    let client = InventoryClient::new(&server_url).expect("client");

    client
        .wake(&ObjUuid::from("abc-1"))
        .await
        .expect("wake");

    assert_eq!(
        state.seen.lock().await.as_slice(),
        &[("wake".to_string(), "abc-1".to_string())]
    );
}

#[tokio::test]
async fn context_menu_and_post_object_round_trip() {
    let (server_url, _state) = spawn_inventory_server("").await;
    let client = InventoryClient::new(&server_url).expect("client");

    let menu = client
        .context_menu(&ObjUuid::from("abc-1"))
        .await
        .expect("context");
    assert_eq!(menu["edit"].action.route, GET_OBJECT_ROUTE);

    let mut record: HostRecord = serde_json::from_value(sample_host_json()).expect("record");
    record.hours = "4".into();
    let stored = client.post_object(&record).await.expect("post_object");

    assert_eq!(stored.hours, "4");
    assert_eq!(stored.extra.get("stored"), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = InventoryClient::with_timeout(&format!("http://{addr}"), Duration::from_secs(2))
        .expect("client");
    let err = client
        .wake(&ObjUuid::from("abc-1"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, GatewayError::Transport { .. }));
    assert_eq!(err.api_error().code, ErrorCode::Unavailable);
}

#[test]
fn rejects_unparseable_server_url() {
    let err = InventoryClient::new("not a url").err().expect("must fail");
    assert!(matches!(err, GatewayError::InvalidUrl { .. }));
}

#[tokio::test]
async fn missing_gateway_fails_every_call() {
    let gateway = MissingInventoryGateway;
    assert!(matches!(
        gateway.get_object(&ObjUuid::from("a")).await,
        Err(GatewayError::Unavailable)
    ));
    assert!(gateway.wake(&ObjUuid::from("a")).await.is_err());
}
