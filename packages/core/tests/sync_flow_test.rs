//! End-to-end synchronization flow against a mocked HTTP authority.
//!
//! Exercises the full wiring - HTTP transport, reply normalization, store,
//! dispatcher, loader - the way the editor uses it: reconcile a snapshot,
//! drop a node, wire a connection, commit an input edit.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loomflow_core::{
    AuthorityClient, AuthorityConfig, ConnectGesture, EditorSession, GraphAuthority,
    HttpAuthority, Position, ReconciliationLoader,
};

async fn session_for(server: &MockServer) -> EditorSession {
    let authority = HttpAuthority::new(AuthorityConfig {
        base_url: server.uri(),
        ..AuthorityConfig::default()
    })
    .unwrap();
    EditorSession::new(Arc::new(authority) as Arc<dyn GraphAuthority>)
}

fn graph_reply() -> serde_json::Value {
    json!({
        "metadata": {"projectId": "p1", "projectName": "demo"},
        "graph": {
            "nodes": [
                {
                    "nodeId": "node_1",
                    "name": "const_node",
                    "position": {"x": 0.0, "y": 0.0},
                    "input": [{"value": "2"}],
                    "output": ["value"]
                },
                {
                    "nodeId": "node_2",
                    "name": "add_node",
                    "position": {"x": 240.0, "y": 40.0},
                    "input": [{"var": "a"}, {"var": "b", "value": ""}],
                    "output": [{"id": "sum", "label": "Sum"}]
                }
            ],
            "connections": [
                {"sourceNodeId": "node_1", "sourcePort": 0, "targetNodeId": "node_2", "targetPort": 0}
            ]
        }
    })
}

#[tokio::test]
async fn reconcile_then_edit_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph"))
        .respond_with(ResponseTemplate::new(200).set_body_json(graph_reply()))
        .mount(&server)
        .await;

    // Connect must arrive with resolved positional indices.
    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .and(body_partial_json(json!({
            "cmd": "connection_add",
            "sourceNodeId": "node_1", "sourcePort": 0,
            "targetNodeId": "node_2", "targetPort": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "connection": {
                "sourceNodeId": "node_1", "sourcePort": 0,
                "targetNodeId": "node_2", "targetPort": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .and(body_partial_json(
            json!({"cmd": "node_update_input", "nodeId": "node_1", "inputIndex": 0, "value": "7"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server).await;

    // Reconcile with a shorter visible floor to keep the test snappy.
    let loader = ReconciliationLoader::with_min_visible(
        session.store().clone(),
        AuthorityClient::new(Arc::new(
            HttpAuthority::new(AuthorityConfig {
                base_url: server.uri(),
                ..AuthorityConfig::default()
            })
            .unwrap(),
        ) as Arc<dyn GraphAuthority>),
        Duration::ZERO,
    );
    loader.refresh().await.unwrap();

    let store = session.store();
    assert_eq!(store.nodes().await.len(), 2);
    let edges = store.edges().await;
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].target_handle, "a");

    // Wire const output into the second input of the add node.
    session
        .on_connect(ConnectGesture {
            source: "node_1".to_string(),
            source_handle: "value".to_string(),
            target: "node_2".to_string(),
            target_handle: "b".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(store.edges().await.len(), 2);

    // Two keystrokes, one blur, exactly one remote update.
    session.inputs().stage("node_1", 0, "5").await.unwrap();
    session.inputs().stage("node_1", 0, "7").await.unwrap();
    let committed = session.inputs().commit("node_1", 0).await.unwrap();
    assert_eq!(committed.as_deref(), Some("7"));
    assert_eq!(store.node("node_1").await.unwrap().inputs[0].value, "7");
}

#[tokio::test]
async fn drop_gesture_adds_the_authority_built_node() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .and(body_partial_json(json!({"cmd": "node_add", "type": "add"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "node": {
                "nodeId": "node_3",
                "name": "add_node",
                "position": {"x": 100.0, "y": 60.0},
                "input": [{"var": "a"}, {"var": "b"}],
                "output": ["sum"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server).await;
    session
        .on_drop("add", Position::new(100.0, 60.0))
        .await
        .unwrap();

    let node = session.store().node("node_3").await.unwrap();
    assert_eq!(node.inputs.len(), 2);
    assert_eq!(node.outputs[0].id, "sum");
}

#[tokio::test]
async fn authority_rejection_rolls_the_connect_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph"))
        .respond_with(ResponseTemplate::new(200).set_body_json(graph_reply()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .and(body_partial_json(json!({"cmd": "connection_add"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": "error", "message": "Connection already exists"}),
        ))
        .mount(&server)
        .await;

    let session = session_for(&server).await;
    let loader = ReconciliationLoader::with_min_visible(
        session.store().clone(),
        AuthorityClient::new(Arc::new(
            HttpAuthority::new(AuthorityConfig {
                base_url: server.uri(),
                ..AuthorityConfig::default()
            })
            .unwrap(),
        ) as Arc<dyn GraphAuthority>),
        Duration::ZERO,
    );
    loader.refresh().await.unwrap();
    let before = session.store().edges().await.len();

    let result = session
        .on_connect(ConnectGesture {
            source: "node_1".to_string(),
            source_handle: "value".to_string(),
            target: "node_2".to_string(),
            target_handle: "b".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(session.store().edges().await.len(), before);
}
