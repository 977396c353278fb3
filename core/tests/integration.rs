//! Full CRUD lifecycle against the live dispatcher.
//!
//! # Design
//! Starts the widget server on a random port, then exercises every client
//! operation over real HTTP. The client-side `Widget` is defined here rather
//! than borrowed from the server crate so that schema drift shows up as a
//! failure.

use std::net::SocketAddr;
use std::time::Duration;

use restrepo_core::{ApiError, ClientConfig, HttpExecutor, RestClientRepository, RetryPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    #[serde(default)]
    id: i64,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn widget(name: &str) -> Widget {
    Widget {
        id: 0,
        name: name.to_string(),
        description: None,
    }
}

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { restrepo_server::run(listener).await });
    addr
}

fn client(addr: SocketAddr) -> RestClientRepository<Widget> {
    let transport = reqwest_client();
    RestClientRepository::with_executor(
        ClientConfig::new(addr.ip().to_string(), addr.port(), "widgets"),
        HttpExecutor::new(transport),
    )
    .with_policy(RetryPolicy::new(3, Duration::from_millis(20)))
}

fn reqwest_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn crud_lifecycle() {
    let client = client(start_server().await);

    // Step 1: list — should be empty.
    assert!(client.get_all().await.unwrap().is_empty(), "expected empty list");

    // Step 2: create.
    let created = client.create(&widget("A")).await.unwrap().expect("created entity");
    assert_eq!(created.name, "A");
    assert_eq!(created.id, 1);
    let id = created.id;

    // Step 3: get the created widget.
    let fetched = client.get(&id).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));

    // Step 4: update, then confirm with a read.
    let mut changed = created.clone();
    changed.name = "B".to_string();
    changed.description = Some("blue".to_string());
    assert!(client.update(&id, &changed).await.unwrap());
    let fetched = client.get(&id).await.unwrap().expect("updated entity");
    assert_eq!(fetched.name, "B");
    assert_eq!(fetched.description.as_deref(), Some("blue"));

    // Step 5: list — one item.
    assert_eq!(client.get_all().await.unwrap(), vec![fetched]);

    // Step 6: delete.
    assert!(client.delete(&id).await.unwrap());

    // Step 7: reads and writes after delete report absence, not errors.
    assert!(client.get(&id).await.unwrap().is_none());
    assert!(!client.delete(&id).await.unwrap());
    assert!(!client.update(&id, &changed).await.unwrap());

    // Step 8: list — empty again.
    assert!(client.get_all().await.unwrap().is_empty(), "expected empty list after delete");
}

#[tokio::test]
async fn invalid_entities_surface_as_bad_request() {
    let client = client(start_server().await);

    let err = client.create(&widget("")).await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "name must not be empty");
        }
        other => panic!("expected 400, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_operations_share_one_client() {
    let client = client(start_server().await);

    let (wa, wb, wc) = (widget("a"), widget("b"), widget("c"));
    let (a, b, c) = tokio::join!(client.create(&wa), client.create(&wb), client.create(&wc));
    let mut ids: Vec<i64> = [a, b, c]
        .into_iter()
        .map(|created| created.unwrap().unwrap().id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(client.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn unreachable_server_is_a_terminal_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(addr).with_policy(RetryPolicy::new(2, Duration::from_millis(10)));
    match client.get_all().await {
        Err(ApiError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("expected exhausted retries, got {other:?}"),
    }
}

#[tokio::test]
async fn default_constructor_uses_shared_pool_and_default_policy() {
    let addr = start_server().await;
    let client: RestClientRepository<Widget> =
        RestClientRepository::new(addr.ip().to_string(), addr.port(), "widgets").unwrap();

    assert_eq!(client.policy(), &RetryPolicy::default());
    assert_eq!(client.config().resource_url(), format!("http://{addr}/api/widgets"));
    assert!(client.get(&1).await.unwrap().is_none());
}
