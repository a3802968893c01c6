use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pathdb_core::{ConnectionState, Error, Value};
use pathdb_remote::{DocumentCollection, HttpCollection, Record, RemoteDocStore, RemoteOptions};

async fn collection(server: &MockServer) -> HttpCollection {
    HttpCollection::new(&server.uri(), "pathdb").unwrap()
}

#[tokio::test]
async fn connect_lists_the_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = RemoteDocStore::new(Arc::new(collection(&server).await), RemoteOptions::default());
    store.connect().await.unwrap();
    assert_eq!(store.connection_state(), ConnectionState::Connected);
}

#[tokio::test]
async fn failed_connect_stays_disconnected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = RemoteDocStore::new(Arc::new(collection(&server).await), RemoteOptions::default());
    match store.connect().await {
        Err(Error::Remote { message }) => assert!(message.contains("503"), "{}", message),
        other => panic!("expected remote error, got {:?}", other),
    }
    assert_eq!(store.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn find_one_reads_a_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"key": "users", "value": {"count": 2}})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pathdb/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let collection = collection(&server).await;
    assert_eq!(
        collection.find_one("users").await.unwrap(),
        Some(Record::new("users", Value::from_iter([("count", 2)])))
    );
    assert_eq!(collection.find_one("missing").await.unwrap(), None);
}

#[tokio::test]
async fn find_all_rejects_non_arrays() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .mount(&server)
        .await;

    let collection = collection(&server).await;
    assert!(matches!(
        collection.find_all().await,
        Err(Error::Remote { .. })
    ));
}

#[tokio::test]
async fn delete_one_and_many() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/pathdb/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/pathdb/here"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/pathdb/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 3})))
        .mount(&server)
        .await;

    let collection = collection(&server).await;
    assert!(!collection.delete_one("gone").await.unwrap());
    assert!(collection.delete_one("here").await.unwrap());
    assert_eq!(collection.delete_many().await.unwrap(), 3);
}

#[tokio::test]
async fn nested_set_puts_whole_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/guild"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "guild", "value": {"lang": "en"}})),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/pathdb/guild"))
        .and(body_json(json!({
            "key": "guild",
            "value": {"lang": "en", "prefix": "!"},
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = RemoteDocStore::new(Arc::new(collection(&server).await), RemoteOptions::default());
    assert_eq!(
        store.set("guild.prefix", Value::from("!")).await.unwrap(),
        Value::from("!")
    );
}

#[tokio::test]
async fn emptied_record_is_deleted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathdb/a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "a", "value": {"b": {"c": 1}}})),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/pathdb/a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = RemoteDocStore::new(Arc::new(collection(&server).await), RemoteOptions::default());
    assert!(store.delete("a.b.c").await.unwrap());
}
