use std::sync::Arc;

use serde_json::json;

use pathdb::{
    Adapter, AllMode, ArgumentError, Config, ConnectionState, Database, Error, KeyValueStore,
    LengthMode, Map, MemoryCollection, Record, Value,
};

fn value(json: serde_json::Value) -> Value {
    pathdb_codec::json_to_value(json)
}

fn map(json: serde_json::Value) -> Map {
    match value(json) {
        Value::Map(map) => map,
        other => panic!("expected map, got {:?}", other),
    }
}

async fn file_db(dir: &tempfile::TempDir, adapter: Adapter) -> Database {
    Database::open(Config::default().adapter(adapter).folder(dir.path()))
        .await
        .unwrap()
}

async fn remote_db(collection: Arc<MemoryCollection>) -> Database {
    Database::with_collection(Config::default().adapter(Adapter::Remote), collection)
        .await
        .unwrap()
}

async fn basic_scenarios(db: &Database) {
    db.set("a.b", Value::from(5)).await.unwrap();
    assert_eq!(db.get("a.b").await.unwrap(), Some(Value::from(5)));
    assert_eq!(db.get("a").await.unwrap(), Some(value(json!({"b": 5}))));

    db.set("counter", Value::from(1)).await.unwrap();
    assert_eq!(db.add("counter", Value::from(4)).await.unwrap(), Value::from(5));
    assert_eq!(db.subtract("counter", Value::from(10)).await.unwrap(), Value::from(0));
    assert!(!db.has("counter").await.unwrap());

    assert_eq!(db.push("list", Value::from("x")).await.unwrap(), vec![Value::from("x")]);
    assert_eq!(db.unpush("list", Value::from("x")).await.unwrap(), Vec::<Value>::new());

    db.set("users", value(json!([{"name": "A"}, {"name": "B"}])))
        .await
        .unwrap();
    assert_eq!(
        db.find("users", &map(json!({"name": "B"}))).await.unwrap(),
        vec![value(json!({"name": "B"}))]
    );
    assert_eq!(
        db.find_one_and_delete("users", &map(json!({"name": "A"})))
            .await
            .unwrap(),
        value(json!({"name": "A"}))
    );
    assert_eq!(db.get("users").await.unwrap(), Some(value(json!([{"name": "B"}]))));
}

#[tokio::test]
async fn scenarios_on_every_file_adapter() {
    for adapter in [Adapter::Json, Adapter::Yaml, Adapter::Bson] {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir, adapter).await;
        assert_eq!(db.backend(), adapter.name());

        basic_scenarios(&db).await;
        assert!(dir
            .path()
            .join(format!("pathdb.{}", adapter.name()))
            .is_file());
    }
}

#[tokio::test]
async fn scenarios_on_remote_adapter() {
    let collection = Arc::new(MemoryCollection::new());
    let db = remote_db(collection.clone()).await;
    assert_eq!(db.backend(), "remote");

    basic_scenarios(&db).await;
    assert_eq!(
        collection.snapshot().first(),
        Some(&Record::new("a", value(json!({"b": 5}))))
    );
}

#[tokio::test]
async fn remote_delete_removes_emptied_record() {
    let collection = Arc::new(MemoryCollection::new());
    let db = remote_db(collection.clone()).await;

    db.set("a.b.c", Value::from(1)).await.unwrap();
    assert_eq!(
        collection.snapshot(),
        vec![Record::new("a", value(json!({"b": {"c": 1}})))]
    );

    assert!(db.delete("a.b.c").await.unwrap());
    assert!(collection.is_empty());
}

#[tokio::test]
async fn set_over_scalar_replaces_it() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, Adapter::Json).await;

    db.set("a", Value::from(1)).await.unwrap();
    db.set("a.b", Value::from(2)).await.unwrap();
    assert_eq!(db.get("a").await.unwrap(), Some(value(json!({"b": 2}))));
}

#[tokio::test]
async fn switching_adapters_opens_a_new_backend() {
    let dir = tempfile::tempdir().unwrap();
    let collection = Arc::new(MemoryCollection::new());

    let db = Database::with_collection(Config::default().folder(dir.path()), collection.clone())
        .await
        .unwrap();
    db.set("where", Value::from("file")).await.unwrap();

    let db = db.set_adapter(Adapter::Remote).await.unwrap();
    assert_eq!(db.get("where").await.unwrap(), None);
    db.set("where", Value::from("remote")).await.unwrap();
    assert_eq!(collection.len(), 1);

    let db = db.set_adapter(Adapter::Json).await.unwrap();
    assert_eq!(db.get("where").await.unwrap(), Some(Value::from("file")));
    assert!(matches!(
        db.connection_state().await,
        Err(Error::Unsupported { .. })
    ));
}

#[tokio::test]
async fn remote_lifecycle() {
    let db = remote_db(Arc::new(MemoryCollection::new())).await;
    assert_eq!(db.connection_state().await.unwrap(), ConnectionState::Connected);

    db.disconnect().await.unwrap();
    assert_eq!(db.connection_state().await.unwrap(), ConnectionState::Disconnected);
    assert_eq!(db.uptime().await.unwrap(), std::time::Duration::ZERO);
}

#[tokio::test]
async fn separator_and_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, Adapter::Json).await;

    let db = db.set_separator("/").await.unwrap();
    db.set("a/b", Value::from(1)).await.unwrap();
    assert_eq!(db.get("a").await.unwrap(), Some(value(json!({"b": 1}))));

    let db = db.set_file("other").await.unwrap();
    assert_eq!(db.get("a/b").await.unwrap(), None);
    assert_eq!(db.config().file, "other");

    let failed = db.set_separator("::").await.unwrap_err();
    match failed.error() {
        Error::InvalidArgument(ArgumentError::InvalidSeparator { separator }) => {
            assert_eq!(separator, "::")
        }
        other => panic!("expected invalid separator, got {:?}", other),
    }

    let db = failed.into_database();
    assert_eq!(db.config().separator, '/');
    assert_eq!(db.config().file, "other");
}

#[tokio::test]
async fn readable_json_is_indented() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, Adapter::Json)
        .await
        .set_readable(true)
        .await
        .unwrap();

    db.set("a", Value::from(1)).await.unwrap();
    let written = std::fs::read_to_string(dir.path().join("pathdb.json")).unwrap();
    assert_eq!(written, "{\n  \"a\": 1\n}");
}

#[tokio::test]
async fn no_blank_data_prunes_parents() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, Adapter::Yaml)
        .await
        .set_no_blank_data(true)
        .await
        .unwrap();

    db.set("a.b.c", Value::from(1)).await.unwrap();
    db.set("keep", Value::from(true)).await.unwrap();
    assert!(db.delete("a.b.c").await.unwrap());
    assert_eq!(db.all(AllMode::All).await.unwrap(), value(json!({"keep": true})));
}

#[tokio::test]
async fn backup_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, Adapter::Json).await;

    db.set("a", Value::from(1)).await.unwrap();
    let backup = db.backup("snapshot").await.unwrap();
    assert_eq!(backup, dir.path().join("snapshot.json"));

    db.clear().await.unwrap();
    assert_eq!(db.length(LengthMode::Object).await.unwrap(), 0);

    db.load_backup(&backup).await.unwrap();
    assert_eq!(db.get("a").await.unwrap(), Some(Value::from(1)));
}

#[tokio::test]
async fn remote_export_and_unsupported_scans() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::with_collection(
        Config::default().adapter(Adapter::Remote).folder(dir.path()),
        Arc::new(MemoryCollection::new()),
    )
    .await
    .unwrap();

    db.set("guild-1", value(json!({"prefix": "!"}))).await.unwrap();
    let target = db.backup("dump").await.unwrap();
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(target).unwrap()).unwrap();
    assert_eq!(written, json!({"guild": {"1": {"prefix": "!"}}}));

    let error = db.starts_with("g").await.unwrap_err();
    assert!(matches!(error, Error::Unsupported { .. }));
    assert_eq!(
        db.message(&error),
        "`starts_with` is not supported by the remote backend"
    );
}
