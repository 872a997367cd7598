mod common;

use common::{doc, TestStore};
use inventory_store::config::Config;
use inventory_store::{open, Collection, Model, Product, StoreError, Supplier};
use serde_json::json;

#[tokio::test]
async fn test_save_of_load_is_idempotent() {
    let app = TestStore::new();
    Product::create(&app.db, doc(json!({ "name": "A", "currentStock": 1, "tags": ["x", "y"] })))
        .await
        .unwrap();
    Product::create(&app.db, doc(json!({ "name": "B", "currentStock": 2, "price": 9.5 })))
        .await
        .unwrap();

    let before = app.db.data.load(Collection::Products).await.documents;
    app.db.data.save(Collection::Products, &before).await.unwrap();
    let after = app.db.data.load(Collection::Products).await.documents;

    assert_eq!(before, after);
}

#[tokio::test]
async fn test_collection_files_layout() {
    let app = TestStore::new();
    Product::new("A", 1).save(&app.db).await.unwrap();
    Supplier::new("S").save(&app.db).await.unwrap();

    let root = app.db.data.root();
    assert!(root.join("products.json").is_file());
    assert!(root.join("suppliers.json").is_file());
    assert!(!root.join("users.json").exists());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("products.json")).unwrap()).unwrap();
    assert!(raw.is_array());
    assert_eq!(raw[0]["name"], "A");
}

#[tokio::test]
async fn test_corrupt_collection_reads_as_empty_and_is_reported() {
    let app = TestStore::new();
    Product::new("A", 1).save(&app.db).await.unwrap();

    let path = app.db.data.path_for(Collection::Products);
    std::fs::write(&path, "[{\"_id\": \"broken\"").unwrap();

    let outcome = app.db.data.load(Collection::Products).await;
    assert!(outcome.documents.is_empty());
    let recovered = outcome.recovered.expect("corruption must be detected");
    assert_eq!(recovered.collection, "products");
    assert_eq!(recovered.path, path);

    assert!(Product::find(&app.db).await.unwrap().is_empty());
    assert!(Product::find_by_id(&app.db, "broken").await.unwrap().is_none());

    Product::new("Fresh", 3).save(&app.db).await.unwrap();
    let healed = app.db.data.load(Collection::Products).await;
    assert!(healed.recovered.is_none());
    assert_eq!(healed.documents.len(), 1);
}

#[tokio::test]
async fn test_write_failure_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();

    let db = open(&Config::new(&blocker));
    let result = Product::new("A", 1).save(&db).await;

    match result {
        Err(StoreError::Write { collection, .. }) => assert_eq!(collection, "products"),
        other => panic!("expected write failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_handles_see_each_others_writes_on_same_dir() {
    let app = TestStore::new();
    let mut product = Product::new("Shared", 2);
    product.save(&app.db).await.unwrap();

    let second = app.reopen();
    let seen = Product::find_by_id(&second, product.id().unwrap()).await.unwrap();
    assert_eq!(seen.map(|p| p.current_stock), Some(2));

    let isolated = TestStore::new();
    assert!(Product::find(&isolated.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_created_documents_have_equal_timestamps() {
    let app = TestStore::new();
    let created = app
        .db
        .supplier_repo
        .create(doc(json!({ "name": "Acme", "_id": "caller-chosen" })))
        .await
        .unwrap();

    assert_ne!(created["_id"], "caller-chosen");
    assert_eq!(created["createdAt"], created["updatedAt"]);
    assert!(created["createdAt"].as_str().unwrap().ends_with('Z'));
}
