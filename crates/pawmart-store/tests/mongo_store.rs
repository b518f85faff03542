#![cfg(feature = "mongo")]

use pawmart_store::mongo::MongoStore;

// The driver connects lazily, so constructing the adapter needs no
// running mongod. Operations against it are covered by the memory
// adapter tests plus manual runs against a local server.
#[tokio::test]
async fn mongo_store_builds_without_a_server() {
    let store = MongoStore::new("mongodb://127.0.0.1:27017", "pawmart_test").await;
    assert!(store.is_ok());
}

#[tokio::test]
async fn mongo_store_rejects_malformed_uri() {
    let store = MongoStore::new("not-a-uri", "pawmart_test").await;
    assert!(store.is_err());
}
