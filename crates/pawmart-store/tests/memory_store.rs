#![cfg(feature = "memory")]

use bson::oid::ObjectId;
use pawmart_store::memory::InMemoryStore;
use pawmart_types::domain::ack::InsertOutcome;
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::MarketStore;

fn user(email: &str) -> User {
    User {
        id: None,
        email: email.into(),
        name: Some("Test".into()),
        photo_url: None,
    }
}

fn listing(seller: &str, category: &str, title: &str) -> Listing {
    Listing {
        id: None,
        seller_email: seller.into(),
        category: category.into(),
        title: title.into(),
        description: None,
        price_cents: Some(10_000),
        image_url: None,
        location: None,
    }
}

fn order(buyer: &str, listing_id: &str) -> Order {
    Order {
        id: None,
        buyer_email: buyer.into(),
        listing_id: listing_id.into(),
        status: Some("pending".into()),
        offer_cents: None,
    }
}

#[tokio::test]
async fn user_create_is_deduplicated_by_email() {
    let store = InMemoryStore::new();

    let first = store.create_user(user("a@x.com")).await.unwrap();
    assert!(matches!(first, InsertOutcome::Inserted(_)));

    let second = store.create_user(user("a@x.com")).await.unwrap();
    assert_eq!(second, InsertOutcome::AlreadyExists);

    let all = store.list_users().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn user_lookup_update_delete_flow() {
    let store = InMemoryStore::new();
    let id = match store.create_user(user("a@x.com")).await.unwrap() {
        InsertOutcome::Inserted(id) => id,
        InsertOutcome::AlreadyExists => panic!("fresh store"),
    };

    let found = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(found.id, Some(id));

    let ack = store
        .update_user(
            "a@x.com",
            UserPatch {
                photo_url: Some("https://pics.example/p.png".into()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.matched_count, 1);
    assert_eq!(ack.modified_count, 1);

    // Untouched field survives the patch.
    let found = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(found.name.as_deref(), Some("Test"));
    assert_eq!(found.photo_url.as_deref(), Some("https://pics.example/p.png"));

    let ack = store.delete_user(id).await.unwrap();
    assert_eq!(ack.deleted_count, 1);
    let ack = store.delete_user(id).await.unwrap();
    assert_eq!(ack.deleted_count, 0);
}

#[tokio::test]
async fn update_with_no_changes_reports_unmodified() {
    let store = InMemoryStore::new();
    store.create_user(user("a@x.com")).await.unwrap();

    let ack = store
        .update_user(
            "a@x.com",
            UserPatch {
                name: Some("Test".into()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.matched_count, 1);
    assert_eq!(ack.modified_count, 0);
}

#[tokio::test]
async fn listing_filters_return_exact_sets() {
    let store = InMemoryStore::new();
    store
        .create_listing(listing("s1@x.com", "dogs", "Beagle"))
        .await
        .unwrap();
    store
        .create_listing(listing("s1@x.com", "cats", "Tabby"))
        .await
        .unwrap();
    store
        .create_listing(listing("s2@x.com", "dogs", "Husky"))
        .await
        .unwrap();

    let dogs = store.listings_by_category("dogs").await.unwrap();
    assert_eq!(dogs.len(), 2);
    assert!(dogs.iter().all(|l| l.category == "dogs"));

    let s1 = store.listings_by_seller("s1@x.com").await.unwrap();
    assert_eq!(s1.len(), 2);
    assert!(s1.iter().all(|l| l.seller_email == "s1@x.com"));

    let none = store.listings_by_category("birds").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn listing_get_update_delete_flow() {
    let store = InMemoryStore::new();
    let id = store
        .create_listing(listing("s1@x.com", "dogs", "Beagle"))
        .await
        .unwrap();

    let found = store.find_listing(id).await.unwrap().unwrap();
    assert_eq!(found.title, "Beagle");

    let ack = store
        .update_listing(
            id,
            ListingPatch {
                price_cents: Some(5_000),
                ..ListingPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.matched_count, 1);

    let found = store.find_listing(id).await.unwrap().unwrap();
    assert_eq!(found.price_cents, Some(5_000));
    assert_eq!(found.title, "Beagle");

    let ack = store.delete_listing(id).await.unwrap();
    assert_eq!(ack.deleted_count, 1);
    assert!(store.find_listing(id).await.unwrap().is_none());
}

#[tokio::test]
async fn order_flow_and_buyer_filter() {
    let store = InMemoryStore::new();
    let listing_id = store
        .create_listing(listing("s1@x.com", "dogs", "Beagle"))
        .await
        .unwrap();
    let id = store
        .create_order(order("b1@x.com", &listing_id.to_hex()))
        .await
        .unwrap();
    store
        .create_order(order("b2@x.com", &listing_id.to_hex()))
        .await
        .unwrap();

    let mine = store.orders_by_buyer("b1@x.com").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, Some(id));

    let ack = store
        .update_order(
            id,
            OrderPatch {
                status: Some("accepted".into()),
                ..OrderPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.modified_count, 1);

    let ack = store.delete_order(id).await.unwrap();
    assert_eq!(ack.deleted_count, 1);
    assert_eq!(store.list_orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_keys_report_zero_counts() {
    let store = InMemoryStore::new();
    let missing = ObjectId::new();

    assert!(store.find_listing(missing).await.unwrap().is_none());
    assert!(store
        .find_user_by_email("nobody@x.com")
        .await
        .unwrap()
        .is_none());

    let ack = store
        .update_listing(missing, ListingPatch::default())
        .await
        .unwrap();
    assert_eq!(ack.matched_count, 0);

    let ack = store.delete_order(missing).await.unwrap();
    assert_eq!(ack.deleted_count, 0);
}
