use crate::errors::AppError;
use bson::oid::ObjectId;
use pawmart_types::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::MarketStore;

pub struct MarketService<S: MarketStore> {
    store: S,
}

/// A malformed identifier addresses nothing: it is "not found", never
/// an error, uniformly across resource kinds and operations.
fn parse_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

impl<S: MarketStore> MarketService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, user: User) -> Result<InsertOutcome, AppError> {
        self.store
            .create_user(user)
            .await
            .map_err(|e| AppError::store("Failed to create user", e))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store
            .list_users()
            .await
            .map_err(|e| AppError::store("Failed to fetch users", e))
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.store
            .find_user_by_email(email)
            .await
            .map_err(|e| AppError::store("Failed to fetch user", e))
    }

    pub async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, AppError> {
        self.store
            .update_user(email, patch)
            .await
            .map_err(|e| AppError::store("Failed to update user", e))
    }

    pub async fn delete_user(&self, id: &str) -> Result<DeleteAck, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(DeleteAck { deleted_count: 0 });
        };
        self.store
            .delete_user(id)
            .await
            .map_err(|e| AppError::store("Failed to delete user", e))
    }

    pub async fn create_listing(&self, listing: Listing) -> Result<ObjectId, AppError> {
        self.store
            .create_listing(listing)
            .await
            .map_err(|e| AppError::store("Failed to create listing", e))
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>, AppError> {
        self.store
            .list_listings()
            .await
            .map_err(|e| AppError::store("Failed to fetch listings", e))
    }

    pub async fn get_listing(&self, id: &str) -> Result<Option<Listing>, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        self.store
            .find_listing(id)
            .await
            .map_err(|e| AppError::store("Failed to fetch listing", e))
    }

    pub async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, AppError> {
        self.store
            .listings_by_seller(email)
            .await
            .map_err(|e| AppError::store("Failed to fetch listings", e))
    }

    pub async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, AppError> {
        self.store
            .listings_by_category(category)
            .await
            .map_err(|e| AppError::store("Failed to fetch listings", e))
    }

    pub async fn update_listing(
        &self,
        id: &str,
        patch: ListingPatch,
    ) -> Result<UpdateAck, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(UpdateAck::unmatched());
        };
        self.store
            .update_listing(id, patch)
            .await
            .map_err(|e| AppError::store("Failed to update listing", e))
    }

    pub async fn delete_listing(&self, id: &str) -> Result<DeleteAck, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(DeleteAck { deleted_count: 0 });
        };
        self.store
            .delete_listing(id)
            .await
            .map_err(|e| AppError::store("Failed to delete listing", e))
    }

    pub async fn create_order(&self, order: Order) -> Result<ObjectId, AppError> {
        self.store
            .create_order(order)
            .await
            .map_err(|e| AppError::store("Failed to create order", e))
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        self.store
            .list_orders()
            .await
            .map_err(|e| AppError::store("Failed to fetch orders", e))
    }

    pub async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, AppError> {
        self.store
            .orders_by_buyer(email)
            .await
            .map_err(|e| AppError::store("Failed to fetch orders", e))
    }

    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<UpdateAck, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(UpdateAck::unmatched());
        };
        self.store
            .update_order(id, patch)
            .await
            .map_err(|e| AppError::store("Failed to update order", e))
    }

    pub async fn delete_order(&self, id: &str) -> Result<DeleteAck, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(DeleteAck { deleted_count: 0 });
        };
        self.store
            .delete_order(id)
            .await
            .map_err(|e| AppError::store("Failed to delete order", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmart_store::memory::InMemoryStore;

    fn user(email: &str) -> User {
        User {
            id: None,
            email: email.into(),
            name: Some("Test".into()),
            photo_url: None,
        }
    }

    fn listing(category: &str) -> Listing {
        Listing {
            id: None,
            seller_email: "seller@x.com".into(),
            category: category.into(),
            title: "Beagle".into(),
            description: None,
            price_cents: None,
            image_url: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn duplicate_user_create_signals_already_exists() {
        let svc = MarketService::new(InMemoryStore::new());

        let first = svc.create_user(user("a@x.com")).await.unwrap();
        assert!(matches!(first, InsertOutcome::Inserted(_)));

        let second = svc.create_user(user("a@x.com")).await.unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);

        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_ids_behave_as_not_found() {
        let svc = MarketService::new(InMemoryStore::new());

        assert!(svc.get_listing("definitely-not-an-oid").await.unwrap().is_none());

        let ack = svc
            .update_order("nope", OrderPatch::default())
            .await
            .unwrap();
        assert_eq!(ack.matched_count, 0);

        let ack = svc.delete_user("x").await.unwrap();
        assert_eq!(ack.deleted_count, 0);

        let ack = svc.delete_listing("12345").await.unwrap();
        assert_eq!(ack.deleted_count, 0);
    }

    #[tokio::test]
    async fn listing_crud_round_trip() {
        let svc = MarketService::new(InMemoryStore::new());
        let id = svc.create_listing(listing("dogs")).await.unwrap();

        let found = svc.get_listing(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(found.category, "dogs");

        let ack = svc
            .update_listing(
                &id.to_hex(),
                ListingPatch {
                    location: Some("Austin".into()),
                    ..ListingPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ack.matched_count, 1);

        let found = svc.get_listing(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(found.location.as_deref(), Some("Austin"));
        assert_eq!(found.title, "Beagle");

        let ack = svc.delete_listing(&id.to_hex()).await.unwrap();
        assert_eq!(ack.deleted_count, 1);
        let ack = svc.delete_listing(&id.to_hex()).await.unwrap();
        assert_eq!(ack.deleted_count, 0);
    }

    #[tokio::test]
    async fn category_filter_round_trip() {
        let svc = MarketService::new(InMemoryStore::new());
        svc.create_listing(listing("dogs")).await.unwrap();
        svc.create_listing(listing("dogs")).await.unwrap();
        svc.create_listing(listing("cats")).await.unwrap();

        let dogs = svc.listings_by_category("dogs").await.unwrap();
        assert_eq!(dogs.len(), 2);
        assert!(dogs.iter().all(|l| l.category == "dogs"));
    }
}
