use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use crate::domain::listing::{Listing, ListingPatch};
use crate::domain::order::{Order, OrderPatch};
use crate::domain::user::{User, UserPatch};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store error: {0}")]
    Db(String),
}

/// The uniform CRUD contract over the three resource collections. One
/// port, one adapter per backing store; every operation is a single
/// store call.
#[async_trait]
pub trait MarketStore: Send + Sync + 'static {
    // Users: addressed by email, deleted by generated id.
    async fn create_user(&self, user: User) -> Result<InsertOutcome, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, StoreError>;
    async fn delete_user(&self, id: ObjectId) -> Result<DeleteAck, StoreError>;

    // Listings: no duplicate check on create.
    async fn create_listing(&self, listing: Listing) -> Result<ObjectId, StoreError>;
    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError>;
    async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, StoreError>;
    async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, StoreError>;
    async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, StoreError>;
    async fn update_listing(
        &self,
        id: ObjectId,
        patch: ListingPatch,
    ) -> Result<UpdateAck, StoreError>;
    async fn delete_listing(&self, id: ObjectId) -> Result<DeleteAck, StoreError>;

    // Orders.
    async fn create_order(&self, order: Order) -> Result<ObjectId, StoreError>;
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
    async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, StoreError>;
    async fn update_order(&self, id: ObjectId, patch: OrderPatch) -> Result<UpdateAck, StoreError>;
    async fn delete_order(&self, id: ObjectId) -> Result<DeleteAck, StoreError>;
}
