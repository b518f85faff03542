#[cfg(not(any(feature = "memory", feature = "mongo")))]
compile_error!("Enable a store feature: `memory` or `mongo`.");

use bson::oid::ObjectId;
use pawmart_types::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::{MarketStore, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;

pub struct Store {
    #[cfg(all(feature = "memory", not(feature = "mongo")))]
    memory: memory::InMemoryStore,
    #[cfg(feature = "mongo")]
    mongo: mongo::MongoStore,
}

pub async fn build_store(uri: Option<&str>, db_name: &str) -> anyhow::Result<Store> {
    Store::build_store(uri, db_name).await
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "mongo")))]
    pub async fn build_store(_: Option<&str>, _: &str) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryStore::new(),
        })
    }

    // The connection string is required for the document store; a missing
    // MONGO_URI is fatal at startup.
    #[cfg(feature = "mongo")]
    pub async fn build_store(uri: Option<&str>, db_name: &str) -> anyhow::Result<Self> {
        let uri = uri.ok_or_else(|| anyhow::anyhow!("MONGO_URI must be set"))?;
        let mongo = mongo::MongoStore::new(uri, db_name).await?;
        Ok(Self { mongo })
    }
}

#[cfg(all(feature = "memory", not(feature = "mongo")))]
#[async_trait::async_trait]
impl MarketStore for Store {
    async fn create_user(&self, user: User) -> Result<InsertOutcome, StoreError> {
        self.memory.create_user(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.memory.list_users().await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.memory.find_user_by_email(email).await
    }

    async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, StoreError> {
        self.memory.update_user(email, patch).await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.memory.delete_user(id).await
    }

    async fn create_listing(&self, listing: Listing) -> Result<ObjectId, StoreError> {
        self.memory.create_listing(listing).await
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.memory.list_listings().await
    }

    async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, StoreError> {
        self.memory.find_listing(id).await
    }

    async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, StoreError> {
        self.memory.listings_by_seller(email).await
    }

    async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        self.memory.listings_by_category(category).await
    }

    async fn update_listing(
        &self,
        id: ObjectId,
        patch: ListingPatch,
    ) -> Result<UpdateAck, StoreError> {
        self.memory.update_listing(id, patch).await
    }

    async fn delete_listing(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.memory.delete_listing(id).await
    }

    async fn create_order(&self, order: Order) -> Result<ObjectId, StoreError> {
        self.memory.create_order(order).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.memory.list_orders().await
    }

    async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        self.memory.orders_by_buyer(email).await
    }

    async fn update_order(&self, id: ObjectId, patch: OrderPatch) -> Result<UpdateAck, StoreError> {
        self.memory.update_order(id, patch).await
    }

    async fn delete_order(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.memory.delete_order(id).await
    }
}

// When both features are enabled the document store wins; the memory
// adapter stays available for direct construction in tests.
#[cfg(feature = "mongo")]
#[async_trait::async_trait]
impl MarketStore for Store {
    async fn create_user(&self, user: User) -> Result<InsertOutcome, StoreError> {
        self.mongo.create_user(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.mongo.list_users().await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.mongo.find_user_by_email(email).await
    }

    async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, StoreError> {
        self.mongo.update_user(email, patch).await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.mongo.delete_user(id).await
    }

    async fn create_listing(&self, listing: Listing) -> Result<ObjectId, StoreError> {
        self.mongo.create_listing(listing).await
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.mongo.list_listings().await
    }

    async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, StoreError> {
        self.mongo.find_listing(id).await
    }

    async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, StoreError> {
        self.mongo.listings_by_seller(email).await
    }

    async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        self.mongo.listings_by_category(category).await
    }

    async fn update_listing(
        &self,
        id: ObjectId,
        patch: ListingPatch,
    ) -> Result<UpdateAck, StoreError> {
        self.mongo.update_listing(id, patch).await
    }

    async fn delete_listing(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.mongo.delete_listing(id).await
    }

    async fn create_order(&self, order: Order) -> Result<ObjectId, StoreError> {
        self.mongo.create_order(order).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.mongo.list_orders().await
    }

    async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        self.mongo.orders_by_buyer(email).await
    }

    async fn update_order(&self, id: ObjectId, patch: OrderPatch) -> Result<UpdateAck, StoreError> {
        self.mongo.update_order(id, patch).await
    }

    async fn delete_order(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        self.mongo.delete_order(id).await
    }
}
