use async_trait::async_trait;
use bson::oid::ObjectId;
use dashmap::DashMap;
use pawmart_types::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::{MarketStore, StoreError};
use std::sync::Arc;

/// Map-per-collection store for tests and local runs. Natural order is
/// the map's iteration order, matching the contract's "no defined sort".
#[derive(Clone)]
pub struct InMemoryStore {
    users: Arc<DashMap<ObjectId, User>>,
    listings: Arc<DashMap<ObjectId, Listing>>,
    orders: Arc<DashMap<ObjectId, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            listings: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for InMemoryStore {
    async fn create_user(&self, mut user: User) -> Result<InsertOutcome, StoreError> {
        if self.users.iter().any(|kv| kv.value().email == user.email) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        let id = ObjectId::new();
        user.id = Some(id);
        self.users.insert(id, user);
        Ok(InsertOutcome::Inserted(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.iter().map(|kv| kv.value().clone()).collect())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|kv| kv.value().email == email)
            .map(|kv| kv.value().clone()))
    }

    async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, StoreError> {
        if let Some(mut entry) = self.users.iter_mut().find(|kv| kv.value().email == email) {
            let before = entry.value().clone();
            entry.value_mut().apply(&patch);
            let modified = *entry.value() != before;
            return Ok(UpdateAck {
                matched_count: 1,
                modified_count: modified as u64,
            });
        }
        Ok(UpdateAck::unmatched())
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        Ok(DeleteAck {
            deleted_count: self.users.remove(&id).is_some() as u64,
        })
    }

    async fn create_listing(&self, mut listing: Listing) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        listing.id = Some(id);
        self.listings.insert(id, listing);
        Ok(id)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.listings.iter().map(|kv| kv.value().clone()).collect())
    }

    async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, StoreError> {
        Ok(self.listings.get(&id).map(|kv| kv.clone()))
    }

    async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, StoreError> {
        Ok(self
            .listings
            .iter()
            .filter(|kv| kv.value().seller_email == email)
            .map(|kv| kv.value().clone())
            .collect())
    }

    async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        Ok(self
            .listings
            .iter()
            .filter(|kv| kv.value().category == category)
            .map(|kv| kv.value().clone())
            .collect())
    }

    async fn update_listing(
        &self,
        id: ObjectId,
        patch: ListingPatch,
    ) -> Result<UpdateAck, StoreError> {
        if let Some(mut entry) = self.listings.get_mut(&id) {
            let before = entry.value().clone();
            entry.value_mut().apply(&patch);
            let modified = *entry.value() != before;
            return Ok(UpdateAck {
                matched_count: 1,
                modified_count: modified as u64,
            });
        }
        Ok(UpdateAck::unmatched())
    }

    async fn delete_listing(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        Ok(DeleteAck {
            deleted_count: self.listings.remove(&id).is_some() as u64,
        })
    }

    async fn create_order(&self, mut order: Order) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        order.id = Some(id);
        self.orders.insert(id, order);
        Ok(id)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.iter().map(|kv| kv.value().clone()).collect())
    }

    async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .iter()
            .filter(|kv| kv.value().buyer_email == email)
            .map(|kv| kv.value().clone())
            .collect())
    }

    async fn update_order(&self, id: ObjectId, patch: OrderPatch) -> Result<UpdateAck, StoreError> {
        if let Some(mut entry) = self.orders.get_mut(&id) {
            let before = entry.value().clone();
            entry.value_mut().apply(&patch);
            let modified = *entry.value() != before;
            return Ok(UpdateAck {
                matched_count: 1,
                modified_count: modified as u64,
            });
        }
        Ok(UpdateAck::unmatched())
    }

    async fn delete_order(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        Ok(DeleteAck {
            deleted_count: self.orders.remove(&id).is_some() as u64,
        })
    }
}
