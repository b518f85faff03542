use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use pawmart_types::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::{MarketStore, StoreError};
use serde::Serialize;

/// Document-store adapter. Holds one typed collection handle per
/// resource kind; the driver's client is connection-pooled and safe to
/// share across requests without extra locking.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    listings: Collection<Listing>,
    orders: Collection<Order>,
}

impl MongoStore {
    pub async fn new(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        tracing::info!(db = db_name, "document store ready");
        Ok(Self {
            users: db.collection("users"),
            listings: db.collection("listings"),
            orders: db.collection("orders"),
        })
    }
}

fn db_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Db(e.to_string())
}

/// Serialize a patch into a `$set` document. Patch fields skip when
/// absent, so only the present fields are written.
fn set_doc<P: Serialize>(patch: &P) -> Result<Document, StoreError> {
    bson::to_document(patch).map_err(db_err)
}

impl MongoStore {
    /// The driver rejects an empty `$set`; answer an all-absent patch
    /// with a lookup-derived ack instead of issuing the update.
    async fn update_by<T>(
        &self,
        coll: &Collection<T>,
        filter: Document,
        set: Document,
    ) -> Result<UpdateAck, StoreError>
    where
        T: Send + Sync + serde::de::DeserializeOwned + Serialize,
    {
        if set.is_empty() {
            let matched = coll.find_one(filter).await.map_err(db_err)?.is_some();
            return Ok(UpdateAck {
                matched_count: matched as u64,
                modified_count: 0,
            });
        }
        let res = coll
            .update_one(filter, doc! { "$set": set })
            .await
            .map_err(db_err)?;
        Ok(UpdateAck {
            matched_count: res.matched_count,
            modified_count: res.modified_count,
        })
    }
}

#[async_trait]
impl MarketStore for MongoStore {
    async fn create_user(&self, mut user: User) -> Result<InsertOutcome, StoreError> {
        let existing = self
            .users
            .find_one(doc! { "email": &user.email })
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(InsertOutcome::AlreadyExists);
        }
        let id = ObjectId::new();
        user.id = Some(id);
        self.users.insert_one(&user).await.map_err(db_err)?;
        Ok(InsertOutcome::Inserted(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(doc! {}).await.map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "email": email })
            .await
            .map_err(db_err)
    }

    async fn update_user(&self, email: &str, patch: UserPatch) -> Result<UpdateAck, StoreError> {
        let set = set_doc(&patch)?;
        self.update_by(&self.users, doc! { "email": email }, set)
            .await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        let res = self
            .users
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;
        Ok(DeleteAck {
            deleted_count: res.deleted_count,
        })
    }

    async fn create_listing(&self, mut listing: Listing) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        listing.id = Some(id);
        self.listings.insert_one(&listing).await.map_err(db_err)?;
        Ok(id)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let cursor = self.listings.find(doc! {}).await.map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, StoreError> {
        self.listings
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)
    }

    async fn listings_by_seller(&self, email: &str) -> Result<Vec<Listing>, StoreError> {
        let cursor = self
            .listings
            .find(doc! { "seller_email": email })
            .await
            .map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn listings_by_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        let cursor = self
            .listings
            .find(doc! { "category": category })
            .await
            .map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn update_listing(
        &self,
        id: ObjectId,
        patch: ListingPatch,
    ) -> Result<UpdateAck, StoreError> {
        let set = set_doc(&patch)?;
        self.update_by(&self.listings, doc! { "_id": id }, set).await
    }

    async fn delete_listing(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        let res = self
            .listings
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;
        Ok(DeleteAck {
            deleted_count: res.deleted_count,
        })
    }

    async fn create_order(&self, mut order: Order) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        order.id = Some(id);
        self.orders.insert_one(&order).await.map_err(db_err)?;
        Ok(id)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let cursor = self.orders.find(doc! {}).await.map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn orders_by_buyer(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let cursor = self
            .orders
            .find(doc! { "buyer_email": email })
            .await
            .map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn update_order(&self, id: ObjectId, patch: OrderPatch) -> Result<UpdateAck, StoreError> {
        let set = set_doc(&patch)?;
        self.update_by(&self.orders, doc! { "_id": id }, set).await
    }

    async fn delete_order(&self, id: ObjectId) -> Result<DeleteAck, StoreError> {
        let res = self
            .orders
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;
        Ok(DeleteAck {
            deleted_count: res.deleted_count,
        })
    }
}
