use std::time::Duration;

use anyhow::Context;
use pawmart_types::domain::ack::{DeleteAck, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct PawMartClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct PawMartClient {
    base: Url,
    client: reqwest::Client,
}

/// Server ack for a user create; `inserted_id` is null when the email
/// was already taken.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub inserted_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub inserted_id: String,
}

impl PawMartClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<PawMartClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(PawMartClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn create_user(&self, user: &User) -> anyhow::Result<CreateUserResponse> {
        let res = self
            .client
            .post(self.url("users")?)
            .json(user)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let res = self
            .client
            .get(self.url("users")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_user(&self, email: &str) -> anyhow::Result<Option<User>> {
        let res = self
            .client
            .get(self.url(&format!("users/{email}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn update_user(&self, email: &str, patch: &UserPatch) -> anyhow::Result<UpdateAck> {
        let res = self
            .client
            .patch(self.url(&format!("users/{email}"))?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_user(&self, id: &str) -> anyhow::Result<DeleteAck> {
        let res = self
            .client
            .delete(self.url(&format!("users/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_listing(&self, listing: &Listing) -> anyhow::Result<InsertedResponse> {
        let res = self
            .client
            .post(self.url("listings")?)
            .json(listing)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_listings(&self) -> anyhow::Result<Vec<Listing>> {
        let res = self
            .client
            .get(self.url("listings")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_listing(&self, id: &str) -> anyhow::Result<Option<Listing>> {
        let res = self
            .client
            .get(self.url(&format!("listings/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn listings_by_seller(&self, email: &str) -> anyhow::Result<Vec<Listing>> {
        let res = self
            .client
            .get(self.url(&format!("listings/user/{email}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn listings_by_category(&self, category: &str) -> anyhow::Result<Vec<Listing>> {
        let res = self
            .client
            .get(self.url(&format!("listings/category/{category}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn update_listing(
        &self,
        id: &str,
        patch: &ListingPatch,
    ) -> anyhow::Result<UpdateAck> {
        let res = self
            .client
            .patch(self.url(&format!("listings/{id}"))?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_listing(&self, id: &str) -> anyhow::Result<DeleteAck> {
        let res = self
            .client
            .delete(self.url(&format!("listings/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_order(&self, order: &Order) -> anyhow::Result<InsertedResponse> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(order)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let res = self
            .client
            .get(self.url("orders")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn orders_by_buyer(&self, email: &str) -> anyhow::Result<Vec<Order>> {
        let res = self
            .client
            .get(self.url(&format!("orders/user/{email}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> anyhow::Result<UpdateAck> {
        let res = self
            .client
            .patch(self.url(&format!("orders/{id}"))?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_order(&self, id: &str) -> anyhow::Result<DeleteAck> {
        let res = self
            .client
            .delete(self.url(&format!("orders/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl PawMartClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<PawMartClient> {
        if let Some(client) = self.client {
            return Ok(PawMartClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(PawMartClient {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use httpmock::prelude::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            email: "user@example.com".into(),
            name: Some("User".into()),
            photo_url: None,
        }
    }

    fn sample_listing() -> Listing {
        Listing {
            id: Some(ObjectId::new()),
            seller_email: "user@example.com".into(),
            category: "dogs".into(),
            title: "Beagle".into(),
            description: None,
            price_cents: Some(25_000),
            image_url: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let server = MockServer::start();
        let user = sample_user();
        let hex = user.id.unwrap().to_hex();

        let create_mock = server.mock(|when, then| {
            when.method(POST).path("/users");
            then.status(200).json_body_obj(&CreateUserResponse {
                message: None,
                inserted_id: Some(hex.clone()),
            });
        });

        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/users/user@example.com");
            then.status(200).json_body_obj(&user);
        });

        let client = PawMartClient::new(&server.base_url()).unwrap();
        let created = client.create_user(&user).await.unwrap();
        assert_eq!(created.inserted_id.as_deref(), Some(hex.as_str()));
        assert!(created.message.is_none());

        let fetched = client.get_user("user@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.email, user.email);

        create_mock.assert();
        get_mock.assert();
    }

    #[tokio::test]
    async fn duplicate_user_is_a_success_shape() {
        let server = MockServer::start();
        let user = sample_user();

        let dup_mock = server.mock(|when, then| {
            when.method(POST).path("/users");
            then.status(200).json_body_obj(&CreateUserResponse {
                message: Some("User already exists".into()),
                inserted_id: None,
            });
        });

        let client = PawMartClient::new(&server.base_url()).unwrap();
        let created = client.create_user(&user).await.unwrap();
        assert_eq!(created.message.as_deref(), Some("User already exists"));
        assert!(created.inserted_id.is_none());

        dup_mock.assert();
    }

    #[tokio::test]
    async fn listing_filter_update_delete() {
        let server = MockServer::start();
        let listing = sample_listing();
        let hex = listing.id.unwrap().to_hex();

        let filter_mock = server.mock(|when, then| {
            when.method(GET).path("/listings/category/dogs");
            then.status(200).json_body_obj(&vec![listing.clone()]);
        });

        let update_mock = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH)
                .path(format!("/listings/{hex}"))
                .json_body_obj(&ListingPatch {
                    price_cents: Some(20_000),
                    ..ListingPatch::default()
                });
            then.status(200).json_body_obj(&UpdateAck {
                matched_count: 1,
                modified_count: 1,
            });
        });

        let delete_mock = server.mock(|when, then| {
            when.method(DELETE).path(format!("/listings/{hex}"));
            then.status(200)
                .json_body_obj(&DeleteAck { deleted_count: 1 });
        });

        let client = PawMartClient::new(&server.base_url()).unwrap();

        let dogs = client.listings_by_category("dogs").await.unwrap();
        assert_eq!(dogs.len(), 1);
        assert_eq!(dogs[0].title, "Beagle");

        let ack = client
            .update_listing(
                &hex,
                &ListingPatch {
                    price_cents: Some(20_000),
                    ..ListingPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ack.modified_count, 1);

        let ack = client.delete_listing(&hex).await.unwrap();
        assert_eq!(ack.deleted_count, 1);

        filter_mock.assert();
        update_mock.assert();
        delete_mock.assert();
    }
}
