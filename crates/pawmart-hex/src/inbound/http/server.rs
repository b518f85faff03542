use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    serve, Json, Router,
};
use bson::oid::ObjectId;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::market_service::MarketService;
use crate::errors::AppError;
use pawmart_types::domain::ack::{DeleteAck, InsertOutcome, UpdateAck};
use pawmart_types::domain::listing::{Listing, ListingPatch};
use pawmart_types::domain::order::{Order, OrderPatch};
use pawmart_types::domain::user::{User, UserPatch};
use pawmart_types::ports::market_store::MarketStore;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<S>
where
    S: MarketStore,
{
    pub service: Arc<MarketService<S>>,
    pub config: HttpServerConfig,
}

/// Ack for a user create. The duplicate case is a success shape with a
/// null `insertedId`, mirroring the store's "nothing inserted" sentinel.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    inserted_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    inserted_id: String,
}

impl From<ObjectId> for InsertedResponse {
    fn from(id: ObjectId) -> Self {
        Self {
            inserted_id: id.to_hex(),
        }
    }
}

impl<S> HttpServer<S>
where
    S: MarketStore + Send + Sync + 'static,
{
    pub async fn new(service: MarketService<S>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = ObjectId::new().to_hex();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let svc = self.service.clone();
        Router::new()
            .route("/", get(root))
            .route("/users", post(create_user::<S>))
            .route("/users", get(list_users::<S>))
            // One capture name for the user key: email on read/patch,
            // generated id on delete.
            .route("/users/{key}", get(get_user::<S>))
            .route("/users/{key}", patch(update_user::<S>))
            .route("/users/{key}", delete(delete_user::<S>))
            .route("/listings", post(create_listing::<S>))
            .route("/listings", get(list_listings::<S>))
            .route("/listings/user/{email}", get(listings_by_seller::<S>))
            .route(
                "/listings/category/{category}",
                get(listings_by_category::<S>),
            )
            .route("/listings/{id}", get(get_listing::<S>))
            .route("/listings/{id}", patch(update_listing::<S>))
            .route("/listings/{id}", delete(delete_listing::<S>))
            .route("/orders", post(create_order::<S>))
            .route("/orders", get(list_orders::<S>))
            .route("/orders/user/{email}", get(orders_by_buyer::<S>))
            .route("/orders/{id}", patch(update_order::<S>))
            .route("/orders/{id}", delete(delete_order::<S>))
            .layer(CorsLayer::permissive())
            .layer(trace_layer)
            .with_state(svc)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn root() -> &'static str {
    "PawMart Server is Running..."
}

async fn create_user<S>(
    State(service): State<Arc<MarketService<S>>>,
    Json(user): Json<User>,
) -> Result<Json<CreateUserResponse>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    let body = match service.create_user(user).await? {
        InsertOutcome::Inserted(id) => CreateUserResponse {
            message: None,
            inserted_id: Some(id.to_hex()),
        },
        InsertOutcome::AlreadyExists => CreateUserResponse {
            message: Some("User already exists"),
            inserted_id: None,
        },
    };
    Ok(Json(body))
}

async fn list_users<S>(
    State(service): State<Arc<MarketService<S>>>,
) -> Result<Json<Vec<User>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.list_users().await?))
}

// Absent records are a success with a null body, never a 404.
async fn get_user<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(email): Path<String>,
) -> Result<Json<Option<User>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.get_user(&email).await?))
}

async fn update_user<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(email): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UpdateAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.update_user(&email, patch).await?))
}

async fn delete_user<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.delete_user(&id).await?))
}

async fn create_listing<S>(
    State(service): State<Arc<MarketService<S>>>,
    Json(listing): Json<Listing>,
) -> Result<Json<InsertedResponse>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    let id = service.create_listing(listing).await?;
    Ok(Json(id.into()))
}

async fn list_listings<S>(
    State(service): State<Arc<MarketService<S>>>,
) -> Result<Json<Vec<Listing>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.list_listings().await?))
}

async fn get_listing<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Listing>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.get_listing(&id).await?))
}

async fn listings_by_seller<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Listing>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.listings_by_seller(&email).await?))
}

async fn listings_by_category<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Listing>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.listings_by_category(&category).await?))
}

async fn update_listing<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<UpdateAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.update_listing(&id, patch).await?))
}

async fn delete_listing<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.delete_listing(&id).await?))
}

async fn create_order<S>(
    State(service): State<Arc<MarketService<S>>>,
    Json(order): Json<Order>,
) -> Result<Json<InsertedResponse>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    let id = service.create_order(order).await?;
    Ok(Json(id.into()))
}

async fn list_orders<S>(
    State(service): State<Arc<MarketService<S>>>,
) -> Result<Json<Vec<Order>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.list_orders().await?))
}

async fn orders_by_buyer<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Order>>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.orders_by_buyer(&email).await?))
}

async fn update_order<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<UpdateAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.update_order(&id, patch).await?))
}

async fn delete_order<S>(
    State(service): State<Arc<MarketService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError>
where
    S: MarketStore + Send + Sync + 'static,
{
    Ok(Json(service.delete_order(&id).await?))
}
