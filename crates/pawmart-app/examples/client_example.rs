///  To run (needs a local mongod):
///  cargo r --example client_example
use pawmart_client::PawMartClient;
use pawmart_hex::application::market_service::MarketService;
use pawmart_hex::inbound::http::{HttpServer, HttpServerConfig};
use pawmart_store::build_store;
use pawmart_types::domain::listing::Listing;
use pawmart_types::domain::user::User;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start the server on an ephemeral port against a local store.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into());
    let store = build_store(Some(&uri), "pawmart_example").await?;
    let service = MarketService::new(store);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Use the client against the running server.
    let client = PawMartClient::new(&addr)?;
    let created = client
        .create_user(&User {
            id: None,
            email: "example@example.com".into(),
            name: Some("Example".into()),
            photo_url: None,
        })
        .await?;
    match &created.inserted_id {
        Some(id) => println!("Created user id={id}"),
        None => println!(
            "{}",
            created.message.as_deref().unwrap_or("no user inserted")
        ),
    }

    let listing = client
        .create_listing(&Listing {
            id: None,
            seller_email: "example@example.com".into(),
            category: "dogs".into(),
            title: "Corgi puppy".into(),
            description: Some("Very round".into()),
            price_cents: Some(50_000),
            image_url: None,
            location: Some("Austin".into()),
        })
        .await?;
    println!("Created listing id={}", listing.inserted_id);

    let dogs = client.listings_by_category("dogs").await?;
    println!("{} listing(s) in category 'dogs'", dogs.len());

    let ack = client.delete_listing(&listing.inserted_id).await?;
    println!("Deleted {} listing(s)", ack.deleted_count);

    handle.abort();
    Ok(())
}
