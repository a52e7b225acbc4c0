//! Client example demonstrating the payment flow against a running server.
//!
//! Run with: cargo run -p gateway-app --example client_example --no-default-features --features sqlite

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use gateway_client::GatewayClient;
use gateway_hex::{GatewayService, inbound::HttpServer};
use gateway_repo::{build_repo, security::ApiKeyValidator};
use gateway_types::{CardNumber, CreatePaymentRequest};
use rust_decimal_macros::dec;
use tempfile::tempdir;
use tokio::net::TcpListener;

const API_KEY: &str = "sk_example_key";
const CARD: &str = "1111-2222-1333";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("gateway.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url).await?;
    repo.register_card(&CardNumber::normalize(CARD), Utc::now() + Duration::days(365))
        .await?;

    let service = GatewayService::new(repo);
    let server = HttpServer::new(service, Arc::new(ApiKeyValidator::from_keys([API_KEY])));
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        match TcpListener::bind(&server_addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, router.into_make_service()).await {
                    eprintln!("server error: {e}");
                }
            }
            Err(e) => eprintln!("bind failed: {e}"),
        }
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    let base_url = format!("http://127.0.0.1:{port}");
    let client = GatewayClient::new(&base_url);

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let response = client.card_brand(CARD).await;
    assert!(response.is_err());
    println!("✅ Unauthorized without key: {}", response.unwrap_err());

    let client = client.with_api_key(API_KEY);

    let brand = client.card_brand(CARD).await?;
    println!("✅ Card {} is {}", brand.card, brand.brand);

    let validity = client.card_validity(CARD).await?;
    println!("✅ Card admissible: {}", validity.valid);

    let schedule = client.quote_installments(dec!(1000), dec!(1.1), 3).await?;
    println!("\n📋 Installment quote:");
    for installment in &schedule {
        println!("   {:>2}. {}", installment.sequence, installment.amount);
    }

    let created = client
        .create_payment(&CreatePaymentRequest {
            total: dec!(1000),
            interest_rate: dec!(1.1),
            installments: 3,
            card: CARD.to_string(),
            cvv: "123".to_string(),
        })
        .await?;
    println!("\n✅ {} (id={})", created.message, created.id);

    let status = client.payment_status(created.id).await?;
    println!("   Status: {} ({})", status.status, status.code);

    let confirmed = client.confirm_payment(created.id).await?;
    println!("✅ {}", confirmed.message);

    let refused = client.cancel_payment(created.id).await;
    println!("✅ Cancel after confirm refused: {}", refused.unwrap_err());

    let payment = client.get_payment(created.id).await?;
    println!("   Stored: {} {} on {}", payment.total, payment.status, payment.card);

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
