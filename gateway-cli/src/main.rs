//! Gateway CLI
//!
//! Command-line interface for the payment gateway API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use gateway_client::GatewayClient;
use gateway_types::{CreatePaymentRequest, PaymentId};

#[derive(Parser)]
#[command(name = "gateway")]
#[command(author, version, about = "Payment gateway API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the gateway API
    #[arg(long, env = "GATEWAY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// API key for authentication
    #[arg(long, env = "GATEWAY_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Card checks
    Card {
        #[command(subcommand)]
        action: CardCommands,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CardCommands {
    /// Detect the brand of a card number
    Brand {
        /// Card number, `-` separators allowed
        number: String,
    },
    /// Check whether a card is registered and unexpired
    Valid {
        /// Card number, `-` separators allowed
        number: String,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Preview an installment schedule
    Quote {
        /// Principal
        #[arg(long)]
        total: Decimal,
        /// Factor applied to the whole principal (1.1 means +10%)
        #[arg(long)]
        rate: Decimal,
        /// Number of installments
        #[arg(long)]
        installments: i32,
    },
    /// Create a payment
    Create {
        /// Principal
        #[arg(long)]
        total: Decimal,
        /// Interest rate factor
        #[arg(long)]
        rate: Decimal,
        /// Number of installments
        #[arg(long, default_value_t = 1)]
        installments: i32,
        /// Card number
        #[arg(long)]
        card: String,
        /// Card verification value
        #[arg(long)]
        cvv: String,
    },
    /// Get payment details
    Get {
        /// Payment ID
        id: PaymentId,
    },
    /// Get the status of a payment
    Status {
        /// Payment ID
        id: PaymentId,
    },
    /// Confirm a pending payment
    Confirm {
        /// Payment ID
        id: PaymentId,
    },
    /// Cancel a pending payment
    Cancel {
        /// Payment ID
        id: PaymentId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = GatewayClient::new(&cli.api_url);
    if let Some(key) = cli.api_key {
        client = client.with_api_key(key);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Card { action } => match action {
            CardCommands::Brand { number } => {
                let brand = client.card_brand(&number).await?;
                println!("{}", serde_json::to_string_pretty(&brand)?);
            }
            CardCommands::Valid { number } => {
                let validity = client.card_validity(&number).await?;
                println!("{}", serde_json::to_string_pretty(&validity)?);
            }
        },

        Commands::Payment { action } => match action {
            PaymentCommands::Quote {
                total,
                rate,
                installments,
            } => {
                let schedule = client.quote_installments(total, rate, installments).await?;
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            }
            PaymentCommands::Create {
                total,
                rate,
                installments,
                card,
                cvv,
            } => {
                let created = client
                    .create_payment(&CreatePaymentRequest {
                        total,
                        interest_rate: rate,
                        installments,
                        card,
                        cvv,
                    })
                    .await?;
                println!("{}", serde_json::to_string_pretty(&created)?);
            }
            PaymentCommands::Get { id } => {
                let payment = client.get_payment(id).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::Status { id } => {
                let status = client.payment_status(id).await?;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            PaymentCommands::Confirm { id } => {
                let result = client.confirm_payment(id).await?;
                println!("✓ {} ({})", result.message, result.status);
            }
            PaymentCommands::Cancel { id } => {
                let result = client.cancel_payment(id).await?;
                println!("✓ {} ({})", result.message, result.status);
            }
        },
    }

    Ok(())
}
