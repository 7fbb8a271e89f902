//! Backend entry-point: configuration, tracing, and server bootstrap.

mod server;

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
use zeroize::Zeroizing;

use backend::inbound::http::health::HealthState;
use backend::outbound::payout::{OnChainSettings, PaymentApiSettings};
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, create_server};

/// Command-line and environment configuration.
#[derive(Parser, Debug)]
#[command(name = "backend", about = "AUD lending platform API")]
struct Args {
    /// Socket address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// PostgreSQL connection string; fixture data is served when absent.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JSON-RPC endpoint for the on-chain payout backend.
    #[arg(long, env = "BLOCKCHAIN_RPC_URL", default_value = "")]
    blockchain_rpc_url: String,

    /// AUD stablecoin contract address.
    #[arg(long, env = "AUDC_CONTRACT_ADDRESS", default_value = "")]
    audc_contract_address: String,

    /// Signing key of the disbursement account.
    #[arg(long, env = "DISBURSEMENT_SIGNING_KEY", default_value = "", hide_env_values = true)]
    disbursement_signing_key: String,

    /// Base URL of the payments provider.
    #[arg(long, env = "PAYMENT_API_URL", default_value = "")]
    payment_api_url: String,

    /// Bearer token for the payments provider.
    #[arg(long, env = "PAYMENT_API_KEY", default_value = "", hide_env_values = true)]
    payment_api_key: String,

    /// Source account at the payments provider.
    #[arg(long, env = "PAYMENT_ACCOUNT_ID", default_value = "")]
    payment_account_id: String,

    /// Base URL of the market data API.
    #[arg(long, env = "COINGECKO_BASE_URL", default_value = "https://api.coingecko.com")]
    coingecko_base_url: Url,

    /// Seconds a cached market quote stays fresh.
    #[arg(long, env = "PRICE_CACHE_TTL_SECONDS", default_value_t = 60)]
    price_cache_ttl_seconds: u64,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let args = Args::parse();

    let db_pool = match &args.database_url {
        Some(database_url) => Some(
            DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?,
        ),
        None => {
            warn!("DATABASE_URL not set; serving fixture data");
            None
        }
    };

    let mut config = ServerConfig::new(
        args.bind_addr,
        OnChainSettings {
            rpc_url: args.blockchain_rpc_url,
            contract_address: args.audc_contract_address,
            signing_key: Zeroizing::new(args.disbursement_signing_key),
        },
        PaymentApiSettings {
            base_url: args.payment_api_url,
            api_key: args.payment_api_key,
            account_id: args.payment_account_id,
        },
        args.coingecko_base_url,
        Duration::from_secs(args.price_cache_ttl_seconds),
    );
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
