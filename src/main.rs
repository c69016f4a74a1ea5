//! Service entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use wata_callback::adapters::http::{app_router, CallbackAppState, CallbackHttpSettings, HealthInfo};
use wata_callback::adapters::{
    CachedKeyProvider, InMemoryPaymentProfileStore, InMemoryProcessedCallbackRepository,
    InMemoryPurchaseRequestStore, PostgresPaymentProfileStore,
    PostgresProcessedCallbackRepository, PostgresPurchaseRequestStore, RefreshPolicy,
    WataClientConfig, WataGatewayClient,
};
use wata_callback::application::{CreatePaymentLinkHandler, HandleGatewayCallbackHandler};
use wata_callback::config::{AppConfig, ServerConfig};
use wata_callback::domain::callback::{CallbackValidator, DuplicateDeliveryGuard, IpAllowList};
use wata_callback::domain::foundation::PaymentProfileId;
use wata_callback::domain::purchase::PaymentProfile;
use wata_callback::ports::{
    Clock, PaymentProfileStore, ProcessedCallbackRepository, PurchaseRequestStore, SystemClock,
};

struct Stores {
    purchase_requests: Arc<dyn PurchaseRequestStore>,
    payment_profiles: Arc<dyn PaymentProfileStore>,
    processed: Arc<dyn ProcessedCallbackRepository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stores = build_stores(&config).await?;

    let gateway = Arc::new(WataGatewayClient::new(
        WataClientConfig::new(config.gateway.api_base_url.clone())
            .with_timeout(config.gateway.http_timeout()),
    )?);
    let key_provider = Arc::new(CachedKeyProvider::new(
        gateway.clone(),
        clock.clone(),
        RefreshPolicy::from_ttl_secs(config.gateway.key_cache_ttl_secs),
    ));

    let validator = Arc::new(CallbackValidator::new(
        IpAllowList::parse(&config.gateway.allowed_ips_list())?,
        key_provider,
        stores.purchase_requests.clone(),
        stores.payment_profiles.clone(),
        Arc::new(DuplicateDeliveryGuard::new(stores.processed.clone())),
    ));

    let callbacks = HandleGatewayCallbackHandler::new(
        validator,
        stores.purchase_requests.clone(),
        stores.processed.clone(),
        clock,
    );
    let payment_links = CreatePaymentLinkHandler::new(
        stores.purchase_requests,
        stores.payment_profiles,
        gateway,
        config.gateway.supported_currencies_list(),
        config.gateway.token.clone(),
    );

    let state = CallbackAppState::new(
        callbacks,
        payment_links,
        CallbackHttpSettings {
            signature_header: config.gateway.signature_header.clone(),
            default_provider_id: config.gateway.provider_id.clone(),
            trust_forwarded_for: config.server.trust_forwarded_for,
            links_api_key: config.server.links_api_key(),
        },
    );
    let app = app_router(
        state,
        HealthInfo {
            environment: config.server.environment.as_str(),
        },
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = config.server.environment.as_str(),
        gateway = %config.gateway.api_base_url,
        payment_links = config.server.links_api_key().is_some(),
        "Listening for gateway callbacks"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn Error>> {
    let Some(database) = &config.database else {
        tracing::warn!("No database configured, using in-memory stores");
        let profile = PaymentProfile::new(
            PaymentProfileId::new(1)?,
            config.gateway.provider_id.clone(),
            config.gateway.token.clone(),
            true,
        );
        return Ok(Stores {
            purchase_requests: Arc::new(InMemoryPurchaseRequestStore::new()),
            payment_profiles: Arc::new(InMemoryPaymentProfileStore::with_profiles(vec![profile])),
            processed: Arc::new(InMemoryProcessedCallbackRepository::new()),
        });
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Stores {
        purchase_requests: Arc::new(PostgresPurchaseRequestStore::new(pool.clone())),
        payment_profiles: Arc::new(PostgresPaymentProfileStore::new(pool.clone())),
        processed: Arc::new(PostgresProcessedCallbackRepository::new(pool)),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
