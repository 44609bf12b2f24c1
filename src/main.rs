//! CASA Pipeline server binary.
//!
//! Loads configuration, wires the adapters behind each port and serves the
//! application router until SIGINT or SIGTERM.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use casa_pipeline::adapters::http::{
    app_router, ExemptRoutes, IdentityProviderRoutes, NotificationsAppState, PipelineState,
    SessionCookie,
};
use casa_pipeline::adapters::{
    BugsnagConfig, BugsnagErrorTracker, InMemorySessionStore, LogErrorTracker,
    MockSessionValidator, RedisSessionStore, ShortIoConfig, ShortIoUrlShortener,
    StaticTenantResolver, TwilioConfig, TwilioSmsCarrier,
};
use casa_pipeline::config::{AppConfig, ConfigError, ValidationError};
use casa_pipeline::ports::{ErrorTracker, SessionStore};
use secrecy::ExposeSecret;

/// Errors that abort startup.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Redis connection failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis connection timed out after {0:?}")]
    RedisTimeout(Duration),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(error) = run(config).await {
        tracing::error!(error = %error, "Application terminated with error");
        process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.server.environment.as_str(),
        "Starting CASA pipeline"
    );

    let pipeline = build_pipeline(&config).await?;
    let notifications = build_notifications(&config);

    let app: Router = app_router(&pipeline, notifications)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server is ready and listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Initializes tracing; JSON output in production, human-readable otherwise.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_pipeline(config: &AppConfig) -> Result<PipelineState, StartupError> {
    let session_store = build_session_store(config).await?;
    let error_tracker = build_error_tracker(config);

    // No identity provider adapter ships with the pipeline; every token is
    // rejected until one is wired in.
    tracing::warn!("No identity provider configured; bearer tokens will be rejected");
    let validator = Arc::new(MockSessionValidator::new());
    let tenant_resolver = Arc::new(StaticTenantResolver::new());

    let identity_routes = match config.session.identity_provider_prefix_list() {
        Some(prefixes) => IdentityProviderRoutes::new(prefixes),
        None => IdentityProviderRoutes::default(),
    };
    let exempt_routes: ExemptRoutes = config.session.exempt_route_list()?.into_iter().collect();

    let cookie = SessionCookie::named(config.session.cookie_name.clone())
        .with_secure(config.session.secure_cookie || config.is_production());

    Ok(
        PipelineState::new(session_store, error_tracker, validator, tenant_resolver)
            .with_session_cookie(cookie)
            .with_identity_routes(identity_routes)
            .with_exempt_routes(exempt_routes),
    )
}

async fn build_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, StartupError> {
    let Some(redis_config) = &config.redis else {
        tracing::info!("Using in-memory session store");
        return Ok(Arc::new(
            InMemorySessionStore::new().with_ttl(config.session.ttl()),
        ));
    };

    let client = redis::Client::open(redis_config.url.as_str())?;
    let connect_timeout = redis_config.connect_timeout();
    let conn = tokio::time::timeout(connect_timeout, client.get_multiplexed_async_connection())
        .await
        .map_err(|_| StartupError::RedisTimeout(connect_timeout))??;

    tracing::info!(key_prefix = %redis_config.key_prefix, "Using Redis session store");
    Ok(Arc::new(
        RedisSessionStore::new(conn, config.session.ttl_secs)
            .with_key_prefix(redis_config.key_prefix.clone()),
    ))
}

fn build_error_tracker(config: &AppConfig) -> Arc<dyn ErrorTracker> {
    let Some(api_key) = config
        .error_tracking
        .bugsnag_api_key
        .as_ref()
        .filter(|_| config.error_tracking.is_enabled())
    else {
        tracing::info!("Bugsnag not configured; unexpected errors are only logged");
        return Arc::new(LogErrorTracker::new());
    };

    let mut bugsnag = BugsnagConfig::new(api_key.expose_secret().clone())
        .with_release_stage(config.release_stage());
    if let Some(endpoint) = &config.error_tracking.endpoint {
        bugsnag = bugsnag.with_endpoint(endpoint.clone());
    }

    Arc::new(BugsnagErrorTracker::new(bugsnag))
}

fn build_notifications(config: &AppConfig) -> NotificationsAppState {
    let carrier = TwilioSmsCarrier::new(
        TwilioConfig::new()
            .with_base_url(config.sms.twilio_base_url.clone())
            .with_timeout(config.sms.timeout()),
    );

    let short_url = &config.short_url;
    let shortener = ShortIoUrlShortener::new(
        ShortIoConfig::new(
            short_url.api_key.expose_secret().clone(),
            short_url.domain.clone(),
        )
        .with_base_url(short_url.base_url.clone())
        .with_timeout(short_url.timeout()),
    );

    NotificationsAppState::new(Arc::new(carrier), Arc::new(shortener))
        .with_sms_timeout(config.sms.timeout())
        .with_shorten_timeout(short_url.timeout())
        .with_shorten_concurrency(short_url.max_concurrency)
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
