mod api;
mod auth;
mod config;
mod db;
mod error;
mod import;
mod models;
mod schema;
mod telemetry;

use anyhow::Context;
use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::Router;
use clap::{Parser, Subcommand};
use config::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub settings: Arc<Settings>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram recipe sharing API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Print the OpenAPI document and exit
    Openapi,
    /// Load ingredients from a `name,unit` CSV file
    ImportIngredients {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// Load tags from a `name,color,slug` CSV file
    ImportTags {
        /// Path to the CSV file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Openapi) = cli.command {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI document")?;
        println!("{}", spec);
        return Ok(());
    }

    let _telemetry = telemetry::init_telemetry()?;
    let settings = Settings::load()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings).await,
        Commands::ImportIngredients { path } => {
            let pool = db::create_pool(&settings.database_url)?;
            let mut conn = pool.get()?;
            import::import_ingredients(&mut conn, &path)?;
            Ok(())
        }
        Commands::ImportTags { path } => {
            let pool = db::create_pool(&settings.database_url)?;
            let mut conn = pool.get()?;
            import::import_tags(&mut conn, &path)?;
            Ok(())
        }
        Commands::Openapi => Ok(()),
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = db::create_pool(&settings.database_url)?;
    let bind_addr = settings.bind_addr.clone();

    let state = AppState {
        pool: Arc::new(pool),
        settings: Arc::new(settings),
    };

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app).await?;
    Ok(())
}
