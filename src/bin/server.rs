use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use pocketbook::{AppState, build_router, downgrade_db, graceful_shutdown};

/// A fallback signing secret so the app runs out of the box. Flash message
/// cookies signed with it are forgeable, so production deployments must set
/// the SECRET environment variable.
const INSECURE_DEFAULT_SECRET: &str = "pocketbook-dev-secret";

/// The web server for Pocketbook, a personal income and expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 8181)]
    port: u16,

    /// Revert the most recent database schema migration and exit.
    #[arg(long, default_value_t = false)]
    downgrade_schema: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open database file");

    if args.downgrade_schema {
        downgrade_db(&connection).expect("Could not downgrade database schema");
        tracing::info!("Database schema downgraded.");
        return;
    }

    let secret = env::var("SECRET").unwrap_or_else(|_| {
        tracing::warn!(
            "The environment variable 'SECRET' is not set, using an insecure built-in secret. \
             Do not do this in production."
        );
        INSECURE_DEFAULT_SECRET.to_owned()
    });

    let dev_mode = cfg!(debug_assertions);
    let state = AppState::new(connection, &secret, dev_mode)
        .expect("Could not initialize the application state");

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
