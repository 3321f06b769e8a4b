//! Coastal hazard server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coastal_hazard_lib::api::{self, ApiDoc};
use coastal_hazard_lib::auth::{AdminKey, AuthProvider, HeaderAuthProvider};
use coastal_hazard_lib::config::{Config, StoreBackend};
use coastal_hazard_lib::db::DbPool;
use coastal_hazard_lib::error::AppResult;
use coastal_hazard_lib::middleware::RequestLogger;
use coastal_hazard_lib::services::{
    EventBroadcaster, Geocoder, NominatimGeocoder, SeedSet, VerificationWorkflow, WarningBoard,
};
use coastal_hazard_lib::store::{
    MemoryCollection, MemoryWarnings, OfflineCollection, PgCollection, PgWarnings,
    ReportCollection, ReportStore, WarningCollection,
};

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<PathBuf>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static dir not configured"))?;
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

fn load_seed(config: &Config) -> AppResult<SeedSet> {
    match &config.seed_file {
        Some(path) => {
            info!(path = %path.display(), "Loading seed reports from file");
            SeedSet::from_file(path)
        }
        None => SeedSet::embedded(),
    }
}

type Collections = (Arc<dyn ReportCollection>, Arc<dyn WarningCollection>);

/// Connect the configured backend. A PostgreSQL failure leaves the server
/// in offline mode: seed data stays readable, writes answer 503.
async fn open_collections(config: &Config) -> Collections {
    match config.store {
        StoreBackend::Memory => {
            let reports: Arc<dyn ReportCollection> = Arc::new(MemoryCollection::new());
            let warnings: Arc<dyn WarningCollection> = Arc::new(MemoryWarnings::new());
            (reports, warnings)
        }
        StoreBackend::Postgres => match open_postgres(config).await {
            Ok(collections) => collections,
            Err(e) => {
                error!(error = %e, "Report store unavailable, serving seed data only");
                let offline = Arc::new(OfflineCollection::new(e.to_string()));
                let reports: Arc<dyn ReportCollection> = offline.clone();
                let warnings: Arc<dyn WarningCollection> = offline;
                (reports, warnings)
            }
        },
    }
}

async fn open_postgres(config: &Config) -> AppResult<Collections> {
    let pool = DbPool::connect(config).await?;
    info!("Database connection established");

    pool.run_migrations().await?;
    info!("Database migrations complete");

    let collection = Arc::new(PgCollection::new(pool.clone(), config.retry).await?);
    collection.start_refresh_task(Duration::from_secs(config.feed_refresh_secs));
    let reports: Arc<dyn ReportCollection> = collection;
    let warnings: Arc<dyn WarningCollection> = Arc::new(PgWarnings::new(pool, config.retry));
    Ok((reports, warnings))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and HAZARD_ADMIN_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Coastal Hazard Server");
    info!("  Environment: {}", config.environment);
    info!("  Store: {}", config.store);
    info!("  Merge precedence: {}", config.merge_precedence);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let seed = match load_seed(&config) {
        Ok(seed) => seed,
        Err(e) => {
            error!(error = %e, "Failed to load seed reports");
            std::process::exit(1);
        }
    };
    info!(count = seed.len(), "Seed reports loaded");

    let geocoder: Arc<dyn Geocoder> = match NominatimGeocoder::new(&config.geocoder) {
        Ok(geocoder) => Arc::new(geocoder),
        Err(e) => {
            error!(error = %e, "Failed to build geocoder client");
            std::process::exit(1);
        }
    };

    let (collection, warning_collection) = open_collections(&config).await;

    let events = EventBroadcaster::new();
    let store = ReportStore::new(collection, seed, config.merge_precedence, events.clone());
    let workflow = VerificationWorkflow::new(store.clone());
    let board = WarningBoard::new(warning_collection, events);

    let admin_key = AdminKey::new(config.admin_key.clone());
    if !admin_key.is_configured() {
        warn!("No administrator key configured; status changes are disabled");
    }
    let auth: Arc<dyn AuthProvider> = Arc::new(HeaderAuthProvider::new(admin_key));

    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development { 2 } else { num_cpus::get() };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let server = HttpServer::new(move || {
        let allowed_headers = vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-reporter-id"),
            header::HeaderName::from_static("x-reporter-role"),
            header::HeaderName::from_static("x-admin-key"),
        ];
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        };

        let mut app = App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(workflow.clone()))
            .app_data(web::Data::new(board.clone()))
            .app_data(web::Data::from(auth.clone()))
            .app_data(web::Data::from(geocoder.clone()))
            .app_data(api::json_config())
            .service(web::scope("/api/v1").configure(api::configure))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            );

        // Serve the frontend when HAZARD_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
