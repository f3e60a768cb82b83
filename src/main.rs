use std::sync::Arc;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_multipart::form::MultipartFormConfig;
use actix_session::SessionMiddleware;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use dotenvy::dotenv;
use tera::Tera;

use portfolio_admin::clients::local_storage::LocalStorage;
use portfolio_admin::clients::object_storage::{LocalObjectStorage, ObjectStorage};
use portfolio_admin::db::{establish_connection_pool, run_migrations};
use portfolio_admin::models::config::{ServerConfig, StoreBackend};
use portfolio_admin::repository::document::DocumentRepository;
use portfolio_admin::repository::errors::RepositoryResult;
use portfolio_admin::repository::fallback::CategoryFallback;
use portfolio_admin::repository::{DieselRepository, PortfolioStore};
use portfolio_admin::routes;

/// Upper bound for a whole multipart request (all media of one project).
const MULTIPART_TOTAL_LIMIT: usize = 200 * 1024 * 1024;

fn open_store(config: &ServerConfig) -> RepositoryResult<Arc<dyn PortfolioStore>> {
    let fallback = config
        .category_fallback_path
        .as_deref()
        .map(LocalStorage::open)
        .transpose()?;

    match config.backend {
        StoreBackend::Relational => {
            let pool = establish_connection_pool(&config.database_url, config.store_timeout())?;
            run_migrations(&pool)?;
            let repo = DieselRepository::new(pool);
            let store: Arc<dyn PortfolioStore> = match fallback {
                Some(local) => Arc::new(CategoryFallback::new(repo, local)),
                None => Arc::new(repo),
            };
            Ok(store)
        }
        StoreBackend::Document => {
            let repo = DocumentRepository::open(&config.document_store_path)?;
            let store: Arc<dyn PortfolioStore> = match fallback {
                Some(local) => Arc::new(CategoryFallback::new(repo, local)),
                None => Arc::new(repo),
            };
            Ok(store)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let store = match open_store(&server_config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open the {:?} store: {e}", server_config.backend);
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let storage: Arc<dyn ObjectStorage> = Arc::new(LocalObjectStorage::new(
        &server_config.upload_dir,
        &server_config.upload_url_prefix,
    ));
    if let Err(e) = std::fs::create_dir_all(&server_config.upload_dir) {
        log::error!("Failed to create upload directory: {e}");
        std::process::exit(1);
    }

    if server_config.secret.len() < 32 {
        log::error!("The session secret must be at least 32 bytes long");
        std::process::exit(1);
    }
    let secret_key = Key::derive_from(server_config.secret.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let store = web::Data::from(store);
    let storage = web::Data::from(storage);
    let tera = web::Data::new(tera);
    let config_data = web::Data::new(server_config.clone());
    let session_ttl = server_config.session_ttl();
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting portfolio server on {}:{} with the {:?} store",
        bind_address.0,
        bind_address.1,
        server_config.backend
    );

    HttpServer::new(move || {
        let ttl_seconds = i64::try_from(session_ttl.as_secs()).unwrap_or(i64::MAX);
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                IdentityMiddleware::builder()
                    .login_deadline(Some(session_ttl))
                    .build(),
            )
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .session_lifecycle(
                        PersistentSession::default().session_ttl(CookieDuration::seconds(ttl_seconds)),
                    )
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(MultipartFormConfig::default().total_limit(MULTIPART_TOTAL_LIMIT))
            .app_data(store.clone())
            .app_data(storage.clone())
            .app_data(tera.clone())
            .app_data(config_data.clone())
            .service(Files::new(
                &server_config.upload_url_prefix,
                &server_config.upload_dir,
            ))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
