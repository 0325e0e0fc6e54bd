use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use pintarlokal_backend::auth::gotrue::SupabaseAuth;
use pintarlokal_backend::auth::jwks::JwksCache;
use pintarlokal_backend::auth::jwt::TokenVerifier;
use pintarlokal_backend::config::AppConfig;
use pintarlokal_backend::create_pool;
use pintarlokal_backend::db::PgStore;
use pintarlokal_backend::handlers;
use pintarlokal_backend::state::AppState;
use pintarlokal_backend::storage::supabase::SupabaseStorage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to the database");
    tracing::info!("Connected to the database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        tracing::info!("Migrations applied");
    }

    let verifier = match &config.jwt_secret {
        Some(secret) => TokenVerifier::Secret(secret.clone()),
        None => TokenVerifier::Jwks(JwksCache::new(&config.supabase_url, &config.anon_key)),
    };
    let verifier = web::Data::new(verifier);

    let state = web::Data::new(AppState::with_pg(
        PgStore::new(db),
        Arc::new(SupabaseStorage::new(
            &config.supabase_url,
            &config.service_role_key,
        )),
        Arc::new(SupabaseAuth::new(&config.supabase_url, &config.anon_key)),
        config.max_portfolio_bytes,
    ));

    let bind_addr = config.bind_addr();
    tracing::info!(project_ref = %config.project_ref, "Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(verifier.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
