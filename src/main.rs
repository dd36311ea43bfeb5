use school_admin::env::{AppConfig, load_environment};
use school_admin::telemetry::init_tracing;
use school_admin::{connect_database, init_rocket, run_migrations};
use tracing::{error, warn};

#[rocket::launch]
async fn rocket() -> _ {
    let env_loaded = load_environment();

    let config = AppConfig::from_env().expect("Invalid configuration");
    init_tracing(&config);

    match env_loaded {
        Ok(report) => report.log(),
        Err(e) => warn!("Failed to load environment files: {}", e),
    }

    let pool = connect_database(&config)
        .await
        .expect("Failed to connect to SQLite database");

    if let Err(e) = run_migrations(&pool).await {
        error!("Failed to run migrations: {}", e);
        panic!("Database migration failed: {}", e);
    }

    init_rocket(pool).await
}
