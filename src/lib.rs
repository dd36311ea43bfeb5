#[macro_use]
extern crate rocket;

pub mod api;
pub mod db;
pub mod env;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod ui;
#[cfg(test)]
mod test;

use api::{
    api_create_course, api_create_teacher, api_default_catcher, api_delete_course,
    api_delete_teacher, api_get_available_subjects, api_get_courses, api_get_teachers,
    api_update_course, api_update_teacher, health,
};
use env::AppConfig;
use error::AppError;
use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use telemetry::TelemetryFairing;
use tracing::info;

pub async fn connect_database(config: &AppConfig) -> Result<SqlitePool, AppError> {
    info!(max_connections = config.max_connections, "Connecting to database");
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations completed successfully");
    Ok(())
}

pub async fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting school admin");

    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_get_courses,
                api_create_course,
                api_update_course,
                api_delete_course,
                api_get_teachers,
                api_create_teacher,
                api_update_teacher,
                api_delete_teacher,
                api_get_available_subjects,
                health,
            ],
        )
        .register("/api", catchers![api_default_catcher])
        .attach(TelemetryFairing)
}
