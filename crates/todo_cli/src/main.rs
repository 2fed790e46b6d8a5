//! Server entry point.
//!
//! # Responsibility
//! - Load `.env`, read configuration, and start logging before anything else.
//! - Open and bootstrap the database, then serve until Ctrl-C.

use log::{error, info};
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_http::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("todo-server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = todo_core::init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("todo-server: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("todo-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "event=server_launch module=cli status=start version={} db_path={}",
        todo_core::core_version(),
        config.db_path.display()
    );
    let conn = open_db(&config.db_path)?;
    let state = AppState::try_new(conn)?;
    todo_http::serve(config, create_router(state)).await?;
    Ok(())
}
