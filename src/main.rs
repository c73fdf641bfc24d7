use std::sync::Arc;

use tracing::{error, info};

use chat_service::auth::{AccountManager, CredentialHasher, SessionManager, TokenService};
use chat_service::db::{SessionRepository, UserRepository};
use chat_service::message::{MessageRepository, MessageService};
use chat_service::web::{shutdown_signal, AppState, WebServer};
use chat_service::{Config, Database};

/// Environment variable naming the configuration file.
const ENV_CONFIG_PATH: &str = "CHAT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn load_config() -> Config {
    let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

fn build_state(config: &Config, db: &Database) -> chat_service::Result<AppState> {
    let users = Arc::new(UserRepository::new(db.pool().clone()));
    let session_store = Arc::new(SessionRepository::new(db.pool().clone()));
    let message_store = Arc::new(MessageRepository::new(db.pool().clone()));

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_secs)
        .map_err(|e| chat_service::ChatError::Config(e.to_string()))?;
    info!(secret = %tokens.masked_secret(), ttl_secs = config.auth.token_ttl_secs, "Token service ready");

    let sessions = SessionManager::new(session_store, tokens, config.auth.session_ttl_secs);
    let hasher = CredentialHasher::new(&config.auth)
        .map_err(|e| chat_service::ChatError::Config(e.to_string()))?;

    let accounts = AccountManager::new(users.clone(), hasher, sessions);
    let messages = MessageService::new(message_store, users);
    Ok(AppState::new(accounts, messages))
}

#[tokio::main]
async fn main() {
    let config = load_config();

    if let Err(e) = chat_service::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        chat_service::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Chat service starting");

    let db = match Database::open(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let state = match build_state(&config, &db) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            db.close().await;
            std::process::exit(1);
        }
    };

    let server = WebServer::new(&config.server, state);
    if let Err(e) = server.run(shutdown_signal()).await {
        error!("Web server error: {}", e);
    }

    db.close().await;
    info!("Chat service stopped");
}
