use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub inventory: InventoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    pub flights_path: PathBuf,
    pub flights_backup_path: PathBuf,
    pub hotels_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", 3000)?
            .set_default("inventory.flights_path", "flights.json")?
            .set_default("inventory.flights_backup_path", "flights.db.backup.json")?
            .set_default("inventory.hotels_path", "hotels.xml")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `WAYPOINT__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("WAYPOINT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
