pub mod config {
    use serde::Deserialize;
    use std::path::Path;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub database_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Comma-separated list of origins allowed to make cross-origin requests.
        #[serde(default = "default_cors_origins")]
        pub cors_origins: String,
        #[serde(default)]
        pub max_connections: Option<u32>,
    }

    impl Config {
        /// Loads configuration from environment variables, falling back to a
        /// `.env` file in the working directory.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_sources(Path::new(".env"), config::Environment::default())
        }

        /// Loads configuration from the given environment source.
        pub fn from_source(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Loads configuration from `KEY=value` lines in `env_file`, if present,
        /// with `environment` taking precedence.
        pub fn from_sources(
            env_file: &Path,
            environment: config::Environment,
        ) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(env_file_source(env_file)?)
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns the configured CORS origins, trimmed and without empty entries.
        pub fn allowed_origins(&self) -> Vec<String> {
            self.cors_origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect()
        }
    }

    // Ini keeps key case, so the pairs go back through `Environment` to be lowercased.
    fn env_file_source(path: &Path) -> anyhow::Result<config::Environment> {
        let vars: config::Map<String, String> = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Ini)
                    .required(false),
            )
            .build()?
            .try_deserialize()?;
        Ok(config::Environment::default().source(Some(vars)))
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_cors_origins() -> String {
        "http://localhost:5173".to_string()
    }

}

pub mod database {
    use crate::config::Config;
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

    /// Opens a connection pool for the configured database.
    #[tracing::instrument(skip(config))]
    pub async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        if let Some(max_connections) = config.max_connections {
            options.max_connections(max_connections);
        }
        let db = Database::connect(options).await?;
        Ok(db)
    }

    /// Creates the `tasks` schema if it does not exist yet. Safe to call repeatedly.
    #[tracing::instrument(skip(db))]
    pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
        migration::Migrator::up(db, None).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

pub mod entities;
pub mod task;
pub mod web;
