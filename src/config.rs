// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::cache::AssetCache,
    db::{MemoryStore, PgStore, Store},
    services::{AssetService, CatalogService, DecommissionService, MaintenanceService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Sem DATABASE_URL a aplicação sobe com o armazenamento em memória.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub cache_capacity: u64,
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_secs(3),
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.db_max_connections),
            db_acquire_timeout: parse_var("DB_ACQUIRE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.db_acquire_timeout),
            cache_capacity: parse_var("CACHE_CAPACITY")?.unwrap_or(defaults.cache_capacity),
            cache_ttl: parse_var("CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
        })
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} inválida: '{raw}'")),
        Err(_) => Ok(None),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: AssetCache,
    pub asset_service: AssetService,
    pub catalog_service: CatalogService,
    pub maintenance_service: MaintenanceService,
    pub decommission_service: DecommissionService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let cache = AssetCache::new(settings.cache_capacity, settings.cache_ttl);

        let store: Arc<dyn Store> = match &settings.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(settings.db_max_connections)
                    .acquire_timeout(settings.db_acquire_timeout)
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgStore::new(db_pool))
            }
            None => {
                tracing::warn!("DATABASE_URL não definida; usando armazenamento em memória (dados não persistem).");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_store(store, cache))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_store(store: Arc<dyn Store>, cache: AssetCache) -> Self {
        Self {
            asset_service: AssetService::new(store.clone(), cache.clone()),
            catalog_service: CatalogService::new(store.clone()),
            maintenance_service: MaintenanceService::new(store.clone(), cache.clone()),
            decommission_service: DecommissionService::new(store.clone(), cache.clone()),
            store,
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.cache_capacity, 1000);
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn unset_variable_parses_to_none() {
        let parsed: Option<u32> = parse_var("PATRIMONIO_TEST_UNSET_VARIABLE").unwrap();
        assert!(parsed.is_none());
    }
}
