use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use aluquote_core::config::{AppConfig, ConfigError, LoadOptions};
use aluquote_core::domain::series::AreaRateTable;
use aluquote_db::{
    connect_with_settings, migrations, DbPool, SqlCatalogRepository, SqlQuotationRepository,
};

use crate::api::ApiState;
use crate::email::{MailerError, NoopMailer, QuotationMailer, SmtpMailer};
use crate::render::{templates, RenderError};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub api_state: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("mailer setup failed: {0}")]
    Mailer(#[from] MailerError),
    #[error("template setup failed: {0}")]
    Render(#[from] RenderError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let mailer: Arc<dyn QuotationMailer> = if config.email.enabled {
        Arc::new(SmtpMailer::new(config.email.clone())?)
    } else {
        Arc::new(NoopMailer)
    };

    let api_state = ApiState {
        catalog: Arc::new(SqlCatalogRepository::new(db_pool.clone())),
        quotations: Arc::new(SqlQuotationRepository::new(db_pool.clone())),
        rates: Arc::new(AreaRateTable::default()),
        mailer,
        templates: Arc::new(templates()?),
    };

    Ok(Application { config, db_pool, api_state })
}

#[cfg(test)]
mod tests {
    use aluquote_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    fn memory_options() -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:?cache=shared".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_builds_state() {
        let app = bootstrap(memory_options()).await.expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('catalog_item', 'quotation', 'quotation_line')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected baseline tables after bootstrap");
        assert_eq!(table_count, 3);

        let items = app.api_state.catalog.list().await.expect("catalog list");
        assert!(items.is_empty(), "fresh database starts without catalog rows");

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_configuration() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(String::new()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }
}
