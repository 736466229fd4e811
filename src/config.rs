// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::UserRepository,
    services::{
        contact_service::ContactMailSettings,
        mailer::{HttpMailer, LogMailer, Mailer},
        media::{DisabledMediaHost, HttpMediaHost, MediaHost},
        AuthService, BookingService, ContactService, DestinationService, RegionService,
        TourService, UserService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub admin_notify_email: String,
    pub media_upload_url: Option<String>,
    pub media_upload_preset: Option<String>,
    pub media_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mail_from = optional("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string());
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_hours: parsed("TOKEN_TTL_HOURS", 168)?,
            mail_api_url: optional("MAIL_API_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            admin_notify_email: optional("ADMIN_NOTIFY_EMAIL").unwrap_or_else(|| mail_from.clone()),
            mail_from,
            media_upload_url: optional("MEDIA_UPLOAD_URL"),
            media_upload_preset: optional("MEDIA_UPLOAD_PRESET"),
            media_api_key: optional("MEDIA_API_KEY"),
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).with_context(|| format!("{name} deve ser definida"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match optional(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} inválida: `{raw}`")),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub region_service: RegionService,
    pub destination_service: DestinationService,
    pub tour_service: TourService,
    pub booking_service: BookingService,
    pub contact_service: ContactService,
    pub user_service: UserService,
    pub media_host: Arc<dyn MediaHost>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::build(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre uma pool já criada.
    pub fn build(db_pool: PgPool, config: Config) -> Self {
        let mailer: Arc<dyn Mailer> = match (&config.mail_api_url, &config.mail_api_key) {
            (Some(url), Some(key)) => Arc::new(HttpMailer::new(url.clone(), key.clone())),
            _ => {
                tracing::warn!("MAIL_API_URL/MAIL_API_KEY ausentes: e-mails só vão para o log");
                Arc::new(LogMailer)
            }
        };

        let media_host: Arc<dyn MediaHost> = match &config.media_upload_url {
            Some(url) => Arc::new(HttpMediaHost::new(
                url.clone(),
                config.media_upload_preset.clone(),
                config.media_api_key.clone(),
            )),
            None => Arc::new(DisabledMediaHost),
        };

        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let contact_service = ContactService::new(
            db_pool.clone(),
            mailer,
            ContactMailSettings {
                from: config.mail_from.clone(),
                admin_to: config.admin_notify_email.clone(),
            },
        );

        Self {
            auth_service,
            region_service: RegionService::new(db_pool.clone()),
            destination_service: DestinationService::new(db_pool.clone()),
            tour_service: TourService::new(db_pool.clone()),
            booking_service: BookingService::new(db_pool.clone()),
            contact_service,
            user_service: UserService::new(db_pool.clone()),
            media_host,
            config: Arc::new(config),
            db_pool,
        }
    }
}
