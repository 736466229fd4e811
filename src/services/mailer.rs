// src/services/mailer.rs

use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// E-mail transacional já montado: destinatário, template e os campos dele.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub template: &'static str,
    pub fields: BTreeMap<String, String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Envia e devolve o id da mensagem no provedor.
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<String>;
}

// ---
// Provedor HTTP genérico (POST JSON com bearer)
// ---

pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    id: Option<String>,
    message_id: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .context("mail API unreachable")?
            .error_for_status()
            .context("mail API rejected the message")?;

        let body: SendResponse = response.json().await.context("unexpected mail API response")?;
        Ok(body
            .id
            .or(body.message_id)
            .unwrap_or_else(|| "unknown".to_string()))
    }
}

// ---
// Sem provedor configurado: só registra no log
// ---

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<String> {
        let id = format!("log-{}", Uuid::new_v4());
        tracing::info!(
            "📭 (sem provedor) e-mail '{}' para {} [{}]",
            email.subject,
            email.to,
            id
        );
        Ok(id)
    }
}
