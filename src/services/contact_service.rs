// src/services/contact_service.rs

use std::{collections::BTreeMap, sync::Arc};

use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::{
    common::error::AppError,
    db::crud_repo::CrudRepository,
    models::contact::{Contact, ContactPayload},
    services::{
        crud_service::Writable,
        mailer::{Mailer, OutgoingEmail},
    },
};

/// Endereços usados nas notificações do formulário de contato.
#[derive(Debug, Clone)]
pub struct ContactMailSettings {
    pub from: String,
    pub admin_to: String,
}

#[derive(Clone)]
pub struct ContactService {
    crud: CrudRepository<Contact>,
    mailer: Arc<dyn Mailer>,
    settings: ContactMailSettings,
}

impl ContactService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, settings: ContactMailSettings) -> Self {
        Self {
            crud: CrudRepository::new(pool),
            mailer,
            settings,
        }
    }

    /// Grava o pedido e dispara os dois e-mails em segundo plano.
    ///
    /// A resposta não espera os envios; falhas só vão para o log. Os handles
    /// são devolvidos para quem quiser acompanhar (testes).
    pub async fn submit(&self, payload: ContactPayload) -> Result<(Contact, Vec<JoinHandle<bool>>), AppError> {
        let changeset = Contact::create_changeset(payload.into_public_submission())?;
        let contact = self.crud.insert(self.crud.pool(), changeset).await?;
        tracing::info!("📨 Novo contato {} de {}", contact.id, contact.email);

        let emails = contact_emails(&contact, &self.settings);
        let handles = spawn_deliveries(self.mailer.clone(), emails);
        Ok((contact, handles))
    }
}

/// Confirmação para o cliente e aviso para a equipe.
pub fn contact_emails(contact: &Contact, settings: &ContactMailSettings) -> Vec<OutgoingEmail> {
    let mut fields = BTreeMap::new();
    fields.insert("fullName".to_string(), contact.full_name.clone());
    fields.insert("email".to_string(), contact.email.clone());
    if let Some(whatsapp) = &contact.whatsapp {
        fields.insert("whatsapp".to_string(), whatsapp.clone());
    }
    if let Some(quantity) = contact.quantity {
        fields.insert("quantity".to_string(), quantity.to_string());
    }
    if let Some(date) = contact.date {
        fields.insert("date".to_string(), date.format("%Y-%m-%d").to_string());
    }
    if let Some(message) = &contact.message {
        fields.insert("message".to_string(), message.clone());
    }

    vec![
        OutgoingEmail {
            from: settings.from.clone(),
            to: contact.email.clone(),
            reply_to: None,
            subject: "We received your request".to_string(),
            template: "contact_confirmation",
            fields: fields.clone(),
        },
        OutgoingEmail {
            from: settings.from.clone(),
            to: settings.admin_to.clone(),
            reply_to: Some(contact.email.clone()),
            subject: format!("New contact request from {}", contact.full_name),
            template: "contact_admin_notification",
            fields,
        },
    ]
}

/// Cada envio roda na sua própria task; um não depende do outro.
pub fn spawn_deliveries(mailer: Arc<dyn Mailer>, emails: Vec<OutgoingEmail>) -> Vec<JoinHandle<bool>> {
    emails
        .into_iter()
        .map(|email| {
            let mailer = mailer.clone();
            tokio::spawn(async move {
                match mailer.send(&email).await {
                    Ok(message_id) => {
                        tracing::info!(
                            "📧 E-mail '{}' enviado para {} (id {})",
                            email.template,
                            email.to,
                            message_id
                        );
                        true
                    }
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Falha ao enviar e-mail '{}' para {}: {:#}",
                            email.template,
                            email.to,
                            e
                        );
                        false
                    }
                }
            })
        })
        .collect()
}
