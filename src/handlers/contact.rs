// src/handlers/contact.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::{error::AppError, form::Payload},
    config::AppState,
    models::contact::ContactPayload,
};

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub ok: bool,
    pub id: Uuid,
}

// POST /api/contact
// Responde assim que o contato é gravado; os e-mails seguem em segundo plano.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Public",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Contato registrado"),
        (status = 400, description = "Campos obrigatórios ausentes")
    )
)]
pub async fn submit(
    State(app_state): State<AppState>,
    Payload(payload): Payload<ContactPayload>,
) -> Result<(StatusCode, Json<Submitted>), AppError> {
    let (contact, _deliveries) = app_state.contact_service.submit(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(Submitted {
            ok: true,
            id: contact.id,
        }),
    ))
}
