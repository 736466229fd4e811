// src/common/form.rs

use std::{fmt::Display, str::FromStr};

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};

use crate::common::error::AppError;

// ---
// Extrator: aceita JSON ou formulário HTML (application/x-www-form-urlencoded)
// ---
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Payload(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Payload(value))
    }
}

// ---
// Desserialização tolerante
// ---
// Formulários só mandam strings; JSON manda números e booleanos de verdade.
// Estes helpers aceitam os dois formatos e tratam "" como ausente.

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Value(T),
    Text(String),
}

/// `Option<T>` que aceita o valor nativo ou o texto parseável.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<Loose<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Value(v)) => Ok(Some(v)),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Chave estrangeira opcional em update: campo ausente fica `None`,
/// `null` ou "" viram `Some(None)` (desvincula), valor vira `Some(Some(v))`.
/// Precisa de `#[serde(default)]` no campo.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    lenient(deserializer).map(Some)
}

/// Booleano de checkbox: "on", "true", "1", "yes".
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose<bool>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Value(v)) => Ok(Some(v)),
        Some(Loose::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "on" | "true" | "1" | "yes" => Ok(Some(true)),
            "off" | "false" | "0" | "no" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("invalid boolean `{other}`"))),
        },
    }
}

/// Lista que pode chegar como array JSON ou como string JSON (campo oculto de formulário).
pub fn embedded_json<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Loose<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Value(v)) => Ok(Some(v)),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Text(s)) => serde_json::from_str(&s).map(Some).map_err(de::Error::custom),
    }
}
