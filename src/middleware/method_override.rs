// src/middleware/method_override.rs

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::common::error::AppError;

pub const OVERRIDE_HEADER: &str = "x-http-method-override";
pub const OVERRIDE_FIELD: &str = "_method";

/// Limite do corpo de formulário lido aqui (o upload multipart não passa por isso).
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Formulários HTML só fazem GET/POST. Um POST com `_method=PUT|PATCH|DELETE`
/// (campo do form) ou com o header `X-HTTP-Method-Override` vira esse verbo
/// antes do roteamento.
///
/// Precisa envolver o `Router` inteiro: dentro dele a rota já foi escolhida.
pub async fn method_override(request: Request, next: Next) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let from_header = request
        .headers()
        .get(OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (mut parts, body) = request.into_parts();
    let (target, body) = match from_header {
        Some(verb) => (Some(verb), body),
        None if is_form(&parts.headers) => {
            let bytes = to_bytes(body, MAX_FORM_BYTES)
                .await
                .map_err(|e| AppError::BadRequest(format!("could not read form body: {e}")))?;
            (form_method(&bytes), Body::from(bytes))
        }
        None => (None, body),
    };

    if let Some(verb) = target {
        let method = parse_override(&verb)?;
        if method != Method::POST {
            tracing::debug!("↪️ {} {} via override", method, parts.uri.path());
        }
        parts.method = method;
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
}

fn form_method(body: &[u8]) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == OVERRIDE_FIELD)
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}

/// Só verbos de escrita podem ser simulados.
pub fn parse_override(verb: &str) -> Result<Method, AppError> {
    match verb.trim().to_ascii_uppercase().as_str() {
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        "POST" => Ok(Method::POST),
        other => Err(AppError::BadRequest(format!(
            "unsupported method override `{other}`"
        ))),
    }
}
