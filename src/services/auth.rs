// src/services/auth.rs

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AccountStatus, Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl: Duration) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl,
        }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .filter(|u| u.status == AccountStatus::Active)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("🔑 Login de {}", user.email);
        create_token(&user, &self.jwt_secret, self.token_ttl)
    }

    /// Valida assinatura e expiração. Não toca no banco.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode_token(token, &self.jwt_secret)
    }

    /// Usuário dono do token. Conta removida ou inativa conta como não autenticado.
    pub async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.status == AccountStatus::Active)
            .ok_or(AppError::Unauthorized)
    }
}

pub fn create_token(user: &User, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}
