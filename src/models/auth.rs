// src/models/auth.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::form::lenient,
    db::crud_repo::{Filter, FilterKind, Resource},
};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub const PG_TYPE: &'static str = "account_status";
    pub const VALUES: &'static [&'static str] = &["active", "inactive"];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Admin,
    Editor,
}

impl UserRole {
    pub const PG_TYPE: &'static str = "user_role";
    pub const VALUES: &'static [&'static str] = &["admin", "editor"];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

// Representa um usuário (conta do painel) vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for User {
    const TABLE: &'static str = "users";
    const LABEL: &'static str = "User";
    const SEARCH_COLUMNS: &'static [&'static str] = &["email", "name"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("role", "role", FilterKind::Enum(UserRole::PG_TYPE, UserRole::VALUES)),
        Filter::new("status", "status", FilterKind::Enum(AccountStatus::PG_TYPE, AccountStatus::VALUES)),
    ];
    const DEFAULT_ORDER: &'static str = "created_at DESC";
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] = &[("users_email_key", "email")];

    fn id(&self) -> Uuid {
        self.id
    }
}

// Criação/edição de contas pelo painel
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub name: Option<String>,
    #[validate(length(min = 8, message = "password must have at least 8 characters"))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<AccountStatus>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid email"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: UserRole,
    pub exp: usize,     // Expiration time (quando o token expira)
    pub iat: usize,     // Issued At (quando o token foi criado)
}
