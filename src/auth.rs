use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use nanoid::nanoid;
use std::env;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn from_env() -> Self {
        AdminCredentials {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

pub fn issue_token() -> String {
    nanoid!(32)
}

/// Bukti sesi admin. Handler yang memutasi data meminta extractor ini,
/// jadi kewenangan terlihat eksplisit di tanda tangannya, bukan dicek
/// tersebar di mana-mana.
pub struct AdminSession {
    pub token: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("sesi admin diperlukan".to_string()))?;
        if !state.sessions.read().await.contains(token) {
            return Err(AppError::Unauthorized("sesi tidak dikenal".to_string()));
        }
        Ok(AdminSession {
            token: token.to_string(),
        })
    }
}
