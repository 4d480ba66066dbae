use crate::{
    auth::{self, AdminSession},
    db,
    error::AppError,
    listing::{self, PlacePage, SortConfig, SortDirection, SortKey},
    models::{CategoryStats, Place, PlaceDraft},
    schedule::{self, AccessInfo},
    state::AppState,
    workspace,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    if !state.admin.matches(&payload.username, &payload.password) {
        return Err(AppError::Unauthorized(
            "nama pengguna atau kata sandi salah".to_string(),
        ));
    }
    let token = auth::issue_token();
    state.sessions.write().await.insert(token.clone());
    tracing::info!("admin masuk");
    Ok(Json(LoginResponse { token }))
}

#[derive(Default, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    sort: Option<SortKey>,
    dir: Option<SortDirection>,
    page: Option<usize>,
    #[serde(rename = "perPage")]
    per_page: Option<usize>,
}

impl ListQuery {
    fn is_plain(&self) -> bool {
        self.q.is_none()
            && self.sort.is_none()
            && self.page.is_none()
            && self.per_page.is_none()
    }

    fn sort_config(&self) -> Option<SortConfig> {
        self.sort.map(|key| SortConfig {
            key,
            direction: self.dir.unwrap_or(SortDirection::Asc),
        })
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    Plain(Vec<Place>),
    Paged(PlacePage),
}

/// Tanpa parameter: seluruh koleksi untuk peta dan polling admin.
/// Dengan parameter: halaman tersaring, dihitung dengan aturan yang
/// sama seperti di sisi klien.
pub async fn list_places(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let places = db::list_places(&state.pool).await?;
    if query.is_plain() {
        return Ok(Json(ListResponse::Plain(places)));
    }
    let page = listing::visible_page(
        &places,
        query.q.as_deref().unwrap_or(""),
        query.sort_config(),
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(listing::DEFAULT_PAGE_SIZE),
    );
    Ok(Json(ListResponse::Paged(page)))
}

pub async fn get_place(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<Place>, AppError> {
    db::find_place(&state.pool, &public_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("tempat tidak ditemukan".to_string()))
}

pub async fn create_place(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(draft): Json<PlaceDraft>,
) -> Result<(StatusCode, Json<Place>), AppError> {
    validate(&draft)?;
    let place = db::create_place(&state.pool, &draft).await?;
    tracing::info!(id = %place.id, "tempat dibuat");
    Ok((StatusCode::CREATED, Json(place)))
}

pub async fn update_place(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Json(draft): Json<PlaceDraft>,
) -> Result<Json<Place>, AppError> {
    validate(&draft)?;
    db::update_place(&state.pool, &public_id, &draft)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("tempat tidak ditemukan".to_string()))
}

pub async fn delete_place(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_place(&state.pool, &public_id).await? {
        return Err(AppError::NotFound("tempat tidak ditemukan".to_string()));
    }
    tracing::info!(id = %public_id, "tempat dihapus");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<CategoryStats>, AppError> {
    db::category_stats(&state.pool).await.map(Json)
}

fn validate(draft: &PlaceDraft) -> Result<(), AppError> {
    workspace::validate_draft(draft).map_err(|errors| AppError::BadRequest(errors.join("; ")))?;
    // Jam yang salah format hanya ditandai, tidak memblokir simpan.
    if let Some(detail) = &draft.detail {
        if let AccessInfo::Schedule { items } = schedule::decode(detail.access_info.as_deref()) {
            for item in &items {
                for t in [&item.open, &item.close] {
                    if !t.is_empty() && !schedule::is_valid_time(t) {
                        tracing::warn!(jam = %t, "format jam tidak valid, tetap disimpan");
                    }
                }
            }
        }
    }
    Ok(())
}
