use crate::error::AppError;
use crate::format;
use crate::schedule;
use crate::models::{
    Category, CategoryStats, DetailDraft, DetailRow, ImageRow, Place, PlaceDraft, PlaceRow,
};
use nanoid::nanoid;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS places (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            public_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            lat REAL NOT NULL,
            lon REAL NOT NULL,
            address TEXT,
            description TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS place_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            place_id INTEGER NOT NULL,
            url TEXT NOT NULL,
            FOREIGN KEY (place_id) REFERENCES places (id) ON DELETE CASCADE
        );",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS place_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            place_id INTEGER NOT NULL UNIQUE,
            access_info TEXT,
            price_info TEXT,
            contact_info TEXT,
            facilities TEXT,
            web_url TEXT,
            FOREIGN KEY (place_id) REFERENCES places (id) ON DELETE CASCADE
        );",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_places(pool: &SqlitePool) -> Result<Vec<Place>, AppError> {
    let rows: Vec<PlaceRow> =
        sqlx::query_as("SELECT * FROM places ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;

    // Urutan sisip (id menaik) merekonstruksi gambar sampul di indeks 0.
    let image_rows: Vec<ImageRow> =
        sqlx::query_as("SELECT place_id, url FROM place_images ORDER BY id")
            .fetch_all(pool)
            .await?;
    let mut images: HashMap<i64, Vec<String>> = HashMap::new();
    for row in image_rows {
        images.entry(row.place_id).or_default().push(row.url);
    }

    let detail_rows: Vec<DetailRow> = sqlx::query_as(
        "SELECT place_id, access_info, price_info, contact_info, facilities, web_url
         FROM place_details",
    )
    .fetch_all(pool)
    .await?;
    let mut details: HashMap<i64, DetailRow> = detail_rows
        .into_iter()
        .map(|row| (row.place_id, row))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let place_images = images.remove(&row.id).unwrap_or_default();
            let detail = details.remove(&row.id);
            Place::assemble(row, place_images, detail)
        })
        .collect())
}

pub async fn find_place(pool: &SqlitePool, public_id: &str) -> Result<Option<Place>, AppError> {
    let row: Option<PlaceRow> = sqlx::query_as("SELECT * FROM places WHERE public_id = ?")
        .bind(public_id)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let image_rows: Vec<ImageRow> =
        sqlx::query_as("SELECT place_id, url FROM place_images WHERE place_id = ? ORDER BY id")
            .bind(row.id)
            .fetch_all(pool)
            .await?;
    let detail: Option<DetailRow> = sqlx::query_as(
        "SELECT place_id, access_info, price_info, contact_info, facilities, web_url
         FROM place_details WHERE place_id = ?",
    )
    .bind(row.id)
    .fetch_optional(pool)
    .await?;

    let images = image_rows.into_iter().map(|r| r.url).collect();
    Ok(Some(Place::assemble(row, images, detail)))
}

pub async fn create_place(pool: &SqlitePool, draft: &PlaceDraft) -> Result<Place, AppError> {
    let public_id = nanoid!(10);
    let mut tx = pool.begin().await?;
    let row: PlaceRow = sqlx::query_as(
        "INSERT INTO places (public_id, name, category, lat, lon, address, description)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&public_id)
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(draft.lat)
    .bind(draft.lon)
    .bind(&draft.address)
    .bind(&draft.description)
    .fetch_one(&mut *tx)
    .await?;

    insert_images(&mut tx, row.id, &draft.images).await?;
    if let Some(detail) = &draft.detail {
        upsert_detail(&mut tx, row.id, detail).await?;
    }
    tx.commit().await?;

    find_place(pool, &public_id)
        .await?
        .ok_or_else(|| AppError::NotFound("tempat hilang setelah dibuat".to_string()))
}

/// Penggantian rekaman penuh: field tempat ditimpa, semua gambar lama
/// dihapus lalu dibuat ulang sesuai urutan kiriman, detail di-upsert
/// (atau dihapus bila tidak dikirim).
pub async fn update_place(
    pool: &SqlitePool,
    public_id: &str,
    draft: &PlaceDraft,
) -> Result<Option<Place>, AppError> {
    let mut tx = pool.begin().await?;
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM places WHERE public_id = ?")
        .bind(public_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((place_id,)) = existing else {
        return Ok(None);
    };

    sqlx::query(
        "UPDATE places SET name = ?, category = ?, lat = ?, lon = ?, address = ?, description = ?
         WHERE id = ?",
    )
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(draft.lat)
    .bind(draft.lon)
    .bind(&draft.address)
    .bind(&draft.description)
    .bind(place_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM place_images WHERE place_id = ?")
        .bind(place_id)
        .execute(&mut *tx)
        .await?;
    insert_images(&mut tx, place_id, &draft.images).await?;

    match &draft.detail {
        Some(detail) => upsert_detail(&mut tx, place_id, detail).await?,
        None => {
            sqlx::query("DELETE FROM place_details WHERE place_id = ?")
                .bind(place_id)
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await?;

    find_place(pool, public_id).await
}

pub async fn delete_place(pool: &SqlitePool, public_id: &str) -> Result<bool, AppError> {
    // Gambar dan detail ikut lewat ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM places WHERE public_id = ?")
        .bind(public_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn category_stats(pool: &SqlitePool) -> Result<CategoryStats, AppError> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT category, COUNT(*) FROM places GROUP BY category")
            .fetch_all(pool)
            .await?;
    let mut stats = CategoryStats::default();
    for (raw, count) in rows {
        stats.record(&Category::parse(&raw), count);
    }
    Ok(stats)
}

async fn insert_images(
    tx: &mut Transaction<'_, Sqlite>,
    place_id: i64,
    urls: &[String],
) -> Result<(), AppError> {
    for url in urls {
        if url.trim().is_empty() {
            continue;
        }
        sqlx::query("INSERT INTO place_images (place_id, url) VALUES (?, ?)")
            .bind(place_id)
            .bind(url)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn upsert_detail(
    tx: &mut Transaction<'_, Sqlite>,
    place_id: i64,
    detail: &DetailDraft,
) -> Result<(), AppError> {
    // Kontak disimpan sudah terformat.
    let contact = detail
        .contact_info
        .as_deref()
        .map(format::format_contact)
        .filter(|c| !c.is_empty());
    // Baris tutup kehilangan jam bukanya di sini; teks warisan lewat utuh.
    let access_info = detail.access_info.as_deref().map(|raw| {
        match schedule::decode(Some(raw)) {
            schedule::AccessInfo::Schedule { mut items } => {
                schedule::normalize(&mut items);
                schedule::encode(&items)
            }
            _ => raw.to_string(),
        }
    });
    sqlx::query(
        "INSERT INTO place_details (place_id, access_info, price_info, contact_info, facilities, web_url)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(place_id) DO UPDATE SET
            access_info = excluded.access_info,
            price_info = excluded.price_info,
            contact_info = excluded.contact_info,
            facilities = excluded.facilities,
            web_url = excluded.web_url",
    )
    .bind(place_id)
    .bind(access_info)
    .bind(&detail.price_info)
    .bind(contact)
    .bind(&detail.facilities)
    .bind(&detail.web_url)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
