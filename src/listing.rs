//! Saring, urut, dan halaman untuk koleksi tempat. Murni hitung ulang:
//! tidak ada I/O, urutan asli koleksi tidak pernah diubah.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::Place;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Category,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Siklus tiga keadaan pada kunci yang sama: asc, desc, lalu tanpa
/// urutan (kembali ke urutan hasil fetch). Kunci berbeda mulai lagi
/// dari asc.
pub fn cycle_sort(current: Option<SortConfig>, key: SortKey) -> Option<SortConfig> {
    match current {
        Some(cfg) if cfg.key == key => match cfg.direction {
            SortDirection::Asc => Some(SortConfig {
                key,
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortConfig {
            key,
            direction: SortDirection::Asc,
        }),
    }
}

/// Cocok bila kueri muncul di nama, alamat, atau kategori (salah satu
/// cukup), tanpa peduli huruf besar-kecil.
pub fn matches_query(place: &Place, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    let hit = |field: &str| field.to_lowercase().contains(&q);
    hit(&place.name)
        || place.address.as_deref().is_some_and(hit)
        || hit(&place.category)
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(per_page)
    }
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

fn compare(a: &Place, b: &Place, key: SortKey) -> Ordering {
    let pick = |p: &Place| match key {
        SortKey::Name => p.name.to_lowercase(),
        SortKey::Category => p.category.to_lowercase(),
        SortKey::Address => p.address.clone().unwrap_or_default().to_lowercase(),
    };
    pick(a).cmp(&pick(b))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePage {
    pub items: Vec<Place>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

pub fn visible_page(
    places: &[Place],
    query: &str,
    sort: Option<SortConfig>,
    page: usize,
    per_page: usize,
) -> PlacePage {
    let per_page = per_page.max(1);
    let mut filtered: Vec<&Place> = places.iter().filter(|p| matches_query(p, query)).collect();
    if let Some(cfg) = sort {
        // Stabil: baris setara mempertahankan urutan fetch.
        filtered.sort_by(|a, b| {
            let ord = compare(a, b, cfg.key);
            match cfg.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    let total_items = filtered.len();
    let total_pages = total_pages(total_items, per_page);
    let page = clamp_page(page, total_pages);
    let items = filtered
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    PlacePage {
        items,
        page,
        per_page,
        total_pages,
        total_items,
    }
}
