use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::prelude::FromRow;

use crate::format;
use crate::schedule::{self, AccessInfo, ScheduleGroup};

/// Kategori tertutup untuk label dan ikon marker. String mentah dari
/// penyimpanan diterjemahkan sekali di sini; nilai tak dikenal tetap
/// dibawa apa adanya.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Hotel,
    Cafe,
    Wisata,
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "hotel" => Category::Hotel,
            "cafe" => Category::Cafe,
            "wisata" => Category::Wisata,
            _ => Category::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Hotel => "Hotel",
            Category::Cafe => "Cafe",
            Category::Wisata => "Wisata",
            Category::Other(raw) => raw,
        }
    }

    pub fn marker_icon(&self) -> &'static str {
        match self {
            Category::Hotel => "/assets/markers/hotel.png",
            Category::Cafe => "/assets/markers/cafe.png",
            Category::Wisata => "/assets/markers/wisata.png",
            Category::Other(_) => "/assets/markers/default.png",
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PlaceRow {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
pub struct ImageRow {
    pub place_id: i64,
    pub url: String,
}

#[derive(Debug, FromRow)]
pub struct DetailRow {
    pub place_id: i64,
    pub access_info: Option<String>,
    pub price_info: Option<String>,
    pub contact_info: Option<String>,
    pub facilities: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub marker_icon: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Urutan berarti: indeks 0 adalah gambar sampul.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub detail: Option<PlaceDetail>,
}

impl Place {
    pub fn assemble(row: PlaceRow, images: Vec<String>, detail: Option<DetailRow>) -> Self {
        let marker_icon = Category::parse(&row.category).marker_icon().to_string();
        Place {
            id: row.public_id,
            name: row.name,
            category: row.category,
            marker_icon,
            lat: row.lat,
            lon: row.lon,
            address: row.address,
            description: row.description,
            images,
            detail: detail.map(PlaceDetail::from_stored),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    #[serde(default)]
    pub access_info: Option<String>,
    #[serde(default)]
    pub price_info: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub facilities: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    // Turunan sisi baca, tidak pernah diterima dari klien.
    #[serde(skip_deserializing)]
    pub schedule: AccessInfo,
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub schedule_display: Vec<ScheduleGroup>,
    #[serde(skip_deserializing)]
    pub price_display: Option<String>,
}

impl PlaceDetail {
    pub fn from_stored(row: DetailRow) -> Self {
        let schedule = schedule::decode(row.access_info.as_deref());
        let schedule_display = match &schedule {
            AccessInfo::Schedule { items } => schedule::group_for_display(items),
            _ => Vec::new(),
        };
        let price_display = row.price_info.as_deref().map(format::format_price);
        PlaceDetail {
            access_info: row.access_info,
            price_info: row.price_info,
            contact_info: row.contact_info,
            facilities: row.facilities,
            web_url: row.web_url,
            schedule,
            schedule_display,
            price_display,
        }
    }
}

/// Payload POST/PUT: rekaman penuh, bukan diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub detail: Option<DetailDraft>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailDraft {
    #[serde(default)]
    pub access_info: Option<String>,
    #[serde(default)]
    pub price_info: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub facilities: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Form lama mengirim koordinat sebagai string; endpoint menerima
/// keduanya dan memaksa ke f64.
fn lenient_coord<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("koordinat tidak valid: {s}")))
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: i64,
    pub hotel: i64,
    pub cafe: i64,
    pub wisata: i64,
    pub other: i64,
}

impl CategoryStats {
    pub fn record(&mut self, category: &Category, count: i64) {
        self.total += count;
        match category {
            Category::Hotel => self.hotel += count,
            Category::Cafe => self.cafe += count,
            Category::Wisata => self.wisata += count,
            Category::Other(_) => self.other += count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Hotel"), Category::Hotel);
        assert_eq!(Category::parse("CAFE"), Category::Cafe);
        assert_eq!(Category::parse(" wisata "), Category::Wisata);
        assert_eq!(
            Category::parse("museum"),
            Category::Other("museum".to_string())
        );
    }

    #[test]
    fn unknown_category_keeps_raw_label_and_default_marker() {
        let cat = Category::parse("museum");
        assert_eq!(cat.label(), "museum");
        assert_eq!(cat.marker_icon(), "/assets/markers/default.png");
    }

    #[test]
    fn draft_accepts_string_coordinates() {
        let draft: PlaceDraft = serde_json::from_str(
            r#"{"name":"Hotel A","category":"hotel","lat":"-7.797","lon":110.37,"images":["a.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(draft.lat, Some(-7.797));
        assert_eq!(draft.lon, Some(110.37));
    }

    #[test]
    fn blank_string_coordinate_is_missing() {
        let draft: PlaceDraft =
            serde_json::from_str(r#"{"name":"X","category":"cafe","lat":"  "}"#).unwrap();
        assert_eq!(draft.lat, None);
        assert_eq!(draft.lon, None);
    }

    #[test]
    fn garbage_coordinate_is_rejected() {
        let res = serde_json::from_str::<PlaceDraft>(
            r#"{"name":"X","category":"cafe","lat":"utara","lon":1.0}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn stored_detail_derives_display_fields() {
        let row = DetailRow {
            place_id: 1,
            access_info: Some(r#"[{"startDay":"Senin","open":"08:00","close":"17:00"}]"#.into()),
            price_info: Some("0 - 0".into()),
            contact_info: Some("0812-3456-7890".into()),
            facilities: None,
            web_url: None,
        };
        let detail = PlaceDetail::from_stored(row);
        assert!(matches!(detail.schedule, AccessInfo::Schedule { .. }));
        assert_eq!(detail.schedule_display.len(), 1);
        assert_eq!(detail.price_display.as_deref(), Some("Gratis"));
    }

    #[test]
    fn legacy_detail_keeps_raw_text_for_display() {
        let row = DetailRow {
            place_id: 1,
            access_info: Some("buka kalau tidak hujan".into()),
            price_info: None,
            contact_info: None,
            facilities: None,
            web_url: None,
        };
        let detail = PlaceDetail::from_stored(row);
        assert_eq!(
            detail.schedule,
            AccessInfo::Legacy {
                text: "buka kalau tidak hujan".to_string()
            }
        );
        assert!(detail.schedule_display.is_empty());
    }
}
