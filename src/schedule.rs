//! Jadwal buka: konversi antara kolom teks `access_info` dan bentuk
//! terstruktur, plus pengelompokan per label hari untuk tampilan.
//!
//! Kontrak kolom: nilai yang diawali `[` adalah array JSON berisi
//! [`ScheduleItem`]; nilai lain diperlakukan sebagai catatan bebas warisan
//! dan tidak pernah di-parse sebagai JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];
pub const EVERY_DAY: &str = "Setiap Hari";
pub const HOLIDAY_MARKERS: [&str; 2] = ["Libur Nasional", "Tanggal Merah"];

pub const CLOSED_LABEL: &str = "TUTUP";
pub const ALL_DAY_LABEL: &str = "24 Jam";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub close: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<String>,
    /// Nama field lama, sebelum rentang hari didukung.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_24_hours: bool,
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub close: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Hanya jalur baca; editor belum pernah menulis field ini.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shifts: Vec<Shift>,
}

impl ScheduleItem {
    /// Baris bawaan yang ditampilkan editor untuk jadwal kosong.
    /// Tidak pernah disimpan sebelum operator menyuntingnya.
    pub fn placeholder() -> Self {
        ScheduleItem {
            start_day: Some("Senin".to_string()),
            end_day: Some("Jumat".to_string()),
            open: "08:00".to_string(),
            close: "17:00".to_string(),
            ..ScheduleItem::default()
        }
    }

    pub fn day_label(&self) -> &str {
        self.start_day
            .as_deref()
            .or(self.day.as_deref())
            .unwrap_or(EVERY_DAY)
    }

    pub fn group_label(&self) -> String {
        let start = self.day_label();
        match self.end_day.as_deref() {
            Some(end) if end != start => format!("{start} - {end}"),
            _ => start.to_string(),
        }
    }

    pub fn is_holiday(&self) -> bool {
        HOLIDAY_MARKERS.contains(&self.day_label())
    }

    /// Hari libur nasional selalu tutup, apa pun isi flag dan jamnya.
    pub fn renders_closed(&self) -> bool {
        self.is_closed || self.is_holiday()
    }

    pub fn hour_lines(&self) -> Vec<String> {
        if self.renders_closed() {
            return vec![CLOSED_LABEL.to_string()];
        }
        if self.is_24_hours {
            return vec![ALL_DAY_LABEL.to_string()];
        }
        if !self.shifts.is_empty() {
            return self
                .shifts
                .iter()
                .map(|s| format!("{} - {}", s.open, s.close))
                .collect();
        }
        vec![format!("{} - {}", self.open, self.close)]
    }
}

/// Hasil pembacaan kolom `access_info`. Format ditentukan sekali di sini;
/// kode hilir mencocokkan varian, tidak menebak-nebak string lagi.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "camelCase")]
pub enum AccessInfo {
    #[default]
    Empty,
    Legacy {
        text: String,
    },
    #[serde(rename = "v1")]
    Schedule {
        items: Vec<ScheduleItem>,
    },
}

#[derive(Debug)]
pub struct MalformedScheduleError(serde_json::Error);

impl fmt::Display for MalformedScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jadwal tidak bisa dibaca sebagai JSON: {}", self.0)
    }
}

impl std::error::Error for MalformedScheduleError {}

/// Parse ketat untuk nilai yang sudah diketahui berawalan `[`.
pub fn decode_strict(raw: &str) -> Result<Vec<ScheduleItem>, MalformedScheduleError> {
    serde_json::from_str(raw).map_err(MalformedScheduleError)
}

pub fn decode(raw: Option<&str>) -> AccessInfo {
    let Some(raw) = raw else {
        return AccessInfo::Empty;
    };
    if raw.is_empty() {
        return AccessInfo::Empty;
    }
    if !raw.starts_with('[') {
        return AccessInfo::Legacy {
            text: raw.to_string(),
        };
    }
    match decode_strict(raw) {
        Ok(items) => AccessInfo::Schedule { items },
        Err(err) => {
            tracing::warn!("{err}; ditampilkan sebagai teks warisan");
            AccessInfo::Legacy {
                text: raw.to_string(),
            }
        }
    }
}

/// Selalu menghasilkan array JSON, juga untuk satu baris, supaya tes
/// awalan-`[` milik [`decode`] terpenuhi oleh semua tulisan editor.
pub fn encode(items: &[ScheduleItem]) -> String {
    serde_json::to_string(items).expect("schedule items serialize to JSON")
}

/// Invarian tulis: baris tutup tidak boleh membawa jam buka.
pub fn normalize(items: &mut [ScheduleItem]) {
    for item in items {
        if item.is_closed {
            item.open.clear();
            item.close.clear();
            item.shifts.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub hours: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGroup {
    pub label: String,
    pub holiday: bool,
    pub rows: Vec<ScheduleRow>,
}

/// Kelompokkan baris per label hari, urut sesuai kemunculan pertama.
pub fn group_for_display(items: &[ScheduleItem]) -> Vec<ScheduleGroup> {
    let mut groups: Vec<ScheduleGroup> = Vec::new();
    for item in items {
        let label = item.group_label();
        let flagged = item.is_closed || item.is_holiday();
        let row = ScheduleRow {
            hours: item.hour_lines(),
            note: item.note.clone(),
        };
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => {
                group.holiday |= flagged;
                group.rows.push(row);
            }
            None => groups.push(ScheduleGroup {
                label,
                holiday: flagged,
                rows: vec![row],
            }),
        }
    }
    groups
}

/// Pola `^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$`: jam boleh satu digit,
/// menit harus dua. Pelanggaran hanya ditandai, nilai tetap disimpan.
pub fn is_valid_time(value: &str) -> bool {
    let Some((hour, minute)) = value.split_once(':') else {
        return false;
    };
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return false;
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let h: u8 = hour.parse().unwrap_or(u8::MAX);
    let m: u8 = minute.parse().unwrap_or(u8::MAX);
    h <= 23 && m <= 59
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(start: &str, end: Option<&str>, open: &str, close: &str) -> ScheduleItem {
        ScheduleItem {
            start_day: Some(start.to_string()),
            end_day: end.map(str::to_string),
            open: open.to_string(),
            close: close.to_string(),
            ..ScheduleItem::default()
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let items = vec![
            item("Senin", Some("Jumat"), "08:00", "17:00"),
            ScheduleItem {
                start_day: Some("Sabtu".to_string()),
                is_24_hours: true,
                note: Some("hanya lobi".to_string()),
                ..ScheduleItem::default()
            },
        ];
        let raw = encode(&items);
        assert!(raw.starts_with('['));
        assert_eq!(decode(Some(raw.as_str())), AccessInfo::Schedule { items });
    }

    #[test]
    fn single_item_still_encodes_as_array() {
        let raw = encode(&[item("Minggu", None, "10:00", "14:00")]);
        assert!(raw.starts_with('['));
    }

    #[test]
    fn legacy_text_is_never_parsed_as_json() {
        // Juga untuk teks yang kebetulan JSON valid tapi bukan array.
        for raw in ["buka tiap hari kerja", "{\"format\":\"v1\"}", "08:00 - 17:00"] {
            assert_eq!(
                decode(Some(raw)),
                AccessInfo::Legacy {
                    text: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn empty_and_missing_input_decode_to_empty() {
        assert_eq!(decode(None), AccessInfo::Empty);
        assert_eq!(decode(Some("")), AccessInfo::Empty);
    }

    #[test]
    fn malformed_array_falls_back_to_legacy() {
        let raw = "[{\"startDay\": \"Senin\",";
        assert!(decode_strict(raw).is_err());
        assert_eq!(
            decode(Some(raw)),
            AccessInfo::Legacy {
                text: raw.to_string()
            }
        );
    }

    #[test]
    fn closed_row_renders_tutup_regardless_of_hours() {
        let mut closed = item("Senin", None, "08:00", "17:00");
        closed.is_closed = true;
        assert_eq!(closed.hour_lines(), vec![CLOSED_LABEL.to_string()]);
    }

    #[test]
    fn holiday_marker_forces_closed_without_flag() {
        let red_letter = item("Tanggal Merah", None, "09:00", "12:00");
        assert!(!red_letter.is_closed);
        assert_eq!(red_letter.hour_lines(), vec![CLOSED_LABEL.to_string()]);
    }

    #[test]
    fn legacy_day_field_is_honored() {
        let old = ScheduleItem {
            day: Some("Rabu".to_string()),
            open: "09:00".to_string(),
            close: "21:00".to_string(),
            ..ScheduleItem::default()
        };
        assert_eq!(old.group_label(), "Rabu");
    }

    #[test]
    fn shifts_are_tolerated_on_read_and_rendered_per_line() {
        let raw = r#"[{"startDay":"Sabtu","open":"","close":"",
            "shifts":[{"open":"11:00","close":"14:00"},{"open":"18:00","close":"22:00"}]}]"#;
        let AccessInfo::Schedule { items } = decode(Some(raw)) else {
            panic!("harus terbaca sebagai jadwal");
        };
        assert_eq!(
            items[0].hour_lines(),
            vec!["11:00 - 14:00".to_string(), "18:00 - 22:00".to_string()]
        );
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let items = vec![
            item("Sabtu", Some("Minggu"), "10:00", "22:00"),
            item("Senin", Some("Jumat"), "08:00", "17:00"),
            item("Sabtu", Some("Minggu"), "07:00", "09:00"),
        ];
        let groups = group_for_display(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Sabtu - Minggu");
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].label, "Senin - Jumat");
    }

    #[test]
    fn range_label_collapses_when_end_equals_start() {
        assert_eq!(item("Senin", Some("Senin"), "", "").group_label(), "Senin");
    }

    #[test]
    fn group_is_holiday_flagged_by_any_member() {
        let mut closed = item("Senin", None, "", "");
        closed.is_closed = true;
        let open = item("Senin", None, "08:00", "17:00");
        let groups = group_for_display(&[open, closed]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].holiday);
    }

    #[test]
    fn twenty_four_hours_overrides_times() {
        let mut all_day = item("Setiap Hari", None, "08:00", "17:00");
        all_day.is_24_hours = true;
        assert_eq!(all_day.hour_lines(), vec![ALL_DAY_LABEL.to_string()]);
    }

    #[test]
    fn normalize_scrubs_hours_from_closed_rows() {
        let mut items = vec![
            {
                let mut closed = item("Minggu", None, "08:00", "17:00");
                closed.is_closed = true;
                closed
            },
            item("Senin", None, "08:00", "17:00"),
        ];
        normalize(&mut items);
        assert_eq!(items[0].open, "");
        assert_eq!(items[0].close, "");
        assert_eq!(items[1].open, "08:00");
    }

    #[test]
    fn placeholder_is_weekday_office_hours() {
        let row = ScheduleItem::placeholder();
        assert_eq!(row.group_label(), "Senin - Jumat");
        assert_eq!(row.hour_lines(), vec!["08:00 - 17:00".to_string()]);
    }

    #[test]
    fn each_day_name_groups_to_itself() {
        let items: Vec<ScheduleItem> = DAY_NAMES
            .iter()
            .map(|d| item(d, None, "08:00", "17:00"))
            .collect();
        let groups = group_for_display(&items);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, DAY_NAMES.to_vec());
    }

    #[test]
    fn time_pattern_accepts_24_hour_clock_only() {
        for ok in ["08:00", "8:05", "23:59", "00:00", "19:30"] {
            assert!(is_valid_time(ok), "{ok} harus valid");
        }
        for bad in ["24:00", "12:60", "8:5", "ab:cd", "0800", "115:00", ""] {
            assert!(!is_valid_time(bad), "{bad} harus ditolak");
        }
    }
}
