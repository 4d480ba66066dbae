//! Keadaan panel admin di antara form, daftar, dan hasil panggilan
//! jaringan. Penyegaran berkala dijeda selama ada suntingan; mutasi
//! diterapkan lokal hanya lewat hasil eksplisit, bukan sebelum server
//! menjawab.

use crate::listing::{self, PlacePage, SortConfig, SortKey};
use crate::models::{Place, PlaceDraft};

/// Hasil satu operasi mutasi terhadap server. Pemanggil menerapkan
/// transisi keadaan hanya pada `Committed`; `Failed` dibiarkan untuk
/// dikoreksi fetch rekonsiliasi berikutnya.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Committed(T),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditState {
    Browsing,
    Creating,
    Editing(String),
}

#[derive(Debug)]
pub struct Workspace {
    places: Vec<Place>,
    query: String,
    sort: Option<SortConfig>,
    page: usize,
    per_page: usize,
    edit: EditState,
}

impl Workspace {
    pub fn new(per_page: usize) -> Self {
        Workspace {
            places: Vec::new(),
            query: String::new(),
            sort: None,
            page: 1,
            per_page: per_page.max(1),
            edit: EditState::Browsing,
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn is_editing(&self) -> bool {
        self.edit != EditState::Browsing
    }

    /// Gerbang polling: penyegaran berkala hanya jalan saat tidak ada
    /// suntingan, supaya form operator tidak tertimpa data basi.
    pub fn refresh_due(&self) -> bool {
        !self.is_editing()
    }

    /// Terima hasil fetch penuh. Mengembalikan false bila dilewati
    /// karena sedang menyunting.
    pub fn apply_fetch(&mut self, places: Vec<Place>) -> bool {
        if self.is_editing() {
            return false;
        }
        self.places = places;
        self.clamp_current_page();
        true
    }

    pub fn begin_create(&mut self) {
        self.edit = EditState::Creating;
    }

    pub fn begin_edit(&mut self, id: &str) -> Option<&Place> {
        let found = self.places.iter().position(|p| p.id == id)?;
        self.edit = EditState::Editing(id.to_string());
        Some(&self.places[found])
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Browsing;
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = listing::cycle_sort(self.sort, key);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_current_page();
    }

    pub fn visible(&self) -> PlacePage {
        listing::visible_page(&self.places, &self.query, self.sort, self.page, self.per_page)
    }

    /// Simpan yang terkonfirmasi menambal daftar lokal dengan rekaman
    /// yang dikirim dan menutup mode sunting; kegagalan mengembalikan
    /// pesannya dan membiarkan form tetap terbuka.
    pub fn commit_save(&mut self, outcome: MutationOutcome<Place>) -> Result<(), String> {
        match outcome {
            MutationOutcome::Committed(saved) => {
                match self.places.iter_mut().find(|p| p.id == saved.id) {
                    Some(slot) => *slot = saved,
                    None => self.places.insert(0, saved),
                }
                self.edit = EditState::Browsing;
                Ok(())
            }
            MutationOutcome::Failed { message } => Err(message),
        }
    }

    /// Hapus yang terkonfirmasi membuang rekaman lokal dan menurunkan
    /// indeks halaman bila halaman terakhir ikut kosong.
    pub fn commit_delete(
        &mut self,
        id: &str,
        outcome: MutationOutcome<()>,
    ) -> Result<(), String> {
        match outcome {
            MutationOutcome::Committed(()) => {
                self.places.retain(|p| p.id != id);
                self.clamp_current_page();
                Ok(())
            }
            MutationOutcome::Failed { message } => Err(message),
        }
    }

    fn clamp_current_page(&mut self) {
        let visible = self.visible();
        self.page = listing::clamp_page(self.page, visible.total_pages);
    }
}

/// Validasi sebelum kirim; pelanggaran memblokir submit tanpa
/// panggilan jaringan.
pub fn validate_draft(draft: &PlaceDraft) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push("nama tempat wajib diisi".to_string());
    }
    match (draft.lat, draft.lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {}
        _ => errors.push("koordinat wajib diisi".to_string()),
    }
    if !draft.images.iter().any(|url| !url.trim().is_empty()) {
        errors.push("minimal satu gambar wajib diisi".to_string());
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
