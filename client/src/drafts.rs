//! Form payloads for the per-entity save calls, one struct per modal form.
//!
//! A populated `id` switches the save into edit mode (PUT instead of POST).

use serde::Serialize;

/// In-memory stand-in for a browser file input.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct KelasDraft {
    pub id: Option<i64>,
    pub nama_kelas: String,
    pub deskripsi: String,
    pub id_guru: String,
}

#[derive(Debug, Clone)]
pub struct PenggunaDraft {
    /// Profiles are keyed by UUID strings, not integers.
    pub id: Option<String>,
    pub nama_lengkap: String,
    pub email: String,
    pub peran: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MateriDraft {
    pub id: Option<i64>,
    pub id_kelas: String,
    pub judul: String,
    pub deskripsi: String,
}

#[derive(Debug, Clone)]
pub struct TugasDraft {
    pub id: Option<i64>,
    pub id_kelas: String,
    pub judul: String,
    pub deskripsi: String,
    pub batas_waktu: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KuisDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub id_kelas: String,
    pub judul: String,
    pub waktu_mulai: String,
    pub waktu_selesai: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForumDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub id_kelas: String,
    pub id_pengguna: String,
    pub isi: String,
}
