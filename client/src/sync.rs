//! Load fan-out and per-entity mutations.
//!
//! Loading is all-or-nothing: seven requests behind one barrier, and any
//! failure drops the whole batch back onto the bundled sample data. This is
//! deliberately stricter than the server's stats endpoint, which tolerates
//! individual query failures.
//!
//! Every mutation follows the same contract: notify on success, reload
//! everything, and on failure notify once and return the error to the
//! caller. Nothing is retried.

use anyhow::{anyhow, Result};
use payloads::{ApiResponse, Stats};
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    drafts::{Attachment, ForumDraft, KelasDraft, KuisDraft, MateriDraft, PenggunaDraft, TugasDraft},
    notify::Notice,
    sample,
    store::Store,
};

/// HTTP client bound to one EduCMS deployment.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Refresh every collection plus the dashboard stats in one barrier.
    ///
    /// On failure the store is repopulated from the sample dataset so the
    /// views always have something to render.
    pub async fn load_all(&self, store: &mut Store) {
        match self.fetch_all().await {
            Ok((kelas, pengguna, materi, tugas, kuis, forum, stats)) => {
                store.kelas = kelas;
                store.pengguna = pengguna;
                store.materi = materi;
                store.tugas = tugas;
                store.kuis = kuis;
                store.forum = forum;
                store.stats = stats;

                store.notify(Notice::success("Data berhasil dimuat!"));
            }
            Err(e) => {
                store.notify(Notice::danger(format!("Gagal memuat data: {e}")));
                sample::populate(store);
            }
        }
    }

    async fn fetch_all(
        &self,
    ) -> Result<(
        Vec<Value>,
        Vec<Value>,
        Vec<Value>,
        Vec<Value>,
        Vec<Value>,
        Vec<Value>,
        Stats,
    )> {
        tokio::try_join!(
            self.fetch_collection("/api/kelas"),
            self.fetch_collection("/api/pengguna"),
            self.fetch_collection("/api/materi"),
            self.fetch_collection("/api/tugas"),
            self.fetch_collection("/api/kuis"),
            self.fetch_collection("/api/forum"),
            self.fetch_stats(),
        )
    }

    async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>> {
        let envelope = self.fetch_envelope(path).await?;

        Ok(envelope
            .data
            .and_then(|data| data.as_array().cloned())
            .unwrap_or_default())
    }

    async fn fetch_stats(&self) -> Result<Stats> {
        let envelope = self.fetch_envelope("/api/dashboard/stats").await?;

        Ok(envelope
            .data
            .and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default())
    }

    async fn fetch_envelope(&self, path: &str) -> Result<ApiResponse> {
        let response = self.client.get(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Gagal memuat data dari server: {}",
                response.status().as_u16()
            ));
        }

        Ok(response.json().await?)
    }

    pub async fn save_kelas(
        &self,
        store: &mut Store,
        draft: &KelasDraft,
        image: Option<Attachment>,
    ) -> Result<Value> {
        let mut form = Form::new()
            .text("nama_kelas", draft.nama_kelas.clone())
            .text("deskripsi", draft.deskripsi.clone())
            .text("id_guru", draft.id_guru.clone());

        if let Some(file) = image {
            form = form.part("gambar", Part::bytes(file.bytes).file_name(file.file_name));
        }

        let id = draft.id.map(|id| id.to_string());
        let result = self.submit_multipart("/api/kelas", id.as_deref(), form).await;

        self.finish_save(store, result, "Kelas", draft.id.is_some())
            .await
    }

    pub async fn save_pengguna(
        &self,
        store: &mut Store,
        draft: &PenggunaDraft,
        avatar: Option<Attachment>,
    ) -> Result<Value> {
        let is_edit = draft.id.is_some();

        let mut form = Form::new()
            .text("nama_lengkap", draft.nama_lengkap.clone())
            .text("email", draft.email.clone())
            .text("peran", draft.peran.clone());

        // Only send a password when creating or when one was entered.
        if !is_edit || draft.password.is_some() {
            form = form.text(
                "password",
                draft
                    .password
                    .clone()
                    .unwrap_or_else(|| "defaultpassword".to_string()),
            );
        }

        if let Some(file) = avatar {
            form = form.part(
                "foto_profil",
                Part::bytes(file.bytes).file_name(file.file_name),
            );
        }

        let result = self
            .submit_multipart("/api/pengguna", draft.id.as_deref(), form)
            .await;

        self.finish_save(store, result, "Pengguna", is_edit).await
    }

    pub async fn save_materi(
        &self,
        store: &mut Store,
        draft: &MateriDraft,
        file: Option<Attachment>,
    ) -> Result<Value> {
        let mut form = Form::new()
            .text("id_kelas", draft.id_kelas.clone())
            .text("judul", draft.judul.clone())
            .text("deskripsi", draft.deskripsi.clone());

        if let Some(file) = file {
            form = form.part(
                "tautan_file",
                Part::bytes(file.bytes).file_name(file.file_name),
            );
        }

        let id = draft.id.map(|id| id.to_string());
        let result = self
            .submit_multipart("/api/materi", id.as_deref(), form)
            .await;

        self.finish_save(store, result, "Materi", draft.id.is_some())
            .await
    }

    pub async fn save_tugas(
        &self,
        store: &mut Store,
        draft: &TugasDraft,
        file: Option<Attachment>,
    ) -> Result<Value> {
        let mut form = Form::new()
            .text("id_kelas", draft.id_kelas.clone())
            .text("judul", draft.judul.clone())
            .text("deskripsi", draft.deskripsi.clone())
            .text("batas_waktu", draft.batas_waktu.clone());

        if let Some(file) = file {
            form = form.part(
                "tautan_file",
                Part::bytes(file.bytes).file_name(file.file_name),
            );
        }

        let id = draft.id.map(|id| id.to_string());
        let result = self.submit_multipart("/api/tugas", id.as_deref(), form).await;

        self.finish_save(store, result, "Tugas", draft.id.is_some())
            .await
    }

    pub async fn save_kuis(&self, store: &mut Store, draft: &KuisDraft) -> Result<Value> {
        let id = draft.id.map(|id| id.to_string());
        let result = self.submit_json("/api/kuis", id.as_deref(), draft).await;

        self.finish_save(store, result, "Kuis", draft.id.is_some())
            .await
    }

    pub async fn save_forum(&self, store: &mut Store, draft: &ForumDraft) -> Result<Value> {
        let id = draft.id.map(|id| id.to_string());
        let result = self.submit_json("/api/forum", id.as_deref(), draft).await;

        self.finish_save(store, result, "Diskusi", draft.id.is_some())
            .await
    }

    pub async fn delete_kelas(&self, store: &mut Store, id: i64) -> Result<()> {
        let result = self.delete_record("/api/kelas", &id.to_string()).await;
        self.finish_delete(store, result, "Kelas").await
    }

    pub async fn delete_pengguna(&self, store: &mut Store, id: &str) -> Result<()> {
        let result = self.delete_record("/api/pengguna", id).await;
        self.finish_delete(store, result, "Pengguna").await
    }

    pub async fn delete_materi(&self, store: &mut Store, id: i64) -> Result<()> {
        let result = self.delete_record("/api/materi", &id.to_string()).await;
        self.finish_delete(store, result, "Materi").await
    }

    pub async fn delete_tugas(&self, store: &mut Store, id: i64) -> Result<()> {
        let result = self.delete_record("/api/tugas", &id.to_string()).await;
        self.finish_delete(store, result, "Tugas").await
    }

    pub async fn delete_kuis(&self, store: &mut Store, id: i64) -> Result<()> {
        let result = self.delete_record("/api/kuis", &id.to_string()).await;
        self.finish_delete(store, result, "Kuis").await
    }

    pub async fn delete_forum(&self, store: &mut Store, id: i64) -> Result<()> {
        let result = self.delete_record("/api/forum", &id.to_string()).await;
        self.finish_delete(store, result, "Diskusi").await
    }

    async fn submit_multipart(&self, path: &str, id: Option<&str>, form: Form) -> Result<Value> {
        let request = match id {
            Some(id) => self.client.put(self.url(&format!("{path}/{id}"))),
            None => self.client.post(self.url(path)),
        };

        self.submit(request.multipart(form)).await
    }

    async fn submit_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        id: Option<&str>,
        body: &T,
    ) -> Result<Value> {
        let request = match id {
            Some(id) => self.client.put(self.url(&format!("{path}/{id}"))),
            None => self.client.post(self.url(path)),
        };

        self.submit(request.json(body)).await
    }

    async fn submit(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(error_message(response).await));
        }

        let envelope: ApiResponse = response.json().await?;

        Ok(envelope.data.unwrap_or(Value::Null))
    }

    async fn delete_record(&self, path: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("{path}/{id}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(error_message(response).await));
        }

        Ok(())
    }

    async fn finish_save(
        &self,
        store: &mut Store,
        result: Result<Value>,
        label: &str,
        is_edit: bool,
    ) -> Result<Value> {
        match result {
            Ok(data) => {
                let verb = if is_edit { "diupdate" } else { "disimpan" };
                store.notify(Notice::success(format!("{label} berhasil {verb}!")));
                self.load_all(store).await;

                Ok(data)
            }
            Err(e) => {
                store.notify(Notice::danger(format!(
                    "Gagal menyimpan {}: {e}",
                    label.to_lowercase()
                )));

                Err(e)
            }
        }
    }

    async fn finish_delete(
        &self,
        store: &mut Store,
        result: Result<()>,
        label: &str,
    ) -> Result<()> {
        match result {
            Ok(()) => {
                store.notify(Notice::success(format!("{label} berhasil dihapus!")));
                self.load_all(store).await;

                Ok(())
            }
            Err(e) => {
                store.notify(Notice::danger(format!(
                    "Gagal menghapus {}: {e}",
                    label.to_lowercase()
                )));

                Err(e)
            }
        }
    }
}

/// Prefer the server's envelope message, fall back to the bare status.
async fn error_message(response: Response) -> String {
    let status = response.status();

    response
        .json::<ApiResponse>()
        .await
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| format!("Permintaan gagal: {}", status.as_u16()))
}
