use payloads::Stats;
use serde_json::Value;

use crate::notify::Notice;

/// Client-side snapshot of everything the dashboard renders.
///
/// Collections are replaced wholesale on every reload; nothing merges. The
/// store is passed explicitly to every sync call instead of living in
/// ambient globals, so rendering code always reads one coherent snapshot.
#[derive(Debug, Default)]
pub struct Store {
    pub kelas: Vec<Value>,
    pub pengguna: Vec<Value>,
    pub materi: Vec<Value>,
    pub tugas: Vec<Value>,
    pub kuis: Vec<Value>,
    pub forum: Vec<Value>,
    pub stats: Stats,
    notices: Vec<Notice>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the queued notifications to the rendering layer and clear them.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
