//! Data-sync layer for the EduCMS API.
//!
//! The counterpart of the dashboard frontend: an explicit [`Store`] holds
//! every collection the views render, and [`ApiClient`] refreshes it with
//! one all-or-nothing fan-out across the whole API. Mutations go through
//! per-entity save and delete calls that notify, reload, and hand the error
//! back to the caller.

pub mod drafts;
pub mod notify;
pub mod sample;
pub mod store;
pub mod sync;

pub use drafts::{
    Attachment, ForumDraft, KelasDraft, KuisDraft, MateriDraft, PenggunaDraft, TugasDraft,
};
pub use notify::{Level, Notice};
pub use store::Store;
pub use sync::ApiClient;
