//! # Table and field vocabulary
//!
//! The public API speaks the legacy Indonesian vocabulary (`kelas`,
//! `pengguna`, ...) while the storage project keeps the column names of the
//! chat-platform schema it was built on. This module owns both directions of
//! that translation.
//!
//! Tables form a closed set. A path segment either names a [`Resource`] or
//! the request is rejected as an unknown route; nothing is forwarded to an
//! arbitrary table name. Resources without a mapping entry use their own
//! name as the physical table and translate no fields.
//!
//! Field maps are written once in the request direction. The response
//! direction walks the same pairs backwards, so the two can never drift
//! apart.

use serde_json::{Map, Value};

/// Physical tables probed by the `/api/schema` discovery endpoint.
pub const PROBE_TABLES: [&str; 12] = [
    "categories",
    "chat_rooms",
    "materi",
    "messages",
    "notifications",
    "options",
    "profiles",
    "questions",
    "quiz_attempts",
    "quizzes",
    "rewards",
    "user_favorites",
];

/// Integer-typed foreign key columns. Form submissions deliver every value
/// as a string, so these are re-typed after field translation and before the
/// record reaches storage.
pub const FOREIGN_KEY_FIELDS: [&str; 4] = ["category_id", "room_id", "quiz_id", "question_id"];

const KELAS_FIELDS: &[(&str, &str)] = &[
    ("nama_kelas", "name"),
    ("deskripsi", "description"),
    ("id_guru", "category_id"),
];

const PENGGUNA_FIELDS: &[(&str, &str)] = &[
    ("nama_lengkap", "full_name"),
    ("peran", "role"),
    ("foto_profil", "avatar_url"),
];

const KUIS_FIELDS: &[(&str, &str)] = &[
    ("judul", "title"),
    ("id_kelas", "category_id"),
    ("waktu_mulai", "start_time"),
    ("waktu_selesai", "end_time"),
];

const FORUM_FIELDS: &[(&str, &str)] = &[
    ("isi", "content"),
    ("id_kelas", "room_id"),
    ("id_pengguna", "sender_id"),
];

/// Every table addressable through `/api/{table}`.
///
/// The first six are the legacy names the client uses; the rest expose the
/// physical tables directly under their own names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Kelas,
    Pengguna,
    Materi,
    Tugas,
    Kuis,
    Forum,
    Categories,
    ChatRooms,
    Messages,
    Notifications,
    Options,
    Profiles,
    Questions,
    QuizAttempts,
    Quizzes,
    Rewards,
    UserFavorites,
}

impl Resource {
    pub fn parse(segment: &str) -> Option<Self> {
        let resource = match segment {
            "kelas" => Self::Kelas,
            "pengguna" => Self::Pengguna,
            "materi" => Self::Materi,
            "tugas" => Self::Tugas,
            "kuis" => Self::Kuis,
            "forum" => Self::Forum,
            "categories" => Self::Categories,
            "chat_rooms" => Self::ChatRooms,
            "messages" => Self::Messages,
            "notifications" => Self::Notifications,
            "options" => Self::Options,
            "profiles" => Self::Profiles,
            "questions" => Self::Questions,
            "quiz_attempts" => Self::QuizAttempts,
            "quizzes" => Self::Quizzes,
            "rewards" => Self::Rewards,
            "user_favorites" => Self::UserFavorites,
            _ => return None,
        };

        Some(resource)
    }

    pub fn physical(self) -> &'static str {
        match self {
            Self::Kelas => "categories",
            Self::Pengguna => "profiles",
            Self::Kuis => "quizzes",
            Self::Forum => "messages",
            // Purpose-built tables already using the legacy names.
            Self::Materi => "materi",
            Self::Tugas => "tugas",
            Self::Categories => "categories",
            Self::ChatRooms => "chat_rooms",
            Self::Messages => "messages",
            Self::Notifications => "notifications",
            Self::Options => "options",
            Self::Profiles => "profiles",
            Self::Questions => "questions",
            Self::QuizAttempts => "quiz_attempts",
            Self::Quizzes => "quizzes",
            Self::Rewards => "rewards",
            Self::UserFavorites => "user_favorites",
        }
    }

    /// Field pairs in the request direction, legacy name first.
    fn field_map(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Kelas => KELAS_FIELDS,
            Self::Pengguna => PENGGUNA_FIELDS,
            Self::Kuis => KUIS_FIELDS,
            Self::Forum => FORUM_FIELDS,
            _ => &[],
        }
    }
}

/// Rewrite an incoming record from legacy field names to storage columns.
/// Unmapped fields pass through untouched.
pub fn map_request_body(resource: Resource, body: &Map<String, Value>) -> Map<String, Value> {
    let map = resource.field_map();

    body.iter()
        .map(|(key, value)| {
            let translated = map
                .iter()
                .find(|(legacy, _)| *legacy == key.as_str())
                .map_or(key.as_str(), |(_, column)| *column);

            (translated.to_string(), value.clone())
        })
        .collect()
}

/// Rewrite a stored record, or an array of them, back to legacy field names.
pub fn map_response_body(resource: Resource, value: &Value) -> Value {
    match value {
        Value::Array(rows) => Value::Array(
            rows.iter()
                .map(|row| map_response_body(resource, row))
                .collect(),
        ),
        Value::Object(row) => {
            let map = resource.field_map();

            Value::Object(
                row.iter()
                    .map(|(key, value)| {
                        let translated = map
                            .iter()
                            .find(|(_, column)| *column == key.as_str())
                            .map_or(key.as_str(), |(legacy, _)| *legacy);

                        (translated.to_string(), value.clone())
                    })
                    .collect(),
            )
        }
        other => other.clone(),
    }
}

/// Re-type known foreign key fields to integers in place.
///
/// Strings that do not parse are left alone so storage reports the real type
/// error instead of this layer guessing.
pub fn coerce_foreign_keys(record: &mut Map<String, Value>) {
    for field in FOREIGN_KEY_FIELDS {
        let Some(value) = record.get(field) else {
            continue;
        };

        let coerced = match value {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f as i64),
            _ => None,
        };

        if let Some(int) = coerced {
            record.insert(field.to_string(), Value::from(int));
        }
    }
}
