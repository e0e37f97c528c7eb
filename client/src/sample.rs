//! Bundled fallback dataset, shown when the API cannot be reached so the
//! dashboard never renders empty.

use payloads::Stats;
use serde_json::json;

use crate::store::Store;

pub fn populate(store: &mut Store) {
    store.kelas = vec![
        json!({
            "id": 1,
            "nama_kelas": "Matematika Dasar",
            "deskripsi": "Aljabar dan aritmetika untuk kelas 7",
            "id_guru": 1
        }),
        json!({
            "id": 2,
            "nama_kelas": "Bahasa Indonesia",
            "deskripsi": "Tata bahasa dan menulis",
            "id_guru": 2
        }),
    ];

    store.pengguna = vec![
        json!({
            "id": "6f1c7d58-1b65-4f37-9a20-3f4b2a7c9d11",
            "nama_lengkap": "Siti Rahma",
            "email": "siti@educms.id",
            "peran": "guru"
        }),
        json!({
            "id": "a2b9e431-77f0-4f0a-8a0f-5d6c1e2f3a44",
            "nama_lengkap": "Budi Santoso",
            "email": "budi@educms.id",
            "peran": "siswa"
        }),
    ];

    store.materi = vec![json!({
        "id": 1,
        "id_kelas": 1,
        "judul": "Bab 1: Bilangan Bulat",
        "deskripsi": "Pengenalan bilangan bulat"
    })];

    store.tugas = vec![json!({
        "id": 1,
        "id_kelas": 1,
        "judul": "Latihan Bab 1",
        "deskripsi": "Kerjakan soal 1-10",
        "batas_waktu": "2025-01-31"
    })];

    store.kuis = vec![json!({
        "id": 1,
        "id_kelas": 1,
        "judul": "Kuis Bilangan Bulat",
        "waktu_mulai": "2025-01-20T08:00:00Z",
        "waktu_selesai": "2025-01-20T09:00:00Z"
    })];

    store.forum = vec![json!({
        "id": 1,
        "id_kelas": 1,
        "id_pengguna": "a2b9e431-77f0-4f0a-8a0f-5d6c1e2f3a44",
        "isi": "Apakah tugas bab 1 boleh dikumpulkan lewat email?"
    })];

    store.stats = Stats {
        kelas: store.kelas.len(),
        pengguna: store.pengguna.len(),
        materi: store.materi.len(),
        kuis: store.kuis.len(),
        forum: store.forum.len(),
        pengumpulan: 0,
    };
}
