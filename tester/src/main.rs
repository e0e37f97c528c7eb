use client::{ApiClient, Store};

#[tokio::main]
async fn main() {
    let base =
        std::env::var("EDUCMS_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let api = ApiClient::new(base);
    let mut store = Store::new();

    api.load_all(&mut store).await;

    println!("kelas:      {}", store.kelas.len());
    println!("pengguna:   {}", store.pengguna.len());
    println!("materi:     {}", store.materi.len());
    println!("tugas:      {}", store.tugas.len());
    println!("kuis:       {}", store.kuis.len());
    println!("forum:      {}", store.forum.len());
    println!("pengumpulan (stats): {}", store.stats.pengumpulan);

    for notice in store.drain_notices() {
        println!("[{:?}] {}", notice.level, notice.message);
    }
}
