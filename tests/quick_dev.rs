use serde_json::json;

// Jalankan server dulu (cargo run), lalu:
// cargo test quick_dev -- --ignored --nocapture
#[tokio::test]
#[ignore = "butuh server berjalan di localhost:3000"]
async fn quick_dev() -> anyhow::Result<()> {
    let hc = httpc_test::new_client("http://localhost:3000")?;

    hc.do_get("/api/places").await?.print().await?;
    hc.do_get("/api/places?q=pantai&sort=name&page=1").await?.print().await?;
    hc.do_get("/api/stats").await?.print().await?;

    let login = hc
        .do_post(
            "/api/auth/login",
            json!({ "username": "admin", "password": "admin" }),
        )
        .await?;
    login.print().await?;

    // Mutasi tanpa token harus ditolak.
    let unauthorized = hc
        .do_post(
            "/api/places",
            json!({
                "name": "Kopi Pagi",
                "category": "cafe",
                "lat": "-7.782",
                "lon": "110.367",
                "images": ["kopi.jpg"]
            }),
        )
        .await?;
    assert_eq!(unauthorized.status(), 401);

    Ok(())
}
