use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use petaloka::auth::AdminCredentials;
use petaloka::models::{DetailDraft, PlaceDraft};
use petaloka::state::AppState;
use petaloka::{db, handlers, schedule};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

async fn root_handler() -> Html<String> {
    tokio::fs::read_to_string("templates/index.html")
        .await
        .map(Html)
        .unwrap_or_else(|_| Html("<h1>Galat: index.html tidak bisa dimuat</h1>".to_string()))
}

async fn seed_database_if_empty(pool: &SqlitePool) {
    let place_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM places")
        .fetch_one(pool)
        .await
        .expect("failed to check place count");

    if place_count.0 == 0 {
        tracing::info!("basis data kosong, menambah contoh tempat");
        let draft = PlaceDraft {
            name: "Pantai Parangtritis".to_string(),
            category: "wisata".to_string(),
            lat: Some(-8.0257),
            lon: Some(110.3327),
            address: Some("Parangtritis, Kretek, Bantul".to_string()),
            description: Some("Pantai selatan dengan gumuk pasir.".to_string()),
            images: vec!["/assets/contoh/parangtritis.jpg".to_string()],
            detail: Some(DetailDraft {
                access_info: Some(schedule::encode(&[schedule::ScheduleItem {
                    start_day: Some("Setiap Hari".to_string()),
                    open: "05:00".to_string(),
                    close: "19:00".to_string(),
                    ..schedule::ScheduleItem::default()
                }])),
                price_info: Some("10000".to_string()),
                contact_info: Some("081234567890".to_string()),
                facilities: Some("parkir, warung, toilet".to_string()),
                web_url: None,
            }),
        };
        match db::create_place(pool, &draft).await {
            Ok(place) => tracing::info!(id = %place.id, "contoh tempat ditambahkan"),
            Err(e) => tracing::error!("gagal menambah contoh tempat: {e:?}"),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let connect_options = SqliteConnectOptions::from_str(&db_url)
        .expect("failed to parse DATABASE_URL")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .expect("failed to connect to db");

    db::init_schema(&pool).await.expect("failed to create tables");
    seed_database_if_empty(&pool).await;

    let app_state = AppState {
        pool,
        admin: Arc::new(AdminCredentials::from_env()),
        sessions: Arc::new(RwLock::new(HashSet::new())),
    };

    let app = Router::new()
        .route("/", get(root_handler))
        .nest_service("/assets", ServeDir::new("assets"))
        .route("/api/auth/login", post(handlers::login))
        .route(
            "/api/places",
            get(handlers::list_places).post(handlers::create_place),
        )
        .route(
            "/api/places/{public_id}",
            get(handlers::get_place)
                .put(handlers::update_place)
                .delete(handlers::delete_place),
        )
        .route("/api/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("mendengarkan di {}", addr);
    axum::serve(listener, app).await.unwrap();
}
