use gigwork_backend::{
    api::router::create_router,
    background::start_background_worker,
    config::Config,
    infra::repositories::{
        sqlite_invitation_repo::SqliteInvitationRepo,
        sqlite_job_repo::SqliteJobRepo,
        sqlite_notification_repo::SqliteNotificationRepo,
        sqlite_project_repo::SqliteProjectRepo,
    },
    state::AppState,
};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

const TEST_PRIVATE_KEY: &str = include_str!("keys/test_private.pem");
const TEST_PUBLIC_KEY: &str = include_str!("keys/test_public.pem");
const TEST_ISSUER: &str = "test-issuer";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        // Same journal setup as the factory so concurrent writers queue
        // instead of failing with SQLITE_BUSY.
        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: TEST_PUBLIC_KEY.to_string(),
            auth_issuer: TEST_ISSUER.to_string(),
            invitation_ttl_hours: 72,
            // Long interval so sweeps in tests are driven explicitly.
            expiry_sweep_interval_secs: 3600,
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            project_repo: Arc::new(SqliteProjectRepo::new(pool.clone())),
            invitation_repo: Arc::new(SqliteInvitationRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
        });

        let worker_state = state.clone();
        tokio::spawn(async move {
            start_background_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Mints the bearer token the external auth collaborator would issue.
    pub fn token_for(&self, user_id: &str, user_type: &str) -> String {
        let claims = json!({
            "sub": user_id,
            "user_type": user_type,
            "iss": TEST_ISSUER,
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        encode(
            &Header::new(Algorithm::EdDSA),
            &claims,
            &EncodingKey::from_ed_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap(),
        )
        .expect("Failed to sign test token")
    }

    #[allow(dead_code)]
    pub fn company_token(&self, company_id: &str) -> String {
        self.token_for(company_id, "company")
    }

    #[allow(dead_code)]
    pub fn worker_token(&self, worker_id: &str) -> String {
        self.token_for(worker_id, "worker")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
