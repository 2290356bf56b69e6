use std::fs;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod domain;
pub mod infrastructure;
pub mod application;

use infrastructure::audit_repo::AuditRepository;
use infrastructure::catalog_repo::CatalogRepository;
use infrastructure::grid_repo::GridRepository;
use infrastructure::preference_repo::PreferenceRepository;
use infrastructure::roster_repo::RosterRepository;

// 全てのリポジトリを保持するコンテナ
pub struct AppServices {
    pub roster: RosterRepository,
    pub grid: GridRepository,
    pub preference: PreferenceRepository,
    pub catalog: CatalogRepository,
    pub audit: AuditRepository,
}

impl AppServices {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            // poolは内部で参照カウントされているのでcloneしても低コスト
            roster: RosterRepository::new(pool.clone()),
            grid: GridRepository::new(pool.clone()),
            preference: PreferenceRepository::new(pool.clone()),
            catalog: CatalogRepository::new(pool.clone()),
            audit: AuditRepository::new(pool),
        }
    }
}

// =====================
// DB ブートストラップ
// =====================

/// DBファイルを開いて（なければ作って）マイグレーションを適用する
/// UIシェル（デスクトップアプリやHTTPサーバ）の起動時に1回呼ぶ
pub async fn open_database(db_path: &Path) -> Result<SqlitePool, String> {
    // --- ディレクトリ作成（冪等） ---
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    log::info!("Using DB at: {}", db_path.display());

    // --- DB 接続設定 ---
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true); // ファイルがなければ作る

    // --- DB 接続 ---
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| e.to_string())?;

    // --- テーブル ---
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| e.to_string())?;

    Ok(pool)
}
