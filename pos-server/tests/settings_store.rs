//! Settings store round-trip and atomicity

use pos_server::db::models::Settings;
use pos_server::db::repository::SettingsRepository;
use pos_server::{AppError, Config, DbService};

fn fallback_config(dir: &tempfile::TempDir) -> Config {
    Config::with_overrides(
        "mysql://127.0.0.1:1/pos_test",
        dir.path().join("pos.db").display().to_string(),
        1500,
    )
}

fn custom_settings() -> Settings {
    Settings {
        restaurant_name: "Nile Corner".to_string(),
        restaurant_name_ar: "ركن النيل".to_string(),
        currency: "EGP".to_string(),
        tax_rate: 0.08,
        service_charge_rate: 0.05,
        language: "en".to_string(),
        theme_color: "#2563eb".to_string(),
        print_receipt: true,
        print_kitchen: false,
    }
}

#[tokio::test]
async fn save_then_load_round_trips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::connect(&fallback_config(&dir)).await.unwrap();
    let repo = SettingsRepository::new(db.pool.clone());

    let saved = custom_settings();
    repo.save(&saved).await.unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::connect(&fallback_config(&dir)).await.unwrap();
    let repo = SettingsRepository::new(db.pool.clone());

    repo.save(&custom_settings()).await.unwrap();

    // A future station version may persist keys this build does not know
    sqlx::query("REPLACE INTO settings (`key`, value, updated_at) VALUES ('loyalty_mode', 'stamps', 0)")
        .execute(&db.pool)
        .await
        .unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, custom_settings());
}

#[tokio::test]
async fn empty_restaurant_name_falls_back_to_whole_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::connect(&fallback_config(&dir)).await.unwrap();
    let repo = SettingsRepository::new(db.pool.clone());

    // Stored record with a blank name: the fallback is all-or-nothing, so
    // the stored currency must NOT leak into the reported record
    let mut broken = custom_settings();
    broken.restaurant_name = String::new();
    repo.save(&broken).await.unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, Settings::defaults());
    assert_eq!(loaded.currency, "ج.م");
}

#[tokio::test]
async fn save_rolls_back_entirely_on_injected_failure() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::connect(&fallback_config(&dir)).await.unwrap();
    let repo = SettingsRepository::new(db.pool.clone());

    let original = custom_settings();
    repo.save(&original).await.unwrap();

    // Abort the ninth field write (print_kitchen is saved last)
    sqlx::query(
        "CREATE TRIGGER reject_print_kitchen BEFORE INSERT ON settings \
         WHEN NEW.key = 'print_kitchen' \
         BEGIN SELECT RAISE(ABORT, 'injected write failure'); END",
    )
    .execute(&db.pool)
    .await
    .unwrap();

    let mut changed = original.clone();
    changed.restaurant_name = "Changed".to_string();
    changed.currency = "USD".to_string();
    changed.tax_rate = 0.2;

    let err = repo.save(&changed).await.unwrap_err();
    assert!(matches!(err, AppError::Persist(_)));

    // Eight successful upserts were rolled back with the failed one
    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, original);

    // With the fault removed the same record saves cleanly
    sqlx::query("DROP TRIGGER reject_print_kitchen")
        .execute(&db.pool)
        .await
        .unwrap();
    repo.save(&changed).await.unwrap();
    assert_eq!(repo.load().await.unwrap(), changed);
}
