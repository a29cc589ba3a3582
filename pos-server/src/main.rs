use pos_server::{App, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pos_server::utils::logger::init();

    tracing::info!("POS station starting...");

    let config = Config::from_env();
    let app = App::bootstrap(&config).await?;

    tracing::info!(backend = %app.backend(), "POS station ready");

    // The UI layer drives the App in-process; keep the station alive until
    // the operator shuts it down
    tokio::signal::ctrl_c().await?;
    tracing::info!("POS station shutting down");

    Ok(())
}
