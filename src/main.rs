//! A web service that greets its authenticated callers.

use hello_server::{
    infra::{config, logging},
    server,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let _guard = logging::init_logging();
    let config = config::load_config()?;

    let listener = TcpListener::bind((
        config.server.http_address.as_str(),
        config.server.http_port,
    ))
    .await?;
    server::run_app(listener, config).await?;

    Ok(())
}
