use tinykv::config::Config;
use tinykv::server;
use tinykv::store::new_shared_store;
use tracing::error;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_args(&args);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    let store = new_shared_store();

    if let Err(e) = server::run_server(config, store).await {
        error!("{e}");
        std::process::exit(1);
    }
}
