// --- Cargador de horarios - Archivo principal ---

use semanario::{run_server, Config};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env();
    log::info!("=== Semanario (API) === escuchando en http://{}", config.bind);
    run_server(config).await
}
