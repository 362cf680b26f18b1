mod config;
mod gate;
mod logger;
mod spa;
mod tls;

use actix_web::{middleware::Logger, App, HttpServer};
use log::info;
use rustls::crypto::{ring::default_provider, CryptoProvider};

use crate::{config::EdgeConfig, gate::EdgeGate};

/* ---------- main -------------------------------------------------------- */
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logger::init();

    let cfg = EdgeConfig::from_env()?;
    cfg.validate()?;
    info!("Serving static files from {}", cfg.dist_dir.display());

    let dist_dir = cfg.dist_dir.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(EdgeGate)
            .wrap(Logger::default())
            .service(spa::service(&dist_dir))
    });

    let addr = (cfg.bind.as_str(), cfg.port);
    match &cfg.tls {
        Some(paths) => {
            // déjà installé si un autre composant l'a fait : sans importance
            let _ = CryptoProvider::install_default(default_provider());
            info!("edge listening on https://{}:{}", cfg.bind, cfg.port);
            server.bind_rustls_0_23(addr, tls::server_config(paths)?)?.run().await?;
        }
        None => {
            info!("edge listening on http://{}:{}", cfg.bind, cfg.port);
            server.bind(addr)?.run().await?;
        }
    }
    Ok(())
}
