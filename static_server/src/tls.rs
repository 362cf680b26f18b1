use std::{fs::File, io::BufReader};

use anyhow::Context;
use rustls::{
    pki_types::{CertificateDer, PrivateKeyDer},
    server::ServerConfig,
};
use rustls_pemfile::{certs, pkcs8_private_keys};

use crate::config::TlsPaths;

pub fn server_config(paths: &TlsPaths) -> anyhow::Result<ServerConfig> {
    // certificat
    let mut r = BufReader::new(
        File::open(&paths.cert).with_context(|| format!("open {}", paths.cert.display()))?,
    );
    let certs: Vec<CertificateDer<'static>> =
        certs(&mut r).collect::<Result<_, _>>().context("parse certificate")?;

    // clé privée
    let mut r = BufReader::new(
        File::open(&paths.key).with_context(|| format!("open {}", paths.key.display()))?,
    );
    let key = pkcs8_private_keys(&mut r)
        .next()
        .context("no PKCS#8 key in file")?
        .context("invalid PKCS#8 key")?;

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, PrivateKeyDer::Pkcs8(key))
        .context("TLS config")
}
