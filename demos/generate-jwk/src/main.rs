use std::{env, process::ExitCode};

use log::{error, info};
use rsa_key_factory::{
    factory::{KeyFactory, RsaKeyFactory, RsaKeyFactoryBuilder},
    KeyError,
};

fn configure(
    algorithm: &str,
    dn_name: Option<String>,
) -> Result<RsaKeyFactoryBuilder, KeyError> {
    let mut builder = RsaKeyFactory::builder().signature_algorithm(algorithm.parse()?);
    if let Some(dn_name) = dn_name {
        builder = builder.dn_name(dn_name);
    }
    Ok(builder)
}

/// Usage: `generate-jwk [ALGORITHM] [DN]`, e.g. `generate-jwk RS256 "CN=Test"`.
fn main() -> ExitCode {
    env_logger::init();
    let mut args = env::args().skip(1);
    let algorithm = args.next().unwrap_or_else(|| "RS256".to_owned());
    let dn_name = args.next();

    let builder = match configure(&algorithm, dn_name) {
        Ok(builder) => builder,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let factory = match builder.build() {
        Ok(factory) => factory,
        Err(e) => {
            error!("Failed to generate key pair: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Generated {} key pair", algorithm);

    let jwk = factory.to_jwk(None);
    match serde_json::to_string_pretty(&jwk) {
        Ok(json) => eprintln!("Persist this record to reconstruct the key pair:\n{}", json),
        Err(e) => error!("Failed to serialize key pair: {}", e),
    }

    println!("{}", factory.public_key());
    if let Some(certificate) = factory.certificate() {
        match certificate.to_pem() {
            Ok(pem) => print!("{}", pem),
            Err(e) => {
                error!("Failed to encode certificate: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
