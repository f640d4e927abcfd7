use lazy_static::lazy_static;
use rsa_key_factory::{algorithm::SignatureAlgorithm, factory::RsaKeyFactory, jwk::JsonWebKey};

pub const TEST_DN: &str = "CN=Test";

lazy_static! {
    /// Generating 2048 bit keys is slow, so tests share one key pair.
    pub static ref GENERATED: RsaKeyFactory = RsaKeyFactory::builder()
        .signature_algorithm(SignatureAlgorithm::RS256)
        .dn_name(TEST_DN)
        .build()
        .expect("Failed to generate key pair");
}

pub fn fixture_json() -> &'static str {
    include_str!("jwk.json")
}

pub fn fixture_jwk() -> JsonWebKey {
    serde_json::from_str(fixture_json()).expect("Failed to read jwk.json")
}
