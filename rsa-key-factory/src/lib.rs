#![doc = include_str!("../README.md")]

/// [SignatureAlgorithm](crate::algorithm::SignatureAlgorithm) lists the
/// algorithms an RSA signing key can be generated for.
pub mod algorithm;

/// [Certificate](crate::certificate::Certificate) wraps the self-signed
/// X.509 certificate optionally issued together with a new key pair.
pub mod certificate;

/// base64url helpers for the unsigned integers that make up RSA keys.
pub mod encoding;

/// [JsonWebKey](crate::jwk::JsonWebKey) is the persisted form of a key pair
/// that [RsaKeyFactory::from_jwk](crate::factory::RsaKeyFactory::from_jwk)
/// reconstructs keys from.
pub mod jwk;

/// Key value objects.
///
/// [RsaPublicKey](crate::keys::RsaPublicKey) serializes to the JWK layout
/// used when publishing the key set.
pub mod keys;

/// [RsaKeyFactory](crate::factory::RsaKeyFactory) generates or reconstructs
/// RSA key pairs.
///
/// # Example
///
/// ```no_run
/// use rsa_key_factory::{
///     algorithm::SignatureAlgorithm,
///     factory::{KeyFactory, RsaKeyFactory},
/// };
///
/// let factory = RsaKeyFactory::builder()
///     .signature_algorithm(SignatureAlgorithm::RS256)
///     .dn_name("CN=Test")
///     .build()
///     .expect("Failed to generate key pair");
///
/// println!("{}", factory.public_key());
/// ```
pub mod factory;

mod error;

pub use error::KeyError;
