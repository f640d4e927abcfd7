use log::{debug, info};
use rand::{
    rngs::{OsRng, StdRng},
    SeedableRng,
};

use crate::{
    algorithm::SignatureAlgorithm,
    certificate::{issue_self_signed, Certificate},
    error::KeyError,
    jwk::JsonWebKey,
    keys::{RsaPrivateKey, RsaPublicKey},
};

/// Modulus size of generated keys.
pub const KEY_SIZE_BITS: usize = 2048;

/// Gives access to the key material produced for one key family.
pub trait KeyFactory {
    type PrivateKey;
    type PublicKey;

    fn private_key(&self) -> &Self::PrivateKey;
    fn public_key(&self) -> &Self::PublicKey;
    fn certificate(&self) -> Option<&Certificate>;
}

/// RSA key pair, either freshly generated or reconstructed from a [JsonWebKey].
#[derive(Clone, Debug)]
pub struct RsaKeyFactory {
    signature_algorithm: Option<SignatureAlgorithm>,
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    certificate: Option<Certificate>,
}

impl RsaKeyFactory {
    pub fn builder() -> RsaKeyFactoryBuilder {
        RsaKeyFactoryBuilder::new()
    }

    /// Generate a new key pair.
    ///
    /// When `dn_name` is present and not blank, a self-signed certificate
    /// valid for one year is issued for the key, using `dn_name` as both
    /// issuer and subject.
    pub fn generate(
        signature_algorithm: SignatureAlgorithm,
        dn_name: Option<&str>,
    ) -> Result<Self, KeyError> {
        let mut rng = StdRng::from_rng(OsRng)
            .map_err(|e| KeyError::ProviderUnavailable(e.to_string()))?;

        debug!("Generating {} bit RSA key pair", KEY_SIZE_BITS);
        let key_pair = rsa::RsaPrivateKey::new(&mut rng, KEY_SIZE_BITS)
            .map_err(|e| KeyError::KeyGenerationFailed(e.to_string()))?;
        let private_key = RsaPrivateKey::from(&key_pair);
        let public_key = RsaPublicKey::from(&key_pair.to_public_key());

        let certificate = match dn_name.map(str::trim).filter(|dn| !dn.is_empty()) {
            Some(dn_name) => {
                let certificate =
                    issue_self_signed(signature_algorithm, dn_name, &key_pair, &mut rng)?;
                info!(
                    "Issued self-signed {} certificate for {}",
                    signature_algorithm, dn_name
                );
                Some(certificate)
            }
            None => None,
        };

        Ok(Self {
            signature_algorithm: Some(signature_algorithm),
            private_key,
            public_key,
            certificate,
        })
    }

    /// Reconstruct a key pair from a persisted JWK record.
    ///
    /// Values are copied out of the record; no certificate is attached.
    pub fn from_jwk(jwk: Option<&JsonWebKey>) -> Result<Self, KeyError> {
        let jwk =
            jwk.ok_or_else(|| KeyError::InvalidArgument("Key value must not be null.".to_owned()))?;
        Ok(Self::from(jwk))
    }

    /// Algorithm the key was generated for, or the `alg` of the record it
    /// was reconstructed from when that names a supported algorithm.
    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        self.signature_algorithm
    }

    /// Export the key pair as a record that [from_jwk](RsaKeyFactory::from_jwk) accepts.
    pub fn to_jwk(&self, key_id: Option<String>) -> JsonWebKey {
        JsonWebKey::new(
            key_id,
            self.signature_algorithm,
            &self.private_key,
            &self.public_key,
        )
    }
}

impl From<&JsonWebKey> for RsaKeyFactory {
    fn from(jwk: &JsonWebKey) -> Self {
        debug!(
            "Reconstructing RSA key pair {}",
            jwk.key_id.as_deref().unwrap_or("<no kid>")
        );
        Self {
            signature_algorithm: jwk
                .algorithm
                .as_deref()
                .and_then(|alg| alg.parse().ok()),
            private_key: RsaPrivateKey::new(
                jwk.private_key.modulus.clone(),
                jwk.private_key.private_exponent.clone(),
            ),
            public_key: RsaPublicKey::new(
                jwk.public_key.modulus.clone(),
                jwk.public_key.exponent.clone(),
            ),
            certificate: None,
        }
    }
}

impl KeyFactory for RsaKeyFactory {
    type PrivateKey = RsaPrivateKey;
    type PublicKey = RsaPublicKey;

    fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }
}

pub struct RsaKeyFactoryBuilder {
    signature_algorithm: Option<SignatureAlgorithm>,
    dn_name: Option<String>,
}

impl RsaKeyFactoryBuilder {
    fn new() -> Self {
        RsaKeyFactoryBuilder {
            signature_algorithm: None,
            dn_name: None,
        }
    }

    /// Set the algorithm the generated key will sign with. Required.
    pub fn signature_algorithm(mut self, signature_algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = Some(signature_algorithm);
        self
    }

    /// Set the distinguished name, e.g. `CN=Test`, to issue a self-signed
    /// certificate for.
    ///
    /// Without a name (or with a blank one) no certificate is issued.
    pub fn dn_name(mut self, dn_name: impl Into<String>) -> Self {
        self.dn_name = Some(dn_name.into());
        self
    }

    /// Generate the key pair and, if configured, its certificate.
    pub fn build(self) -> Result<RsaKeyFactory, KeyError> {
        let signature_algorithm = self.signature_algorithm.ok_or_else(|| {
            KeyError::InvalidParameter("The signature algorithm cannot be null".to_owned())
        })?;
        RsaKeyFactory::generate(signature_algorithm, self.dn_name.as_deref())
    }
}

impl Default for RsaKeyFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
