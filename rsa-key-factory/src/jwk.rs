use rsa::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    algorithm::SignatureAlgorithm,
    encoding::Base64UrlUint,
    keys::{RsaPrivateKey, RsaPublicKey},
};

/// Persisted form of an RSA key pair, as stored by a key repository.
///
/// ```json
/// {
///     "kid": "...",
///     "alg": "RS256",
///     "privateKey": { "modulus": "...", "privateExponent": "..." },
///     "publicKey": { "modulus": "...", "exponent": "AQAB" }
/// }
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonWebKey {
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    pub private_key: JwkPrivateKey,
    pub public_key: JwkPublicKey,
}

#[serde_as]
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwkPrivateKey {
    #[serde_as(as = "Base64UrlUint")]
    pub modulus: BigUint,
    #[serde_as(as = "Base64UrlUint")]
    pub private_exponent: BigUint,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JwkPublicKey {
    #[serde_as(as = "Base64UrlUint")]
    pub modulus: BigUint,
    #[serde_as(as = "Base64UrlUint")]
    pub exponent: BigUint,
}

impl JsonWebKey {
    pub fn new(
        key_id: Option<String>,
        algorithm: Option<SignatureAlgorithm>,
        private_key: &RsaPrivateKey,
        public_key: &RsaPublicKey,
    ) -> Self {
        JsonWebKey {
            key_id,
            algorithm: algorithm.map(|alg| alg.name().to_owned()),
            private_key: JwkPrivateKey {
                modulus: private_key.modulus().clone(),
                private_exponent: private_key.private_exponent().clone(),
            },
            public_key: JwkPublicKey {
                modulus: public_key.modulus().clone(),
                exponent: public_key.public_exponent().clone(),
            },
        }
    }
}

impl std::fmt::Debug for JwkPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwkPrivateKey")
            .field("modulus_bits", &self.modulus.bits())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_record() {
        let jwk: JsonWebKey = serde_json::from_value(json!({
            "kid": "key-1",
            "alg": "RS256",
            "privateKey": { "modulus": "DKE", "privateExponent": "CsE" },
            "publicKey": { "modulus": "DKE", "exponent": "EQ" }
        }))
        .unwrap();
        assert_eq!(jwk.key_id.as_deref(), Some("key-1"));
        assert_eq!(jwk.algorithm.as_deref(), Some("RS256"));
        assert_eq!(jwk.private_key.modulus, BigUint::from(3233u32));
        assert_eq!(jwk.private_key.private_exponent, BigUint::from(2753u32));
        assert_eq!(jwk.public_key.exponent, BigUint::from(17u32));
    }

    #[test]
    fn optional_metadata() {
        let jwk: JsonWebKey = serde_json::from_value(json!({
            "privateKey": { "modulus": "DKE", "privateExponent": "CsE" },
            "publicKey": { "modulus": "DKE", "exponent": "EQ" }
        }))
        .unwrap();
        assert!(jwk.key_id.is_none());
        assert!(jwk.algorithm.is_none());
    }

    #[test]
    fn missing_public_section() {
        let result = serde_json::from_value::<JsonWebKey>(json!({
            "privateKey": { "modulus": "DKE", "privateExponent": "CsE" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn build_from_key_pair() {
        let private_key = RsaPrivateKey::new(BigUint::from(3233u32), BigUint::from(2753u32));
        let public_key = RsaPublicKey::new(BigUint::from(3233u32), BigUint::from(17u32));
        let jwk = JsonWebKey::new(
            Some("key-1".to_owned()),
            Some(SignatureAlgorithm::RS256),
            &private_key,
            &public_key,
        );
        assert_eq!(
            serde_json::to_value(&jwk).unwrap(),
            json!({
                "kid": "key-1",
                "alg": "RS256",
                "privateKey": { "modulus": "DKE", "privateExponent": "CsE" },
                "publicKey": { "modulus": "DKE", "exponent": "EQ" }
            })
        );
    }
}
