use std::fmt::{Debug, Display};

use log::warn;
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint,
};
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{ser::PrettyFormatter, Value};
use serde_with::serde_as;

use crate::{
    encoding::{decode_uint, encode_uint, Base64UrlUint},
    error::KeyError,
};

/// Private half of an RSA key pair.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaPrivateKey {
    #[serde_as(as = "Base64UrlUint")]
    modulus: BigUint,
    #[serde_as(as = "Base64UrlUint")]
    private_exponent: BigUint,
}

impl RsaPrivateKey {
    pub fn new(modulus: BigUint, private_exponent: BigUint) -> Self {
        Self {
            modulus,
            private_exponent,
        }
    }

    pub fn from_base64(modulus: &str, private_exponent: &str) -> Result<Self, KeyError> {
        Ok(Self::new(decode_uint(modulus)?, decode_uint(private_exponent)?))
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn private_exponent(&self) -> &BigUint {
        &self.private_exponent
    }
}

impl From<&rsa::RsaPrivateKey> for RsaPrivateKey {
    fn from(key: &rsa::RsaPrivateKey) -> Self {
        Self::new(key.n().clone(), key.d().clone())
    }
}

impl Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("modulus_bits", &self.modulus.bits())
            .finish_non_exhaustive()
    }
}

/// Public half of an RSA key pair, published to relying parties.
///
/// Serializes to the JWK layout used in the published key set:
///
/// ```json
/// { "modulus": "...", "exponent": "AQAB", "x": null, "y": null }
/// ```
///
/// `x` and `y` are always null. Consumers of a mixed key set use them to tell
/// RSA keys apart from elliptic curve keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    modulus: BigUint,
    public_exponent: BigUint,
}

impl RsaPublicKey {
    const USE: &'static str = "sig";

    pub fn new(modulus: BigUint, public_exponent: BigUint) -> Self {
        Self {
            modulus,
            public_exponent,
        }
    }

    /// Build a key from base64url encoded, unsigned big-endian components.
    pub fn from_base64(modulus: &str, public_exponent: &str) -> Result<Self, KeyError> {
        Ok(Self::new(decode_uint(modulus)?, decode_uint(public_exponent)?))
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn public_exponent(&self) -> &BigUint {
        &self.public_exponent
    }

    pub fn key_use(&self) -> &'static str {
        Self::USE
    }

    pub fn to_json_value(&self) -> Result<Value, KeyError> {
        serde_json::to_value(self).map_err(|e| KeyError::SerializationFailed(e.to_string()))
    }

    /// Pretty printed JWK JSON, indented by four spaces.
    pub fn to_json(&self) -> Result<String, KeyError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| KeyError::SerializationFailed(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| KeyError::SerializationFailed(e.to_string()))
    }

    /// Best effort variant of [to_json](RsaPublicKey::to_json) for diagnostics.
    ///
    /// Never fails; an empty string is returned when serialization fails.
    pub fn to_json_or_empty(&self) -> String {
        match self.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to render public key as JSON: {:?}", e);
                String::new()
            }
        }
    }
}

impl Serialize for RsaPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut jwk = serializer.serialize_struct("RsaPublicKey", 4)?;
        jwk.serialize_field("modulus", &encode_uint(&self.modulus))?;
        jwk.serialize_field("exponent", &encode_uint(&self.public_exponent))?;
        jwk.serialize_field("x", &Option::<String>::None)?;
        jwk.serialize_field("y", &Option::<String>::None)?;
        jwk.end()
    }
}

impl<'de> Deserialize<'de> for RsaPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[serde_as]
        #[derive(Deserialize)]
        struct PublicJwk {
            #[serde_as(as = "Base64UrlUint")]
            modulus: BigUint,
            #[serde_as(as = "Base64UrlUint")]
            exponent: BigUint,
        }

        let jwk = PublicJwk::deserialize(deserializer)?;
        Ok(RsaPublicKey::new(jwk.modulus, jwk.exponent))
    }
}

impl Display for RsaPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json_or_empty())
    }
}

impl From<&rsa::RsaPublicKey> for RsaPublicKey {
    fn from(key: &rsa::RsaPublicKey) -> Self {
        Self::new(key.n().clone(), key.e().clone())
    }
}

impl TryFrom<&RsaPublicKey> for rsa::RsaPublicKey {
    type Error = KeyError;

    fn try_from(key: &RsaPublicKey) -> Result<Self, Self::Error> {
        rsa::RsaPublicKey::new(key.modulus.clone(), key.public_exponent.clone())
            .map_err(|e| KeyError::InvalidParameter(format!("Unusable RSA public key: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn small_key() -> RsaPublicKey {
        RsaPublicKey::new(BigUint::from(3233u32), BigUint::from(17u32))
    }

    #[test]
    fn from_base64_decodes_unsigned() {
        let key = RsaPublicKey::from_base64("AQAB", "AQAB").unwrap();
        assert_eq!(key.modulus(), &BigUint::from(65537u32));
        assert_eq!(key.public_exponent(), &BigUint::from(65537u32));
    }

    #[test]
    fn from_base64_rejects_garbage() {
        let result = RsaPublicKey::from_base64("AQAB", "%%%");
        assert!(matches!(result, Err(KeyError::InvalidEncoding(_))));
    }

    #[test]
    fn json_has_exactly_four_fields() {
        let value = RsaPublicKey::from_base64("AQAB", "AQAB")
            .unwrap()
            .to_json_value()
            .unwrap();
        assert_eq!(
            value,
            json!({ "modulus": "AQAB", "exponent": "AQAB", "x": null, "y": null })
        );
    }

    #[test]
    fn exponent_one() {
        let key = RsaPublicKey::new(BigUint::from(3233u32), BigUint::from(1u32));
        let value = key.to_json_value().unwrap();
        assert_eq!(value["exponent"], "AQ");
        assert!(value["x"].is_null());
        assert!(value["y"].is_null());
    }

    #[test]
    fn pretty_json_uses_four_spaces() {
        let json = small_key().to_json().unwrap();
        assert_eq!(
            json,
            "{\n    \"modulus\": \"DKE\",\n    \"exponent\": \"EQ\",\n    \"x\": null,\n    \"y\": null\n}"
        );
    }

    #[test]
    fn display_matches_json() {
        let key = small_key();
        assert_eq!(key.to_string(), key.to_json().unwrap());
    }

    #[test]
    fn deserialize_ignores_family_fields() {
        let key: RsaPublicKey = serde_json::from_value(
            json!({ "modulus": "DKE", "exponent": "EQ", "x": null, "y": null }),
        )
        .unwrap();
        assert_eq!(key, small_key());
    }

    #[test]
    fn use_is_sig() {
        assert_eq!(small_key().key_use(), "sig");
    }

    #[test]
    fn private_key_serializes_camel_case() {
        let key = RsaPrivateKey::from_base64("DKE", "C_E").unwrap();
        assert_eq!(key.private_exponent(), &BigUint::from(3057u32));
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            json!({ "modulus": "DKE", "privateExponent": "C_E" })
        );
    }

    #[test]
    fn private_key_debug_hides_exponent() {
        let key = RsaPrivateKey::new(BigUint::from(3233u32), BigUint::from(2753u32));
        let debug = format!("{:?}", key);
        assert!(!debug.contains("2753"));
        assert!(debug.contains("modulus_bits"));
    }

    #[test]
    fn reject_invalid_rsa_components() {
        let key = RsaPublicKey::new(BigUint::from(3233u32), BigUint::from(1u32));
        let result = rsa::RsaPublicKey::try_from(&key);
        assert!(matches!(result, Err(KeyError::InvalidParameter(_))));
    }
}
