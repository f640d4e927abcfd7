use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    Engine,
};
use rsa::BigUint;
use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

use crate::error::KeyError;

/// URL-safe alphabet, no padding on output, padding tolerated on input.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes the minimal two's-complement big-endian form of `value`: the
/// magnitude, with a leading zero byte when its high bit is set.
pub fn encode_uint(value: &BigUint) -> String {
    let mut bytes = value.to_bytes_be();
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        bytes.insert(0, 0);
    }
    BASE64_URL.encode(bytes)
}

/// Decodes base64url text into an unsigned integer. The decoded bytes are a
/// big-endian magnitude, with or without a leading sign byte; a set high bit
/// never makes the value negative.
pub fn decode_uint(encoded: &str) -> Result<BigUint, KeyError> {
    let bytes = BASE64_URL
        .decode(encoded)
        .map_err(|e| KeyError::InvalidEncoding(format!("{}: {}", e, encoded)))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// `serde_with` adapter storing a [BigUint] as base64url text.
pub struct Base64UrlUint;

impl SerializeAs<BigUint> for Base64UrlUint {
    fn serialize_as<S>(source: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_uint(source))
    }
}

impl<'de> DeserializeAs<'de, BigUint> for Base64UrlUint {
    fn deserialize_as<D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        decode_uint(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_with::serde_as;

    use super::*;

    #[test]
    fn encode_common_exponent() {
        assert_eq!(encode_uint(&BigUint::from(65537u32)), "AQAB");
    }

    #[test]
    fn high_bit_gets_sign_byte() {
        assert_eq!(encode_uint(&BigUint::from(128u32)), "AIA");
        assert_eq!(encode_uint(&BigUint::from(127u32)), "fw");
        assert_eq!(encode_uint(&BigUint::from(0x8000u32)), "AIAA");
    }

    #[test]
    fn decode_with_or_without_sign_byte() {
        assert_eq!(decode_uint("gA").unwrap(), BigUint::from(128u32));
        assert_eq!(decode_uint("AIA").unwrap(), BigUint::from(128u32));
    }

    #[test]
    fn encode_zero() {
        assert_eq!(encode_uint(&BigUint::from(0u32)), "AA");
    }

    #[test]
    fn leading_zero_bytes_are_dropped() {
        let value = decode_uint("AAEAAQ").unwrap();
        assert_eq!(value, BigUint::from(65537u32));
        assert_eq!(encode_uint(&value), "AQAB");
    }

    #[test]
    fn accept_padded_input() {
        assert_eq!(decode_uint("AQ==").unwrap(), BigUint::from(1u32));
        assert_eq!(decode_uint("AQ").unwrap(), BigUint::from(1u32));
    }

    #[test]
    fn reject_standard_alphabet() {
        let result = decode_uint("+/8");
        assert!(matches!(result, Err(KeyError::InvalidEncoding(_))));
    }

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Holder {
        #[serde_as(as = "Base64UrlUint")]
        value: BigUint,
    }

    #[test]
    fn serde_adapter() {
        let holder = Holder {
            value: BigUint::from(65537u32),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, "{\"value\":\"AQAB\"}");
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), holder);
    }

    #[test]
    fn serde_adapter_rejects_invalid_text() {
        let result = serde_json::from_str::<Holder>("{\"value\":\"not base64!\"}");
        assert!(result.is_err());
    }
}
