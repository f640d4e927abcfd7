use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use x509_cert::spki::ObjectIdentifier;

use crate::error::KeyError;

const SHA256_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const SHA384_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA512_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");

/// Signing algorithms supported for RSA keys.
///
/// Each variant is identified by its JWA name (`RS256`, ...) and maps to
/// the algorithm used when the key signs its own certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SignatureAlgorithm {
    RS256,
    RS384,
    RS512,
}

impl SignatureAlgorithm {
    pub fn values() -> &'static [SignatureAlgorithm] {
        &[
            SignatureAlgorithm::RS256,
            SignatureAlgorithm::RS384,
            SignatureAlgorithm::RS512,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::RS256 => "RS256",
            SignatureAlgorithm::RS384 => "RS384",
            SignatureAlgorithm::RS512 => "RS512",
        }
    }

    /// Name of the certificate signature algorithm, e.g. `SHA256WITHRSA`.
    pub fn algorithm(&self) -> &'static str {
        match self {
            SignatureAlgorithm::RS256 => "SHA256WITHRSA",
            SignatureAlgorithm::RS384 => "SHA384WITHRSA",
            SignatureAlgorithm::RS512 => "SHA512WITHRSA",
        }
    }

    pub fn family(&self) -> &'static str {
        "RSA"
    }

    pub(crate) fn oid(&self) -> ObjectIdentifier {
        match self {
            SignatureAlgorithm::RS256 => SHA256_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::RS384 => SHA384_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::RS512 => SHA512_WITH_RSA_ENCRYPTION,
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = KeyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SignatureAlgorithm::values()
            .iter()
            .find(|alg| alg.name() == name)
            .copied()
            .ok_or_else(|| {
                KeyError::InvalidParameter(format!("Unsupported signature algorithm: {}", name))
            })
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
