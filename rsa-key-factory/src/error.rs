use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq)]
pub enum KeyError {
    /// A required parameter, such as the signature algorithm, is missing or unsupported.
    InvalidParameter(String),
    /// No JWK record was supplied for reconstruction.
    InvalidArgument(String),
    /// A key component is not valid base64url text.
    InvalidEncoding(String),
    InvalidDistinguishedName(String),
    /// The operating system entropy source could not be used.
    ProviderUnavailable(String),
    KeyGenerationFailed(String),
    CertificateIssuanceFailed(String),
    CertificateEncodingFailed(String),
    SerializationFailed(String),
}

impl Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for KeyError {}
