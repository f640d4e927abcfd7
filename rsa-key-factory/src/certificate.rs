use std::{
    str::FromStr,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Months, Utc};
use log::debug;
use rand::{CryptoRng, RngCore};
use rsa::{
    pkcs1v15::{Signature, SigningKey},
    pkcs8::EncodePublicKey,
    signature::{RandomizedSigner, SignatureEncoding},
    BigUint,
};
use sha2::{digest::const_oid::AssociatedOid, Digest, Sha256, Sha384, Sha512};
use x509_cert::{
    certificate::{CertificateInner, Raw, TbsCertificateInner, Version},
    der::{
        asn1::{Any, AnyRef, BitString, GeneralizedTime, Uint, UtcTime},
        pem::{self, LineEnding},
        DateTime as DerDateTime, Decode, Encode,
    },
    name::Name,
    serial_number::SerialNumber,
    spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned},
    time::{Time, Validity},
};

use crate::{algorithm::SignatureAlgorithm, error::KeyError};

/// Width of the random draw the serial number is taken from.
pub const SERIAL_NUMBER_BITS: usize = 1024;

/// Months between `notBefore` and `notAfter`.
const VALIDITY_MONTHS: u32 = 12;

/// X.509 certificate as issued by this crate.
///
/// Serial numbers are wider than the 20 octets RFC 5280 allows, so the
/// certificate is held under the unrestricted `Raw` profile.
pub type X509Certificate = CertificateInner<Raw>;

/// A self-signed certificate together with the algorithm it was signed with.
#[derive(Clone, Debug)]
pub struct Certificate {
    signature_algorithm: SignatureAlgorithm,
    x509: X509Certificate,
    der: Vec<u8>,
}

impl Certificate {
    pub fn new(
        signature_algorithm: SignatureAlgorithm,
        x509: X509Certificate,
    ) -> Result<Self, KeyError> {
        let der = x509
            .to_der()
            .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;
        Ok(Self {
            signature_algorithm,
            x509,
            der,
        })
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn x509(&self) -> &X509Certificate {
        &self.x509
    }

    pub fn subject_name(&self) -> &Name {
        &self.x509.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.x509.tbs_certificate.issuer
    }

    /// Subject rendered as an RFC 4514 string.
    pub fn subject(&self) -> String {
        self.subject_name().to_string()
    }

    pub fn issuer(&self) -> String {
        self.issuer_name().to_string()
    }

    pub fn not_before(&self) -> SystemTime {
        UNIX_EPOCH + self.x509.tbs_certificate.validity.not_before.to_unix_duration()
    }

    pub fn not_after(&self) -> SystemTime {
        UNIX_EPOCH + self.x509.tbs_certificate.validity.not_after.to_unix_duration()
    }

    pub fn serial_number(&self) -> BigUint {
        BigUint::from_bytes_be(self.x509.tbs_certificate.serial_number.as_bytes())
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    pub fn to_pem(&self) -> Result<String, KeyError> {
        pem::encode_string("CERTIFICATE", LineEnding::LF, &self.der)
            .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))
    }
}

/// Issue an X.509 v1 certificate for `key_pair`, signed by `key_pair`
/// itself, with issuer and subject both set to `dn_name`.
pub(crate) fn issue_self_signed<R>(
    signature_algorithm: SignatureAlgorithm,
    dn_name: &str,
    key_pair: &rsa::RsaPrivateKey,
    rng: &mut R,
) -> Result<Certificate, KeyError>
where
    R: CryptoRng + RngCore,
{
    let principal = Name::from_str(dn_name)
        .map_err(|e| KeyError::InvalidDistinguishedName(format!("{}: {}", e, dn_name)))?;
    let validity = one_year_from(Utc::now())?;
    let serial_number = random_serial_number(rng)?;
    let subject_public_key_info = subject_public_key_info(&key_pair.to_public_key())?;
    let algorithm_identifier = AlgorithmIdentifierOwned {
        oid: signature_algorithm.oid(),
        parameters: Some(Any::from(AnyRef::NULL)),
    };

    let tbs_certificate = TbsCertificateInner::<Raw> {
        version: Version::V1,
        serial_number,
        signature: algorithm_identifier.clone(),
        issuer: principal.clone(),
        validity,
        subject: principal,
        subject_public_key_info,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: None,
    };
    let tbs_der = tbs_certificate
        .to_der()
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;

    let signature = match signature_algorithm {
        SignatureAlgorithm::RS256 => sign::<Sha256, _>(key_pair, &tbs_der, rng)?,
        SignatureAlgorithm::RS384 => sign::<Sha384, _>(key_pair, &tbs_der, rng)?,
        SignatureAlgorithm::RS512 => sign::<Sha512, _>(key_pair, &tbs_der, rng)?,
    };
    let signature = BitString::from_bytes(&signature)
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;

    debug!(
        "Signed certificate for {} using {}",
        dn_name,
        signature_algorithm.algorithm()
    );
    Certificate::new(
        signature_algorithm,
        X509Certificate {
            tbs_certificate,
            signature_algorithm: algorithm_identifier,
            signature,
        },
    )
}

fn sign<D, R>(
    key_pair: &rsa::RsaPrivateKey,
    message: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, KeyError>
where
    D: Digest + AssociatedOid,
    R: CryptoRng + RngCore,
{
    let signing_key = SigningKey::<D>::new(key_pair.clone());
    let signature: Signature = signing_key
        .try_sign_with_rng(rng, message)
        .map_err(|e| KeyError::CertificateIssuanceFailed(e.to_string()))?;
    Ok(signature.to_vec())
}

fn subject_public_key_info(
    public_key: &rsa::RsaPublicKey,
) -> Result<SubjectPublicKeyInfoOwned, KeyError> {
    let document = public_key
        .to_public_key_der()
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;
    SubjectPublicKeyInfoOwned::from_der(document.as_bytes())
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))
}

/// Draw a positive serial number from `SERIAL_NUMBER_BITS` random bits.
/// An all-zero draw is not positive and is drawn again.
fn random_serial_number<R>(rng: &mut R) -> Result<SerialNumber<Raw>, KeyError>
where
    R: CryptoRng + RngCore,
{
    let mut bytes = [0u8; SERIAL_NUMBER_BITS / 8];
    loop {
        rng.fill_bytes(&mut bytes);
        if bytes.iter().any(|b| *b != 0) {
            break;
        }
    }
    let encoded = Uint::new(&bytes)
        .and_then(|value| value.to_der())
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;
    SerialNumber::<Raw>::from_der(&encoded)
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))
}

fn one_year_from(not_before: DateTime<Utc>) -> Result<Validity, KeyError> {
    let not_after = not_before
        .checked_add_months(Months::new(VALIDITY_MONTHS))
        .ok_or_else(|| {
            KeyError::CertificateEncodingFailed(format!("No expiry date after {}", not_before))
        })?;
    Ok(Validity {
        not_before: x509_time(not_before)?,
        not_after: x509_time(not_after)?,
    })
}

/// UTCTime up to 2049, GeneralizedTime from 2050 on (RFC 5280, 4.1.2.5).
fn x509_time(at: DateTime<Utc>) -> Result<Time, KeyError> {
    let seconds = u64::try_from(at.timestamp()).map_err(|_| {
        KeyError::CertificateEncodingFailed(format!("Time before 1970 not supported: {}", at))
    })?;
    let date_time = DerDateTime::from_unix_duration(Duration::from_secs(seconds))
        .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))?;
    if date_time.year() < 2050 {
        UtcTime::from_date_time(date_time)
            .map(Time::UtcTime)
            .map_err(|e| KeyError::CertificateEncodingFailed(e.to_string()))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_date_time(date_time)))
    }
}
