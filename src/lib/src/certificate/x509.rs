use crate::certificate::*;
use crate::error::*;

use log::*;
use std::borrow::Cow;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::str;
use x509_cert::der::{pem, Decode, Encode};
use x509_cert::ext::Extension;
use x509_cert::Certificate;

const PEM_LABEL: &str = "CERTIFICATE";

/// Extensions this certificate library understands and returns by value.
/// Everything else is only reachable through `copy_unknown_extensions()`.
pub const RECOGNIZED_EXTENSIONS: &[Oid] = &[
    oids::BASIC_CONSTRAINTS,
    oids::KEY_USAGE,
    oids::EXT_KEY_USAGE,
    oids::SUBJECT_KEY_IDENTIFIER,
    oids::AUTHORITY_KEY_IDENTIFIER,
    oids::SUBJECT_ALT_NAME,
    oids::ISSUER_ALT_NAME,
    oids::CERTIFICATE_POLICIES,
    oids::CRL_DISTRIBUTION_POINTS,
    oids::NAME_CONSTRAINTS,
    oids::POLICY_CONSTRAINTS,
    oids::AUTHORITY_INFO_ACCESS,
];

/// An X.509 certificate parsed with `x509-cert`.
#[derive(Clone, Debug)]
pub struct X509Certificate {
    der: Vec<u8>,
    certificate: Certificate,
}

impl X509Certificate {
    /// Parse a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CSError> {
        let certificate = Certificate::from_der(der)?;
        Ok(Self {
            der: der.to_vec(),
            certificate,
        })
    }

    /// Parse a PEM-encoded certificate.
    pub fn from_pem(pem: &str) -> Result<Self, CSError> {
        let (label, der) = pem::decode_vec(pem.as_bytes()).map_err(|e| {
            debug!("Invalid PEM document: {}", e);
            CSError::ParseError
        })?;
        if label != PEM_LABEL {
            debug!("Unexpected PEM label: {}", label);
            return Err(CSError::ParseError);
        }
        Self::from_der(&der)
    }

    /// Try to guess the certificate encoding.
    pub fn from_any(data: &[u8]) -> Result<Self, CSError> {
        if let Ok(cert) = Self::from_der(data) {
            return Ok(cert);
        }
        let s = str::from_utf8(data).map_err(|_| CSError::ParseError)?;
        Self::from_pem(s)
    }

    /// Read a DER or PEM certificate from a file.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self, CSError> {
        let file = file.as_ref();
        let mut fp = File::open(file).map_err(|source| CSError::FileOpen {
            path: file.to_path_buf(),
            source,
        })?;
        let mut bytes = vec![];
        fp.read_to_end(&mut bytes)?;
        Self::from_any(&bytes)
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    pub fn is_recognized(oid: &Oid) -> bool {
        RECOGNIZED_EXTENSIONS.contains(oid)
    }

    fn extensions(&self) -> &[Extension] {
        self.certificate
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
    }
}

impl CertificateRef for X509Certificate {
    fn encoded_data(&self) -> Result<Cow<'_, [u8]>, Status> {
        Ok(Cow::Borrowed(&self.der))
    }

    fn copy_first_field_value(&self, oid: &Oid) -> Result<FieldValue, Status> {
        if !Self::is_recognized(oid) {
            return Err(Status::UNKNOWN_TAG);
        }
        match self.extensions().iter().find(|ext| &ext.extn_id == oid) {
            Some(ext) => Ok(FieldValue::new(ext.extn_value.as_bytes().to_vec())),
            None => {
                debug!("Recognized extension {} is not present", oid);
                Err(Status::UNKNOWN_TAG)
            }
        }
    }

    fn release_first_field_value(&self, _oid: &Oid, _value: FieldValue) -> Result<(), Status> {
        Ok(())
    }

    fn copy_unknown_extensions(&self) -> Result<Vec<FieldValue>, Status> {
        let mut values = vec![];
        for ext in self
            .extensions()
            .iter()
            .filter(|ext| !Self::is_recognized(&ext.extn_id))
        {
            let der = ext.to_der().map_err(|e| {
                debug!("Unable to encode extension {}: {}", ext.extn_id, e);
                Status::NO_FIELD_VALUES
            })?;
            values.push(FieldValue::new(der));
        }
        if values.is_empty() {
            return Err(Status::NO_FIELD_VALUES);
        }
        Ok(values)
    }

    fn release_unknown_extensions(&self, _values: Vec<FieldValue>) -> Result<(), Status> {
        Ok(())
    }
}
