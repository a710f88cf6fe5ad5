mod digest;
mod field;
pub mod oids;
mod x509;

pub use digest::*;
pub use field::*;
pub use x509::*;

use log::*;
use std::borrow::Cow;
use std::fmt;

/// An X.509 object identifier, compared by its encoded bytes.
pub type Oid = x509_cert::der::asn1::ObjectIdentifier;

/// A status code reported by a certificate library.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Status(pub i32);

impl Status {
    /// The library does not know how to interpret the requested field.
    pub const UNKNOWN_TAG: Status = Status(-2147411889);

    /// The certificate has no value for the requested field.
    pub const NO_FIELD_VALUES: Status = Status(-2147411694);

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Status::UNKNOWN_TAG => write!(f, "unknown tag ({})", self.0),
            Status::NO_FIELD_VALUES => write!(f, "no field values ({})", self.0),
            Status(code) => write!(f, "status {code}"),
        }
    }
}

/// A field value handed out by a certificate library.
///
/// For extensions the library does not recognize, the value is the DER
/// encoding of the whole X.509 `Extension` structure.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldValue {
    data: Vec<u8>,
}

impl FieldValue {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for FieldValue {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Access to a parsed certificate owned by a certificate library.
///
/// Every successful `copy_*` call must be matched by exactly one call to the
/// corresponding `release_*` function. [`FirstFieldValue`] and [`FieldValues`]
/// take care of that pairing.
pub trait CertificateRef {
    /// The raw (DER) encoding of the certificate.
    fn encoded_data(&self) -> Result<Cow<'_, [u8]>, Status>;

    /// Look up the first value of the field identified by `oid`.
    ///
    /// Returns `Status::UNKNOWN_TAG` if the library does not recognize `oid`.
    fn copy_first_field_value(&self, oid: &Oid) -> Result<FieldValue, Status>;

    fn release_first_field_value(&self, oid: &Oid, value: FieldValue) -> Result<(), Status>;

    /// All extensions the library did not recognize, as DER-encoded `Extension` structures.
    fn copy_unknown_extensions(&self) -> Result<Vec<FieldValue>, Status>;

    fn release_unknown_extensions(&self, values: Vec<FieldValue>) -> Result<(), Status>;
}

/// A field value that is released back to the certificate library when dropped.
pub struct FirstFieldValue<'a, C: CertificateRef + ?Sized> {
    cert: &'a C,
    oid: &'a Oid,
    value: Option<FieldValue>,
}

impl<'a, C: CertificateRef + ?Sized> FirstFieldValue<'a, C> {
    pub fn copy(cert: &'a C, oid: &'a Oid) -> Result<Self, Status> {
        let value = cert.copy_first_field_value(oid)?;
        Ok(Self {
            cert,
            oid,
            value: Some(value),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_ref().map(FieldValue::as_bytes).unwrap_or_default()
    }

    /// Release the value now, reporting a failure instead of logging it.
    pub fn release(mut self) -> Result<(), Status> {
        match self.value.take() {
            Some(value) => self.cert.release_first_field_value(self.oid, value),
            None => Ok(()),
        }
    }
}

impl<C: CertificateRef + ?Sized> Drop for FirstFieldValue<'_, C> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            if let Err(status) = self.cert.release_first_field_value(self.oid, value) {
                warn!("Unable to release value of field {}: {}", self.oid, status);
            }
        }
    }
}

/// The set of unrecognized extensions of a certificate, released when dropped.
pub struct FieldValues<'a, C: CertificateRef + ?Sized> {
    cert: &'a C,
    values: Option<Vec<FieldValue>>,
}

impl<'a, C: CertificateRef + ?Sized> FieldValues<'a, C> {
    pub fn copy_unknown_extensions(cert: &'a C) -> Result<Self, Status> {
        let values = cert.copy_unknown_extensions()?;
        Ok(Self {
            cert,
            values: Some(values),
        })
    }

    pub fn values(&self) -> &[FieldValue] {
        self.values.as_deref().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldValue> {
        self.values().iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Release the set now, reporting a failure instead of logging it.
    pub fn release(mut self) -> Result<(), Status> {
        match self.values.take() {
            Some(values) => self.cert.release_unknown_extensions(values),
            None => Ok(()),
        }
    }
}

impl<C: CertificateRef + ?Sized> Drop for FieldValues<'_, C> {
    fn drop(&mut self) {
        if let Some(values) = self.values.take() {
            if let Err(status) = self.cert.release_unknown_extensions(values) {
                warn!("Unable to release unrecognized extensions: {}", status);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use x509_cert::der::asn1::OctetString;
    use x509_cert::der::Encode;
    use x509_cert::ext::Extension;

    /// A certificate library stand-in that counts copies and releases.
    #[derive(Default)]
    pub struct FakeCertificate {
        pub der: Vec<u8>,
        pub encoded_data_status: Option<Status>,
        pub recognized: Vec<(Oid, Vec<u8>)>,
        pub lookup_status: Option<Status>,
        pub unknown: Option<Vec<FieldValue>>,
        pub release_status: Option<Status>,
        pub first_copies: Cell<usize>,
        pub first_releases: Cell<usize>,
        pub unknown_copies: Cell<usize>,
        pub unknown_releases: Cell<usize>,
    }

    impl FakeCertificate {
        pub fn with_unknown(oids: &[Oid]) -> Self {
            let unknown = oids.iter().map(extension_der).collect();
            Self {
                unknown: Some(unknown),
                ..Default::default()
            }
        }

        pub fn balanced(&self) -> bool {
            self.first_copies.get() == self.first_releases.get()
                && self.unknown_copies.get() == self.unknown_releases.get()
        }
    }

    pub fn extension_der(oid: &Oid) -> FieldValue {
        let extension = Extension {
            extn_id: *oid,
            critical: true,
            extn_value: OctetString::new(vec![0x05, 0x00]).unwrap(),
        };
        FieldValue::new(extension.to_der().unwrap())
    }

    impl CertificateRef for FakeCertificate {
        fn encoded_data(&self) -> Result<Cow<'_, [u8]>, Status> {
            match self.encoded_data_status {
                Some(status) => Err(status),
                None => Ok(Cow::Borrowed(&self.der)),
            }
        }

        fn copy_first_field_value(&self, oid: &Oid) -> Result<FieldValue, Status> {
            if let Some(status) = self.lookup_status {
                return Err(status);
            }
            match self.recognized.iter().find(|(known, _)| known == oid) {
                Some((_, value)) => {
                    self.first_copies.set(self.first_copies.get() + 1);
                    Ok(FieldValue::new(value.clone()))
                }
                None => Err(Status::UNKNOWN_TAG),
            }
        }

        fn release_first_field_value(&self, _oid: &Oid, _value: FieldValue) -> Result<(), Status> {
            self.first_releases.set(self.first_releases.get() + 1);
            self.release_status.map_or(Ok(()), Err)
        }

        fn copy_unknown_extensions(&self) -> Result<Vec<FieldValue>, Status> {
            match &self.unknown {
                Some(values) => {
                    self.unknown_copies.set(self.unknown_copies.get() + 1);
                    Ok(values.clone())
                }
                None => Err(Status::NO_FIELD_VALUES),
            }
        }

        fn release_unknown_extensions(&self, _values: Vec<FieldValue>) -> Result<(), Status> {
            self.unknown_releases.set(self.unknown_releases.get() + 1);
            self.release_status.map_or(Ok(()), Err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    const OID: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.13");

    #[test]
    fn status_display() {
        assert_eq!(
            Status::UNKNOWN_TAG.to_string(),
            "unknown tag (-2147411889)"
        );
        assert_eq!(Status(-25300).to_string(), "status -25300");
    }

    #[test]
    fn first_field_value_released_on_drop() {
        let cert = FakeCertificate {
            recognized: vec![(OID, vec![1, 2, 3])],
            ..Default::default()
        };
        {
            let value = FirstFieldValue::copy(&cert, &OID).unwrap();
            assert_eq!(value.as_bytes(), &[1, 2, 3]);
        }
        assert_eq!(cert.first_copies.get(), 1);
        assert_eq!(cert.first_releases.get(), 1);
    }

    #[test]
    fn explicit_release_is_not_repeated_on_drop() {
        let cert = FakeCertificate::with_unknown(&[OID]);
        let values = FieldValues::copy_unknown_extensions(&cert).unwrap();
        assert_eq!(values.values().len(), 1);
        values.release().unwrap();
        assert_eq!(cert.unknown_releases.get(), 1);
        assert!(cert.balanced());
    }

    #[test]
    fn failed_copy_needs_no_release() {
        let cert = FakeCertificate::default();
        assert_eq!(
            FieldValues::copy_unknown_extensions(&cert).err(),
            Some(Status::NO_FIELD_VALUES)
        );
        assert_eq!(cert.unknown_releases.get(), 0);
    }

    #[test]
    fn release_failure_is_reported() {
        let cert = FakeCertificate {
            recognized: vec![(OID, vec![])],
            release_status: Some(Status(-1)),
            ..Default::default()
        };
        let value = FirstFieldValue::copy(&cert, &OID).unwrap();
        assert_eq!(value.release(), Err(Status(-1)));
        assert!(cert.balanced());
    }
}
