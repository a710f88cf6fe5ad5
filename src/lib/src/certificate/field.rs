use crate::certificate::*;
use crate::error::*;

use log::*;
use x509_cert::der::Decode;
use x509_cert::ext::Extension;

/// Check whether a certificate contains a field, by OID.
///
/// This works for extensions, even ones the certificate library does not
/// recognize: those are looked up in the library's set of unrecognized
/// extensions. Only presence is reported, not the value.
pub fn certificate_has_field<C: CertificateRef + ?Sized>(
    cert: &C,
    oid: &Oid,
) -> Result<bool, CSError> {
    match FirstFieldValue::copy(cert, oid) {
        Ok(value) => {
            value.release().map_err(CSError::CertificateError)?;
            return Ok(true);
        }
        Err(Status::UNKNOWN_TAG) => {
            debug!("Field {} not recognized by the certificate library", oid);
        }
        Err(status) => return Err(CSError::CertificateError(status)),
    }

    let values = match FieldValues::copy_unknown_extensions(cert) {
        Ok(values) => values,
        Err(status) => {
            debug!("No unrecognized extensions ({})", status);
            return Ok(false);
        }
    };
    let found = values.iter().any(|value| extension_has_oid(value, oid));
    values.release().map_err(CSError::CertificateError)?;
    Ok(found)
}

fn extension_has_oid(value: &FieldValue, oid: &Oid) -> bool {
    match Extension::from_der(value.as_bytes()) {
        Ok(extension) => extension.extn_id.as_bytes() == oid.as_bytes(),
        Err(e) => {
            debug!("Skipping malformed extension entry: {}", e);
            false
        }
    }
}
