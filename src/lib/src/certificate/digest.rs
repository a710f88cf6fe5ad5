use crate::certificate::*;
use crate::error::*;
use crate::hash::*;

/// Calculate the canonical hash of a certificate, given its raw (DER) data.
pub fn hash_of_certificate(data: &[u8]) -> Sha1Digest {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize()
}

/// Calculate the canonical hash of a certificate held by a certificate library.
pub fn hash_of_certificate_ref<C: CertificateRef + ?Sized>(cert: &C) -> Result<Sha1Digest, CSError> {
    let data = cert.encoded_data().map_err(CSError::CertificateError)?;
    Ok(hash_of_certificate(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::testing::*;

    #[test]
    fn deterministic_and_input_sensitive() {
        let a = hash_of_certificate(b"\x30\x03\x02\x01\x01");
        let b = hash_of_certificate(b"\x30\x03\x02\x01\x01");
        let c = hash_of_certificate(b"\x30\x03\x02\x01\x02");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), SHA1_DIGEST_LENGTH);
    }

    #[test]
    fn handle_form_hashes_encoded_data() {
        let cert = FakeCertificate {
            der: b"not really DER".to_vec(),
            ..Default::default()
        };
        assert_eq!(
            hash_of_certificate_ref(&cert).unwrap(),
            hash_of_certificate(b"not really DER")
        );
    }

    #[test]
    fn extraction_failure_carries_status() {
        let cert = FakeCertificate {
            encoded_data_status: Some(Status(-67843)),
            ..Default::default()
        };
        match hash_of_certificate_ref(&cert) {
            Err(CSError::CertificateError(status)) => assert_eq!(status.code(), -67843),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
