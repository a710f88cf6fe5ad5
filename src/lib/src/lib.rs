//! Auxiliary utilities for code signing.
//!
//! - certificate digests ([`hash_of_certificate`], [`hash_of_certificate_ref`])
//! - file content hashing ([`hash_file_data`], [`hash_file_desc`])
//! - certificate extension presence checks ([`certificate_has_field`])
//! - a scoped wrapper around a file copy primitive ([`Copyfile`])
//!
//! Certificates and copy primitives are reached through narrow traits
//! ([`CertificateRef`], [`CopyfileBackend`]) so that other certificate libraries
//! or OS facilities can be plugged in.

#![forbid(unsafe_code)]

mod certificate;
mod copyfile;
mod error;
mod file_hash;
mod hash;

pub use certificate::*;
pub use copyfile::*;
pub use error::*;
pub use file_hash::*;
pub use hash::*;

pub mod reexports {
    pub use {ct_codecs, hmac_sha256, log, sha1, thiserror, x509_cert};
}
