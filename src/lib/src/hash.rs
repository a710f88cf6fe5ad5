use crate::error::*;

use ct_codecs::{Encoder, Hex};
use std::io::{self, Write};

pub const SHA1_DIGEST_LENGTH: usize = 20;
pub const SHA256_DIGEST_LENGTH: usize = 32;

/// A SHA-1 digest, as used for certificate hashes.
pub type Sha1Digest = [u8; SHA1_DIGEST_LENGTH];

/// A SHA-256 digest.
pub type Sha256Digest = [u8; SHA256_DIGEST_LENGTH];

/// An incremental hash function.
///
/// Data is fed with `update()` any number of times, then `finalize()` consumes
/// the accumulator and returns the digest.
pub trait HashAccumulator {
    type Digest: AsRef<[u8]>;

    fn update(&mut self, data: &[u8]);

    fn finalize(self) -> Self::Digest
    where
        Self: Sized;
}

#[derive(Clone, Default)]
pub struct Sha1 {
    hash: sha1::Sha1,
}

impl Sha1 {
    pub fn new() -> Self {
        Sha1 {
            hash: <sha1::Sha1 as sha1::Digest>::new(),
        }
    }
}

impl HashAccumulator for Sha1 {
    type Digest = Sha1Digest;

    fn update(&mut self, data: &[u8]) {
        sha1::Digest::update(&mut self.hash, data);
    }

    fn finalize(self) -> Sha1Digest {
        let mut digest = [0u8; SHA1_DIGEST_LENGTH];
        digest.copy_from_slice(&sha1::Digest::finalize(self.hash));
        digest
    }
}

impl Write for Sha1 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct Sha256 {
    hash: hmac_sha256::Hash,
}

impl Sha256 {
    pub fn new() -> Self {
        Sha256 {
            hash: hmac_sha256::Hash::new(),
        }
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAccumulator for Sha256 {
    type Digest = Sha256Digest;

    fn update(&mut self, data: &[u8]) {
        self.hash.update(data);
    }

    fn finalize(self) -> Sha256Digest {
        self.hash.finalize()
    }
}

impl Write for Sha256 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hash.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encode a digest as lowercase hexadecimal.
pub fn digest_to_hex(digest: impl AsRef<[u8]>) -> Result<String, CSError> {
    Hex::encode_to_string(digest.as_ref()).map_err(|e| CSError::InternalError(format!("{e:?}")))
}
