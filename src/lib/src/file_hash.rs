use crate::error::*;
use crate::hash::*;

use std::fs::File;
use std::io::{self, prelude::*, SeekFrom};
use std::path::Path;

/// Size of the chunks read from a file while hashing it.
pub const HASH_BUFFER_SIZE: usize = 4096;

/// A file read sequentially from its current position.
pub trait SequentialFile {
    /// Fill `buf` as far as possible. Fewer bytes are only returned at end of file.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// `true` once every byte of the file has been read.
    fn at_end(&mut self) -> io::Result<bool>;
}

/// A file descriptor with end-of-file detection.
///
/// Reads are unbuffered, so a borrowed reader is left exactly after the last
/// byte returned. `at_end()` compares the current position with the length of
/// the file, and turns `true` as soon as the last byte has been consumed.
#[derive(Debug)]
pub struct FileDesc<R = File> {
    reader: R,
}

impl FileDesc<File> {
    /// Open a file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CSError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CSError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read + Seek> FileDesc<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> SequentialFile for FileDesc<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut got = 0;
        while got < buf.len() {
            match self.reader.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(got)
    }

    fn at_end(&mut self) -> io::Result<bool> {
        let pos = self.reader.stream_position()?;
        let end = self.reader.seek(SeekFrom::End(0))?;
        if pos != end {
            self.reader.seek(SeekFrom::Start(pos))?;
        }
        Ok(pos >= end)
    }
}

/// Count the bytes of a file, feeding them to a throwaway SHA-1 accumulator.
///
/// Returns the number of bytes read.
pub fn hash_file_data(path: impl AsRef<Path>) -> Result<usize, CSError> {
    let mut hasher = Sha1::new();
    hash_file_data_with(path, &mut hasher)
}

/// Hash the content of the file at `path` into `hasher`.
///
/// Returns the number of bytes read.
/// See [`hash_file_desc`] for which bytes actually reach the accumulator.
pub fn hash_file_data_with<H>(path: impl AsRef<Path>, hasher: &mut H) -> Result<usize, CSError>
where
    H: HashAccumulator + ?Sized,
{
    let mut file = FileDesc::open(path)?;
    hash_file_desc(&mut file, hasher, 0)
}

/// Hash (a section of) a file, starting at its current position.
///
/// Reading extends to the end of the file, or, if `limit` is not `0`, to at
/// most `limit` bytes.
///
/// The chunk whose read reaches the end of the file is counted in the
/// returned total but is *not* fed to `hasher`. Existing callers depend on
/// this, so the hashed data of a file that is read to its end always misses
/// its last (up to `HASH_BUFFER_SIZE`) bytes.
pub fn hash_file_desc<F, H>(file: &mut F, hasher: &mut H, mut limit: usize) -> Result<usize, CSError>
where
    F: SequentialFile + ?Sized,
    H: HashAccumulator + ?Sized,
{
    let mut buffer = [0u8; HASH_BUFFER_SIZE];
    let mut total = 0;
    loop {
        let size = if limit != 0 && limit < buffer.len() {
            limit
        } else {
            buffer.len()
        };
        let got = file.read_chunk(&mut buffer[..size])?;
        total += got;
        if file.at_end()? {
            break;
        }
        hasher.update(&buffer[..got]);
        if limit != 0 {
            limit -= got;
            if limit == 0 {
                break;
            }
        }
    }
    Ok(total)
}
