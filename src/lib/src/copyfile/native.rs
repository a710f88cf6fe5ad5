use crate::copyfile::*;

use log::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// A portable copy primitive built on `std::fs`.
///
/// ACLs and extended attributes are not supported; `ACL` and `XATTR` are ignored.
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeCopyfile;

/// Copy state of [`NativeCopyfile`].
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct NativeCopyState {
    src: Option<PathBuf>,
    dst: Option<PathBuf>,
    copied: u64,
}

impl NativeCopyState {
    pub fn src(&self) -> Option<&Path> {
        self.src.as_deref()
    }

    pub fn dst(&self) -> Option<&Path> {
        self.dst.as_deref()
    }

    /// Number of data bytes copied by the last copy.
    pub fn copied(&self) -> u64 {
        self.copied
    }
}

fn invalid_input(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

impl CopyfileBackend for NativeCopyfile {
    type State = NativeCopyState;

    fn state_alloc(&self) -> Option<NativeCopyState> {
        Some(NativeCopyState::default())
    }

    fn state_free(&self, state: NativeCopyState) {
        debug!("Releasing copy state ({} bytes copied)", state.copied);
    }

    fn state_set(&self, state: &mut NativeCopyState, flag: u32, value: &StateValue) -> io::Result<()> {
        match (flag, value) {
            (state::SRC_FILENAME, StateValue::Path(path)) => state.src = Some(path.clone()),
            (state::SRC_FILENAME, StateValue::Empty) => state.src = None,
            (state::DST_FILENAME, StateValue::Path(path)) => state.dst = Some(path.clone()),
            (state::DST_FILENAME, StateValue::Empty) => state.dst = None,
            (state::COPIED, _) => return Err(invalid_input("copy state value is read-only")),
            _ => return Err(invalid_input("unsupported copy state value")),
        }
        Ok(())
    }

    fn state_get(&self, state: &NativeCopyState, flag: u32, value: &mut StateValue) -> io::Result<()> {
        let path_value = |path: &Option<PathBuf>| match path {
            Some(path) => StateValue::Path(path.clone()),
            None => StateValue::Empty,
        };
        *value = match flag {
            state::SRC_FILENAME => path_value(&state.src),
            state::DST_FILENAME => path_value(&state.dst),
            state::COPIED => StateValue::Count(state.copied),
            _ => return Err(invalid_input("unsupported copy state value")),
        };
        Ok(())
    }

    fn copyfile(
        &self,
        src: &Path,
        dst: &Path,
        state: &mut NativeCopyState,
        flags: CopyFlags,
    ) -> io::Result<()> {
        state.src = Some(src.to_path_buf());
        state.dst = Some(dst.to_path_buf());
        state.copied = 0;

        let metadata = if flags.contains(CopyFlags::NOFOLLOW_SRC) {
            fs::symlink_metadata(src)?
        } else {
            fs::metadata(src)?
        };
        if metadata.file_type().is_symlink() {
            return Err(invalid_input("source is a symbolic link"));
        }
        if flags.contains(CopyFlags::NOFOLLOW_DST)
            && fs::symlink_metadata(dst).map_or(false, |m| m.file_type().is_symlink())
        {
            return Err(invalid_input("destination is a symbolic link"));
        }
        if flags.contains(CopyFlags::EXCL) && fs::symlink_metadata(dst).is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "destination already exists",
            ));
        }
        if flags.intersects(CopyFlags::ACL | CopyFlags::XATTR) {
            debug!("ACLs and extended attributes are not copied by this backend");
        }

        if flags.contains(CopyFlags::MOVE) && fs::rename(src, dst).is_ok() {
            debug!("{} renamed to {}", src.display(), dst.display());
            state.copied = if metadata.is_dir() { 0 } else { metadata.len() };
            return Ok(());
        }

        let remove_source = flags.intersects(CopyFlags::MOVE | CopyFlags::UNLINK);
        if remove_source && !flags.contains(CopyFlags::DATA) {
            return Err(invalid_input("removing the source requires copying its data"));
        }

        if metadata.is_dir() {
            if !flags.contains(CopyFlags::RECURSIVE) {
                return Err(invalid_input("source is a directory"));
            }
            state.copied = copy_tree(src, dst, flags)?;
        } else {
            state.copied = copy_file(src, dst, &metadata, flags)?;
        }

        if remove_source {
            let copy = fs::symlink_metadata(dst)?;
            if copy.is_dir() != metadata.is_dir() {
                return Err(invalid_input("destination does not hold a copy of the source"));
            }
            if metadata.is_dir() {
                fs::remove_dir_all(src)?;
            } else {
                fs::remove_file(src)?;
            }
        }
        Ok(())
    }
}

fn copy_file(src: &Path, dst: &Path, metadata: &fs::Metadata, flags: CopyFlags) -> io::Result<u64> {
    let mut copied = 0;
    if flags.contains(CopyFlags::DATA) {
        let mut reader = File::open(src)?;
        let mut writer = File::create(dst)?;
        copied = io::copy(&mut reader, &mut writer)?;
    } else if flags.contains(CopyFlags::STAT) && fs::symlink_metadata(dst).is_err() {
        File::create(dst)?;
    }
    if flags.contains(CopyFlags::STAT) {
        copy_stat(dst, metadata)?;
    }
    Ok(copied)
}

fn copy_tree(src: &Path, dst: &Path, flags: CopyFlags) -> io::Result<u64> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let metadata = if flags.contains(CopyFlags::NOFOLLOW_SRC) {
            entry.metadata()?
        } else {
            fs::metadata(&from)?
        };
        if metadata.file_type().is_symlink() {
            debug!("Skipping symbolic link {}", from.display());
            continue;
        }
        copied += if metadata.is_dir() {
            copy_tree(&from, &to, flags)?
        } else {
            copy_file(&from, &to, &metadata, flags)?
        };
    }
    if flags.contains(CopyFlags::STAT) {
        fs::set_permissions(dst, fs::metadata(src)?.permissions())?;
    }
    Ok(copied)
}

fn copy_stat(dst: &Path, metadata: &fs::Metadata) -> io::Result<()> {
    let file = File::options().write(true).open(dst)?;
    file.set_modified(metadata.modified()?)?;
    drop(file);
    fs::set_permissions(dst, metadata.permissions())
}
