mod native;

pub use native::*;

use crate::error::*;

use log::*;
use std::fmt;
use std::io;
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

/// Identifiers of the values stored in a copy state.
pub mod state {
    pub const SRC_FILENAME: u32 = 2;
    pub const DST_FILENAME: u32 = 4;
    /// Number of data bytes copied by the last copy. Read-only.
    pub const COPIED: u32 = 8;
}

/// What to copy, and how.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct CopyFlags(u32);

impl CopyFlags {
    pub const ACL: CopyFlags = CopyFlags(1 << 0);
    pub const STAT: CopyFlags = CopyFlags(1 << 1);
    pub const XATTR: CopyFlags = CopyFlags(1 << 2);
    pub const DATA: CopyFlags = CopyFlags(1 << 3);
    pub const SECURITY: CopyFlags = CopyFlags(Self::STAT.0 | Self::ACL.0);
    pub const METADATA: CopyFlags = CopyFlags(Self::SECURITY.0 | Self::XATTR.0);
    pub const ALL: CopyFlags = CopyFlags(Self::METADATA.0 | Self::DATA.0);
    pub const RECURSIVE: CopyFlags = CopyFlags(1 << 15);
    pub const EXCL: CopyFlags = CopyFlags(1 << 17);
    pub const NOFOLLOW_SRC: CopyFlags = CopyFlags(1 << 18);
    pub const NOFOLLOW_DST: CopyFlags = CopyFlags(1 << 19);
    pub const MOVE: CopyFlags = CopyFlags(1 << 20);
    pub const UNLINK: CopyFlags = CopyFlags(1 << 21);
    pub const NOFOLLOW: CopyFlags = CopyFlags(Self::NOFOLLOW_SRC.0 | Self::NOFOLLOW_DST.0);

    const NAMED: &'static [(&'static str, CopyFlags)] = &[
        ("acl", Self::ACL),
        ("stat", Self::STAT),
        ("xattr", Self::XATTR),
        ("data", Self::DATA),
        ("security", Self::SECURITY),
        ("metadata", Self::METADATA),
        ("all", Self::ALL),
        ("recursive", Self::RECURSIVE),
        ("excl", Self::EXCL),
        ("nofollow_src", Self::NOFOLLOW_SRC),
        ("nofollow_dst", Self::NOFOLLOW_DST),
        ("nofollow", Self::NOFOLLOW),
        ("move", Self::MOVE),
        ("unlink", Self::UNLINK),
    ];

    pub const fn empty() -> Self {
        CopyFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        CopyFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: CopyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: CopyFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Parse a comma-separated list of flag names, such as `data,stat,excl`.
    pub fn parse_list(list: &str) -> Result<Self, CSError> {
        let mut flags = Self::empty();
        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let (_, flag) = Self::NAMED
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(name))
                .ok_or(CSError::InvalidArgument)?;
            flags |= *flag;
        }
        Ok(flags)
    }
}

impl BitOr for CopyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        CopyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for CopyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CopyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CopyFlags({:#x})", self.0)
    }
}

/// A value stored in, or read from, a copy state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum StateValue {
    #[default]
    Empty,
    Path(PathBuf),
    Count(u64),
}

/// An OS-level file copy primitive.
///
/// Copies are driven by a state object, allocated and freed by the backend.
pub trait CopyfileBackend {
    type State;

    fn state_alloc(&self) -> Option<Self::State>;

    fn state_free(&self, state: Self::State);

    fn state_set(&self, state: &mut Self::State, flag: u32, value: &StateValue) -> io::Result<()>;

    fn state_get(&self, state: &Self::State, flag: u32, value: &mut StateValue) -> io::Result<()>;

    fn copyfile(
        &self,
        src: &Path,
        dst: &Path,
        state: &mut Self::State,
        flags: CopyFlags,
    ) -> io::Result<()>;
}

/// A copy state, owned for the lifetime of the wrapper and freed exactly once.
pub struct Copyfile<B: CopyfileBackend = NativeCopyfile> {
    backend: B,
    state: Option<B::State>,
}

impl Copyfile<NativeCopyfile> {
    pub fn new() -> Result<Self, CSError> {
        Self::with_backend(NativeCopyfile)
    }
}

impl<B: CopyfileBackend> Copyfile<B> {
    pub fn with_backend(backend: B) -> Result<Self, CSError> {
        let state = backend.state_alloc().ok_or(CSError::ResourceAllocation)?;
        Ok(Self {
            backend,
            state: Some(state),
        })
    }

    /// Store `value` under `flag` in the copy state.
    pub fn set(&mut self, flag: u32, value: &StateValue) -> Result<(), CSError> {
        let state = self.state.as_mut().ok_or(CSError::ResourceAllocation)?;
        self.backend
            .state_set(state, flag, value)
            .map_err(CSError::UnixError)
    }

    /// Known issue: this calls the backend's `state_set()`, not `state_get()`.
    ///
    /// `value` is stored under `flag` and is never filled in. This matches the
    /// behavior existing callers were written against, and is kept as is.
    /// Use [`Copyfile::state()`] to inspect the state instead.
    pub fn get(&mut self, flag: u32, value: &mut StateValue) -> Result<(), CSError> {
        warn!("Copyfile::get({}) stores its argument instead of reading the state", flag);
        let state = self.state.as_mut().ok_or(CSError::ResourceAllocation)?;
        self.backend
            .state_set(state, flag, value)
            .map_err(CSError::UnixError)
    }

    /// Copy `src` to `dst`.
    pub fn copy(
        &mut self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        flags: CopyFlags,
    ) -> Result<(), CSError> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        debug!("copyfile {} -> {} ({:?})", src.display(), dst.display(), flags);
        let state = self.state.as_mut().ok_or(CSError::ResourceAllocation)?;
        self.backend
            .copyfile(src, dst, state, flags)
            .map_err(CSError::UnixError)
    }

    pub fn state(&self) -> Option<&B::State> {
        self.state.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: CopyfileBackend> Drop for Copyfile<B> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            self.backend.state_free(state);
        }
    }
}
