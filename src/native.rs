//! Runtime loading of the native FlyCapture2 C library.

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use tracing::debug;

use crate::error::Result;

/// Anything that can resolve a symbol name to a function address.
///
/// Implemented by [`NativeLibrary`] for the real SDK and by in-process stub
/// tables in the test suite. Resolved addresses must stay valid for as long
/// as the source is alive; [`crate::api::Fc2Api`] keeps its source alive for
/// exactly that reason.
pub trait SymbolSource: Send + Sync {
    fn resolve(&self, symbol: &str) -> Option<NonNull<c_void>>;
}

/// The dynamically loaded FlyCapture2 C library.
pub struct NativeLibrary {
    lib: libloading::Library,
    path: PathBuf,
}

impl NativeLibrary {
    /// Install location of the C API on Linux.
    pub const DEFAULT_PATH: &'static str = "/usr/lib/libflycapture-c.so";

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Safety: loading the vendor SDK runs its initializers; nothing else
        // is mapped at this path in supported installs.
        let lib = unsafe { libloading::Library::new(&path) }?;
        debug!(path = %path.display(), "loaded FlyCapture2 library");
        Ok(NativeLibrary { lib, path })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::DEFAULT_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish()
    }
}

impl SymbolSource for NativeLibrary {
    fn resolve(&self, symbol: &str) -> Option<NonNull<c_void>> {
        // Safety: the symbol is only ever invoked through a descriptor that
        // fixes its signature at bind time.
        let sym = unsafe {
            self.lib
                .get::<unsafe extern "C" fn()>(symbol.as_bytes())
                .ok()?
        };
        NonNull::new(*sym as usize as *mut c_void)
    }
}
