use std::path::Path;

use libloading::Library;
use tracing::debug;

use super::ffi::*;
use crate::eric::{EricConfig, EricError};

/// `libericapi` and `liberictoolkit`, loaded with their entry points resolved.
///
/// The function pointers stay valid for as long as this value is alive.
pub struct EricLibrary {
    pub(crate) initialisiere: EricInitialisiereFn,
    pub(crate) beende: EricBeendeFn,
    pub(crate) bearbeite_vorgang: EricBearbeiteVorgangFn,
    pub(crate) hole_fehler_text: EricHoleFehlerTextFn,
    pub(crate) puffer_erzeugen: EricRueckgabepufferErzeugenFn,
    pub(crate) puffer_freigeben: EricRueckgabepufferFreigebenFn,
    pub(crate) puffer_inhalt: EricRueckgabepufferInhaltFn,
    pub(crate) puffer_laenge: EricRueckgabepufferLaengeFn,
    pub(crate) get_handle_to_certificate: EricGetHandleToCertificateFn,
    pub(crate) close_handle_to_certificate: EricCloseHandleToCertificateFn,
    _api: Library,
    _toolkit: Library,
}

impl std::fmt::Debug for EricLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EricLibrary").finish_non_exhaustive()
    }
}

impl EricLibrary {
    /// Load both libraries from the configured installation.
    ///
    /// # Errors
    ///
    /// [`EricError::LibraryLoad`] when a library file is missing, cannot be
    /// opened, or lacks one of the required entry points.
    pub fn load(config: &EricConfig) -> Result<Self, EricError> {
        let api_path = config.api_library_path();
        let api = open(&api_path)?;
        let toolkit = open(&config.toolkit_library_path())?;

        // SAFETY: the signatures in `ffi` match `ericapi.h`.
        unsafe {
            Ok(Self {
                initialisiere: symbol(&api, &api_path, b"EricInitialisiere\0")?,
                beende: symbol(&api, &api_path, b"EricBeende\0")?,
                bearbeite_vorgang: symbol(&api, &api_path, b"EricBearbeiteVorgang\0")?,
                hole_fehler_text: symbol(&api, &api_path, b"EricHoleFehlerText\0")?,
                puffer_erzeugen: symbol(&api, &api_path, b"EricRueckgabepufferErzeugen\0")?,
                puffer_freigeben: symbol(&api, &api_path, b"EricRueckgabepufferFreigeben\0")?,
                puffer_inhalt: symbol(&api, &api_path, b"EricRueckgabepufferInhalt\0")?,
                puffer_laenge: symbol(&api, &api_path, b"EricRueckgabepufferLaenge\0")?,
                get_handle_to_certificate: symbol(
                    &api,
                    &api_path,
                    b"EricGetHandleToCertificate\0",
                )?,
                close_handle_to_certificate: symbol(
                    &api,
                    &api_path,
                    b"EricCloseHandleToCertificate\0",
                )?,
                _api: api,
                _toolkit: toolkit,
            })
        }
    }
}

fn open(path: &Path) -> Result<Library, EricError> {
    if !path.exists() {
        return Err(EricError::LibraryLoad {
            path: path.to_path_buf(),
            reason: format!(
                "file does not exist; set {} to the root of the ERiC Linux-x86_64 distribution",
                crate::eric::ERIC_HOME_ENV
            ),
        });
    }
    debug!(path = %path.display(), "loading ERiC library");
    // SAFETY: loading runs the library's initialisers; ERiC has no unsound ones.
    let lib = unsafe { open_global(path) };
    lib.map_err(|e| EricError::LibraryLoad {
        path: path.to_path_buf(),
        reason: format!("{e}; check that dependent libraries (libericxerces, plugins) are available"),
    })
}

// Plugins resolve symbols from libericapi, so it has to be loaded globally.
#[cfg(unix)]
unsafe fn open_global(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }.map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_global(path: &Path) -> Result<Library, libloading::Error> {
    unsafe { Library::new(path) }
}

unsafe fn symbol<T: Copy>(lib: &Library, path: &Path, name: &[u8]) -> Result<T, EricError> {
    unsafe { lib.get::<T>(name) }
        .map(|sym| *sym)
        .map_err(|e| EricError::LibraryLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
