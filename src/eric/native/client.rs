use std::ffi::{CString, c_char};
use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, info, warn};

use super::ffi::*;
use super::library::EricLibrary;
use crate::eric::{
    EngineResponse, EricConfig, EricError, ErrorCode, ProcessMode, ProcessRequest,
    ProcessingFlags, SubmissionEngine, check_result,
};

/// A return buffer owned by the engine, released on drop.
struct ReturnBuffer<'lib> {
    lib: &'lib EricLibrary,
    handle: EricRueckgabepufferHandle,
}

impl<'lib> ReturnBuffer<'lib> {
    fn new(lib: &'lib EricLibrary) -> Result<Self, EricError> {
        // SAFETY: no preconditions.
        let handle = unsafe { (lib.puffer_erzeugen)() };
        if handle.is_null() {
            return Err(EricError::Engine {
                code: ErrorCode::GlobalNichtGenuegendArbeitsspeicher.code(),
                message: Some("could not allocate return buffer".into()),
            });
        }
        Ok(Self { lib, handle })
    }

    fn contents(&self) -> String {
        // SAFETY: `handle` is a live buffer; the engine guarantees `len` bytes at `ptr`.
        unsafe {
            let ptr = (self.lib.puffer_inhalt)(self.handle);
            let len = (self.lib.puffer_laenge)(self.handle) as usize;
            if ptr.is_null() || len == 0 {
                return String::new();
            }
            let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl Drop for ReturnBuffer<'_> {
    fn drop(&mut self) {
        // SAFETY: created by `EricRueckgabepufferErzeugen` and freed once.
        unsafe {
            (self.lib.puffer_freigeben)(self.handle);
        }
    }
}

/// An open certificate, closed on drop.
struct Certificate<'lib> {
    lib: &'lib EricLibrary,
    handle: EricZertifikatHandle,
}

impl<'lib> Certificate<'lib> {
    fn open(client: &'lib EricClient, path: &Path) -> Result<Self, EricError> {
        let lib = &client.library;
        let c_path = c_string(&path.to_string_lossy(), "certificate path")?;
        let mut handle: EricZertifikatHandle = 0;
        let mut pin_support: u32 = 0;
        // SAFETY: out-pointers reference locals; `c_path` outlives the call.
        let rc = unsafe { (lib.get_handle_to_certificate)(&mut handle, &mut pin_support, c_path.as_ptr()) };
        check_result(rc, client.error_text(rc))?;
        debug!(path = %path.display(), pin_support, "opened certificate");
        Ok(Self { lib, handle })
    }
}

impl Drop for Certificate<'_> {
    fn drop(&mut self) {
        // SAFETY: handle obtained from `EricGetHandleToCertificate`.
        let rc = unsafe { (self.lib.close_handle_to_certificate)(self.handle) };
        if rc != 0 {
            warn!(code = rc, "failed to close certificate handle");
        }
    }
}

/// Native [`SubmissionEngine`] backed by the loaded ERiC libraries.
///
/// ERiC's single-thread API keeps global state, so a client is neither
/// `Send` nor `Sync` and at most one should be initialised per process.
///
/// ```no_run
/// use taxel::eric::native::EricClient;
/// use taxel::eric::*;
///
/// let mut client = EricClient::open(EricConfig::from_overrides(None, None))?;
/// let xml = std::fs::read_to_string("output.xml").unwrap();
/// let response = client.process(&ProcessRequest::validate(xml, TaxonomyVersion::default()))?;
/// write_responses(&client.config().log_dir, &response)?;
/// # Ok::<(), EricError>(())
/// ```
#[derive(Debug)]
pub struct EricClient {
    library: EricLibrary,
    config: EricConfig,
    initialized: bool,
    _not_send: PhantomData<*const ()>,
}

impl EricClient {
    pub fn new(library: EricLibrary, config: EricConfig) -> Self {
        Self {
            library,
            config,
            initialized: false,
            _not_send: PhantomData,
        }
    }

    /// Load the libraries and initialise the engine.
    pub fn open(config: EricConfig) -> Result<Self, EricError> {
        let library = EricLibrary::load(&config)?;
        let mut client = Self::new(library, config);
        client.initialize()?;
        Ok(client)
    }

    pub fn config(&self) -> &EricConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create the log directory and call `EricInitialisiere`.
    pub fn initialize(&mut self) -> Result<(), EricError> {
        if self.initialized {
            return Ok(());
        }
        let log_dir = &self.config.log_dir;
        std::fs::create_dir_all(log_dir).map_err(|e| EricError::io(log_dir, e))?;
        let home = c_string(&self.config.home.to_string_lossy(), "ERiC home")?;
        let log = c_string(&log_dir.to_string_lossy(), "log directory")?;

        // SAFETY: both strings outlive the call.
        let rc = unsafe { (self.library.initialisiere)(home.as_ptr(), log.as_ptr()) };
        check_result(rc, self.error_text(rc))?;
        self.initialized = true;
        info!(home = %self.config.home.display(), log_dir = %log_dir.display(), "ERiC initialised");
        Ok(())
    }

    /// Call `EricBeende`. Does nothing if the engine is not initialised.
    pub fn close(&mut self) -> Result<(), EricError> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        // SAFETY: paired with a successful `EricInitialisiere`.
        let rc = unsafe { (self.library.beende)() };
        check_result(rc, self.error_text(rc))?;
        debug!("ERiC shut down");
        Ok(())
    }

    /// The engine's own description of a result code.
    pub fn error_text(&self, code: i32) -> Option<String> {
        let buffer = ReturnBuffer::new(&self.library).ok()?;
        // SAFETY: `buffer` is live for the call.
        let rc = unsafe { (self.library.hole_fehler_text)(code, buffer.handle) };
        (rc == 0).then(|| buffer.contents()).filter(|text| !text.is_empty())
    }
}

impl SubmissionEngine for EricClient {
    fn process(&mut self, request: &ProcessRequest) -> Result<EngineResponse, EricError> {
        if !self.initialized {
            return Err(EricError::Engine {
                code: ErrorCode::GlobalIllegalState.code(),
                message: Some("engine is not initialised".into()),
            });
        }

        let flags = ProcessingFlags::for_request(request);
        let xml = c_string(&request.xml, "XML document")?;
        let version = c_string(&request.version.to_string(), "taxonomy version")?;

        let pdf_name = request
            .print
            .as_ref()
            .map(|p| c_string(&p.pdf_path.to_string_lossy(), "PDF path"))
            .transpose()?;
        let print_params = request
            .print
            .as_ref()
            .zip(pdf_name.as_ref())
            .map(|(p, name)| DruckParameter::new(name.as_ptr(), p.preview));

        let (certificate, pin) = match &request.mode {
            ProcessMode::Validate => (None, None),
            ProcessMode::Send { certificate, pin } => (
                Some(Certificate::open(self, certificate)?),
                Some(c_string(pin, "PIN")?),
            ),
        };
        let crypto_params = certificate
            .as_ref()
            .map(|cert| VerschluesselungsParameter::new(cert.handle, c_ptr(pin.as_ref())));
        let mut transfer: Option<EricTransferHandle> = certificate.as_ref().map(|_| 0);

        let validation_buffer = ReturnBuffer::new(&self.library)?;
        let server_buffer = ReturnBuffer::new(&self.library)?;

        debug!(version = %request.version, flags = flags.bits(), "calling EricBearbeiteVorgang");
        // SAFETY: every pointer references a local that outlives the call.
        let rc = unsafe {
            (self.library.bearbeite_vorgang)(
                xml.as_ptr(),
                version.as_ptr(),
                flags.bits(),
                print_params.as_ref().map_or(std::ptr::null(), |p| p as *const _),
                crypto_params.as_ref().map_or(std::ptr::null(), |p| p as *const _),
                transfer
                    .as_mut()
                    .map_or(std::ptr::null_mut(), |t| t as *mut EricTransferHandle),
                validation_buffer.handle,
                server_buffer.handle,
            )
        };
        check_result(rc, self.error_text(rc))?;

        let server_response = server_buffer.contents();
        Ok(EngineResponse {
            code: rc,
            validation_response: validation_buffer.contents(),
            server_response: (!server_response.is_empty()).then_some(server_response),
            transfer_handle: transfer,
            pdf_path: request.print.as_ref().map(|p| p.pdf_path.clone()),
        })
    }
}

impl Drop for EricClient {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "ERiC shutdown failed");
        }
    }
}

fn c_string(value: &str, what: &str) -> Result<CString, EricError> {
    CString::new(value).map_err(|_| EricError::InvalidArgument(format!("{what} contains a NUL byte")))
}

fn c_ptr(value: Option<&CString>) -> *const c_char {
    value.map_or(std::ptr::null(), |s| s.as_ptr())
}

