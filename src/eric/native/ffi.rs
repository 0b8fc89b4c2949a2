//! C types and entry point signatures of `libericapi` (`eric_types.h`).

use std::ffi::{c_char, c_int, c_void};

pub type EricRueckgabepufferHandle = *mut c_void;
pub type EricZertifikatHandle = u32;
pub type EricTransferHandle = u32;

pub type EricPdfCallback = Option<
    unsafe extern "C" fn(
        pdf_bezeichner: *const c_char,
        pdf_daten: *const u8,
        pdf_groesse: u32,
        benutzerdaten: *mut c_void,
    ) -> c_int,
>;

pub const DRUCK_PARAMETER_VERSION: u32 = 4;
pub const VERSCHLUESSELUNGS_PARAMETER_VERSION: u32 = 3;

/// `eric_druck_parameter_t`
#[repr(C)]
#[derive(Debug)]
pub struct DruckParameter {
    pub version: u32,
    pub vorschau: u32,
    pub erste_seite: u32,
    pub duplex_druck: u32,
    pub pdf_name: *const c_char,
    pub fuss_text: *const c_char,
    pub pdf_callback: EricPdfCallback,
    pub pdf_callback_benutzerdaten: *mut c_void,
}

impl DruckParameter {
    /// Print into `pdf_name`, which must outlive the struct.
    pub fn new(pdf_name: *const c_char, preview: bool) -> Self {
        Self {
            version: DRUCK_PARAMETER_VERSION,
            vorschau: u32::from(preview),
            erste_seite: 0,
            duplex_druck: 0,
            pdf_name,
            fuss_text: std::ptr::null(),
            pdf_callback: None,
            pdf_callback_benutzerdaten: std::ptr::null_mut(),
        }
    }
}

/// `eric_verschluesselungs_parameter_t`
#[repr(C)]
#[derive(Debug)]
pub struct VerschluesselungsParameter {
    pub version: u32,
    pub zertifikat_handle: EricZertifikatHandle,
    pub pin: *const c_char,
    pub abruf_code: *const c_char,
}

impl VerschluesselungsParameter {
    pub fn new(zertifikat_handle: EricZertifikatHandle, pin: *const c_char) -> Self {
        Self {
            version: VERSCHLUESSELUNGS_PARAMETER_VERSION,
            zertifikat_handle,
            pin,
            abruf_code: std::ptr::null(),
        }
    }
}

pub type EricInitialisiereFn =
    unsafe extern "C" fn(plugin_pfad: *const c_char, log_pfad: *const c_char) -> c_int;

pub type EricBeendeFn = unsafe extern "C" fn() -> c_int;

pub type EricBearbeiteVorgangFn = unsafe extern "C" fn(
    datenpuffer: *const c_char,
    datenart_version: *const c_char,
    bearbeitungs_flags: u32,
    druck_parameter: *const DruckParameter,
    crypto_parameter: *const VerschluesselungsParameter,
    transfer_handle: *mut EricTransferHandle,
    rueckgabe_xml_puffer: EricRueckgabepufferHandle,
    serverantwort_xml_puffer: EricRueckgabepufferHandle,
) -> c_int;

pub type EricHoleFehlerTextFn =
    unsafe extern "C" fn(fehlerkode: c_int, rueckgabe_puffer: EricRueckgabepufferHandle) -> c_int;

pub type EricRueckgabepufferErzeugenFn = unsafe extern "C" fn() -> EricRueckgabepufferHandle;

pub type EricRueckgabepufferFreigebenFn =
    unsafe extern "C" fn(handle: EricRueckgabepufferHandle) -> c_int;

pub type EricRueckgabepufferInhaltFn =
    unsafe extern "C" fn(handle: EricRueckgabepufferHandle) -> *const c_char;

pub type EricRueckgabepufferLaengeFn = unsafe extern "C" fn(handle: EricRueckgabepufferHandle) -> u32;

pub type EricGetHandleToCertificateFn = unsafe extern "C" fn(
    h_token: *mut EricZertifikatHandle,
    i_info_pin_support: *mut u32,
    path_to_keystore: *const c_char,
) -> c_int;

pub type EricCloseHandleToCertificateFn =
    unsafe extern "C" fn(h_token: EricZertifikatHandle) -> c_int;
