//! ERiC result codes and processing flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use super::engine::{ProcessMode, ProcessRequest};

/// Known subset of the engine's result codes (`eric_fehlercodes.h`).
///
/// Codes outside this subset are still carried as raw `i32` values in
/// [`EricError::Engine`](super::EricError::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    GlobalUnknown = 610001001,
    /// Plausibility check failed; details are in the validation response.
    GlobalPruefFehler = 610001002,
    GlobalHinweise = 610001003,
    GlobalNichtGenuegendArbeitsspeicher = 610001013,
    GlobalDateiNichtGefunden = 610001014,
    GlobalIllegalState = 610001017,
    GlobalSteuernummerUngueltig = 610001034,
    GlobalPufferUeberlauf = 610001041,
    /// The `<TaxType>_<TaxVersion>` string is not known to the engine.
    GlobalDatenartversionUnbekannt = 610001042,
    GlobalDatenartversionXmlInkonsistent = 610001044,
    GlobalPufferUngleicherInstanz = 610001050,
    GlobalTransferhandleNichtInitialisiert = 610001078,
}

impl ErrorCode {
    const ALL: [Self; 13] = [
        Self::Ok,
        Self::GlobalUnknown,
        Self::GlobalPruefFehler,
        Self::GlobalHinweise,
        Self::GlobalNichtGenuegendArbeitsspeicher,
        Self::GlobalDateiNichtGefunden,
        Self::GlobalIllegalState,
        Self::GlobalSteuernummerUngueltig,
        Self::GlobalPufferUeberlauf,
        Self::GlobalDatenartversionUnbekannt,
        Self::GlobalDatenartversionXmlInkonsistent,
        Self::GlobalPufferUngleicherInstanz,
        Self::GlobalTransferhandleNichtInitialisiert,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.code(), self)
    }
}

/// Bit set passed as `bearbeitungsFlags` to `EricBearbeiteVorgang`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProcessingFlags(u32);

impl ProcessingFlags {
    pub const VALIDATE: Self = Self(1 << 1);
    pub const SEND: Self = Self(1 << 2);
    pub const PRINT: Self = Self(1 << 5);
    pub const CHECK_HINTS: Self = Self(1 << 7);
    pub const VALIDATE_WITHOUT_RELEASE_DATE: Self = Self(1 << 8);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Validation always runs; sending adds `SEND`, a print request adds `PRINT`.
    pub fn for_request(request: &ProcessRequest) -> Self {
        let mut flags = Self::VALIDATE;
        if matches!(request.mode, ProcessMode::Send { .. }) {
            flags |= Self::SEND;
        }
        if request.print.is_some() {
            flags |= Self::PRINT;
        }
        flags
    }
}

impl BitOr for ProcessingFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ProcessingFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
