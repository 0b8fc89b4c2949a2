//! Native binding to the ERiC shared libraries.
//!
//! The libraries are opened at runtime with `libloading`, so building this
//! crate does not require an ERiC installation; only [`EricLibrary::load`]
//! does.

pub mod ffi;
mod client;
mod library;

pub use client::EricClient;
pub use library::EricLibrary;
