//! Utility functions and helpers.

pub mod http;
pub mod interrupt;
pub mod log;
pub mod text;
pub mod url;

pub use interrupt::Interrupt;
