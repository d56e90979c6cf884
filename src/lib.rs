// src/lib.rs

//! Catalog Crawler Library
//!
//! Walks storefront collections in a real browser, re-hosts product images
//! and writes the catalog to Excel workbooks.

pub mod driver;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
