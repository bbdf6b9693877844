//! A library to evaluate rendered images for `gausplat`

#![deny(rustdoc::broken_intra_doc_links)]
#![allow(clippy::excessive_precision)]
#![deny(missing_docs)]

pub mod canvas;
pub mod error;
pub mod evaluate;
pub mod frame;
pub mod metric;
pub mod persist;
