//! Full-resolution images built from masked color samples.

pub mod convert;
pub mod crop;
pub mod reconstruct;

pub use crate::error::Error;
pub use burn::tensor::{backend::Backend, Tensor};
pub use convert::*;
pub use crop::*;
pub use reconstruct::*;
