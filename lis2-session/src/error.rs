//! Error re-exports for the session layer

pub use lis2_core::error::{Lis2Error, Lis2Result};
