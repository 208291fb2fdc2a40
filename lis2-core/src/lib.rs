//! Core types and utilities for the LIS2-A2 analyzer link protocol
//!
//! This crate provides the control-byte constants, checksum computation,
//! and error handling used throughout the lis2 implementation.

pub mod checksum;
pub mod control;
pub mod error;

pub use control::ControlByte;
pub use error::{Lis2Error, Lis2Result};
