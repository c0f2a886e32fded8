//! Readings: analyzed records supplied by the Analysis Service
//!
//! The service stores completed analyses and enumerates their prose fields
//! for the annotation engine. It knows nothing about how a field was
//! produced; every prose field is treated identically.

pub mod store;
pub mod types;

pub use store::{NewReading, ReadingRepository};
pub use types::{AnnotatedField, Argument, Evidence, KeyTerm, Reading};
