//! gradebook-core — Entity store, grading and rating engines, and persistence.
//!
//! This crate defines the school records data model (teachers, students,
//! subjects), the operations that mutate it, and the flat-file gateway that
//! keeps accounts across restarts.

pub mod auth;
pub mod config;
pub mod error;
pub mod grading;
pub mod input;
pub mod model;
pub mod persistence;
pub mod rating;
pub mod store;

pub use error::{RecordsError, Result};
pub use model::{AccountId, Role, StudentId, SubjectId, TeacherId};
pub use store::{Store, StoreOptions};
