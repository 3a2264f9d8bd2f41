//! Password hashing and comparison.

pub mod hasher;

pub use hasher::{Comparison, PasswordHasher};
