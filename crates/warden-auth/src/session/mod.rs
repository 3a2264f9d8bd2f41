//! Session token lifecycle and one-time pad hand-offs.

mod pad;
pub mod validator;

pub use validator::SessionValidator;
