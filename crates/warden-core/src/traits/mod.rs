//! Collaborator traits defined in `warden-core` and implemented by other crates.

pub mod clock;
pub mod reporter;
pub mod session_store;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reporter::AuthReporter;
pub use session_store::SessionStore;
pub use token::TokenGenerator;
