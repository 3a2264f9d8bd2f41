//! OS-random token and identifier generation.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

use warden_core::traits::TokenGenerator;

/// Bytes of entropy in every token.
const TOKEN_BYTES: usize = 32;

/// Generates tokens from the operating system RNG.
///
/// Tokens are URL-safe base64 without padding, so they can be embedded in
/// store keys and headers unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn user_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
