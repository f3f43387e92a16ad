pub mod argon2;
pub mod errors;

pub use argon2::Argon2PasswordHasher;
pub use errors::PasswordError;

/// One-way password hashing capability.
///
/// Implementations must salt every hash so that hashing the same plaintext
/// twice yields different digests, and must encode enough parameters in the
/// digest to verify it later without extra state.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash a plaintext secret.
    ///
    /// # Errors
    /// * `HashingFailed` - The underlying algorithm rejected the input or parameters
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Check a plaintext secret against a stored digest.
    ///
    /// Returns `false` for a mismatch and for a digest that cannot be parsed.
    fn verify(&self, digest: &str, plaintext: &str) -> bool;
}
