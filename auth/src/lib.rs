//! Authentication utilities library
//!
//! Provides the credential and session-token capabilities shared by the services:
//! - Password hashing (Argon2id behind the `PasswordHasher` trait)
//! - JWT encoding and decoding
//! - Access/refresh token issuance, verification and rotation (`TokenManager`)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2PasswordHasher, PasswordHasher};
//!
//! let hasher = Argon2PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password"));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{JwtTokenManager, TokenConfig, TokenManager};
//! use chrono::Duration;
//!
//! let tokens = JwtTokenManager::new(TokenConfig {
//!     secret: b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     issuer: "app".to_string(),
//!     access_ttl: Duration::minutes(15),
//!     refresh_ttl: Duration::days(30),
//! });
//!
//! let pair = tokens.issue_pair("user123").unwrap();
//! let claims = tokens.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.user_id(), "user123");
//!
//! let rotated = tokens.refresh(&pair.refresh_token).unwrap();
//! assert!(tokens.verify_refresh(&rotated.refresh_token).is_ok());
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::JwtTokenManager;
pub use jwt::TokenConfig;
pub use jwt::TokenError;
pub use jwt::TokenManager;
pub use jwt::TokenPair;
pub use jwt::TokenType;
pub use password::Argon2PasswordHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
