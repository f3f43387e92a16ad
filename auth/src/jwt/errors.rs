use thiserror::Error;

/// Error type for low-level JWT encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}

/// Error type for token manager operations.
///
/// Verification variants follow the order in which checks run:
/// signature and registered claims first, then token type, then issuer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("Token has the wrong type")]
    WrongType,

    #[error("Token has the wrong issuer")]
    WrongIssuer,

    #[error("Token is expired")]
    Expired,

    #[error("Refresh token is invalid: {0}")]
    RefreshInvalid(Box<TokenError>),
}

impl TokenError {
    /// True for every failure that happens while checking a presented token.
    pub fn is_verification_failure(&self) -> bool {
        !matches!(self, TokenError::Signing(_))
    }
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(msg) => TokenError::Signing(msg),
            JwtError::InvalidSignature => TokenError::InvalidSignature,
            JwtError::TokenExpired => TokenError::Expired,
            JwtError::InvalidToken(msg) => TokenError::InvalidClaims(msg),
        }
    }
}
