use chrono::Duration;
use chrono::Utc;
use serde::Serialize;

use super::claims::Claims;
use super::claims::TokenType;
use super::errors::TokenError;
use super::handler::JwtHandler;

/// Access and refresh tokens issued together for one user.
///
/// Expiries are absolute Unix timestamps so callers can schedule their own refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: i64,
    pub refresh_token: String,
    pub refresh_expires_at: i64,
}

/// Immutable token manager settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Session token capability: issue, verify and rotate bearer tokens.
pub trait TokenManager: Send + Sync + 'static {
    /// Issue a fresh access/refresh pair for a user.
    ///
    /// # Errors
    /// * `Signing` - A token could not be signed
    fn issue_pair(&self, user_id: &str) -> Result<TokenPair, TokenError>;

    /// Verify a token presented as an access token.
    ///
    /// # Errors
    /// * `InvalidSignature`, `InvalidClaims`, `Expired`, `WrongType`, `WrongIssuer`
    fn verify_access(&self, token: &str) -> Result<Claims, TokenError>;

    /// Verify a token presented as a refresh token.
    ///
    /// # Errors
    /// * `InvalidSignature`, `InvalidClaims`, `Expired`, `WrongType`, `WrongIssuer`
    fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError>;

    /// Exchange a refresh token for a new pair.
    ///
    /// The presented refresh token stays valid until its own expiry.
    ///
    /// # Errors
    /// * `RefreshInvalid` - The refresh token did not verify
    /// * `Signing` - The new pair could not be signed
    fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError>;
}

/// HS256 implementation of [`TokenManager`].
pub struct JwtTokenManager {
    handler: JwtHandler,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenManager {
    /// Create a token manager from its configuration.
    pub fn new(config: TokenConfig) -> Self {
        Self {
            handler: JwtHandler::new(&config.secret),
            issuer: config.issuer,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.typ != expected {
            return Err(TokenError::WrongType);
        }

        if claims.iss != self.issuer {
            return Err(TokenError::WrongIssuer);
        }

        Ok(claims)
    }
}

impl TokenManager for JwtTokenManager {
    fn issue_pair(&self, user_id: &str) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        let access = Claims::new(user_id, TokenType::Access, &self.issuer, now, self.access_ttl);
        let refresh = Claims::new(
            user_id,
            TokenType::Refresh,
            &self.issuer,
            now,
            self.refresh_ttl,
        );

        let access_token = self.handler.encode(&access)?;
        let refresh_token = self.handler.encode(&refresh)?;

        Ok(TokenPair {
            access_token,
            access_expires_at: access.exp,
            refresh_token,
            refresh_expires_at: refresh.exp,
        })
    }

    fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self
            .verify_refresh(refresh_token)
            .map_err(|e| TokenError::RefreshInvalid(Box::new(e)))?;

        self.issue_pair(claims.user_id())
    }
}
