pub mod claims;
pub mod errors;
pub mod handler;
pub mod manager;

pub use claims::Claims;
pub use claims::TokenType;
pub use errors::JwtError;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use manager::JwtTokenManager;
pub use manager::TokenConfig;
pub use manager::TokenManager;
pub use manager::TokenPair;
