//! Authentication and token-lifecycle library
//!
//! Provides the credential machinery behind administrative login:
//! - Password hashing and verification (Argon2id)
//! - Access and refresh token issuance and validation (HMAC JWT), each kind
//!   with its own secret and audience
//! - Authentication coordination
//!
//! Everything here is synchronous and stateless. Services own user lookup and
//! adapt these types behind their own ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Identity, TokenCodec, TokenConfig};
//!
//! let config = TokenConfig::new(
//!     b"access_secret_at_least_32_bytes_long!".to_vec(),
//!     b"refresh_secret_at_least_32_bytes_long".to_vec(),
//! );
//! let codec = TokenCodec::new(&config).unwrap();
//!
//! let identity = Identity::new(1, "admin");
//! let token = codec.issue_access(&identity).unwrap();
//! assert_eq!(codec.validate_access(&token).unwrap(), identity);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Identity, PasswordHasher, TokenCodec, TokenConfig};
//!
//! let config = TokenConfig::new(
//!     b"access_secret_at_least_32_bytes_long!".to_vec(),
//!     b"refresh_secret_at_least_32_bytes_long".to_vec(),
//! );
//! let auth = Authenticator::new(TokenCodec::new(&config).unwrap(), PasswordHasher::new());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a token pair
//! let identity = Identity::new(1, "admin");
//! let result = auth.authenticate("password123", &hash, &identity).unwrap();
//!
//! // Refresh: trade the refresh token for a new access token
//! let user_id = auth.validate_refresh(&result.refresh_token).unwrap();
//! let access_token = auth.issue_access(&Identity::new(user_id, "admin")).unwrap();
//! assert_eq!(auth.validate_access(&access_token).unwrap().user_id, 1);
//! ```

pub mod authenticator;
pub mod codec;
pub mod config;
pub mod identity;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use codec::TokenCodec;
pub use codec::TokenError;
pub use config::TokenConfig;
pub use config::TokenConfigError;
pub use identity::Identity;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
