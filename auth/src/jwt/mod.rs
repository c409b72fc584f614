pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AccessClaims;
pub use claims::Audience;
pub use claims::RefreshClaims;
pub use claims::RegisteredClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
