pub mod user;

pub use user::PostgresCredentialStore;
