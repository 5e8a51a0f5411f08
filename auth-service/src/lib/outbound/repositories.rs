pub mod identity;
pub mod memory;

pub use identity::PostgresCredentialStore;
pub use memory::InMemoryCredentialStore;
