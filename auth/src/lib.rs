//! Authentication primitives library
//!
//! Provides reusable credential and token infrastructure for the services:
//! - Password hashing (Argon2id, tunable cost)
//! - Signed, time-bounded access tokens (HMAC JWT)
//!
//! Each service defines its own authentication ports and adapts these implementations.
//! Nothing in this crate performs I/O.
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
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let claims = Claims::for_identity("42", "alice@example.com", "user", now, Duration::hours(24));
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode(&token, now).unwrap();
//! assert_eq!(decoded.email, "alice@example.com");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
