//! # Campus Auth
//!
//! Identity tokens and permission evaluation.
//!
//! - [`claims`]: the identity carried by every authenticated request
//! - [`jwt`]: signing and verifying identity tokens
//! - [`access`]: deciding whether a role grants a permission
//!
//! ```ignore
//! use campus_auth::{Identity, issue_token, decode_token};
//!
//! let token = issue_token(&identity, &jwt_config)?;
//! let claims = decode_token(&token, &jwt_config)?;
//! assert_eq!(claims.identity(), identity);
//! ```

pub mod access;
pub mod claims;
pub mod jwt;

pub use access::{AccessDenied, RoleGrants, evaluate};
pub use claims::{Claims, Identity};
pub use jwt::{decode_token, encode_claims, issue_token};
