//! # Campus Core
//!
//! Core types, errors, and utilities shared by every Campus crate.
//!
//! - [`errors`]: the tagged [`AppError`] and its `{ data, message, errors }` rendering
//! - [`response`]: the success envelope
//! - [`pagination`]: paging query normalization and page metadata
//! - [`permissions`]: permission string constants
//! - [`password`]: password hashing, verification, and generation
//!
//! ```ignore
//! use campus_core::{AppError, ApiResponse, PagingQuery};
//!
//! let paging = query.into_request(campus_core::pagination::DEFAULT_LIMIT)?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod response;

pub use errors::{AppError, ErrorDetail, ErrorKind, FieldError, ResultExt, Violations};
pub use pagination::{Page, PageMeta, PagingQuery, PagingRequest};
pub use password::{generate_password, hash_password, verify_password};
pub use response::{ApiResponse, ApiResult};
