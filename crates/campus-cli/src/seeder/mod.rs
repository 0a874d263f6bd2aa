//! Database seeding for development and first-run bootstrap.
//!
//! Roles and the super-admin account are upserted so the commands can be rerun.
//! Fake students land under [`SEED_EMAIL_DOMAIN`], which is what
//! [`clear_seed`] removes.

mod models;
mod roles;
mod students;

pub use models::{RoleSeed, StudentSeed, SuperAdminSeed, default_roles};
pub use roles::{seed_roles, seed_super_admin};
pub use students::{clear_seed, generate_students, seed_students};

/// Domain of every generated student email.
pub const SEED_EMAIL_DOMAIN: &str = "seed.campus.local";
