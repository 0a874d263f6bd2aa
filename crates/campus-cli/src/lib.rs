//! # Campus CLI
//!
//! Seeding and bootstrap utilities for the Campus database.
//!
//! ```ignore
//! use campus_cli::seeder::{seed_roles, seed_students};
//!
//! seed_roles(&pool).await?;
//! seed_students(&pool, 50, "changeme").await?;
//! ```

pub mod seeder;
