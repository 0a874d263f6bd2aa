pub mod email;
pub mod ids;
pub mod username;
