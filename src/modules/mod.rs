pub mod auth;
pub mod classes;
pub mod courses;
pub mod departments;
pub mod employees;
pub mod exams;
pub mod profile;
pub mod roles;
pub mod students;
pub mod subjects;
