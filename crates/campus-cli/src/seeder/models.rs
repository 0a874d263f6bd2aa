use campus_models::roles::{STUDENT_ROLE, SUPER_ADMIN_ROLE};

/// A role written by `seed-roles`.
pub struct RoleSeed {
    pub name: &'static str,
    pub is_super_admin: bool,
    pub permissions: &'static [&'static str],
}

/// The roles every installation starts with.
pub fn default_roles() -> [RoleSeed; 2] {
    [
        RoleSeed {
            name: STUDENT_ROLE,
            is_super_admin: false,
            permissions: &["READ", "WRITE", "student.create"],
        },
        RoleSeed {
            name: SUPER_ADMIN_ROLE,
            is_super_admin: true,
            permissions: &[],
        },
    ]
}

/// Account details for the bootstrap employee.
pub struct SuperAdminSeed {
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

impl SuperAdminSeed {
    pub const DEFAULT_FIRST_NAME: &'static str = "Super Admin";
    pub const DEFAULT_USERNAME: &'static str = "super_admin";
    pub const DEFAULT_EMAIL: &'static str = "superadmin@gmail.com";
    pub const DEFAULT_MOBILE: &'static str = "1234567890";
}

/// A generated student row.
#[derive(Debug, Clone)]
pub struct StudentSeed {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
}
