//! Permission string constants.
//!
//! Permissions follow the dotted `<domain>.<resource>.<action>` convention and are
//! matched exactly: holding `student.student.create` says nothing about
//! `student.student`. Routes refer to these constants through the route
//! permission table rather than repeating string literals.

// =============================================================================
// Student permissions
// =============================================================================

/// Permission to create students
pub const STUDENT_CREATE: &str = "student.student.create";
/// Permission to read students
pub const STUDENT_READ: &str = "student.student.read";
/// Permission to update students
pub const STUDENT_UPDATE: &str = "student.student.update";
/// Permission to delete students
pub const STUDENT_DELETE: &str = "student.student.delete";

// =============================================================================
// Employee permissions
// =============================================================================

pub const EMPLOYEE_CREATE: &str = "employee.employee.create";
pub const EMPLOYEE_READ: &str = "employee.employee.read";
pub const EMPLOYEE_UPDATE: &str = "employee.employee.update";
pub const EMPLOYEE_DELETE: &str = "employee.employee.delete";

// =============================================================================
// Department permissions
// =============================================================================

pub const DEPARTMENT_CREATE: &str = "department.department.create";
pub const DEPARTMENT_READ: &str = "department.department.read";
pub const DEPARTMENT_UPDATE: &str = "department.department.update";
pub const DEPARTMENT_DELETE: &str = "department.department.delete";

// =============================================================================
// Class permissions
// =============================================================================

pub const CLASS_CREATE: &str = "class.class.create";
pub const CLASS_READ: &str = "class.class.read";
pub const CLASS_UPDATE: &str = "class.class.update";
pub const CLASS_DELETE: &str = "class.class.delete";

// =============================================================================
// Course permissions
// =============================================================================

pub const COURSE_CREATE: &str = "course.course.create";
pub const COURSE_READ: &str = "course.course.read";
pub const COURSE_UPDATE: &str = "course.course.update";
pub const COURSE_DELETE: &str = "course.course.delete";

// =============================================================================
// Exam permissions
// =============================================================================

pub const EXAM_CREATE: &str = "exam.exam.create";
pub const EXAM_READ: &str = "exam.exam.read";
pub const EXAM_UPDATE: &str = "exam.exam.update";
pub const EXAM_DELETE: &str = "exam.exam.delete";

// =============================================================================
// Subject permissions
// =============================================================================

pub const SUBJECT_CREATE: &str = "subject.subject.create";
pub const SUBJECT_READ: &str = "subject.subject.read";
pub const SUBJECT_UPDATE: &str = "subject.subject.update";
pub const SUBJECT_DELETE: &str = "subject.subject.delete";

// =============================================================================
// Role permissions
// =============================================================================

pub const ROLE_CREATE: &str = "role.role.create";
pub const ROLE_READ: &str = "role.role.read";
pub const ROLE_UPDATE: &str = "role.role.update";
pub const ROLE_DELETE: &str = "role.role.delete";

/// True when `permission` has exactly three non-empty lowercase segments.
pub fn is_dotted(permission: &str) -> bool {
    let segments: Vec<&str> = permission.split('.').collect();
    segments.len() == 3
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '_'))
}
