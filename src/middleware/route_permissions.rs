//! Route → permission table.
//!
//! Every protected route is listed once with the permission it requires. Keys are
//! the route templates exactly as registered, so they match axum's
//! [`MatchedPath`](axum::extract::MatchedPath). Self-service routes that need only a
//! valid token are listed in [`AUTHENTICATED_ONLY`]. A protected route in neither
//! list is refused.

use axum::http::Method;
use campus_core::permissions::*;

pub static ROUTE_PERMISSIONS: &[(Method, &str, &str)] = &[
    // Students
    (Method::POST, "/student/create", STUDENT_CREATE),
    (Method::GET, "/student/get/{studentId}", STUDENT_READ),
    (Method::GET, "/student/getall", STUDENT_READ),
    (Method::PATCH, "/student/update/{studentId}", STUDENT_UPDATE),
    (Method::DELETE, "/student/delete/{studentId}", STUDENT_DELETE),
    // Employees
    (Method::POST, "/employee/create", EMPLOYEE_CREATE),
    (Method::GET, "/employee/get/{employeeId}", EMPLOYEE_READ),
    (Method::GET, "/employee/getall", EMPLOYEE_READ),
    (Method::PATCH, "/employee/update/{employeeId}", EMPLOYEE_UPDATE),
    (Method::DELETE, "/employee/delete/{employeeId}", EMPLOYEE_DELETE),
    // Departments
    (Method::POST, "/department/create", DEPARTMENT_CREATE),
    (Method::GET, "/department/get/{departmentId}", DEPARTMENT_READ),
    (Method::GET, "/department/getall", DEPARTMENT_READ),
    (Method::PATCH, "/department/update/{departmentId}", DEPARTMENT_UPDATE),
    (Method::DELETE, "/department/delete/{departmentId}", DEPARTMENT_DELETE),
    // Classes
    (Method::POST, "/class/create", CLASS_CREATE),
    (Method::GET, "/class/get/{classId}", CLASS_READ),
    (Method::GET, "/class/getall", CLASS_READ),
    (Method::GET, "/class/get-by-department/{departmentId}", CLASS_READ),
    (Method::PATCH, "/class/update/{classId}", CLASS_UPDATE),
    (Method::DELETE, "/class/delete/{classId}", CLASS_DELETE),
    // Courses
    (Method::POST, "/course/create", COURSE_CREATE),
    (Method::GET, "/course/get/{courseId}", COURSE_READ),
    (Method::GET, "/course/getall", COURSE_READ),
    (Method::GET, "/course/get-by-department/{departmentId}", COURSE_READ),
    (Method::PATCH, "/course/update/{courseId}", COURSE_UPDATE),
    (Method::DELETE, "/course/delete/{courseId}", COURSE_DELETE),
    // Exams
    (Method::POST, "/exam/add-new", EXAM_CREATE),
    (Method::GET, "/exam/get/{examId}", EXAM_READ),
    (Method::GET, "/exam/getall", EXAM_READ),
    (Method::GET, "/exam/getall/{session}", EXAM_READ),
    (Method::PATCH, "/exam/update/{examId}", EXAM_UPDATE),
    (Method::DELETE, "/exam/delete/{examId}", EXAM_DELETE),
    // Subjects
    (Method::POST, "/subject/add-new", SUBJECT_CREATE),
    (Method::GET, "/subject/get/{subjectId}", SUBJECT_READ),
    (Method::GET, "/subject/getall", SUBJECT_READ),
    (Method::GET, "/subject/getall/{classId}", SUBJECT_READ),
    (Method::PATCH, "/subject/update/{subjectId}", SUBJECT_UPDATE),
    (Method::DELETE, "/subject/delete/{subjectId}", SUBJECT_DELETE),
    // Roles
    (Method::POST, "/role/create", ROLE_CREATE),
    (Method::GET, "/role/{roleId}", ROLE_READ),
    (Method::GET, "/role", ROLE_READ),
    (Method::PATCH, "/role/update/{roleId}", ROLE_UPDATE),
    (Method::DELETE, "/role/delete/{roleId}", ROLE_DELETE),
];

/// Protected routes open to any authenticated caller.
pub static AUTHENTICATED_ONLY: &[(Method, &str)] = &[
    (Method::GET, "/profile"),
    (Method::POST, "/profile/update"),
    (Method::POST, "/profile/change-password"),
    (Method::GET, "/role/get-permissions/self"),
];

/// How a protected route is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Permission(&'static str),
    AuthenticatedOnly,
}

/// Permission bound to `method` on the route template `path`, if any.
pub fn required_permission(method: &Method, path: &str) -> Option<&'static str> {
    ROUTE_PERMISSIONS
        .iter()
        .find(|(m, p, _)| m == method && *p == path)
        .map(|(_, _, permission)| *permission)
}

/// `None` for a route that is in neither list.
pub fn route_access(method: &Method, path: &str) -> Option<RouteAccess> {
    if let Some(permission) = required_permission(method, path) {
        return Some(RouteAccess::Permission(permission));
    }
    AUTHENTICATED_ONLY
        .iter()
        .any(|(m, p)| m == method && *p == path)
        .then_some(RouteAccess::AuthenticatedOnly)
}
