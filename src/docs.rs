use campus_core::errors::{ErrorBody, ErrorDetail, FieldError};
use campus_core::pagination::{PageMeta, PagingQuery, SortDirection, SortKey};
use campus_models::NamedRef;
use campus_models::auth::{
    AccountKind, DeliveryStatus, ForgotPasswordRequest, LoginRequest, LoginResponse,
    ResetPasswordRequest, ResetRequested,
};
use campus_models::classes::{Class, CreateClassDto, UpdateClassDto};
use campus_models::courses::{Course, CreateCourseDto, UpdateCourseDto};
use campus_models::departments::{Department, DepartmentDto};
use campus_models::employees::{
    CreateEmployeeDto, CreatedEmployee, Employee, EmployeePage, UpdateEmployeeDto,
};
use campus_models::exams::{CreateExamDto, Exam, ExamPage, UpdateExamDto};
use campus_models::profile::{ChangePasswordDto, Profile, UpdateProfileDto};
use campus_models::roles::{CreateRoleDto, Role, SelfPermissions, UpdateRoleDto};
use campus_models::students::{
    CreateStudentDto, CreatedStudent, Student, StudentPage, UpdateStudentDto,
};
use campus_models::subjects::{CreateSubjectDto, Subject, SubjectPage, UpdateSubjectDto};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::student_login,
        crate::modules::auth::controller::employee_login,
        crate::modules::auth::controller::student_request_reset,
        crate::modules::auth::controller::employee_request_reset,
        crate::modules::auth::controller::student_reset_password,
        crate::modules::auth::controller::employee_reset_password,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::profile::controller::change_password,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::employees::controller::create_employee,
        crate::modules::employees::controller::get_employees,
        crate::modules::employees::controller::get_employee,
        crate::modules::employees::controller::update_employee,
        crate::modules::employees::controller::delete_employee,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_classes_by_department,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_courses_by_department,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exams_by_session,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subjects_by_class,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::update_role,
        crate::modules::roles::controller::delete_role,
        crate::modules::roles::controller::get_self_permissions,
    ),
    components(
        schemas(
            ErrorBody,
            ErrorDetail,
            FieldError,
            PageMeta,
            PagingQuery,
            SortKey,
            SortDirection,
            NamedRef,
            AccountKind,
            DeliveryStatus,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ResetRequested,
            ResetPasswordRequest,
            Profile,
            UpdateProfileDto,
            ChangePasswordDto,
            Student,
            CreatedStudent,
            StudentPage,
            CreateStudentDto,
            UpdateStudentDto,
            Employee,
            CreatedEmployee,
            EmployeePage,
            CreateEmployeeDto,
            UpdateEmployeeDto,
            Department,
            DepartmentDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            Exam,
            ExamPage,
            CreateExamDto,
            UpdateExamDto,
            Subject,
            SubjectPage,
            CreateSubjectDto,
            UpdateSubjectDto,
            Role,
            CreateRoleDto,
            UpdateRoleDto,
            SelfPermissions,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Student and employee login and password reset"),
        (name = "Profile", description = "The caller's own account"),
        (name = "Students", description = "Student records"),
        (name = "Employees", description = "Employee records"),
        (name = "Departments", description = "Academic departments"),
        (name = "Classes", description = "Classes within departments"),
        (name = "Courses", description = "Courses offered by departments"),
        (name = "Exams", description = "Exams per academic session"),
        (name = "Subjects", description = "Subjects taught in classes"),
        (name = "Roles", description = "Roles and their permission sets")
    ),
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "College administration backend with role-based permissions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
