use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::db::{
    create_course, create_teacher, delete_course, delete_teacher, get_all_courses,
    get_all_teachers, get_available_subjects, update_course, update_teacher,
};
use crate::error::{ApiError, AppError, AppErrorExt, ErrorResponse};
use crate::models::{
    Course, MessageResponse, NewCourse, NewTeacher, SubjectSpec, Teacher, TeacherChanges,
};

/// JSON body as received. Every field is optional on the wire so that a
/// missing field fails validation and surfaces as the operation's generic
/// failure, the same as any other error.
#[derive(Deserialize, Serialize, Validate, Default, Debug)]
#[serde(default)]
pub struct CourseRequest {
    #[validate(required, length(min = 1))]
    pub course_code: Option<String>,
    #[validate(required, length(min = 1))]
    pub course_name: Option<String>,
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub subject: Option<String>,
    #[validate(required, length(min = 1))]
    pub grade_level: Option<String>,
}

impl CourseRequest {
    pub fn into_course(self) -> Result<NewCourse, AppError> {
        self.validate()?;

        Ok(NewCourse {
            course_code: self.course_code.unwrap_or_default(),
            course_name: self.course_name.unwrap_or_default(),
            description: self.description,
            subject: self.subject.unwrap_or_default(),
            grade_level: self.grade_level.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Serialize, Validate, Default, Debug)]
#[serde(default)]
pub struct TeacherRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub subject: Option<String>,
    pub subjects: Option<Vec<String>>,
}

impl TeacherRequest {
    fn subject_list(&mut self) -> Result<Vec<String>, AppError> {
        let subjects =
            SubjectSpec::from_fields(self.subjects.take(), self.subject.take()).normalize();
        if subjects.is_empty() {
            return Err(AppError::Validation(
                "At least one subject is required".to_string(),
            ));
        }
        Ok(subjects)
    }

    pub fn into_new_teacher(mut self) -> Result<NewTeacher, AppError> {
        self.validate()?;
        let username = required_text(self.username.take(), "username")?;
        let password = required_text(self.password.take(), "password")?;
        let subjects = self.subject_list()?;

        Ok(NewTeacher {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            username,
            password,
            phone: blank_to_none(self.phone),
            employee_id: blank_to_none(self.employee_id),
            subject: subjects[0].clone(),
            subjects,
        })
    }

    /// Username is fixed at creation and password changes are not accepted
    /// here, so both are dropped.
    pub fn into_changes(mut self) -> Result<TeacherChanges, AppError> {
        self.validate()?;
        let subjects = self.subject_list()?;

        Ok(TeacherChanges {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: blank_to_none(self.phone),
            employee_id: blank_to_none(self.employee_id),
            subject: subjects[0].clone(),
            subjects,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn body<T>(payload: Result<Json<T>, json::Error<'_>>) -> Result<T, AppError> {
    payload
        .map(Json::into_inner)
        .map_err(|e| AppError::Validation(format!("Malformed request body: {}", e)))
}

#[get("/courses")]
pub async fn api_get_courses(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = get_all_courses(db)
        .await
        .or_api_error("Failed to get courses")?;

    Ok(Json(courses))
}

#[post("/courses", data = "<payload>")]
pub async fn api_create_course(
    payload: Result<Json<CourseRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Course>, ApiError> {
    let message = "Failed to create course";
    let course = body(payload)
        .and_then(CourseRequest::into_course)
        .or_api_error(message)?;

    let created = create_course(db, &course).await.or_api_error(message)?;

    Ok(Json(created))
}

#[put("/courses/<id>", data = "<payload>")]
pub async fn api_update_course(
    id: i64,
    payload: Result<Json<CourseRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Option<Course>>, ApiError> {
    let message = "Failed to update course";
    let course = body(payload)
        .and_then(CourseRequest::into_course)
        .or_api_error(message)?;

    let updated = update_course(db, id, &course)
        .await
        .or_api_error(message)?;

    Ok(Json(updated))
}

#[delete("/courses/<id>")]
pub async fn api_delete_course(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_course(db, id)
        .await
        .or_api_error("Failed to delete course")?;

    Ok(Json(MessageResponse {
        message: "Course deleted".to_string(),
    }))
}

#[get("/teachers")]
pub async fn api_get_teachers(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Teacher>>, ApiError> {
    let teachers = get_all_teachers(db)
        .await
        .or_api_error("Failed to get teachers")?;

    Ok(Json(teachers))
}

#[post("/teachers", data = "<payload>")]
pub async fn api_create_teacher(
    payload: Result<Json<TeacherRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Teacher>, ApiError> {
    let message = "Failed to create teacher";
    let teacher = body(payload)
        .and_then(TeacherRequest::into_new_teacher)
        .or_api_error(message)?;

    let created = create_teacher(db, &teacher).await.or_api_error(message)?;

    Ok(Json(created))
}

#[put("/teachers/<id>", data = "<payload>")]
pub async fn api_update_teacher(
    id: i64,
    payload: Result<Json<TeacherRequest>, json::Error<'_>>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Option<Teacher>>, ApiError> {
    let message = "Failed to update teacher";
    let changes = body(payload)
        .and_then(TeacherRequest::into_changes)
        .or_api_error(message)?;

    let updated = update_teacher(db, id, &changes)
        .await
        .or_api_error(message)?;

    Ok(Json(updated))
}

#[delete("/teachers/<id>")]
pub async fn api_delete_teacher(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_teacher(db, id)
        .await
        .or_api_error("Failed to delete teacher")?;

    Ok(Json(MessageResponse {
        message: "Teacher deleted".to_string(),
    }))
}

#[get("/scheduling/available-subjects")]
pub async fn api_get_available_subjects(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let subjects = get_available_subjects(db)
        .await
        .or_api_error("Failed to get subjects")?;

    Ok(Json(subjects))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[catch(default)]
pub fn api_default_catcher(
    status: Status,
    _req: &rocket::Request<'_>,
) -> Custom<Json<ErrorResponse>> {
    Custom(
        status,
        Json(ErrorResponse {
            error: status.reason().unwrap_or("Unknown error").to_string(),
        }),
    )
}
