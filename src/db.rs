use std::collections::HashMap;

use sqlx::{Pool, Sqlite, Transaction};
use tracing::{info, instrument};
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    Course, DbCourse, DbTeacher, DbTeacherSubject, NewCourse, NewTeacher, SubjectSpec, Teacher,
    TeacherChanges,
};

#[cfg(not(test))]
const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const PASSWORD_HASH_COST: u32 = 4;

#[instrument(skip(pool))]
pub async fn get_all_courses(pool: &Pool<Sqlite>) -> Result<Vec<Course>, AppError> {
    info!("Getting all courses");
    let rows = sqlx::query_as::<_, DbCourse>(
        "SELECT id, course_code, course_name, description, subject, grade_level
         FROM courses
         ORDER BY course_code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Course::from).collect())
}

#[instrument(skip(pool))]
pub async fn create_course(pool: &Pool<Sqlite>, course: &NewCourse) -> Result<Course, AppError> {
    info!("Creating course");
    let row = sqlx::query_as::<_, DbCourse>(
        "INSERT INTO courses (course_code, course_name, description, subject, grade_level)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, course_code, course_name, description, subject, grade_level",
    )
    .bind(&course.course_code)
    .bind(&course.course_name)
    .bind(course.description.as_deref())
    .bind(&course.subject)
    .bind(&course.grade_level)
    .fetch_one(pool)
    .await?;

    Ok(Course::from(row))
}

/// Replaces every mutable field. `None` when no course has this id.
#[instrument(skip(pool))]
pub async fn update_course(
    pool: &Pool<Sqlite>,
    id: i64,
    course: &NewCourse,
) -> Result<Option<Course>, AppError> {
    info!("Updating course");
    let row = sqlx::query_as::<_, DbCourse>(
        "UPDATE courses
         SET course_code = ?, course_name = ?, description = ?, subject = ?, grade_level = ?
         WHERE id = ?
         RETURNING id, course_code, course_name, description, subject, grade_level",
    )
    .bind(&course.course_code)
    .bind(&course.course_name)
    .bind(course.description.as_deref())
    .bind(&course.subject)
    .bind(&course.grade_level)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Course::from))
}

#[instrument(skip(pool))]
pub async fn delete_course(pool: &Pool<Sqlite>, id: i64) -> Result<u64, AppError> {
    info!("Deleting course");
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[instrument(skip(pool))]
pub async fn get_available_subjects(pool: &Pool<Sqlite>) -> Result<Vec<String>, AppError> {
    info!("Getting available subjects");
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM subjects ORDER BY position, name")
        .fetch_all(pool)
        .await?;

    Ok(names)
}

#[instrument(skip(pool))]
pub async fn get_all_teachers(pool: &Pool<Sqlite>) -> Result<Vec<Teacher>, AppError> {
    info!("Getting all teachers");
    let rows = sqlx::query_as::<_, DbTeacher>(
        "SELECT id, name, email, username, phone, employee_id, subject
         FROM teachers
         ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    let subject_rows = sqlx::query_as::<_, DbTeacherSubject>(
        "SELECT teacher_id, subject
         FROM teacher_subjects
         ORDER BY teacher_id, position",
    )
    .fetch_all(pool)
    .await?;

    let mut subjects_by_teacher: HashMap<i64, Vec<String>> = HashMap::new();
    for row in subject_rows {
        subjects_by_teacher
            .entry(row.teacher_id)
            .or_default()
            .push(row.subject);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let subjects = row
                .id
                .and_then(|id| subjects_by_teacher.remove(&id))
                .unwrap_or_default();
            row.into_teacher(subjects)
        })
        .collect())
}

#[instrument(skip(pool))]
pub async fn get_teacher(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Teacher>, AppError> {
    info!("Getting teacher by ID");
    let row = sqlx::query_as::<_, DbTeacher>(
        "SELECT id, name, email, username, phone, employee_id, subject
         FROM teachers
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let subjects: Vec<String> = sqlx::query_scalar(
        "SELECT subject FROM teacher_subjects WHERE teacher_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(row.into_teacher(subjects)))
}

#[instrument(skip_all, fields(username = %teacher.username))]
pub async fn create_teacher(pool: &Pool<Sqlite>, teacher: &NewTeacher) -> Result<Teacher, AppError> {
    info!("Creating teacher");
    teacher.validate()?;
    let subjects = require_subjects(&teacher.subjects)?;
    let hashed_password = bcrypt::hash(&teacher.password, PASSWORD_HASH_COST)?;

    let mut tx = pool.begin().await?;

    let res = sqlx::query(
        "INSERT INTO teachers (name, email, username, password, phone, employee_id, subject)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&teacher.name)
    .bind(&teacher.email)
    .bind(&teacher.username)
    .bind(&hashed_password)
    .bind(teacher.phone.as_deref())
    .bind(teacher.employee_id.as_deref())
    .bind(&subjects[0])
    .execute(&mut *tx)
    .await?;

    let teacher_id = res.last_insert_rowid();
    replace_teacher_subjects(&mut tx, teacher_id, &subjects).await?;
    tx.commit().await?;

    get_teacher(pool, teacher_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Teacher with id {} missing right after insert",
            teacher_id
        ))
    })
}

/// Rewrites the teacher and its subject list. `None` when no teacher has
/// this id; nothing is written in that case.
#[instrument(skip(pool, changes))]
pub async fn update_teacher(
    pool: &Pool<Sqlite>,
    id: i64,
    changes: &TeacherChanges,
) -> Result<Option<Teacher>, AppError> {
    info!("Updating teacher");
    changes.validate()?;
    let subjects = require_subjects(&changes.subjects)?;

    let mut tx = pool.begin().await?;

    let res = sqlx::query(
        "UPDATE teachers
         SET name = ?, email = ?, phone = ?, employee_id = ?, subject = ?
         WHERE id = ?",
    )
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(changes.phone.as_deref())
    .bind(changes.employee_id.as_deref())
    .bind(&subjects[0])
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if res.rows_affected() == 0 {
        tx.rollback().await?;
        info!("No teacher to update");
        return Ok(None);
    }

    replace_teacher_subjects(&mut tx, id, &subjects).await?;
    tx.commit().await?;

    get_teacher(pool, id).await
}

#[instrument(skip(pool))]
pub async fn delete_teacher(pool: &Pool<Sqlite>, id: i64) -> Result<u64, AppError> {
    info!("Deleting teacher");
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected())
}

fn require_subjects(subjects: &[String]) -> Result<Vec<String>, AppError> {
    let subjects = SubjectSpec::Multi(subjects.to_vec()).normalize();
    if subjects.is_empty() {
        return Err(AppError::Validation(
            "A teacher needs at least one subject".to_string(),
        ));
    }
    Ok(subjects)
}

async fn replace_teacher_subjects(
    tx: &mut Transaction<'_, Sqlite>,
    teacher_id: i64,
    subjects: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = ?")
        .bind(teacher_id)
        .execute(&mut **tx)
        .await?;

    for (position, subject) in subjects.iter().enumerate() {
        sqlx::query(
            "INSERT INTO teacher_subjects (teacher_id, position, subject)
             VALUES (?, ?, ?)",
        )
        .bind(teacher_id)
        .bind(position as i64)
        .bind(subject)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
