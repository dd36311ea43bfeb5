use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub subject: String,
    pub grade_level: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbCourse {
    pub id: Option<i64>,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
}

impl From<DbCourse> for Course {
    fn from(course: DbCourse) -> Self {
        Self {
            id: course.id.unwrap_or_default(),
            course_code: course.course_code.unwrap_or_default(),
            course_name: course.course_name.unwrap_or_default(),
            description: course.description,
            subject: course.subject.unwrap_or_default(),
            grade_level: course.grade_level.unwrap_or_default(),
        }
    }
}

/// Validated course fields, ready to be written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub subject: String,
    pub grade_level: String,
}

/// How a record names its subjects. Records written before multi-subject
/// support only carry the singular `subject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectSpec {
    Multi(Vec<String>),
    Legacy(String),
}

impl SubjectSpec {
    /// A present `subjects` list wins over the legacy field, even when empty.
    pub fn from_fields(subjects: Option<Vec<String>>, subject: Option<String>) -> Self {
        match subjects {
            Some(list) => SubjectSpec::Multi(list),
            None => SubjectSpec::Legacy(subject.unwrap_or_default()),
        }
    }

    /// Ordered, trimmed, duplicate-free subject names.
    pub fn normalize(self) -> Vec<String> {
        let raw = match self {
            SubjectSpec::Multi(list) => list,
            SubjectSpec::Legacy(single) => vec![single],
        };

        let mut subjects: Vec<String> = Vec::with_capacity(raw.len());
        for name in raw {
            let name = name.trim();
            if !name.is_empty() && !subjects.iter().any(|s| s == name) {
                subjects.push(name.to_string());
            }
        }
        subjects
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TeacherRecord", into = "TeacherRecord")]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub subjects: Vec<String>,
}

impl Teacher {
    /// Legacy single-subject view: the first assigned subject.
    pub fn subject(&self) -> &str {
        self.subjects.first().map(String::as_str).unwrap_or_default()
    }

    pub fn subjects_display(&self) -> String {
        self.subjects.join(", ")
    }
}

/// Wire shape of a teacher. Older producers may omit `subjects` and send
/// only `subject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub subjects_display: Option<String>,
}

impl From<TeacherRecord> for Teacher {
    fn from(record: TeacherRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            username: record.username,
            phone: record.phone,
            employee_id: record.employee_id,
            subjects: SubjectSpec::from_fields(record.subjects, record.subject).normalize(),
        }
    }
}

impl From<Teacher> for TeacherRecord {
    fn from(teacher: Teacher) -> Self {
        let subject = teacher.subjects.first().cloned();
        let subjects_display = teacher.subjects_display();
        Self {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            username: teacher.username,
            phone: teacher.phone,
            employee_id: teacher.employee_id,
            subject,
            subjects: Some(teacher.subjects),
            subjects_display: Some(subjects_display),
        }
    }
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTeacher {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub subject: Option<String>,
}

impl DbTeacher {
    /// `subjects` are the rows of `teacher_subjects` in position order; a
    /// teacher without any is a legacy record read from its `subject` column.
    pub fn into_teacher(self, subjects: Vec<String>) -> Teacher {
        let listed = if subjects.is_empty() {
            SubjectSpec::Legacy(self.subject.unwrap_or_default())
        } else {
            SubjectSpec::Multi(subjects)
        };

        Teacher {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            phone: self.phone,
            employee_id: self.employee_id,
            subjects: listed.normalize(),
        }
    }
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTeacherSubject {
    pub teacher_id: i64,
    pub subject: String,
}

/// Fields for a teacher that does not exist yet. `password` is plain text
/// and only ever leaves this struct as a bcrypt hash.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Default)]
pub struct NewTeacher {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub subject: String,
    pub subjects: Vec<String>,
}

/// Mutable teacher fields. Username and password are not part of an update.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Default)]
pub struct TeacherChanges {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub subject: String,
    pub subjects: Vec<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}
