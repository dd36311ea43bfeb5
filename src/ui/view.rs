use crate::models::Teacher;

use super::state::TeacherPageState;

pub const EMPTY_TABLE_MESSAGE: &str = "No teachers found";

/// One line of the teacher table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherRow {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub subjects: String,
    pub email: String,
    pub phone: String,
}

impl From<&Teacher> for TeacherRow {
    fn from(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id,
            employee_id: teacher.employee_id.clone().unwrap_or_default(),
            name: teacher.name.clone(),
            subjects: teacher.subjects_display(),
            email: teacher.email.clone(),
            phone: teacher.phone.clone().unwrap_or_default(),
        }
    }
}

/// Rows for the teachers passing the current filter.
pub fn teacher_rows(state: &TeacherPageState) -> Vec<TeacherRow> {
    state
        .filtered_teachers()
        .into_iter()
        .map(TeacherRow::from)
        .collect()
}
