use crate::models::{NewTeacher, Teacher, TeacherChanges};

use super::state::FormMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Username,
    Password,
    Phone,
    EmployeeId,
}

impl DraftField {
    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Email => "Email",
            DraftField::Username => "Username",
            DraftField::Password => "Password",
            DraftField::Phone => "Phone",
            DraftField::EmployeeId => "Employee ID",
        }
    }
}

/// Unsaved teacher form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeacherDraft {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub phone: String,
    pub employee_id: String,
    /// Always the first entry of `subjects`, or empty.
    pub subject: String,
    pub subjects: Vec<String>,
}

impl TeacherDraft {
    /// Password stays blank: an edit never carries one.
    pub fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            name: teacher.name.clone(),
            email: teacher.email.clone(),
            username: teacher.username.clone(),
            password: String::new(),
            phone: teacher.phone.clone().unwrap_or_default(),
            employee_id: teacher.employee_id.clone().unwrap_or_default(),
            subject: teacher.subject().to_string(),
            subjects: teacher.subjects.clone(),
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Name => self.name = value,
            DraftField::Email => self.email = value,
            DraftField::Username => self.username = value,
            DraftField::Password => self.password = value,
            DraftField::Phone => self.phone = value,
            DraftField::EmployeeId => self.employee_id = value,
        }
    }

    pub fn is_checked(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Checking appends, unchecking removes; the other subjects keep their
    /// relative order.
    pub fn toggle_subject(&mut self, subject: &str, checked: bool) {
        if checked {
            if !self.is_checked(subject) {
                self.subjects.push(subject.to_string());
            }
        } else {
            self.subjects.retain(|s| s != subject);
        }

        self.subject = self.subjects.first().cloned().unwrap_or_default();
    }

    /// Required inputs left blank. Credentials are only asked for on add.
    pub fn missing_fields(&self, mode: FormMode) -> Vec<DraftField> {
        let mut required = vec![
            (DraftField::Name, &self.name),
            (DraftField::Email, &self.email),
        ];
        if mode == FormMode::Add {
            required.push((DraftField::Username, &self.username));
            required.push((DraftField::Password, &self.password));
        }

        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        !self.subjects.is_empty()
    }

    pub fn selection_summary(&self) -> String {
        if self.subjects.is_empty() {
            "Please select at least one subject".to_string()
        } else {
            format!(
                "Selected ({}): {}",
                self.subjects.len(),
                self.subjects.join(", ")
            )
        }
    }

    pub fn to_new_teacher(&self) -> NewTeacher {
        NewTeacher {
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            phone: non_blank(&self.phone),
            employee_id: non_blank(&self.employee_id),
            subject: self.subject.clone(),
            subjects: self.subjects.clone(),
        }
    }

    pub fn to_changes(&self) -> TeacherChanges {
        TeacherChanges {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: non_blank(&self.phone),
            employee_id: non_blank(&self.employee_id),
            subject: self.subject.clone(),
            subjects: self.subjects.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
