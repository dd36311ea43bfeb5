use crate::models::{NewTeacher, Teacher, TeacherChanges};

use super::draft::{DraftField, TeacherDraft};
use super::filter::{TeacherFilter, filter_teachers, subject_options};

pub const MISSING_SUBJECT_ALERT: &str = "Please select at least one subject for the teacher.";
pub const SAVE_FAILED_ALERT: &str = "Error saving teacher. Please try again.";

/// Alert for a submit with required inputs left blank.
pub fn missing_fields_alert(fields: &[DraftField]) -> String {
    let labels: Vec<&str> = fields.iter().map(|f| f.label()).collect();
    format!("Please fill out the required fields: {}", labels.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Browsing,
    Open {
        mode: FormMode,
        draft: TeacherDraft,
        /// Set once a submit passed the field and subject checks, until the save settles.
        submitting: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Alert,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Latest request token per resource. A response carrying an older token
/// lost the race and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestGenerations {
    pub teachers: u64,
    pub subjects: u64,
}

/// What a submit should send.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(NewTeacher),
    Update { id: i64, changes: TeacherChanges },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TeachersRequested,
    TeachersLoaded { generation: u64, teachers: Vec<Teacher> },
    TeachersFailed { generation: u64, reason: String },
    SubjectsRequested,
    SubjectsLoaded { generation: u64, subjects: Vec<String> },
    SubjectsFailed { generation: u64, reason: String },
    SearchChanged(String),
    SubjectFilterChanged(String),
    AddClicked,
    EditClicked(i64),
    CancelClicked,
    FieldChanged(DraftField, String),
    SubjectToggled { subject: String, checked: bool },
    SubmitClicked,
    SaveSucceeded,
    SaveFailed(String),
    DeleteFailed(String),
    NoticesDismissed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeacherPageState {
    teachers: Vec<Teacher>,
    available_subjects: Vec<String>,
    filter: TeacherFilter,
    form: FormState,
    notices: Vec<Notice>,
    generations: RequestGenerations,
}

impl TeacherPageState {
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn available_subjects(&self) -> &[String] {
        &self.available_subjects
    }

    pub fn filter(&self) -> &TeacherFilter {
        &self.filter
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn generations(&self) -> RequestGenerations {
        self.generations
    }

    /// Recomputed on every call from the source list and the filter.
    pub fn filtered_teachers(&self) -> Vec<&Teacher> {
        filter_teachers(&self.teachers, &self.filter)
    }

    pub fn subject_options(&self) -> Vec<String> {
        subject_options(&self.teachers)
    }

    pub fn draft(&self) -> Option<&TeacherDraft> {
        match &self.form {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Browsing => None,
        }
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.form {
            FormState::Open { mode, .. } => Some(*mode),
            FormState::Browsing => None,
        }
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.form, FormState::Open { .. })
    }

    pub fn form_title(&self) -> Option<&'static str> {
        self.mode().map(|mode| match mode {
            FormMode::Add => "Add Teacher",
            FormMode::Edit(_) => "Edit Teacher",
        })
    }

    /// Username and password are only asked for when adding.
    pub fn shows_credentials(&self) -> bool {
        self.mode() == Some(FormMode::Add)
    }

    /// Whether the save button is enabled.
    pub fn can_submit(&self) -> bool {
        match &self.form {
            FormState::Open {
                draft, submitting, ..
            } => draft.can_submit() && !submitting,
            FormState::Browsing => false,
        }
    }

    /// The request an accepted submit is waiting on.
    pub fn pending_submission(&self) -> Option<Submission> {
        match &self.form {
            FormState::Open {
                mode,
                draft,
                submitting: true,
            } => Some(match mode {
                FormMode::Add => Submission::Create(draft.to_new_teacher()),
                FormMode::Edit(id) => Submission::Update {
                    id: *id,
                    changes: draft.to_changes(),
                },
            }),
            _ => None,
        }
    }
}

pub fn reduce(mut state: TeacherPageState, event: Event) -> TeacherPageState {
    match event {
        Event::TeachersRequested => {
            state.generations.teachers += 1;
        }
        Event::TeachersLoaded {
            generation,
            teachers,
        } => {
            if generation == state.generations.teachers {
                state.teachers = teachers;
            }
        }
        Event::TeachersFailed { generation, reason } => {
            if generation == state.generations.teachers {
                state.notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("Error fetching teachers: {}", reason),
                ));
            }
        }
        Event::SubjectsRequested => {
            state.generations.subjects += 1;
        }
        Event::SubjectsLoaded {
            generation,
            subjects,
        } => {
            if generation == state.generations.subjects {
                state.available_subjects = subjects;
            }
        }
        Event::SubjectsFailed { generation, reason } => {
            if generation == state.generations.subjects {
                state.notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("Error fetching subjects: {}", reason),
                ));
            }
        }
        Event::SearchChanged(query) => {
            state.filter.search_query = query;
        }
        Event::SubjectFilterChanged(subject) => {
            state.filter.selected_subject = subject;
        }
        Event::AddClicked => {
            if !state.is_form_open() {
                state.form = FormState::Open {
                    mode: FormMode::Add,
                    draft: TeacherDraft::default(),
                    submitting: false,
                };
            }
        }
        Event::EditClicked(id) => {
            if !state.is_form_open() {
                if let Some(teacher) = state.teachers.iter().find(|t| t.id == id) {
                    state.form = FormState::Open {
                        mode: FormMode::Edit(id),
                        draft: TeacherDraft::from_teacher(teacher),
                        submitting: false,
                    };
                }
            }
        }
        Event::CancelClicked => {
            state.form = FormState::Browsing;
        }
        Event::FieldChanged(field, value) => {
            if let FormState::Open { draft, .. } = &mut state.form {
                draft.set_field(field, value);
            }
        }
        Event::SubjectToggled { subject, checked } => {
            if let FormState::Open { draft, .. } = &mut state.form {
                draft.toggle_subject(&subject, checked);
            }
        }
        Event::SubmitClicked => {
            let mut rejection = None;
            if let FormState::Open {
                mode,
                draft,
                submitting,
            } = &mut state.form
            {
                let missing = draft.missing_fields(*mode);
                if !missing.is_empty() {
                    rejection = Some(missing_fields_alert(&missing));
                } else if !draft.can_submit() {
                    rejection = Some(MISSING_SUBJECT_ALERT.to_string());
                } else if !*submitting {
                    *submitting = true;
                }
            }
            if let Some(message) = rejection {
                state.notices.push(Notice::new(NoticeLevel::Alert, message));
            }
        }
        Event::SaveSucceeded => {
            if let FormState::Open {
                mode,
                submitting: true,
                ..
            } = state.form
            {
                let message = match mode {
                    FormMode::Add => "Teacher created successfully!",
                    FormMode::Edit(_) => "Teacher updated successfully!",
                };
                state.form = FormState::Browsing;
                state.notices.push(Notice::new(NoticeLevel::Info, message));
            }
        }
        Event::SaveFailed(_) => {
            if let FormState::Open { submitting, .. } = &mut state.form {
                if *submitting {
                    *submitting = false;
                    state
                        .notices
                        .push(Notice::new(NoticeLevel::Alert, SAVE_FAILED_ALERT));
                }
            }
        }
        Event::DeleteFailed(reason) => {
            state.notices.push(Notice::new(
                NoticeLevel::Error,
                format!("Error deleting teacher: {}", reason),
            ));
        }
        Event::NoticesDismissed => {
            state.notices.clear();
        }
    }

    state
}
