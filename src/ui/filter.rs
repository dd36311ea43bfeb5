use crate::models::Teacher;

/// Criteria behind the displayed teacher list. Empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherFilter {
    pub search_query: String,
    pub selected_subject: String,
}

impl TeacherFilter {
    pub fn matches(&self, teacher: &Teacher) -> bool {
        if !self.search_query.is_empty()
            && !teacher
                .name
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
        {
            return false;
        }

        if !self.selected_subject.is_empty() {
            let wanted = self.selected_subject.to_lowercase();
            return teacher
                .subjects
                .iter()
                .any(|subject| subject.to_lowercase() == wanted);
        }

        true
    }
}

/// Teachers passing `filter`, in source order.
pub fn filter_teachers<'a>(teachers: &'a [Teacher], filter: &TeacherFilter) -> Vec<&'a Teacher> {
    teachers.iter().filter(|t| filter.matches(t)).collect()
}

/// Options for the subject dropdown: every subject taught by anyone, in
/// first-seen order.
pub fn subject_options(teachers: &[Teacher]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for subject in teachers.iter().flat_map(|t| t.subjects.iter()) {
        if !subject.is_empty() && !options.contains(subject) {
            options.push(subject.clone());
        }
    }
    options
}
