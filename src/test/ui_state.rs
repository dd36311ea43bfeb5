#[cfg(test)]
mod tests {
    use crate::models::Teacher;
    use crate::ui::{
        DraftField, EMPTY_TABLE_MESSAGE, Event, FormMode, FormState, MISSING_SUBJECT_ALERT,
        NoticeLevel, SAVE_FAILED_ALERT, Submission, TeacherDraft, TeacherPageState,
        missing_fields_alert, reduce, teacher_rows,
    };

    fn teacher(id: i64, name: &str, subjects: &[&str]) -> Teacher {
        Teacher {
            id,
            name: name.to_string(),
            email: format!("{}@school.test", name.to_lowercase()),
            username: name.to_lowercase(),
            phone: Some("555".to_string()),
            employee_id: Some(format!("E{}", id)),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn run(state: TeacherPageState, events: Vec<Event>) -> TeacherPageState {
        events.into_iter().fold(state, reduce)
    }

    fn loaded() -> TeacherPageState {
        run(
            TeacherPageState::default(),
            vec![
                Event::TeachersRequested,
                Event::TeachersLoaded {
                    generation: 1,
                    teachers: vec![
                        teacher(1, "Alice", &["Math", "Science"]),
                        teacher(2, "Bob", &["Math", "Art"]),
                        teacher(3, "Carla", &["history"]),
                    ],
                },
            ],
        )
    }

    fn names(state: &TeacherPageState) -> Vec<String> {
        state
            .filtered_teachers()
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let state = reduce(loaded(), Event::SearchChanged("ali".to_string()));
        assert_eq!(names(&state), vec!["Alice"]);

        let state = reduce(state, Event::SearchChanged("BO".to_string()));
        assert_eq!(names(&state), vec!["Bob"]);
    }

    #[test]
    fn test_subject_filter_matches_any_subject() {
        let state = reduce(loaded(), Event::SubjectFilterChanged("math".to_string()));
        assert_eq!(names(&state), vec!["Alice", "Bob"]);

        let state = reduce(state, Event::SearchChanged("b".to_string()));
        assert_eq!(names(&state), vec!["Bob"]);

        let state = reduce(state, Event::SubjectFilterChanged("History".to_string()));
        assert!(names(&state).is_empty());

        let state = reduce(state, Event::SearchChanged(String::new()));
        assert_eq!(names(&state), vec!["Carla"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = run(
            loaded(),
            vec![
                Event::SearchChanged("a".to_string()),
                Event::SubjectFilterChanged("Math".to_string()),
            ],
        );
        let twice = run(
            once.clone(),
            vec![
                Event::SearchChanged("a".to_string()),
                Event::SubjectFilterChanged("Math".to_string()),
            ],
        );

        assert_eq!(names(&once), names(&twice));
        assert_eq!(once.teachers(), twice.teachers());
    }

    #[test]
    fn test_subject_options_first_seen_order() {
        let state = loaded();
        assert_eq!(
            state.subject_options(),
            vec!["Math", "Science", "Art", "history"]
        );
    }

    #[test]
    fn test_add_form_starts_empty() {
        let state = reduce(loaded(), Event::AddClicked);

        assert_eq!(state.form_title(), Some("Add Teacher"));
        assert!(state.shows_credentials());
        assert_eq!(state.draft(), Some(&TeacherDraft::default()));
        assert!(!state.can_submit());
        assert_eq!(
            state.draft().unwrap().selection_summary(),
            "Please select at least one subject"
        );
    }

    #[test]
    fn test_edit_copies_teacher_without_password() {
        let state = reduce(loaded(), Event::EditClicked(2));

        assert_eq!(state.form_title(), Some("Edit Teacher"));
        assert!(!state.shows_credentials());

        let draft = state.draft().unwrap();
        assert_eq!(draft.name, "Bob");
        assert_eq!(draft.username, "bob");
        assert_eq!(draft.password, "");
        assert_eq!(draft.subject, "Math");
        assert_eq!(draft.subjects, vec!["Math", "Art"]);
        assert_eq!(draft.selection_summary(), "Selected (2): Math, Art");
    }

    #[test]
    fn test_edit_unknown_id_stays_browsing() {
        let state = reduce(loaded(), Event::EditClicked(99));
        assert_eq!(state.form(), &FormState::Browsing);
    }

    #[test]
    fn test_toggle_twice_restores_subjects() {
        let before = reduce(loaded(), Event::EditClicked(1));
        let after = run(
            before.clone(),
            vec![
                Event::SubjectToggled {
                    subject: "Art".to_string(),
                    checked: true,
                },
                Event::SubjectToggled {
                    subject: "Art".to_string(),
                    checked: false,
                },
            ],
        );

        assert_eq!(before.draft(), after.draft());
    }

    #[test]
    fn test_unchecking_first_subject_moves_primary() {
        let state = run(
            loaded(),
            vec![
                Event::EditClicked(2),
                Event::SubjectToggled {
                    subject: "Math".to_string(),
                    checked: false,
                },
            ],
        );

        let draft = state.draft().unwrap();
        assert_eq!(draft.subjects, vec!["Art"]);
        assert_eq!(draft.subject, "Art");
        assert!(state.can_submit());
    }

    #[test]
    fn test_submit_without_subjects_alerts() {
        let state = run(
            loaded(),
            vec![
                Event::AddClicked,
                Event::FieldChanged(DraftField::Name, "Dana".to_string()),
                Event::FieldChanged(DraftField::Email, "dana@x.com".to_string()),
                Event::FieldChanged(DraftField::Username, "dana".to_string()),
                Event::FieldChanged(DraftField::Password, "pw".to_string()),
                Event::SubmitClicked,
            ],
        );

        assert!(state.is_form_open());
        assert_eq!(state.pending_submission(), None);
        assert_eq!(state.notices().len(), 1);
        assert_eq!(state.notices()[0].level, NoticeLevel::Alert);
        assert_eq!(state.notices()[0].message, MISSING_SUBJECT_ALERT);
    }

    #[test]
    fn test_submit_with_blank_required_fields_alerts() {
        let state = run(
            loaded(),
            vec![
                Event::AddClicked,
                Event::FieldChanged(DraftField::Email, "dana@x.com".to_string()),
                Event::FieldChanged(DraftField::Password, "   ".to_string()),
                Event::SubjectToggled {
                    subject: "Math".to_string(),
                    checked: true,
                },
                Event::SubmitClicked,
            ],
        );

        assert!(state.can_submit());
        assert_eq!(state.pending_submission(), None);
        assert_eq!(state.notices().len(), 1);
        assert_eq!(state.notices()[0].level, NoticeLevel::Alert);
        assert_eq!(
            state.notices()[0].message,
            "Please fill out the required fields: Name, Username, Password"
        );

        let draft = state.draft().unwrap();
        assert_eq!(
            draft.missing_fields(FormMode::Add),
            vec![DraftField::Name, DraftField::Username, DraftField::Password]
        );
    }

    #[test]
    fn test_edit_does_not_require_credentials() {
        let state = run(
            loaded(),
            vec![
                Event::EditClicked(3),
                Event::FieldChanged(DraftField::Email, String::new()),
                Event::SubmitClicked,
            ],
        );

        assert_eq!(state.pending_submission(), None);
        assert_eq!(
            state.notices()[0].message,
            missing_fields_alert(&[DraftField::Email])
        );

        let state = run(
            state,
            vec![
                Event::FieldChanged(DraftField::Email, "carla@x.com".to_string()),
                Event::SubmitClicked,
            ],
        );

        assert!(matches!(
            state.pending_submission(),
            Some(Submission::Update { id: 3, .. })
        ));
    }

    #[test]
    fn test_submit_add_builds_create_request() {
        let state = run(
            loaded(),
            vec![
                Event::AddClicked,
                Event::FieldChanged(DraftField::Name, "Dana".to_string()),
                Event::FieldChanged(DraftField::Email, "dana@x.com".to_string()),
                Event::FieldChanged(DraftField::Username, "dana".to_string()),
                Event::FieldChanged(DraftField::Password, "pw".to_string()),
                Event::FieldChanged(DraftField::Phone, "  ".to_string()),
                Event::SubjectToggled {
                    subject: "Music".to_string(),
                    checked: true,
                },
                Event::SubmitClicked,
            ],
        );

        assert!(!state.can_submit());
        match state.pending_submission() {
            Some(Submission::Create(teacher)) => {
                assert_eq!(teacher.username, "dana");
                assert_eq!(teacher.password, "pw");
                assert_eq!(teacher.phone, None);
                assert_eq!(teacher.subject, "Music");
                assert_eq!(teacher.subjects, vec!["Music"]);
            }
            other => panic!("unexpected submission: {:?}", other),
        }

        let state = reduce(state, Event::SaveSucceeded);
        assert_eq!(state.form(), &FormState::Browsing);
        assert_eq!(state.notices()[0].message, "Teacher created successfully!");
    }

    #[test]
    fn test_submit_edit_and_failure() {
        let state = run(loaded(), vec![Event::EditClicked(1), Event::SubmitClicked]);

        assert_eq!(
            state.pending_submission(),
            Some(Submission::Update {
                id: 1,
                changes: TeacherDraft::from_teacher(&teacher(1, "Alice", &["Math", "Science"]))
                    .to_changes(),
            })
        );

        let state = reduce(state, Event::SaveFailed("boom".to_string()));
        assert_eq!(state.mode(), Some(FormMode::Edit(1)));
        assert!(state.can_submit());
        assert_eq!(state.notices()[0].message, SAVE_FAILED_ALERT);

        let state = run(state, vec![Event::SubmitClicked, Event::SaveSucceeded]);
        assert_eq!(
            state.notices().last().unwrap().message,
            "Teacher updated successfully!"
        );
    }

    #[test]
    fn test_field_edits_ignored_while_browsing() {
        let before = loaded();
        let after = reduce(
            before.clone(),
            Event::FieldChanged(DraftField::Name, "Nobody".to_string()),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let state = run(
            loaded(),
            vec![
                Event::AddClicked,
                Event::FieldChanged(DraftField::Name, "Temp".to_string()),
                Event::CancelClicked,
                Event::AddClicked,
            ],
        );

        assert_eq!(state.draft(), Some(&TeacherDraft::default()));
    }

    #[test]
    fn test_stale_responses_ignored() {
        let state = run(
            TeacherPageState::default(),
            vec![
                Event::TeachersRequested,
                Event::TeachersRequested,
                Event::TeachersLoaded {
                    generation: 2,
                    teachers: vec![teacher(1, "Fresh", &["Math"])],
                },
                Event::TeachersLoaded {
                    generation: 1,
                    teachers: vec![teacher(1, "Stale", &["Math"])],
                },
                Event::TeachersFailed {
                    generation: 1,
                    reason: "late failure".to_string(),
                },
                Event::SubjectsRequested,
                Event::SubjectsLoaded {
                    generation: 0,
                    subjects: vec!["Old".to_string()],
                },
            ],
        );

        assert_eq!(state.teachers()[0].name, "Fresh");
        assert!(state.notices().is_empty());
        assert!(state.available_subjects().is_empty());
    }

    #[test]
    fn test_rows_and_empty_table() {
        let state = loaded();
        let rows = teacher_rows(&state);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].employee_id, "E2");
        assert_eq!(rows[1].subjects, "Math, Art");

        let state = reduce(state, Event::SearchChanged("zzz".to_string()));
        assert!(teacher_rows(&state).is_empty());
        assert_eq!(EMPTY_TABLE_MESSAGE, "No teachers found");
    }
}
