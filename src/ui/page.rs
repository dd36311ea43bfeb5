use tracing::{instrument, warn};

use super::client::{ClientError, TeacherApi};
use super::state::{Event, Notice, Submission, TeacherPageState, reduce};

/// Runs the teacher page: feeds user events through [`reduce`] and performs
/// the requests the state asks for.
pub struct TeacherPage<A> {
    api: A,
    state: TeacherPageState,
}

impl<A: TeacherApi> TeacherPage<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: TeacherPageState::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &TeacherPageState {
        &self.state
    }

    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    /// Initial load: teachers and the subject catalog, concurrently.
    #[instrument(skip(self))]
    pub async fn mount(&mut self) {
        self.dispatch(Event::TeachersRequested);
        self.dispatch(Event::SubjectsRequested);
        let generations = self.state.generations();

        let (teachers, subjects) =
            tokio::join!(self.api.list_teachers(), self.api.available_subjects());

        self.dispatch(match teachers {
            Ok(teachers) => Event::TeachersLoaded {
                generation: generations.teachers,
                teachers,
            },
            Err(e) => teachers_failed(generations.teachers, e),
        });
        self.dispatch(match subjects {
            Ok(subjects) => Event::SubjectsLoaded {
                generation: generations.subjects,
                subjects,
            },
            Err(e) => {
                warn!(error = %e, "Failed to fetch subjects");
                Event::SubjectsFailed {
                    generation: generations.subjects,
                    reason: e.to_string(),
                }
            }
        });
    }

    pub async fn refresh_teachers(&mut self) {
        self.dispatch(Event::TeachersRequested);
        let generation = self.state.generations().teachers;

        let event = match self.api.list_teachers().await {
            Ok(teachers) => Event::TeachersLoaded {
                generation,
                teachers,
            },
            Err(e) => teachers_failed(generation, e),
        };
        self.dispatch(event);
    }

    pub async fn refresh_subjects(&mut self) {
        self.dispatch(Event::SubjectsRequested);
        let generation = self.state.generations().subjects;

        let event = match self.api.available_subjects().await {
            Ok(subjects) => Event::SubjectsLoaded {
                generation,
                subjects,
            },
            Err(e) => Event::SubjectsFailed {
                generation,
                reason: e.to_string(),
            },
        };
        self.dispatch(event);
    }

    /// Submits the open form. A draft without subjects is rejected by the
    /// reducer and never reaches the API.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) {
        self.dispatch(Event::SubmitClicked);
        let Some(submission) = self.state.pending_submission() else {
            return;
        };

        let saved = match &submission {
            Submission::Create(teacher) => self.api.create_teacher(teacher).await.map(|_| ()),
            Submission::Update { id, changes } => {
                self.api.update_teacher(*id, changes).await.map(|_| ())
            }
        };

        match saved {
            Ok(()) => {
                self.refresh_teachers().await;
                self.dispatch(Event::SaveSucceeded);
            }
            Err(e) => {
                warn!(error = %e, "Failed to save teacher");
                self.dispatch(Event::SaveFailed(e.to_string()));
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: i64) {
        match self.api.delete_teacher(id).await {
            Ok(()) => self.refresh_teachers().await,
            Err(e) => {
                warn!(error = %e, "Failed to delete teacher");
                self.dispatch(Event::DeleteFailed(e.to_string()));
            }
        }
    }

    /// Hands the queued notices to the presenter and clears them.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let notices = self.state.notices().to_vec();
        self.dispatch(Event::NoticesDismissed);
        notices
    }
}

fn teachers_failed(generation: u64, error: ClientError) -> Event {
    warn!(error = %error, "Failed to fetch teachers");
    Event::TeachersFailed {
        generation,
        reason: error.to_string(),
    }
}
