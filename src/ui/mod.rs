//! Teacher management screen, independent of any rendering toolkit.
//!
//! [`state`] holds the page state and its reducer, [`page`] runs the
//! network effects through a [`client::TeacherApi`], and [`view`] projects
//! the state into what the table shows.

pub mod client;
pub mod draft;
pub mod filter;
pub mod page;
pub mod state;
pub mod view;

pub use client::{ClientError, HttpApi, StoreApi, TeacherApi};
pub use draft::{DraftField, TeacherDraft};
pub use filter::{TeacherFilter, filter_teachers, subject_options};
pub use page::TeacherPage;
pub use state::{
    Event, FormMode, FormState, MISSING_SUBJECT_ALERT, Notice, NoticeLevel, SAVE_FAILED_ALERT,
    Submission, TeacherPageState, missing_fields_alert, reduce,
};
pub use view::{EMPTY_TABLE_MESSAGE, TeacherRow, teacher_rows};
