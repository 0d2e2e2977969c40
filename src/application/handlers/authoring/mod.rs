//! Survey authoring handlers (teacher operations).
//!
//! Settings and section assignments can change at any time. The question
//! set is frozen once the first response exists.

mod create_survey;
mod delete_survey;
mod edit_questions;
mod update_survey_settings;

pub use create_survey::{CreateSurveyCommand, CreateSurveyHandler};
pub use delete_survey::{DeleteSurveyCommand, DeleteSurveyHandler};
pub use edit_questions::{
    AddQuestionCommand, AddQuestionHandler, RemoveQuestionCommand, RemoveQuestionHandler,
    ReorderQuestionsCommand, ReorderQuestionsHandler, UpdateQuestionCommand,
    UpdateQuestionHandler,
};
pub use update_survey_settings::{
    AssignSectionsCommand, AssignSectionsHandler, UpdateSurveySettingsCommand,
    UpdateSurveySettingsHandler,
};
