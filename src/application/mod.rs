//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::analytics::{
    GetDashboardHandler, GetDashboardQuery, GetParticipationHandler, GetParticipationQuery,
    GetSurveyAnalyticsHandler, GetSurveyAnalyticsQuery, ListSurveyResponsesHandler,
    ListSurveyResponsesQuery, SurveyResponsePage, RESPONSES_PER_PAGE,
};
pub use handlers::authoring::{
    AddQuestionCommand, AddQuestionHandler, AssignSectionsCommand, AssignSectionsHandler,
    CreateSurveyCommand, CreateSurveyHandler, DeleteSurveyCommand, DeleteSurveyHandler,
    RemoveQuestionCommand, RemoveQuestionHandler, ReorderQuestionsCommand,
    ReorderQuestionsHandler, UpdateQuestionCommand, UpdateQuestionHandler,
    UpdateSurveySettingsCommand, UpdateSurveySettingsHandler,
};
pub use handlers::respondent::{RegisterRespondentCommand, RegisterRespondentHandler};
pub use handlers::section::{
    CreateSectionCommand, CreateSectionHandler, DeleteSectionCommand, DeleteSectionHandler,
    ListSectionsHandler,
};
pub use handlers::submission::{
    AnsweredQuestion, GetResponseHandler, GetResponseQuery, GetSurveyHandler, GetSurveyQuery,
    ListEligibleSurveysHandler, ListEligibleSurveysQuery, ListHistoryHandler, ListHistoryQuery,
    ResponseDetail, SubmitResponseCommand, SubmitResponseHandler, SubmitResponseResult,
    SurveySummary,
};
