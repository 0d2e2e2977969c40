//! Shared handler state for the HTTP adapter.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    PostgresRespondentRepository, PostgresResponseReader, PostgresResponseRepository,
    PostgresSectionRepository, PostgresSurveyRepository,
};
use crate::application::{
    AddQuestionHandler, AssignSectionsHandler, CreateSectionHandler, CreateSurveyHandler,
    DeleteSectionHandler, DeleteSurveyHandler, GetDashboardHandler, GetParticipationHandler,
    GetResponseHandler, GetSurveyAnalyticsHandler, GetSurveyHandler, ListEligibleSurveysHandler,
    ListHistoryHandler, ListSectionsHandler, ListSurveyResponsesHandler,
    RegisterRespondentHandler, RemoveQuestionHandler,
    ReorderQuestionsHandler, SubmitResponseHandler, UpdateQuestionHandler,
    UpdateSurveySettingsHandler,
};
use crate::ports::{
    Clock, RespondentRepository, ResponseReader, ResponseRepository, SectionRepository,
    SurveyRepository,
};

/// The set of port implementations the handlers are built from.
#[derive(Clone)]
pub struct Repositories {
    pub sections: Arc<dyn SectionRepository>,
    pub respondents: Arc<dyn RespondentRepository>,
    pub surveys: Arc<dyn SurveyRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub reader: Arc<dyn ResponseReader>,
}

impl Repositories {
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            sections: store.clone(),
            respondents: store.clone(),
            surveys: store.clone(),
            responses: store.clone(),
            reader: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sections: Arc::new(PostgresSectionRepository::new(pool.clone())),
            respondents: Arc::new(PostgresRespondentRepository::new(pool.clone())),
            surveys: Arc::new(PostgresSurveyRepository::new(pool.clone())),
            responses: Arc::new(PostgresResponseRepository::new(pool.clone())),
            reader: Arc::new(PostgresResponseReader::new(pool)),
        }
    }
}

/// Every command and query handler, plus the clock that stamps commands.
#[derive(Clone)]
pub struct SurveyAppState {
    pub clock: Arc<dyn Clock>,

    pub create_section: Arc<CreateSectionHandler>,
    pub delete_section: Arc<DeleteSectionHandler>,
    pub list_sections: Arc<ListSectionsHandler>,
    pub register_respondent: Arc<RegisterRespondentHandler>,

    pub list_eligible: Arc<ListEligibleSurveysHandler>,
    pub get_survey: Arc<GetSurveyHandler>,
    pub submit_response: Arc<SubmitResponseHandler>,
    pub list_history: Arc<ListHistoryHandler>,
    pub get_response: Arc<GetResponseHandler>,

    pub create_survey: Arc<CreateSurveyHandler>,
    pub update_settings: Arc<UpdateSurveySettingsHandler>,
    pub assign_sections: Arc<AssignSectionsHandler>,
    pub delete_survey: Arc<DeleteSurveyHandler>,
    pub add_question: Arc<AddQuestionHandler>,
    pub update_question: Arc<UpdateQuestionHandler>,
    pub remove_question: Arc<RemoveQuestionHandler>,
    pub reorder_questions: Arc<ReorderQuestionsHandler>,

    pub analytics: Arc<GetSurveyAnalyticsHandler>,
    pub participation: Arc<GetParticipationHandler>,
    pub survey_responses: Arc<ListSurveyResponsesHandler>,
    pub dashboard: Arc<GetDashboardHandler>,
}

impl SurveyAppState {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        let Repositories {
            sections,
            respondents,
            surveys,
            responses,
            reader,
        } = repos;

        Self {
            clock,

            create_section: Arc::new(CreateSectionHandler::new(sections.clone())),
            delete_section: Arc::new(DeleteSectionHandler::new(sections.clone())),
            list_sections: Arc::new(ListSectionsHandler::new(sections.clone())),
            register_respondent: Arc::new(RegisterRespondentHandler::new(respondents.clone())),

            list_eligible: Arc::new(ListEligibleSurveysHandler::new(
                respondents.clone(),
                surveys.clone(),
                reader.clone(),
            )),
            get_survey: Arc::new(GetSurveyHandler::new(respondents.clone(), surveys.clone())),
            submit_response: Arc::new(SubmitResponseHandler::new(
                respondents.clone(),
                surveys.clone(),
                responses.clone(),
            )),
            list_history: Arc::new(ListHistoryHandler::new(respondents.clone(), reader.clone())),
            get_response: Arc::new(GetResponseHandler::new(surveys.clone(), reader.clone())),

            create_survey: Arc::new(CreateSurveyHandler::new(
                respondents.clone(),
                sections.clone(),
                surveys.clone(),
            )),
            update_settings: Arc::new(UpdateSurveySettingsHandler::new(surveys.clone())),
            assign_sections: Arc::new(AssignSectionsHandler::new(
                sections.clone(),
                surveys.clone(),
            )),
            delete_survey: Arc::new(DeleteSurveyHandler::new(surveys.clone())),
            add_question: Arc::new(AddQuestionHandler::new(surveys.clone(), responses.clone())),
            update_question: Arc::new(UpdateQuestionHandler::new(
                surveys.clone(),
                responses.clone(),
            )),
            remove_question: Arc::new(RemoveQuestionHandler::new(
                surveys.clone(),
                responses.clone(),
            )),
            reorder_questions: Arc::new(ReorderQuestionsHandler::new(
                surveys.clone(),
                responses.clone(),
            )),

            analytics: Arc::new(GetSurveyAnalyticsHandler::new(
                surveys.clone(),
                responses.clone(),
                reader.clone(),
            )),
            participation: Arc::new(GetParticipationHandler::new(
                surveys.clone(),
                sections.clone(),
                respondents.clone(),
                responses,
                reader.clone(),
            )),
            survey_responses: Arc::new(ListSurveyResponsesHandler::new(
                surveys.clone(),
                reader.clone(),
            )),
            dashboard: Arc::new(GetDashboardHandler::new(respondents, surveys, sections, reader)),
        }
    }
}
