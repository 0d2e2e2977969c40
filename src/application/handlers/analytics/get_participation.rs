//! GetParticipationHandler - Query handler for completion rates per
//! assigned section.

use std::sync::Arc;

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::analytics::{SectionParticipation, SurveyParticipation};
use crate::domain::foundation::{RespondentId, SectionId, SurveyId};
use crate::domain::survey::SurveyError;
use crate::ports::{
    RespondentRepository, ResponseReader, ResponseRepository, SectionRepository, SurveyRepository,
};

#[derive(Debug, Clone)]
pub struct GetParticipationQuery {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
}

pub struct GetParticipationHandler {
    surveys: Arc<dyn SurveyRepository>,
    sections: Arc<dyn SectionRepository>,
    respondents: Arc<dyn RespondentRepository>,
    responses: Arc<dyn ResponseRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl GetParticipationHandler {
    pub fn new(
        surveys: Arc<dyn SurveyRepository>,
        sections: Arc<dyn SectionRepository>,
        respondents: Arc<dyn RespondentRepository>,
        responses: Arc<dyn ResponseRepository>,
        reader: Arc<dyn ResponseReader>,
    ) -> Self {
        Self {
            surveys,
            sections,
            respondents,
            responses,
            reader,
        }
    }

    pub async fn handle(
        &self,
        query: GetParticipationQuery,
    ) -> Result<SurveyParticipation, SurveyError> {
        let survey =
            load_owned_survey(self.surveys.as_ref(), &query.survey_id, &query.teacher_id).await?;

        let assigned: Vec<SectionId> = survey.section_ids().iter().copied().collect();
        let sections = self.sections.find_by_ids(&assigned).await?;
        let received = self.reader.counts_by_section(survey.id()).await?;

        let mut rows = Vec::with_capacity(sections.len());
        for section in &sections {
            let students = self.respondents.count_students_in_section(section.id()).await?;
            let responses = received.get(section.id()).copied().unwrap_or(0);
            rows.push(SectionParticipation::new(section, students, responses));
        }

        let total_responses = self.responses.count_for_survey(survey.id()).await?;
        Ok(SurveyParticipation::new(
            *survey.id(),
            total_responses,
            survey.questions().len() as u32,
            rows,
        ))
    }
}
