//! GetDashboardHandler - Query handler for a teacher's response totals
//! across all of their surveys.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::application::handlers::loaders::{load_owned_survey, load_respondent};
use crate::domain::analytics::{DashboardAnalytics, DateWindow};
use crate::domain::foundation::{RespondentId, SectionId, SurveyId, Timestamp};
use crate::domain::survey::SurveyError;
use crate::ports::{
    RespondentRepository, ResponseReader, SectionRepository, SubmissionFilter, SurveyRepository,
};

#[derive(Debug, Clone)]
pub struct GetDashboardQuery {
    pub teacher_id: RespondentId,
    pub survey_id: Option<SurveyId>,
    pub section_id: Option<SectionId>,
    /// Inclusive, UTC calendar day.
    pub date_from: Option<NaiveDate>,
    /// Inclusive, UTC calendar day.
    pub date_to: Option<NaiveDate>,
    pub now: Timestamp,
}

pub struct GetDashboardHandler {
    respondents: Arc<dyn RespondentRepository>,
    surveys: Arc<dyn SurveyRepository>,
    sections: Arc<dyn SectionRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl GetDashboardHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        surveys: Arc<dyn SurveyRepository>,
        sections: Arc<dyn SectionRepository>,
        reader: Arc<dyn ResponseReader>,
    ) -> Self {
        Self {
            respondents,
            surveys,
            sections,
            reader,
        }
    }

    pub async fn handle(&self, query: GetDashboardQuery) -> Result<DashboardAnalytics, SurveyError> {
        let teacher = load_respondent(self.respondents.as_ref(), &query.teacher_id).await?;
        if !teacher.is_teacher() {
            return Err(SurveyError::Forbidden);
        }

        let window = DateWindow::resolve(query.date_from, query.date_to, query.now.date())?;

        let surveys = match &query.survey_id {
            Some(id) => vec![load_owned_survey(self.surveys.as_ref(), id, teacher.id()).await?],
            None => self.surveys.find_by_creator(teacher.id()).await?,
        };

        let mut sections = self.sections.list_all().await?;
        if let Some(wanted) = &query.section_id {
            sections.retain(|s| s.id() == wanted);
            if sections.is_empty() {
                return Err(SurveyError::not_found("Section", wanted));
            }
        }

        let mut students: HashMap<SectionId, u32> = HashMap::new();
        for section_id in surveys.iter().flat_map(|s| s.section_ids()) {
            if !students.contains_key(section_id) {
                let count = self.respondents.count_students_in_section(section_id).await?;
                students.insert(*section_id, count);
            }
        }

        let filter = SubmissionFilter {
            survey_ids: surveys.iter().map(|s| *s.id()).collect(),
            section_id: query.section_id,
            submitted_from: query.date_from.map(Timestamp::start_of_day),
            submitted_before: query.date_to.map(|d| Timestamp::start_of_day(d).plus_days(1)),
        };
        let records = self.reader.submissions(&filter).await?;

        debug!(
            teacher_id = %query.teacher_id,
            surveys = surveys.len(),
            records = records.len(),
            "Dashboard computed"
        );

        Ok(DashboardAnalytics::build(
            &surveys,
            &sections,
            &students,
            &records,
            query.section_id.as_ref(),
            &window,
        ))
    }
}
