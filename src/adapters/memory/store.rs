//! In-memory entity store.
//!
//! Implements every repository port over one set of tables guarded by a
//! single `RwLock`. Each port call takes the lock once, so the
//! check-then-insert in `submit` is atomic and the uniqueness of
//! (survey, respondent) holds under concurrent callers. Survey edits bump
//! the stored revision under the same lock that `submit` compares it under.
//!
//! A poisoned lock is reported as `DatabaseError` instead of panicking.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::analytics::SubmissionRecord;
use crate::domain::foundation::{
    DomainError, ErrorCode, QuestionId, RespondentId, ResponseId, SectionId, SurveyId,
};
use crate::domain::respondent::Respondent;
use crate::domain::section::Section;
use crate::domain::survey::{Answer, Response, Survey};
use crate::ports::{
    RespondentRepository, ResponseListOptions, ResponseReader, ResponseRepository,
    ResponseSummary, SectionRepository, StoredResponse, SubmissionFilter, SurveyRepository,
    SurveyResponseList, SurveyResponseRow,
};

#[derive(Debug, Default)]
struct Tables {
    sections: HashMap<SectionId, Section>,
    respondents: HashMap<RespondentId, Respondent>,
    surveys: HashMap<SurveyId, Survey>,
    responses: HashMap<ResponseId, Response>,
    answers: HashMap<ResponseId, Vec<Answer>>,
    /// Uniqueness index over (survey, respondent).
    submitted: HashMap<(SurveyId, RespondentId), ResponseId>,
}

impl Tables {
    fn require_survey(&self, id: &SurveyId) -> Result<&Survey, DomainError> {
        self.surveys.get(id).ok_or_else(|| not_found(ErrorCode::SurveyNotFound, "Survey", id))
    }

    fn require_sections<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a SectionId>,
    ) -> Result<(), DomainError> {
        for id in ids {
            if !self.sections.contains_key(id) {
                return Err(not_found(ErrorCode::SectionNotFound, "Section", id));
            }
        }
        Ok(())
    }

    fn has_responses(&self, survey_id: &SurveyId) -> bool {
        self.submitted.keys().any(|(s, _)| s == survey_id)
    }

    fn responses_for<'a>(&'a self, survey_id: &'a SurveyId) -> impl Iterator<Item = &'a Response> {
        self.responses.values().filter(move |r| r.survey_id() == survey_id)
    }
}

fn not_found(code: ErrorCode, resource: &str, id: &impl ToString) -> DomainError {
    let id = id.to_string();
    DomainError::new(code, format!("{} not found: {}", resource, id)).with_detail("id", id)
}

fn survey_changed(response: &Response, expected: u32, actual: u32) -> DomainError {
    DomainError::new(
        ErrorCode::SurveyChanged,
        format!("Survey revision is {}, answers were checked against {}", actual, expected),
    )
    .with_detail("id", response.survey_id().to_string())
}

/// Thread-safe in-memory implementation of all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DomainError> {
        self.tables
            .read()
            .map_err(|_| DomainError::database("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DomainError> {
        self.tables
            .write()
            .map_err(|_| DomainError::database("in-memory store lock poisoned"))
    }

    /// Total number of stored responses, for test assertions.
    pub fn response_count(&self) -> usize {
        self.read().map(|t| t.responses.len()).unwrap_or_default()
    }

    /// Total number of stored answers, for test assertions.
    pub fn answer_count(&self) -> usize {
        self.read()
            .map(|t| t.answers.values().map(Vec::len).sum())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SectionRepository for InMemoryStore {
    async fn save(&self, section: &Section) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        if tables.sections.values().any(|s| s.code() == section.code()) {
            return Err(DomainError::new(
                ErrorCode::DuplicateSectionCode,
                format!("Section code '{}' is already in use", section.code()),
            )
            .with_detail("field", "code"));
        }
        tables.sections.insert(*section.id(), section.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, DomainError> {
        Ok(self.read()?.sections.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[SectionId]) -> Result<Vec<Section>, DomainError> {
        let tables = self.read()?;
        Ok(ids.iter().filter_map(|id| tables.sections.get(id).cloned()).collect())
    }

    async fn list_all(&self) -> Result<Vec<Section>, DomainError> {
        let mut sections: Vec<Section> = self.read()?.sections.values().cloned().collect();
        sections.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        Ok(sections)
    }

    async fn delete(&self, id: &SectionId) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        if !tables.sections.contains_key(id) {
            return Err(not_found(ErrorCode::SectionNotFound, "Section", id));
        }
        let has_students = tables.respondents.values().any(|r| r.section_id() == Some(id));
        let has_surveys = tables.surveys.values().any(|s| s.is_assigned_to(id));
        if has_students || has_surveys {
            return Err(DomainError::new(
                ErrorCode::SectionInUse,
                "Section still has students or assigned surveys",
            )
            .with_detail("id", id.to_string()));
        }
        tables.sections.remove(id);
        Ok(())
    }
}

#[async_trait]
impl RespondentRepository for InMemoryStore {
    async fn save(&self, respondent: &Respondent) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.require_sections(respondent.section_id())?;
        tables.respondents.insert(*respondent.id(), respondent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RespondentId) -> Result<Option<Respondent>, DomainError> {
        Ok(self.read()?.respondents.get(id).cloned())
    }

    async fn count_students_in_section(&self, section_id: &SectionId) -> Result<u32, DomainError> {
        let tables = self.read()?;
        Ok(tables
            .respondents
            .values()
            .filter(|r| r.section_id() == Some(section_id))
            .count() as u32)
    }
}

#[async_trait]
impl SurveyRepository for InMemoryStore {
    async fn save(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.require_sections(survey.section_ids())?;
        tables.surveys.insert(*survey.id(), survey.clone());
        Ok(())
    }

    async fn update_settings(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.require_sections(survey.section_ids())?;
        let stored = tables.require_survey(survey.id())?;
        let updated = Survey::reconstitute(
            *survey.id(),
            survey.title().to_string(),
            survey.description().to_string(),
            *survey.creator_id(),
            survey.is_active(),
            survey.due_date().copied(),
            *survey.created_at(),
            *survey.updated_at(),
            stored.revision() + 1,
            stored.questions().to_vec(),
            survey.section_ids().clone(),
        );
        tables.surveys.insert(*survey.id(), updated);
        Ok(())
    }

    async fn update_questions(&self, survey: &Survey) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        let stored = tables.require_survey(survey.id())?;
        if tables.has_responses(survey.id()) {
            return Err(DomainError::new(
                ErrorCode::SurveyLocked,
                "Survey already has responses",
            )
            .with_detail("id", survey.id().to_string()));
        }
        let updated = Survey::reconstitute(
            *stored.id(),
            stored.title().to_string(),
            stored.description().to_string(),
            *stored.creator_id(),
            stored.is_active(),
            stored.due_date().copied(),
            *stored.created_at(),
            *survey.updated_at(),
            stored.revision() + 1,
            survey.questions().to_vec(),
            stored.section_ids().clone(),
        );
        tables.surveys.insert(*survey.id(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &SurveyId) -> Result<Option<Survey>, DomainError> {
        Ok(self.read()?.surveys.get(id).cloned())
    }

    async fn find_by_creator(&self, creator_id: &RespondentId) -> Result<Vec<Survey>, DomainError> {
        let mut surveys: Vec<Survey> = self
            .read()?
            .surveys
            .values()
            .filter(|s| s.is_owned_by(creator_id))
            .cloned()
            .collect();
        surveys.sort_by(|a, b| b.created_at().cmp(a.created_at()).then_with(|| a.id().cmp(b.id())));
        Ok(surveys)
    }

    async fn find_assigned_to_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Survey>, DomainError> {
        Ok(self
            .read()?
            .surveys
            .values()
            .filter(|s| s.is_assigned_to(section_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &SurveyId) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.require_survey(id)?;

        let response_ids: Vec<ResponseId> = tables.responses_for(id).map(|r| *r.id()).collect();
        for response_id in &response_ids {
            tables.answers.remove(response_id);
            tables.responses.remove(response_id);
        }
        tables.submitted.retain(|(survey_id, _), _| survey_id != id);
        tables.surveys.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for InMemoryStore {
    async fn submit(
        &self,
        response: &Response,
        answers: &[Answer],
        survey_revision: u32,
    ) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        let survey = tables.require_survey(response.survey_id())?;
        if survey.revision() != survey_revision {
            return Err(survey_changed(response, survey_revision, survey.revision()));
        }

        let key = (*response.survey_id(), *response.respondent_id());
        if tables.submitted.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::AlreadySubmitted,
                "A response already exists for this survey and respondent",
            ));
        }

        let mut seen: HashSet<QuestionId> = HashSet::new();
        if !answers.iter().all(|a| seen.insert(a.question_id)) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "More than one answer for the same question",
            )
            .with_detail("field", "answers"));
        }

        tables.submitted.insert(key, *response.id());
        tables.responses.insert(*response.id(), response.clone());
        tables.answers.insert(*response.id(), answers.to_vec());
        Ok(())
    }

    async fn exists_for(
        &self,
        survey_id: &SurveyId,
        respondent_id: &RespondentId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .read()?
            .submitted
            .contains_key(&(*survey_id, *respondent_id)))
    }

    async fn count_for_survey(&self, survey_id: &SurveyId) -> Result<u32, DomainError> {
        Ok(self.read()?.responses_for(survey_id).count() as u32)
    }
}

#[async_trait]
impl ResponseReader for InMemoryStore {
    async fn history_for(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<Vec<ResponseSummary>, DomainError> {
        let tables = self.read()?;
        let mut history: Vec<ResponseSummary> = tables
            .responses
            .values()
            .filter(|r| r.respondent_id() == respondent_id)
            .map(|r| ResponseSummary {
                response_id: *r.id(),
                survey_id: *r.survey_id(),
                survey_title: tables
                    .surveys
                    .get(r.survey_id())
                    .map(|s| s.title().to_string())
                    .unwrap_or_default(),
                submitted_at: *r.submitted_at(),
                is_complete: r.is_complete(),
                answer_count: tables.answers.get(r.id()).map_or(0, Vec::len) as u32,
            })
            .collect();
        history.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| a.response_id.cmp(&b.response_id))
        });
        Ok(history)
    }

    async fn completed_survey_ids(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<HashSet<SurveyId>, DomainError> {
        Ok(self
            .read()?
            .responses
            .values()
            .filter(|r| r.respondent_id() == respondent_id && r.is_complete())
            .map(|r| *r.survey_id())
            .collect())
    }

    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<StoredResponse>, DomainError> {
        let tables = self.read()?;
        Ok(tables.responses.get(id).map(|response| StoredResponse {
            response: response.clone(),
            answers: tables.answers.get(id).cloned().unwrap_or_default(),
        }))
    }

    async fn answers_for_survey(&self, survey_id: &SurveyId) -> Result<Vec<Answer>, DomainError> {
        let tables = self.read()?;
        Ok(tables
            .responses_for(survey_id)
            .filter(|r| r.is_complete())
            .filter_map(|r| tables.answers.get(r.id()))
            .flatten()
            .cloned()
            .collect())
    }

    async fn counts_by_section(
        &self,
        survey_id: &SurveyId,
    ) -> Result<HashMap<SectionId, u32>, DomainError> {
        let tables = self.read()?;
        let mut counts: HashMap<SectionId, u32> = HashMap::new();
        for response in tables.responses_for(survey_id) {
            let section = tables
                .respondents
                .get(response.respondent_id())
                .and_then(|r| r.section_id());
            if let Some(section_id) = section {
                *counts.entry(*section_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn list_for_survey(
        &self,
        survey_id: &SurveyId,
        options: &ResponseListOptions,
    ) -> Result<SurveyResponseList, DomainError> {
        let tables = self.read()?;
        let mut rows: Vec<SurveyResponseRow> = tables
            .responses_for(survey_id)
            .filter_map(|response| {
                let respondent = tables.respondents.get(response.respondent_id())?;
                if !options.matches(respondent.display_name()) {
                    return None;
                }
                Some(SurveyResponseRow {
                    response_id: *response.id(),
                    respondent_id: *respondent.id(),
                    respondent_name: respondent.display_name().to_string(),
                    section_id: respondent.section_id().copied(),
                    submitted_at: *response.submitted_at(),
                    is_complete: response.is_complete(),
                    answer_count: tables.answers.get(response.id()).map_or(0, Vec::len) as u32,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| a.response_id.cmp(&b.response_id))
        });

        let total = rows.len() as u32;
        let items = rows
            .into_iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .collect();
        Ok(SurveyResponseList { items, total })
    }

    async fn submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, DomainError> {
        let tables = self.read()?;
        let surveys: HashSet<&SurveyId> = filter.survey_ids.iter().collect();
        Ok(tables
            .responses
            .values()
            .filter(|r| surveys.contains(r.survey_id()) && filter.admits(r.submitted_at()))
            .filter_map(|r| {
                let section_id = tables
                    .respondents
                    .get(r.respondent_id())
                    .and_then(|p| p.section_id())
                    .copied();
                if filter.section_id.is_some() && section_id != filter.section_id {
                    return None;
                }
                Some(SubmissionRecord {
                    survey_id: *r.survey_id(),
                    section_id,
                    submitted_at: *r.submitted_at(),
                })
            })
            .collect())
    }
}
