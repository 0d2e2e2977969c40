//! Survey aggregate.
//!
//! A survey exclusively owns its questions and its set of assigned sections.
//! Responses reference the survey but live in their own store so that the
//! submission path can insert them without rewriting the survey.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::domain::foundation::{
    QuestionId, RespondentId, SectionId, SurveyId, Timestamp, ValidationError,
};

use super::question::{Question, QuestionKind};

/// Maximum length for survey title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Question definition used when creating or extending a survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub kind: QuestionKind,
    pub is_required: bool,
}

/// Partial settings update. `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveySettings {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub due_date: Option<Option<Timestamp>>,
}

/// Survey aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters
/// - `questions` are kept sorted by `order`, and orders are unique
/// - `section_ids` contains no duplicates
/// - `revision` only ever grows; the store bumps it on every persisted edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    id: SurveyId,
    title: String,
    description: String,
    creator_id: RespondentId,
    is_active: bool,
    due_date: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
    revision: u32,
    questions: Vec<Question>,
    section_ids: BTreeSet<SectionId>,
}

impl Survey {
    /// Creates a new active survey with no questions or assignments.
    pub fn new(
        id: SurveyId,
        creator_id: RespondentId,
        title: impl Into<String>,
        description: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        ValidationError::check_text("title", &title, MAX_TITLE_LENGTH)?;

        Ok(Self {
            id,
            title,
            description: description.into(),
            creator_id,
            is_active: true,
            due_date: None,
            created_at: now,
            updated_at: now,
            revision: 0,
            questions: Vec::new(),
            section_ids: BTreeSet::new(),
        })
    }

    /// Reconstitute a survey from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SurveyId,
        title: String,
        description: String,
        creator_id: RespondentId,
        is_active: bool,
        due_date: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
        revision: u32,
        mut questions: Vec<Question>,
        section_ids: BTreeSet<SectionId>,
    ) -> Self {
        questions.sort_by_key(|q| q.order());
        Self {
            id,
            title,
            description,
            creator_id,
            is_active,
            due_date,
            created_at,
            updated_at,
            revision,
            questions,
            section_ids,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SurveyId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn creator_id(&self) -> &RespondentId {
        &self.creator_id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn due_date(&self) -> Option<&Timestamp> {
        self.due_date.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Stored revision this copy was loaded at.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Questions in display and validation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn section_ids(&self) -> &BTreeSet<SectionId> {
        &self.section_ids
    }

    pub fn is_assigned_to(&self, section_id: &SectionId) -> bool {
        self.section_ids.contains(section_id)
    }

    pub fn is_owned_by(&self, respondent_id: &RespondentId) -> bool {
        &self.creator_id == respondent_id
    }

    /// Active and not past its due date at `now` (the due instant itself is
    /// still open).
    pub fn is_open(&self, now: &Timestamp) -> bool {
        if !self.is_active {
            return false;
        }
        match &self.due_date {
            Some(due) => !now.is_after(due),
            None => true,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a settings change. Always permitted, even after responses.
    pub fn update_settings(
        &mut self,
        settings: SurveySettings,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        if let Some(title) = settings.title {
            ValidationError::check_text("title", &title, MAX_TITLE_LENGTH)?;
            self.title = title;
        }
        if let Some(description) = settings.description {
            self.description = description;
        }
        if let Some(is_active) = settings.is_active {
            self.is_active = is_active;
        }
        if let Some(due_date) = settings.due_date {
            self.due_date = due_date;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the set of assigned sections.
    pub fn assign_sections(&mut self, sections: impl IntoIterator<Item = SectionId>, now: Timestamp) {
        self.section_ids = sections.into_iter().collect();
        self.updated_at = now;
    }

    /// Appends a question after the current last one.
    pub fn add_question(
        &mut self,
        draft: QuestionDraft,
        now: Timestamp,
    ) -> Result<&Question, ValidationError> {
        let order = self
            .questions
            .last()
            .map(|q| q.order() + 1)
            .unwrap_or(0);
        let question = Question::new(
            QuestionId::new(),
            self.id,
            draft.text,
            draft.kind,
            draft.is_required,
            order,
        )?;
        self.questions.push(question);
        self.updated_at = now;
        let last = self.questions.len() - 1;
        Ok(&self.questions[last])
    }

    /// Redefines an existing question in place, keeping its id and order.
    ///
    /// Returns `Ok(false)` when the question does not belong to this survey.
    pub fn update_question(
        &mut self,
        id: &QuestionId,
        draft: QuestionDraft,
        now: Timestamp,
    ) -> Result<bool, ValidationError> {
        let Some(question) = self.questions.iter_mut().find(|q| q.id() == id) else {
            return Ok(false);
        };
        question.redefine(draft.text, draft.kind, draft.is_required)?;
        self.updated_at = now;
        Ok(true)
    }

    /// Removes a question. Returns whether anything was removed.
    pub fn remove_question(&mut self, id: &QuestionId, now: Timestamp) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id() != id);
        let removed = self.questions.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Reorders questions to match `ordered_ids`, which must be a permutation
    /// of the current question ids.
    pub fn reorder_questions(
        &mut self,
        ordered_ids: &[QuestionId],
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        let current: HashSet<&QuestionId> = self.questions.iter().map(|q| q.id()).collect();
        let requested: HashSet<&QuestionId> = ordered_ids.iter().collect();
        if ordered_ids.len() != self.questions.len()
            || requested.len() != ordered_ids.len()
            || current != requested
        {
            return Err(ValidationError::invalid_format(
                "question_ids",
                "must list every question of the survey exactly once",
            ));
        }

        for question in &mut self.questions {
            if let Some(position) = ordered_ids.iter().position(|id| id == question.id()) {
                question.set_order(position as u32);
            }
        }
        self.questions.sort_by_key(|q| q.order());
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_datetime(
            chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        )
    }

    fn survey() -> Survey {
        Survey::new(SurveyId::new(), RespondentId::new(), "Course feedback", "", now()).unwrap()
    }

    fn text_draft(text: &str) -> QuestionDraft {
        QuestionDraft {
            text: text.to_string(),
            kind: QuestionKind::ShortAnswer,
            is_required: false,
        }
    }

    #[test]
    fn new_survey_is_active_without_due_date() {
        let s = survey();
        assert!(s.is_active());
        assert!(s.due_date().is_none());
        assert!(s.is_open(&now()));
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(Survey::new(SurveyId::new(), RespondentId::new(), title, "", now()).is_err());
    }

    #[test]
    fn due_date_is_inclusive() {
        let mut s = survey();
        s.update_settings(
            SurveySettings {
                due_date: Some(Some(now())),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
        assert!(s.is_open(&now()));
        assert!(!s.is_open(&now().plus_secs(1)));
    }

    #[test]
    fn inactive_survey_is_closed() {
        let mut s = survey();
        s.update_settings(
            SurveySettings {
                is_active: Some(false),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
        assert!(!s.is_open(&now()));
    }

    #[test]
    fn add_question_appends_in_order() {
        let mut s = survey();
        s.add_question(text_draft("First"), now()).unwrap();
        s.add_question(text_draft("Second"), now()).unwrap();
        let orders: Vec<u32> = s.questions().iter().map(|q| q.order()).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn reorder_requires_permutation() {
        let mut s = survey();
        let a = *s.add_question(text_draft("A"), now()).unwrap().id();
        let b = *s.add_question(text_draft("B"), now()).unwrap().id();

        assert!(s.reorder_questions(&[a], now()).is_err());
        assert!(s.reorder_questions(&[a, a], now()).is_err());

        s.reorder_questions(&[b, a], now()).unwrap();
        assert_eq!(s.questions()[0].id(), &b);
        assert_eq!(s.questions()[1].id(), &a);
    }

    #[test]
    fn remove_and_update_report_unknown_ids() {
        let mut s = survey();
        let unknown = QuestionId::new();
        assert!(!s.remove_question(&unknown, now()));
        assert!(!s.update_question(&unknown, text_draft("x"), now()).unwrap());
    }

    #[test]
    fn assign_sections_deduplicates() {
        let mut s = survey();
        let section = SectionId::new();
        s.assign_sections(vec![section, section], now());
        assert_eq!(s.section_ids().len(), 1);
        assert!(s.is_assigned_to(&section));
    }
}
