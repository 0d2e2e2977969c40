//! Eligibility resolution.
//!
//! Decides which surveys a respondent may currently submit to. All time
//! comparisons use the `now` passed in by the caller.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::foundation::{SurveyId, Timestamp};
use crate::domain::respondent::Respondent;

use super::aggregate::Survey;

/// Reason a respondent may not submit to a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// Teachers never submit responses.
    NotAStudent,
    Inactive,
    PastDue,
    NotAssigned,
}

/// Pure eligibility rules.
pub struct EligibilityResolver;

impl EligibilityResolver {
    /// Checks whether `survey` currently accepts a submission from
    /// `respondent`, ignoring whether one already exists.
    pub fn check(
        survey: &Survey,
        respondent: &Respondent,
        now: &Timestamp,
    ) -> Result<(), Ineligibility> {
        let section_id = respondent.section_id().ok_or(Ineligibility::NotAStudent)?;
        if !survey.is_active() {
            return Err(Ineligibility::Inactive);
        }
        if survey.due_date().is_some_and(|due| now.is_after(due)) {
            return Err(Ineligibility::PastDue);
        }
        if !survey.is_assigned_to(section_id) {
            return Err(Ineligibility::NotAssigned);
        }
        Ok(())
    }

    /// Filters `candidates` down to the surveys `respondent` may submit to
    /// now, excluding any in `completed`, ordered by due date (unset last),
    /// then creation time.
    pub fn eligible_surveys(
        respondent: &Respondent,
        candidates: Vec<Survey>,
        completed: &HashSet<SurveyId>,
        now: &Timestamp,
    ) -> Vec<Survey> {
        let mut eligible: Vec<Survey> = candidates
            .into_iter()
            .filter(|s| !completed.contains(s.id()))
            .filter(|s| Self::check(s, respondent, now).is_ok())
            .collect();
        eligible.sort_by(Self::by_due_date);
        eligible
    }

    fn by_due_date(a: &Survey, b: &Survey) -> Ordering {
        let due = match (a.due_date(), b.due_date()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        due.then_with(|| a.created_at().cmp(b.created_at()))
            .then_with(|| a.id().cmp(b.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{RespondentId, SectionId};
    use crate::domain::survey::aggregate::SurveySettings;

    fn t0() -> Timestamp {
        Timestamp::from_datetime(
            chrono::DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        )
    }

    fn survey_for(section: SectionId, created_at: Timestamp, due: Option<Timestamp>) -> Survey {
        let mut s = Survey::new(SurveyId::new(), RespondentId::new(), "S", "", created_at).unwrap();
        s.assign_sections([section], created_at);
        s.update_settings(
            SurveySettings {
                due_date: Some(due),
                ..Default::default()
            },
            created_at,
        )
        .unwrap();
        s
    }

    #[test]
    fn teacher_is_never_eligible() {
        let section = SectionId::new();
        let s = survey_for(section, t0(), None);
        let teacher = Respondent::teacher(RespondentId::new(), "T");
        assert_eq!(
            EligibilityResolver::check(&s, &teacher, &t0()),
            Err(Ineligibility::NotAStudent)
        );
    }

    #[test]
    fn past_due_and_unassigned_are_rejected() {
        let section = SectionId::new();
        let student = Respondent::student(RespondentId::new(), "S", section);

        let expired = survey_for(section, t0(), Some(t0().minus_days(1)));
        assert_eq!(
            EligibilityResolver::check(&expired, &student, &t0()),
            Err(Ineligibility::PastDue)
        );

        let other = survey_for(SectionId::new(), t0(), None);
        assert_eq!(
            EligibilityResolver::check(&other, &student, &t0()),
            Err(Ineligibility::NotAssigned)
        );
    }

    #[test]
    fn orders_by_due_date_then_creation() {
        let section = SectionId::new();
        let student = Respondent::student(RespondentId::new(), "S", section);

        let no_due_old = survey_for(section, t0().minus_days(10), None);
        let no_due_new = survey_for(section, t0().minus_days(1), None);
        let due_late = survey_for(section, t0().minus_days(5), Some(t0().plus_days(7)));
        let due_soon = survey_for(section, t0().minus_days(2), Some(t0().plus_days(1)));

        let expected = vec![*due_soon.id(), *due_late.id(), *no_due_old.id(), *no_due_new.id()];
        let eligible = EligibilityResolver::eligible_surveys(
            &student,
            vec![no_due_new, due_late, no_due_old, due_soon],
            &HashSet::new(),
            &t0(),
        );
        let ids: Vec<SurveyId> = eligible.iter().map(|s| *s.id()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn completed_surveys_are_excluded() {
        let section = SectionId::new();
        let student = Respondent::student(RespondentId::new(), "S", section);
        let s = survey_for(section, t0(), None);
        let completed: HashSet<SurveyId> = [*s.id()].into_iter().collect();

        let eligible = EligibilityResolver::eligible_surveys(&student, vec![s], &completed, &t0());
        assert!(eligible.is_empty());
    }
}
