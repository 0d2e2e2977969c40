//! Participation statistics per assigned section.

use serde::Serialize;

use crate::domain::foundation::{SectionId, SurveyId};
use crate::domain::section::Section;

use super::round_percentage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionParticipation {
    pub section_id: SectionId,
    pub section_name: String,
    pub section_code: String,
    pub total_students: u32,
    pub responses_received: u32,
    /// Responses per student as a percentage, one decimal.
    pub completion_rate: f64,
}

impl SectionParticipation {
    pub fn new(section: &Section, total_students: u32, responses_received: u32) -> Self {
        Self {
            section_id: *section.id(),
            section_name: section.name().to_string(),
            section_code: section.code().to_string(),
            total_students,
            responses_received,
            completion_rate: round_percentage(responses_received, total_students),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyParticipation {
    pub survey_id: SurveyId,
    pub total_responses: u32,
    pub total_questions: u32,
    /// Assigned sections ordered by name.
    pub sections: Vec<SectionParticipation>,
}

impl SurveyParticipation {
    pub fn new(
        survey_id: SurveyId,
        total_responses: u32,
        total_questions: u32,
        mut sections: Vec<SectionParticipation>,
    ) -> Self {
        sections.sort_by(|a, b| a.section_name.cmp(&b.section_name));
        Self {
            survey_id,
            total_responses,
            total_questions,
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn section(name: &str) -> Section {
        Section::new(SectionId::new(), name, name.to_uppercase(), "", Timestamp::now()).unwrap()
    }

    #[test]
    fn completion_rate_rounds_to_one_decimal() {
        let p = SectionParticipation::new(&section("Algebra"), 3, 2);
        assert_eq!(p.completion_rate, 66.7);
    }

    #[test]
    fn empty_section_has_zero_rate() {
        let p = SectionParticipation::new(&section("Empty"), 0, 0);
        assert_eq!(p.completion_rate, 0.0);
    }

    #[test]
    fn sections_are_sorted_by_name() {
        let participation = SurveyParticipation::new(
            SurveyId::new(),
            0,
            1,
            vec![
                SectionParticipation::new(&section("Physics"), 1, 0),
                SectionParticipation::new(&section("Biology"), 1, 0),
            ],
        );
        assert_eq!(participation.sections[0].section_name, "Biology");
    }
}
