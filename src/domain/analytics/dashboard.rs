//! Teacher dashboard: response totals across a teacher's surveys, broken
//! down per survey, per section and per calendar day.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{SectionId, SurveyId, Timestamp, ValidationError};
use crate::domain::section::Section;
use crate::domain::survey::Survey;

use super::round_percentage;

/// Days covered by the daily series when no start date is given.
pub const DEFAULT_DASHBOARD_DAYS: i64 = 30;

/// Longest window the daily series may cover.
pub const MAX_DASHBOARD_DAYS: i64 = 366;

/// A stored response reduced to the fields the dashboard groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub survey_id: SurveyId,
    /// Section of the respondent, `None` for teachers.
    pub section_id: Option<SectionId>,
    pub submitted_at: Timestamp,
}

/// Inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Resolves optional bounds against `today`.
    ///
    /// A missing end is `today`; a missing start lies
    /// `DEFAULT_DASHBOARD_DAYS - 1` days before the end.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let end = to.unwrap_or(today);
        let start = match from {
            Some(start) => start,
            None => end
                .checked_sub_signed(Duration::days(DEFAULT_DASHBOARD_DAYS - 1))
                .unwrap_or(NaiveDate::MIN),
        };

        if start > end {
            return Err(ValidationError::invalid_format(
                "date_from",
                format!("{} is after {}", start, end),
            ));
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_DASHBOARD_DAYS {
            return Err(ValidationError::invalid_format(
                "date_from",
                format!("window spans {} days, at most {} allowed", days, MAX_DASHBOARD_DAYS),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day of the window in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResponseRate {
    pub survey_id: SurveyId,
    pub title: String,
    pub responses: u32,
    /// Students in the assigned sections that pass the section filter.
    pub possible: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionResponseCount {
    pub section_id: SectionId,
    pub section_name: String,
    pub section_code: String,
    pub response_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyResponseCount {
    pub date: NaiveDate,
    pub response_count: u32,
}

/// Which dashboard panels have something to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardPanels {
    pub surveys: bool,
    pub responses: bool,
    pub sections: bool,
    pub daily: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAnalytics {
    pub total_surveys: u32,
    pub total_sections: u32,
    pub total_responses: u32,
    pub surveys: Vec<SurveyResponseRate>,
    /// Ordered by section name.
    pub sections: Vec<SectionResponseCount>,
    pub daily: Vec<DailyResponseCount>,
    pub has_data: DashboardPanels,
}

impl DashboardAnalytics {
    /// Builds the dashboard from records already narrowed to `surveys` and
    /// the active filters. `students` maps a section to its student count.
    pub fn build(
        surveys: &[Survey],
        sections: &[Section],
        students: &HashMap<SectionId, u32>,
        records: &[SubmissionRecord],
        section_filter: Option<&SectionId>,
        window: &DateWindow,
    ) -> Self {
        let mut by_survey: HashMap<SurveyId, u32> = HashMap::new();
        let mut by_section: HashMap<SectionId, u32> = HashMap::new();
        let mut by_day: HashMap<NaiveDate, u32> = HashMap::new();
        for record in records {
            *by_survey.entry(record.survey_id).or_default() += 1;
            if let Some(section_id) = record.section_id {
                *by_section.entry(section_id).or_default() += 1;
            }
            let day = record.submitted_at.date();
            if window.contains(day) {
                *by_day.entry(day).or_default() += 1;
            }
        }

        let survey_rows: Vec<SurveyResponseRate> = surveys
            .iter()
            .map(|survey| {
                let responses = by_survey.get(survey.id()).copied().unwrap_or(0);
                let possible = survey
                    .section_ids()
                    .iter()
                    .filter(|id| section_filter.map_or(true, |wanted| wanted == *id))
                    .map(|id| students.get(id).copied().unwrap_or(0))
                    .sum();
                SurveyResponseRate {
                    survey_id: *survey.id(),
                    title: survey.title().to_string(),
                    responses,
                    possible,
                    percentage: round_percentage(responses, possible),
                }
            })
            .collect();

        let mut section_rows: Vec<SectionResponseCount> = sections
            .iter()
            .map(|section| SectionResponseCount {
                section_id: *section.id(),
                section_name: section.name().to_string(),
                section_code: section.code().to_string(),
                response_count: by_section.get(section.id()).copied().unwrap_or(0),
            })
            .collect();
        section_rows.sort_by(|a, b| a.section_name.cmp(&b.section_name));

        let daily: Vec<DailyResponseCount> = window
            .days()
            .map(|date| DailyResponseCount {
                date,
                response_count: by_day.get(&date).copied().unwrap_or(0),
            })
            .collect();

        let total_responses = records.len() as u32;
        let has_data = DashboardPanels {
            surveys: !survey_rows.is_empty(),
            responses: total_responses > 0,
            sections: !section_rows.is_empty(),
            daily: daily.iter().any(|d| d.response_count > 0),
        };

        Self {
            total_surveys: survey_rows.len() as u32,
            total_sections: section_rows.len() as u32,
            total_responses,
            surveys: survey_rows,
            sections: section_rows,
            daily,
            has_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RespondentId;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at(d: u32) -> Timestamp {
        Timestamp::start_of_day(day(d)).plus_secs(9 * 3600)
    }

    fn section(name: &str) -> Section {
        Section::new(SectionId::new(), name, name.to_uppercase(), "", at(1)).unwrap()
    }

    fn survey(title: &str, sections: &[&Section]) -> Survey {
        let mut survey = Survey::new(SurveyId::new(), RespondentId::new(), title, "", at(1)).unwrap();
        survey.assign_sections(sections.iter().map(|s| *s.id()), at(1));
        survey
    }

    fn record(survey: &Survey, section: &Section, d: u32) -> SubmissionRecord {
        SubmissionRecord {
            survey_id: *survey.id(),
            section_id: Some(*section.id()),
            submitted_at: at(d),
        }
    }

    #[test]
    fn default_window_is_thirty_days_ending_today() {
        let window = DateWindow::resolve(None, None, day(30)).unwrap();
        assert_eq!(window.start(), day(1));
        assert_eq!(window.end(), day(30));
        assert_eq!(window.days().count(), 30);
    }

    #[test]
    fn explicit_bounds_are_inclusive() {
        let window = DateWindow::resolve(Some(day(5)), Some(day(7)), day(30)).unwrap();
        assert_eq!(window.days().collect::<Vec<_>>(), vec![day(5), day(6), day(7)]);
        assert!(window.contains(day(7)));
        assert!(!window.contains(day(8)));
    }

    #[test]
    fn inverted_or_oversized_windows_are_rejected() {
        assert!(DateWindow::resolve(Some(day(9)), Some(day(2)), day(30)).is_err());
        let from = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(DateWindow::resolve(Some(from), Some(day(2)), day(30)).is_err());
    }

    #[test]
    fn rates_sections_and_days_are_counted() {
        let algebra = section("Algebra");
        let biology = section("Biology");
        let quiz = survey("Quiz", &[&algebra, &biology]);
        let poll = survey("Poll", &[&biology]);
        let students = HashMap::from([(*algebra.id(), 4), (*biology.id(), 2)]);
        let records = vec![
            record(&quiz, &algebra, 3),
            record(&quiz, &biology, 3),
            record(&quiz, &algebra, 4),
            record(&poll, &biology, 20),
        ];
        let window = DateWindow::resolve(Some(day(2)), Some(day(5)), day(30)).unwrap();

        let dashboard = DashboardAnalytics::build(
            &[quiz.clone(), poll.clone()],
            &[biology.clone(), algebra.clone()],
            &students,
            &records,
            None,
            &window,
        );

        assert_eq!(dashboard.total_surveys, 2);
        assert_eq!(dashboard.total_responses, 4);
        assert_eq!(dashboard.surveys[0].responses, 3);
        assert_eq!(dashboard.surveys[0].possible, 6);
        assert_eq!(dashboard.surveys[0].percentage, 50.0);
        assert_eq!(dashboard.surveys[1].possible, 2);
        assert_eq!(dashboard.sections[0].section_name, "Algebra");
        assert_eq!(dashboard.sections[0].response_count, 2);
        assert_eq!(dashboard.sections[1].response_count, 2);

        let counts: Vec<u32> = dashboard.daily.iter().map(|d| d.response_count).collect();
        assert_eq!(counts, vec![0, 2, 1, 0]);
        assert!(dashboard.has_data.daily);
    }

    #[test]
    fn section_filter_narrows_possible_students() {
        let algebra = section("Algebra");
        let biology = section("Biology");
        let quiz = survey("Quiz", &[&algebra, &biology]);
        let students = HashMap::from([(*algebra.id(), 4), (*biology.id(), 2)]);
        let window = DateWindow::resolve(None, None, day(30)).unwrap();

        let dashboard = DashboardAnalytics::build(
            &[quiz],
            &[algebra.clone()],
            &students,
            &[],
            Some(algebra.id()),
            &window,
        );

        assert_eq!(dashboard.surveys[0].possible, 4);
        assert_eq!(dashboard.surveys[0].percentage, 0.0);
        assert_eq!(dashboard.total_sections, 1);
        assert!(!dashboard.has_data.responses);
        assert!(!dashboard.has_data.daily);
        assert!(dashboard.has_data.surveys);
    }
}
