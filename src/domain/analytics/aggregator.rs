//! Aggregation engine.
//!
//! Turns the answers of a survey's complete responses into per-question
//! summaries. Pure and deterministic: recomputed from committed data on every
//! call, nothing is cached.

use std::collections::HashMap;

use crate::domain::foundation::QuestionId;
use crate::domain::survey::{Answer, LikertScale, Question, QuestionKind, Survey};

use super::summary::{
    ChoiceBucket, ChoiceSummary, QuestionSummary, ScaleBucket, ScaleSummary, Summary,
    SurveyAnalytics, TextSummary,
};
use super::word_frequency::word_frequency;
use super::round_percentage;

/// Computes survey analytics.
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Aggregates `answers` (all belonging to complete responses of `survey`).
    ///
    /// Answers whose value no longer fits the question configuration, such as
    /// a choice label that was since removed, are left out of the counts.
    pub fn aggregate(survey: &Survey, total_responses: u32, answers: &[Answer]) -> SurveyAnalytics {
        let mut by_question: HashMap<QuestionId, Vec<&Answer>> = HashMap::new();
        for answer in answers {
            by_question.entry(answer.question_id).or_default().push(answer);
        }

        let questions = survey
            .questions()
            .iter()
            .map(|question| {
                let answers = by_question
                    .get(question.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                Self::summarize_question(question, answers)
            })
            .collect();

        SurveyAnalytics {
            survey_id: *survey.id(),
            title: survey.title().to_string(),
            total_responses,
            questions,
        }
    }

    fn summarize_question(question: &Question, answers: &[&Answer]) -> QuestionSummary {
        let summary = match question.kind() {
            QuestionKind::MultipleChoice { choices } => {
                Summary::Choice(Self::summarize_choices(choices, answers))
            }
            QuestionKind::Likert(scale) => Summary::Scale(Self::summarize_scale(scale, answers)),
            QuestionKind::ShortAnswer | QuestionKind::LongAnswer => {
                Summary::Text(Self::summarize_text(answers))
            }
        };

        QuestionSummary {
            question_id: *question.id(),
            text: question.text().to_string(),
            question_type: question.question_type(),
            order: question.order(),
            is_required: question.is_required(),
            summary,
        }
    }

    fn summarize_choices(choices: &[String], answers: &[&Answer]) -> ChoiceSummary {
        let mut counts = vec![0u32; choices.len()];
        for answer in answers {
            let Some(picked) = answer.value.as_choice() else {
                continue;
            };
            if let Some(index) = choices.iter().position(|c| c == picked) {
                counts[index] += 1;
            }
        }

        let total: u32 = counts.iter().sum();
        let buckets = choices
            .iter()
            .zip(counts)
            .map(|(label, count)| ChoiceBucket {
                label: label.clone(),
                count,
                percentage: round_percentage(count, total),
            })
            .collect();

        ChoiceSummary { buckets, total }
    }

    fn summarize_scale(scale: &LikertScale, answers: &[&Answer]) -> ScaleSummary {
        // One slot per scale point, indexed by distance from `min`.
        let mut counts: Vec<u32> = scale.points().map(|_| 0).collect();
        let mut total: i64 = 0;
        for value in answers.iter().filter_map(|a| a.value.as_number()) {
            if !scale.contains(value) {
                continue;
            }
            let slot = (i64::from(value) - i64::from(scale.min)) as usize;
            counts[slot] += 1;
            total += i64::from(value);
        }

        let count: u32 = counts.iter().sum();
        let mean = (count > 0).then(|| total as f64 / f64::from(count));

        let buckets = scale
            .points()
            .zip(counts)
            .map(|(value, hits)| ScaleBucket {
                value,
                label: scale.label_for(value).map(str::to_string),
                count: hits,
                percentage: round_percentage(hits, count),
            })
            .collect();

        ScaleSummary {
            min: scale.min,
            max: scale.max,
            buckets,
            count,
            mean,
        }
    }

    fn summarize_text(answers: &[&Answer]) -> TextSummary {
        // Text was trimmed when the answer was accepted.
        let responses: Vec<String> = answers
            .iter()
            .filter_map(|a| a.value.as_text())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        TextSummary {
            count: responses.len() as u32,
            word_frequency: word_frequency(&responses),
            responses,
        }
    }
}
