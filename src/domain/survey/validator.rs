//! Answer validation.
//!
//! Pure function of a question's configuration and one raw input value.
//! Every input, including absent or blank ones, yields exactly one outcome.

use std::collections::HashMap;

use crate::domain::foundation::QuestionId;

use super::errors::{AnswerRejection, AnswerViolation};
use super::question::{Question, QuestionKind};
use super::response::AnswerValue;

/// Validates raw answer input against question definitions.
pub struct AnswerValidator;

impl AnswerValidator {
    /// Validates one raw value for one question.
    ///
    /// Rules, in order:
    /// 1. absent or blank and required: `MissingRequiredAnswer`
    /// 2. absent or blank and optional: `Ok(None)`, no answer is stored
    /// 3. multiple choice: exact, case-sensitive match with a configured choice
    /// 4. likert: an integer within `[min, max]`
    /// 5. short and long answer: any non-blank text, trimmed
    pub fn validate(
        question: &Question,
        raw: Option<&str>,
    ) -> Result<Option<AnswerValue>, AnswerRejection> {
        let raw = match raw {
            Some(value) if !value.trim().is_empty() => value,
            _ if question.is_required() => return Err(AnswerRejection::MissingRequiredAnswer),
            _ => return Ok(None),
        };

        let value = match question.kind() {
            QuestionKind::MultipleChoice { choices } => {
                if !choices.iter().any(|c| c == raw) {
                    return Err(AnswerRejection::InvalidChoice {
                        given: raw.to_string(),
                    });
                }
                AnswerValue::Choice(raw.to_string())
            }
            QuestionKind::Likert(scale) => match raw.trim().parse::<i32>() {
                Ok(n) if scale.contains(n) => AnswerValue::Number(n),
                _ => {
                    return Err(AnswerRejection::OutOfRange {
                        given: raw.to_string(),
                        min: scale.min,
                        max: scale.max,
                    })
                }
            },
            QuestionKind::ShortAnswer | QuestionKind::LongAnswer => {
                AnswerValue::Text(raw.trim().to_string())
            }
        };

        Ok(Some(value))
    }

    /// Validates a whole submission against `questions`, in question order.
    ///
    /// Every question is checked, so the error carries all violations rather
    /// than only the first. Entries for ids that are not questions of the
    /// survey are ignored.
    pub fn validate_submission(
        questions: &[Question],
        raw_answers: &HashMap<QuestionId, String>,
    ) -> Result<Vec<(QuestionId, AnswerValue)>, Vec<AnswerViolation>> {
        let mut accepted = Vec::with_capacity(questions.len());
        let mut violations = Vec::new();

        for question in questions {
            let raw = raw_answers.get(question.id()).map(String::as_str);
            match Self::validate(question, raw) {
                Ok(Some(value)) => accepted.push((*question.id(), value)),
                Ok(None) => {}
                Err(rejection) => violations.push(AnswerViolation::new(*question.id(), rejection)),
            }
        }

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SurveyId;
    use crate::domain::survey::question::LikertScale;
    use proptest::prelude::*;

    fn question(kind: QuestionKind, required: bool) -> Question {
        Question::new(QuestionId::new(), SurveyId::new(), "Q", kind, required, 0).unwrap()
    }

    fn choice_question(required: bool) -> Question {
        question(
            QuestionKind::MultipleChoice {
                choices: vec!["Yes".to_string(), "No".to_string()],
            },
            required,
        )
    }

    fn likert_question() -> Question {
        question(QuestionKind::Likert(LikertScale::new(1, 5, vec![]).unwrap()), true)
    }

    #[test]
    fn required_question_rejects_absent_and_blank() {
        let q = choice_question(true);
        assert_eq!(
            AnswerValidator::validate(&q, None),
            Err(AnswerRejection::MissingRequiredAnswer)
        );
        assert_eq!(
            AnswerValidator::validate(&q, Some("   ")),
            Err(AnswerRejection::MissingRequiredAnswer)
        );
    }

    #[test]
    fn optional_question_skips_absent_value() {
        let q = choice_question(false);
        assert_eq!(AnswerValidator::validate(&q, None), Ok(None));
        assert_eq!(AnswerValidator::validate(&q, Some("")), Ok(None));
    }

    #[test]
    fn choice_match_is_case_sensitive() {
        let q = choice_question(true);
        assert_eq!(
            AnswerValidator::validate(&q, Some("Yes")),
            Ok(Some(AnswerValue::Choice("Yes".to_string())))
        );
        assert_eq!(
            AnswerValidator::validate(&q, Some("yes")),
            Err(AnswerRejection::InvalidChoice {
                given: "yes".to_string()
            })
        );
    }

    #[test]
    fn likert_accepts_bounds_and_rejects_outside() {
        let q = likert_question();
        assert_eq!(AnswerValidator::validate(&q, Some("1")), Ok(Some(AnswerValue::Number(1))));
        assert_eq!(AnswerValidator::validate(&q, Some(" 5 ")), Ok(Some(AnswerValue::Number(5))));
        assert!(matches!(
            AnswerValidator::validate(&q, Some("6")),
            Err(AnswerRejection::OutOfRange { min: 1, max: 5, .. })
        ));
        assert!(matches!(
            AnswerValidator::validate(&q, Some("three")),
            Err(AnswerRejection::OutOfRange { .. })
        ));
        assert!(matches!(
            AnswerValidator::validate(&q, Some("2.5")),
            Err(AnswerRejection::OutOfRange { .. })
        ));
    }

    #[test]
    fn text_answers_accept_any_non_blank_text() {
        let q = question(QuestionKind::LongAnswer, true);
        let long = "word ".repeat(10_000);
        assert_eq!(
            AnswerValidator::validate(&q, Some(&long)),
            Ok(Some(AnswerValue::Text(long.trim().to_string())))
        );
    }

    #[test]
    fn submission_collects_every_violation() {
        let required_choice = choice_question(true);
        let scale = likert_question();
        let optional_text = question(QuestionKind::ShortAnswer, false);
        let questions = vec![required_choice.clone(), scale.clone(), optional_text];

        let mut raw = HashMap::new();
        raw.insert(*scale.id(), "9".to_string());

        let violations = AnswerValidator::validate_submission(&questions, &raw).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].question_id, *required_choice.id());
        assert_eq!(violations[0].rejection, AnswerRejection::MissingRequiredAnswer);
        assert_eq!(violations[1].question_id, *scale.id());
    }

    #[test]
    fn submission_skips_unanswered_optional_questions() {
        let required = choice_question(true);
        let optional = question(QuestionKind::LongAnswer, false);
        let questions = vec![required.clone(), optional];

        let mut raw = HashMap::new();
        raw.insert(*required.id(), "No".to_string());
        raw.insert(QuestionId::new(), "ignored".to_string());

        let accepted = AnswerValidator::validate_submission(&questions, &raw).unwrap();
        assert_eq!(accepted, vec![(*required.id(), AnswerValue::Choice("No".to_string()))]);
    }

    fn any_kind() -> impl Strategy<Value = QuestionKind> {
        prop_oneof![
            Just(QuestionKind::ShortAnswer),
            Just(QuestionKind::LongAnswer),
            Just(QuestionKind::MultipleChoice {
                choices: vec!["A".to_string(), "B".to_string()]
            }),
            (-5i32..5, 1i32..10).prop_map(|(min, span)| {
                QuestionKind::Likert(LikertScale::new(min, min + span, vec![]).unwrap())
            }),
        ]
    }

    proptest! {
        #[test]
        fn validate_is_total(
            kind in any_kind(),
            required in any::<bool>(),
            raw in proptest::option::of(".*"),
        ) {
            let q = question(kind, required);
            let outcome = AnswerValidator::validate(&q, raw.as_deref());
            match outcome {
                Ok(Some(value)) => {
                    let matches_type = match q.kind() {
                        QuestionKind::MultipleChoice { .. } => value.as_choice().is_some(),
                        QuestionKind::Likert(_) => value.as_number().is_some(),
                        _ => value.as_text().is_some(),
                    };
                    prop_assert!(matches_type);
                }
                Ok(None) => prop_assert!(!required),
                Err(AnswerRejection::MissingRequiredAnswer) => prop_assert!(required),
                Err(_) => {}
            }
        }
    }
}
