//! Question entity and its per-type configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{QuestionId, SurveyId, ValidationError};

/// Maximum length for a single multiple choice label.
pub const MAX_CHOICE_LENGTH: usize = 200;

/// Default likert bounds when a question does not specify them.
pub const DEFAULT_LIKERT_MIN: i32 = 1;
pub const DEFAULT_LIKERT_MAX: i32 = 5;

/// Largest allowed `max - min` for a likert scale. Analytics report one
/// bucket per point.
pub const MAX_LIKERT_SPAN: i64 = 100;

/// Flat question type, used for storage and transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Likert,
    ShortAnswer,
    LongAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Likert => "likert",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::LongAnswer => "long_answer",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "likert" | "likert_scale" => Ok(QuestionType::Likert),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            "long_answer" => Ok(QuestionType::LongAnswer),
            other => Err(ValidationError::invalid_format(
                "question_type",
                format!("unknown question type '{}'", other),
            )),
        }
    }
}

/// Display label attached to one point of a likert scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLabel {
    pub value: i32,
    pub label: String,
}

/// Inclusive integer scale for likert questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertScale {
    pub min: i32,
    pub max: i32,
    #[serde(default)]
    pub labels: Vec<ScaleLabel>,
}

impl LikertScale {
    /// Creates a scale, checking `min < max`, that the span is at most
    /// [`MAX_LIKERT_SPAN`] and that every label lies in range.
    pub fn new(min: i32, max: i32, labels: Vec<ScaleLabel>) -> Result<Self, ValidationError> {
        let scale = Self { min, max, labels };
        scale.validate()?;
        Ok(scale)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Iterates every integer point of the scale in ascending order.
    pub fn points(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }

    pub fn label_for(&self, value: i32) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.value == value)
            .map(|l| l.label.as_str())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.min >= self.max {
            return Err(ValidationError::invalid_format(
                "likert",
                format!("min ({}) must be less than max ({})", self.min, self.max),
            ));
        }
        let span = i64::from(self.max) - i64::from(self.min);
        if span > MAX_LIKERT_SPAN {
            return Err(ValidationError::invalid_format(
                "likert",
                format!("scale spans {} points, at most {} allowed", span + 1, MAX_LIKERT_SPAN + 1),
            ));
        }
        let mut seen = HashSet::new();
        for label in &self.labels {
            if !self.contains(label.value) {
                return Err(ValidationError::invalid_format(
                    "likert.labels",
                    format!("label value {} is outside [{}, {}]", label.value, self.min, self.max),
                ));
            }
            if !seen.insert(label.value) {
                return Err(ValidationError::invalid_format(
                    "likert.labels",
                    format!("duplicate label for value {}", label.value),
                ));
            }
        }
        Ok(())
    }
}

impl Default for LikertScale {
    fn default() -> Self {
        Self {
            min: DEFAULT_LIKERT_MIN,
            max: DEFAULT_LIKERT_MAX,
            labels: Vec::new(),
        }
    }
}

/// Question type together with its type-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice { choices: Vec<String> },
    Likert(LikertScale),
    ShortAnswer,
    LongAnswer,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::Likert(_) => QuestionType::Likert,
            QuestionKind::ShortAnswer => QuestionType::ShortAnswer,
            QuestionKind::LongAnswer => QuestionType::LongAnswer,
        }
    }

    /// Checks the type configuration.
    ///
    /// Multiple choice needs at least two unique, non-blank labels; likert
    /// scales need `min < max`, a bounded span and labels in range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            QuestionKind::MultipleChoice { choices } => {
                if choices.len() < 2 {
                    return Err(ValidationError::invalid_format(
                        "choices",
                        "multiple choice questions need at least two choices",
                    ));
                }
                let mut seen = HashSet::new();
                for choice in choices {
                    ValidationError::check_text("choices", choice, MAX_CHOICE_LENGTH)?;
                    if !seen.insert(choice.as_str()) {
                        return Err(ValidationError::invalid_format(
                            "choices",
                            format!("duplicate choice '{}'", choice),
                        ));
                    }
                }
                Ok(())
            }
            QuestionKind::Likert(scale) => scale.validate(),
            QuestionKind::ShortAnswer | QuestionKind::LongAnswer => Ok(()),
        }
    }
}

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    survey_id: SurveyId,
    text: String,
    kind: QuestionKind,
    is_required: bool,
    order: u32,
}

impl Question {
    /// Creates a validated question.
    pub fn new(
        id: QuestionId,
        survey_id: SurveyId,
        text: impl Into<String>,
        kind: QuestionKind,
        is_required: bool,
        order: u32,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        kind.validate()?;

        Ok(Self {
            id,
            survey_id,
            text,
            kind,
            is_required,
            order,
        })
    }

    /// Reconstitute a question from persistence (no validation).
    pub fn reconstitute(
        id: QuestionId,
        survey_id: SurveyId,
        text: String,
        kind: QuestionKind,
        is_required: bool,
        order: u32,
    ) -> Self {
        Self {
            id,
            survey_id,
            text,
            kind,
            is_required,
            order,
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn survey_id(&self) -> &SurveyId {
        &self.survey_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub(crate) fn redefine(
        &mut self,
        text: String,
        kind: QuestionKind,
        is_required: bool,
    ) -> Result<(), ValidationError> {
        let replacement = Question::new(self.id, self.survey_id, text, kind, is_required, self.order)?;
        *self = replacement;
        Ok(())
    }
}
