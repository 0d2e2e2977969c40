//! RegisterRespondentHandler - Command handler for registering a student or
//! teacher.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{RespondentId, SectionId, ValidationError};
use crate::domain::respondent::{Respondent, RespondentKind, MAX_DISPLAY_NAME_LENGTH};
use crate::domain::survey::SurveyError;
use crate::ports::RespondentRepository;

#[derive(Debug, Clone)]
pub struct RegisterRespondentCommand {
    pub display_name: String,
    pub kind: RespondentKind,
    /// Required for students, forbidden for teachers.
    pub section_id: Option<SectionId>,
}

pub struct RegisterRespondentHandler {
    respondents: Arc<dyn RespondentRepository>,
}

impl RegisterRespondentHandler {
    pub fn new(respondents: Arc<dyn RespondentRepository>) -> Self {
        Self { respondents }
    }

    pub async fn handle(&self, cmd: RegisterRespondentCommand) -> Result<Respondent, SurveyError> {
        ValidationError::check_text("display_name", &cmd.display_name, MAX_DISPLAY_NAME_LENGTH)?;

        let id = RespondentId::new();
        let respondent = match (cmd.kind, cmd.section_id) {
            (RespondentKind::Student, Some(section_id)) => {
                Respondent::student(id, cmd.display_name, section_id)
            }
            (RespondentKind::Student, None) => {
                return Err(SurveyError::invalid("section_id", "students must belong to a section"))
            }
            (RespondentKind::Teacher, None) => Respondent::teacher(id, cmd.display_name),
            (RespondentKind::Teacher, Some(_)) => {
                return Err(SurveyError::invalid("section_id", "teachers do not belong to a section"))
            }
        };

        self.respondents.save(&respondent).await?;
        info!(respondent_id = %respondent.id(), kind = %respondent.kind(), "Respondent registered");
        Ok(respondent)
    }
}
