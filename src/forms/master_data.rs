use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::master_data::{MasterKind, NewMasterRecord, UpdateMasterRecord};
use crate::domain::types::{CODE_RE, MasterCode, MasterName};
use crate::forms::{FormError, sanitize, trimmed, upper};
use crate::validation::FieldErrors;

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Form data for creating or editing a master-data entry.
pub struct MasterRecordForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Code is required"),
        regex(path = *CODE_RE, message = "Code may only contain A-Z, 0-9, _ and - (max 30)")
    )]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required (at most 100 characters)"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl MasterRecordForm {
    pub fn normalize(self) -> Self {
        Self {
            code: upper(&self.code),
            name: trimmed(&self.name),
            description: sanitize(&self.description),
            is_active: self.is_active,
        }
    }

    fn checked(self) -> Result<(MasterCode, MasterName, Option<String>, bool), FormError> {
        let form = self.normalize();
        if let Err(errors) = form.validate() {
            return Err(FormError::Validation(FieldErrors::from(&errors)));
        }

        let mut errors = FieldErrors::new();
        let code = MasterCode::new(form.code.as_str())
            .map_err(|e| errors.insert("code", e.to_string()))
            .ok();
        let name = MasterName::new(form.name.as_str())
            .map_err(|e| errors.insert("name", e.to_string()))
            .ok();
        match (code, name) {
            (Some(code), Some(name)) => Ok((code, name, Some(form.description), form.is_active)),
            _ => Err(FormError::Validation(errors)),
        }
    }

    /// Validates the form and converts it into a record for `kind`.
    pub fn into_new_record(self, kind: MasterKind) -> Result<NewMasterRecord, FormError> {
        let (code, name, description, is_active) = self.checked()?;
        Ok(NewMasterRecord::new(kind, code, name, description, is_active))
    }

    pub fn into_update(self) -> Result<UpdateMasterRecord, FormError> {
        let (code, name, description, is_active) = self.checked()?;
        Ok(UpdateMasterRecord::new(code, name, description, is_active))
    }
}
