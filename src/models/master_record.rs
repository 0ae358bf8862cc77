//! Diesel models representing master-data records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::master_data::{
    MasterRecord as DomainMasterRecord, NewMasterRecord as DomainNewMasterRecord,
    UpdateMasterRecord as DomainUpdateMasterRecord,
};
use crate::domain::types::{MasterCode, MasterName, MasterRecordId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::master_records)]
/// Diesel model for [`crate::domain::master_data::MasterRecord`].
pub struct MasterRecord {
    pub id: i32,
    pub kind: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::master_records)]
/// Insertable form of [`MasterRecord`].
pub struct NewMasterRecord<'a> {
    pub kind: &'a str,
    pub code: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::master_records)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`MasterRecord`].
pub struct UpdateMasterRecord<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MasterRecord> for DomainMasterRecord {
    type Error = TypeConstraintError;

    fn try_from(record: MasterRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MasterRecordId::try_from(record.id)?,
            kind: record.kind.parse()?,
            code: MasterCode::new(record.code)?,
            name: MasterName::new(record.name)?,
            description: record.description,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMasterRecord> for NewMasterRecord<'a> {
    fn from(record: &'a DomainNewMasterRecord) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            kind: record.kind.as_str(),
            code: record.code.as_str(),
            name: record.name.as_str(),
            description: record.description.as_deref(),
            is_active: record.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> From<&'a DomainUpdateMasterRecord> for UpdateMasterRecord<'a> {
    fn from(record: &'a DomainUpdateMasterRecord) -> Self {
        Self {
            code: record.code.as_str(),
            name: record.name.as_str(),
            description: record.description.as_deref(),
            is_active: record.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
