//! Services backing the master-data administration endpoints.

use serde::Deserialize;

use crate::domain::master_data::{MasterKind, MasterRecord, OptionRecord};
use crate::domain::types::MasterRecordId;
use crate::forms::master_data::MasterRecordForm;
use crate::pagination::{Page, Pagination};
use crate::repository::{MasterRecordListQuery, MasterRecordReader, MasterRecordWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters of the master-data list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterListParams {
    /// Free-text filter on code and name.
    pub q: Option<String>,
    /// Zero based page index.
    pub page: Option<usize>,
    pub size: Option<usize>,
    #[serde(default)]
    pub active_only: bool,
}

/// Page size limits taken from the server configuration.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_size: usize,
    pub max_size: usize,
}

impl PageLimits {
    pub fn resolve(&self, page: Option<usize>, size: Option<usize>) -> Pagination {
        Pagination::new(page, size.or(Some(self.default_size)), self.max_size)
    }
}

/// Unknown kinds are reported as missing resources.
pub fn parse_kind(kind: &str) -> ServiceResult<MasterKind> {
    kind.parse().map_err(|_| ServiceError::NotFound)
}

fn parse_id(id: i32) -> ServiceResult<MasterRecordId> {
    MasterRecordId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Returns one page of records of `kind`, ordered by name.
pub fn list_master_records<R>(
    repo: &R,
    kind: &str,
    params: MasterListParams,
    limits: PageLimits,
) -> ServiceResult<Page<MasterRecord>>
where
    R: MasterRecordReader + ?Sized,
{
    let kind = parse_kind(kind)?;
    let pagination = limits.resolve(params.page, params.size);

    let mut query = MasterRecordListQuery::new(kind).paginate(pagination);
    if let Some(term) = params.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()) {
        query = query.search(term);
    }
    if params.active_only {
        query = query.active_only();
    }

    let (total, records) = repo.list_master_records(query).map_err(|e| {
        log::error!("Failed to list {kind} records: {e}");
        ServiceError::from(e)
    })?;

    Ok(Page::new(records, total, pagination))
}

/// Active records of `kind` shaped for select inputs.
pub fn master_options<R>(repo: &R, kind: &str) -> ServiceResult<Vec<OptionRecord>>
where
    R: MasterRecordReader + ?Sized,
{
    let kind = parse_kind(kind)?;
    let (_, records) = repo.list_master_records(MasterRecordListQuery::new(kind).active_only())?;
    Ok(records.iter().map(OptionRecord::from).collect())
}

pub fn get_master_record<R>(repo: &R, kind: &str, id: i32) -> ServiceResult<MasterRecord>
where
    R: MasterRecordReader + ?Sized,
{
    let kind = parse_kind(kind)?;
    repo.get_master_record(kind, parse_id(id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form and stores a new record of `kind`.
pub fn create_master_record<R>(
    repo: &R,
    kind: &str,
    form: MasterRecordForm,
) -> ServiceResult<MasterRecord>
where
    R: MasterRecordWriter + ?Sized,
{
    let kind = parse_kind(kind)?;
    let new_record = form.into_new_record(kind)?;

    let created = repo.create_master_record(&new_record)?;
    log::info!("Created {kind} record {}", created.code);
    Ok(created)
}

pub fn update_master_record<R>(
    repo: &R,
    kind: &str,
    id: i32,
    form: MasterRecordForm,
) -> ServiceResult<MasterRecord>
where
    R: MasterRecordWriter + ?Sized,
{
    let kind = parse_kind(kind)?;
    let id = parse_id(id)?;
    let updates = form.into_update()?;

    let updated = repo.update_master_record(kind, id, &updates)?;
    log::info!("Updated {kind} record {id}");
    Ok(updated)
}

pub fn delete_master_record<R>(repo: &R, kind: &str, id: i32) -> ServiceResult<()>
where
    R: MasterRecordWriter + ?Sized,
{
    let kind = parse_kind(kind)?;
    let id = parse_id(id)?;
    repo.delete_master_record(kind, id)?;
    log::info!("Deleted {kind} record {id}");
    Ok(())
}
