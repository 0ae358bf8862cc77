use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::master_data::{MasterKind, MasterRecord, NewMasterRecord, UpdateMasterRecord};
use crate::domain::submission::{FormKind, NewSubmission, Submission};
use crate::domain::types::{MasterRecordId, SubmissionId};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod master_record;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod submission;

/// Diesel backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRecordListQuery {
    pub kind: MasterKind,
    /// Case-insensitive match against code and name.
    pub search: Option<String>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl MasterRecordListQuery {
    pub fn new(kind: MasterKind) -> Self {
        Self {
            kind,
            search: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionListQuery {
    pub form: FormKind,
    pub reference: Option<String>,
    pub pagination: Option<Pagination>,
}

impl SubmissionListQuery {
    pub fn new(form: FormKind) -> Self {
        Self {
            form,
            reference: None,
            pagination: None,
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

pub trait MasterRecordReader {
    fn get_master_record(
        &self,
        kind: MasterKind,
        id: MasterRecordId,
    ) -> RepositoryResult<Option<MasterRecord>>;
    /// Returns the total number of matches and the requested page.
    fn list_master_records(
        &self,
        query: MasterRecordListQuery,
    ) -> RepositoryResult<(usize, Vec<MasterRecord>)>;
}

pub trait MasterRecordWriter {
    fn create_master_record(&self, record: &NewMasterRecord) -> RepositoryResult<MasterRecord>;
    fn update_master_record(
        &self,
        kind: MasterKind,
        id: MasterRecordId,
        updates: &UpdateMasterRecord,
    ) -> RepositoryResult<MasterRecord>;
    fn delete_master_record(&self, kind: MasterKind, id: MasterRecordId) -> RepositoryResult<()>;
}

pub trait SubmissionReader {
    fn get_submission(&self, id: SubmissionId) -> RepositoryResult<Option<Submission>>;
    fn list_submissions(
        &self,
        query: SubmissionListQuery,
    ) -> RepositoryResult<(usize, Vec<Submission>)>;
}

pub trait SubmissionWriter {
    fn create_submission(&self, submission: &NewSubmission) -> RepositoryResult<Submission>;
}
