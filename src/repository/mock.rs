//! Mock repository used to isolate services in tests.

use mockall::mock;

use crate::domain::master_data::{MasterKind, MasterRecord, NewMasterRecord, UpdateMasterRecord};
use crate::domain::submission::{NewSubmission, Submission};
use crate::domain::types::{MasterRecordId, SubmissionId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    MasterRecordListQuery, MasterRecordReader, MasterRecordWriter, SubmissionListQuery,
    SubmissionReader, SubmissionWriter,
};

mock! {
    pub Repository {}

    impl MasterRecordReader for Repository {
        fn get_master_record(
            &self,
            kind: MasterKind,
            id: MasterRecordId,
        ) -> RepositoryResult<Option<MasterRecord>>;
        fn list_master_records(
            &self,
            query: MasterRecordListQuery,
        ) -> RepositoryResult<(usize, Vec<MasterRecord>)>;
    }

    impl MasterRecordWriter for Repository {
        fn create_master_record(&self, record: &NewMasterRecord) -> RepositoryResult<MasterRecord>;
        fn update_master_record(
            &self,
            kind: MasterKind,
            id: MasterRecordId,
            updates: &UpdateMasterRecord,
        ) -> RepositoryResult<MasterRecord>;
        fn delete_master_record(&self, kind: MasterKind, id: MasterRecordId) -> RepositoryResult<()>;
    }

    impl SubmissionReader for Repository {
        fn get_submission(&self, id: SubmissionId) -> RepositoryResult<Option<Submission>>;
        fn list_submissions(
            &self,
            query: SubmissionListQuery,
        ) -> RepositoryResult<(usize, Vec<Submission>)>;
    }

    impl SubmissionWriter for Repository {
        fn create_submission(&self, submission: &NewSubmission) -> RepositoryResult<Submission>;
    }
}
