//! Repository implementation for stored form submissions.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::submission::{NewSubmission, Submission};
use crate::domain::types::SubmissionId;
use crate::models::submission::{NewSubmission as DbNewSubmission, Submission as DbSubmission};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SubmissionListQuery, SubmissionReader, SubmissionWriter};
use crate::schema::form_submissions;

fn filtered_submissions(query: &SubmissionListQuery) -> form_submissions::BoxedQuery<'_, Sqlite> {
    let mut items = form_submissions::table
        .filter(form_submissions::form.eq(query.form.as_str()))
        .into_boxed();
    if let Some(reference) = query.reference.as_deref() {
        items = items.filter(form_submissions::reference.eq(reference));
    }
    items
}

impl SubmissionReader for DieselRepository {
    fn get_submission(&self, id: SubmissionId) -> RepositoryResult<Option<Submission>> {
        let mut conn = self.conn()?;
        let submission = form_submissions::table
            .find(id.get())
            .first::<DbSubmission>(&mut conn)
            .optional()?;

        submission
            .map(|s| Submission::try_from(s).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_submissions(
        &self,
        query: SubmissionListQuery,
    ) -> RepositoryResult<(usize, Vec<Submission>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered_submissions(&query).count().get_result(&mut conn)?;

        let mut items = filtered_submissions(&query).order((
            form_submissions::created_at.desc(),
            form_submissions::id.desc(),
        ));
        if let Some(pagination) = query.pagination {
            items = items
                .limit(pagination.size as i64)
                .offset(pagination.offset() as i64);
        }

        let submissions = items
            .load::<DbSubmission>(&mut conn)?
            .into_iter()
            .map(|s| Submission::try_from(s).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok((total as usize, submissions))
    }
}

impl SubmissionWriter for DieselRepository {
    fn create_submission(&self, submission: &NewSubmission) -> RepositoryResult<Submission> {
        let mut conn = self.conn()?;
        let insertable: DbNewSubmission = submission.into();

        let created = diesel::insert_into(form_submissions::table)
            .values(&insertable)
            .get_result::<DbSubmission>(&mut conn)?;

        Submission::try_from(created).map_err(RepositoryError::from)
    }
}
