//! Repository implementation for master-data records.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::master_data::{MasterKind, MasterRecord, NewMasterRecord, UpdateMasterRecord};
use crate::domain::types::MasterRecordId;
use crate::models::master_record::{
    MasterRecord as DbMasterRecord, NewMasterRecord as DbNewMasterRecord,
    UpdateMasterRecord as DbUpdateMasterRecord,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, MasterRecordListQuery, MasterRecordReader, MasterRecordWriter,
};
use crate::schema::master_records;

/// Makes `%` and `_` in a search term match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn filtered_records(query: &MasterRecordListQuery) -> master_records::BoxedQuery<'_, Sqlite> {
    let mut items = master_records::table
        .filter(master_records::kind.eq(query.kind.as_str()))
        .into_boxed();

    if query.active_only {
        items = items.filter(master_records::is_active.eq(true));
    }

    if let Some(term) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        let pattern = format!("%{}%", escape_like(term));
        items = items.filter(
            master_records::code
                .like(pattern.clone())
                .escape('\\')
                .or(master_records::name.like(pattern).escape('\\')),
        );
    }

    items
}

impl MasterRecordReader for DieselRepository {
    fn get_master_record(
        &self,
        kind: MasterKind,
        id: MasterRecordId,
    ) -> RepositoryResult<Option<MasterRecord>> {
        let mut conn = self.conn()?;
        let record = master_records::table
            .filter(master_records::id.eq(id.get()))
            .filter(master_records::kind.eq(kind.as_str()))
            .first::<DbMasterRecord>(&mut conn)
            .optional()?;

        match record {
            Some(record) => Ok(Some(
                MasterRecord::try_from(record).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_master_records(
        &self,
        query: MasterRecordListQuery,
    ) -> RepositoryResult<(usize, Vec<MasterRecord>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered_records(&query).count().get_result(&mut conn)?;

        let mut items = filtered_records(&query).order((
            master_records::name.asc(),
            master_records::id.asc(),
        ));
        if let Some(pagination) = query.pagination {
            items = items
                .limit(pagination.size as i64)
                .offset(pagination.offset() as i64);
        }

        let records = items
            .load::<DbMasterRecord>(&mut conn)?
            .into_iter()
            .map(|record| MasterRecord::try_from(record).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok((total as usize, records))
    }
}

impl MasterRecordWriter for DieselRepository {
    fn create_master_record(&self, record: &NewMasterRecord) -> RepositoryResult<MasterRecord> {
        let mut conn = self.conn()?;
        let insertable: DbNewMasterRecord = record.into();

        let created = diesel::insert_into(master_records::table)
            .values(&insertable)
            .get_result::<DbMasterRecord>(&mut conn)?;

        MasterRecord::try_from(created).map_err(RepositoryError::from)
    }

    fn update_master_record(
        &self,
        kind: MasterKind,
        id: MasterRecordId,
        updates: &UpdateMasterRecord,
    ) -> RepositoryResult<MasterRecord> {
        let mut conn = self.conn()?;
        let changes: DbUpdateMasterRecord = updates.into();

        let updated = diesel::update(
            master_records::table
                .filter(master_records::id.eq(id.get()))
                .filter(master_records::kind.eq(kind.as_str())),
        )
        .set(&changes)
        .get_result::<DbMasterRecord>(&mut conn)?;

        MasterRecord::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_master_record(&self, kind: MasterKind, id: MasterRecordId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            master_records::table
                .filter(master_records::id.eq(id.get()))
                .filter(master_records::kind.eq(kind.as_str())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
