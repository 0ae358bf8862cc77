use kyc_backoffice::domain::master_data::{MasterKind, NewMasterRecord, UpdateMasterRecord};
use kyc_backoffice::domain::submission::{FormKind, NewSubmission};
use kyc_backoffice::domain::types::{MasterCode, MasterName, MasterRecordId, SubmissionId};
use kyc_backoffice::pagination::Pagination;
use kyc_backoffice::repository::errors::RepositoryError;
use kyc_backoffice::repository::{
    DieselRepository, MasterRecordListQuery, MasterRecordReader, MasterRecordWriter,
    SubmissionListQuery, SubmissionReader, SubmissionWriter,
};
use serde_json::json;

mod common;

fn new_record(kind: MasterKind, code: &str, name: &str) -> NewMasterRecord {
    NewMasterRecord::new(
        kind,
        MasterCode::new(code).unwrap(),
        MasterName::new(name).unwrap(),
        None,
        true,
    )
}

#[test]
fn test_master_record_repository_crud() {
    let test_db = common::TestDb::new("test_master_record_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let sbi = repo
        .create_master_record(&new_record(MasterKind::Bank, "SBI", "State Bank of India"))
        .unwrap();
    let hdfc = repo
        .create_master_record(&new_record(MasterKind::Bank, "HDFC", "HDFC Bank"))
        .unwrap();
    repo.create_master_record(&new_record(MasterKind::Occupation, "SBI", "Self-employed"))
        .unwrap();

    let (total, items) = repo
        .list_master_records(MasterRecordListQuery::new(MasterKind::Bank))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].code.as_str(), "HDFC");
    assert_eq!(items[1].code.as_str(), "SBI");

    let (search_total, search_items) = repo
        .list_master_records(MasterRecordListQuery::new(MasterKind::Bank).search("state"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].id, sbi.id);

    let updates = UpdateMasterRecord::new(
        hdfc.code.clone(),
        MasterName::new("HDFC Bank Ltd").unwrap(),
        Some("Private sector".into()),
        false,
    );
    let updated = repo
        .update_master_record(MasterKind::Bank, hdfc.id, &updates)
        .unwrap();
    assert_eq!(updated.name.as_str(), "HDFC Bank Ltd");
    assert_eq!(updated.description.as_deref(), Some("Private sector"));
    assert!(!updated.is_active);

    let (active_total, _) = repo
        .list_master_records(MasterRecordListQuery::new(MasterKind::Bank).active_only())
        .unwrap();
    assert_eq!(active_total, 1);

    // A record is only reachable through its own kind.
    assert!(
        repo.get_master_record(MasterKind::Occupation, sbi.id)
            .unwrap()
            .is_none()
    );

    repo.delete_master_record(MasterKind::Bank, sbi.id).unwrap();
    assert!(
        repo.get_master_record(MasterKind::Bank, sbi.id)
            .unwrap()
            .is_none()
    );
    assert!(matches!(
        repo.delete_master_record(MasterKind::Bank, sbi.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_master_record_unique_code_per_kind() {
    let test_db = common::TestDb::new("test_master_record_unique_code_per_kind.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_master_record(&new_record(MasterKind::Relationship, "FATHER", "Father"))
        .unwrap();
    let duplicate =
        repo.create_master_record(&new_record(MasterKind::Relationship, "FATHER", "Dad"));

    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_master_record_update_missing_is_not_found() {
    let test_db = common::TestDb::new("test_master_record_update_missing_is_not_found.db");
    let repo = DieselRepository::new(test_db.pool());

    let updates = UpdateMasterRecord::new(
        MasterCode::new("LOW").unwrap(),
        MasterName::new("Low").unwrap(),
        None,
        true,
    );
    let result = repo.update_master_record(
        MasterKind::RiskCategory,
        MasterRecordId::new(42).unwrap(),
        &updates,
    );
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[test]
fn test_master_record_pagination() {
    let test_db = common::TestDb::new("test_master_record_pagination.db");
    let repo = DieselRepository::new(test_db.pool());

    for (code, name) in [("A1", "Alpha"), ("B2", "Bravo"), ("C3", "Charlie")] {
        repo.create_master_record(&new_record(MasterKind::DocumentType, code, name))
            .unwrap();
    }

    let query = MasterRecordListQuery::new(MasterKind::DocumentType)
        .paginate(Pagination::new(Some(1), Some(2), 100));
    let (total, items) = repo.list_master_records(query).unwrap();

    assert_eq!(total, 3);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name.as_str(), "Charlie");
}

#[test]
fn test_submission_repository() {
    let test_db = common::TestDb::new("test_submission_repository.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_submission(&NewSubmission::new(
            FormKind::Kyc,
            "CUST01",
            json!({ "panNo": "ABCDE1234F" }),
        ))
        .unwrap();
    let second = repo
        .create_submission(&NewSubmission::new(
            FormKind::Kyc,
            "CUST02",
            json!({ "panNo": "PQRSX6789K" }),
        ))
        .unwrap();
    repo.create_submission(&NewSubmission::new(FormKind::Lead, "9123456780", json!({})))
        .unwrap();

    let fetched = repo.get_submission(first.id).unwrap().unwrap();
    assert_eq!(fetched.payload["panNo"], "ABCDE1234F");
    assert_eq!(fetched.form, FormKind::Kyc);

    let (total, items) = repo
        .list_submissions(SubmissionListQuery::new(FormKind::Kyc))
        .unwrap();
    assert_eq!(total, 2);
    // Newest first.
    assert_eq!(items[0].id, second.id);

    let (filtered, items) = repo
        .list_submissions(SubmissionListQuery::new(FormKind::Kyc).reference("CUST01"))
        .unwrap();
    assert_eq!(filtered, 1);
    assert_eq!(items[0].id, first.id);

    assert!(
        repo.get_submission(SubmissionId::new(999).unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_master_record_search_matches_wildcards_literally() {
    let test_db = common::TestDb::new("test_master_record_search_wildcards.db");
    let repo = DieselRepository::new(test_db.pool());

    let underscored = repo
        .create_master_record(&new_record(MasterKind::DocumentType, "A_B", "Form A B"))
        .unwrap();
    repo.create_master_record(&new_record(MasterKind::DocumentType, "AXB", "Form AXB"))
        .unwrap();

    let (total, items) = repo
        .list_master_records(MasterRecordListQuery::new(MasterKind::DocumentType).search("a_b"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, underscored.id);

    let (total, _) = repo
        .list_master_records(MasterRecordListQuery::new(MasterKind::DocumentType).search("%"))
        .unwrap();
    assert_eq!(total, 0);
}
