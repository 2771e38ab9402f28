//! Listing queries against a real Postgres.
//!
//! Run with:
//! TEST_DATABASE_URL=postgres://... cargo test --test list_filters -- --ignored
use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use ward_api::repos::filter::{Page, SortDirection};
use ward_api::repos::patient_repo::PatientFilter;
use ward_api::repos::record_repo::RecordFilter;
use ward_api::repos::user_repo::UserFilter;
use ward_api::services::auth::{Role, TokenCodec};
use ward_api::services::patient_service::{PatientInput, PatientService};
use ward_api::services::record_service::RecordService;
use ward_api::services::user_service::UserService;

async fn pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let db = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect");
    sqlx::migrate!("./migrations").run(&db).await.expect("migrate");
    db
}

fn unique(range_start: i64, span: i64) -> i64 {
    let n = (uuid::Uuid::new_v4().as_u128() % span as u128) as i64;
    range_start + n
}

fn users(db: &PgPool) -> UserService {
    let tokens = Arc::new(TokenCodec::new(b"integration-secret").unwrap());
    UserService::new(db.clone(), tokens, chrono::Duration::hours(2))
}

async fn register_patient(service: &PatientService, name: &str) -> i64 {
    let identity_number = unique(1_000_000_000_000_000, 8_000_000_000_000_000);
    service
        .register(&PatientInput {
            identity_number,
            phone_number: "+628123456789",
            name,
            birth_date: "1990-04-01T00:00:00Z".parse().unwrap(),
            gender: "female",
            identity_card_url: "https://cdn.example.com/ktp.jpg",
        })
        .await
        .unwrap();
    identity_number
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn name_search_finds_the_single_jane_among_ten() {
    let db = pool().await;
    let patients = PatientService::new(db.clone());

    // Names carry a per-run marker so rows left by earlier runs never match.
    let marker = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
    let jane = format!("Jane Doe {marker}");
    register_patient(&patients, &jane).await;
    for i in 0..9 {
        register_patient(&patients, &format!("Other{i} {marker}")).await;
    }

    let filter = PatientFilter {
        name: Some(format!("jane doe {marker}")),
        created_at: SortDirection::from_param(Some("asc")),
        page: Page::from_params(Some("0"), Some("5")),
        ..Default::default()
    };

    let first = patients.list(&filter).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, jane);

    // same filter, unchanged store, same ordered rows
    let second = patients.list(&filter).await.unwrap();
    let ids = |rows: &[ward_api::repos::patient_repo::PatientRow]| {
        rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn empty_filter_returns_at_most_limit_rows_newest_first() {
    let db = pool().await;
    let patients = PatientService::new(db.clone());
    for i in 0..6 {
        register_patient(&patients, &format!("Filler {i}")).await;
    }

    let rows = patients.list(&PatientFilter {
        created_at: SortDirection::from_param(None),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn duplicate_identity_number_is_a_conflict() {
    let db = pool().await;
    let patients = PatientService::new(db.clone());

    let identity_number = register_patient(&patients, "Duplicate Patient").await;
    let err = patients
        .register(&PatientInput {
            identity_number,
            phone_number: "+628123456789",
            name: "Duplicate Again",
            birth_date: "1990-04-01T00:00:00Z".parse().unwrap(),
            gender: "male",
            identity_card_url: "https://cdn.example.com/ktp.jpg",
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ward_api::services::patient_service::PatientError::IdentityNumberAlreadyExists
    ));
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn user_filters_are_combined_with_and() {
    let db = pool().await;
    let service = users(&db);

    // 615 1 2001 05 + 5 random digits => 15 digits, unique per run
    let nip = 615_1_2001_05_00000 + unique(0, 100_000);
    let it = service
        .register_it(nip, "Operator Person", "secret123")
        .await
        .unwrap();
    assert!(it.access_token.is_some());

    let matching = UserFilter {
        user_id: Some(it.user.id.clone()),
        role: Some(Role::Operator),
        ..Default::default()
    };
    let rows = service.list(&matching).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nip, nip);

    let contradicting = UserFilter {
        user_id: Some(it.user.id.clone()),
        role: Some(Role::Caregiver),
        ..Default::default()
    };
    assert!(service.list(&contradicting).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn records_outlive_their_deleted_author() {
    let db = pool().await;
    let service = users(&db);
    let patients = PatientService::new(db.clone());
    let records = RecordService::new(db.clone());

    let nip = 303_2_2005_12_00000 + unique(0, 100_000);
    let nurse = service
        .register_nurse(nip, "Nurse Person", "https://cdn.example.com/ktp.jpg")
        .await
        .unwrap();
    service
        .grant_nurse_access(&nurse.id, "secret123")
        .await
        .unwrap();
    let login = service
        .login(Role::Caregiver, nip, "secret123")
        .await
        .unwrap();
    assert!(login.access_token.is_some());

    let identity_number = register_patient(&patients, "Record Patient").await;
    records
        .create(&nurse.id, identity_number, "fever", "paracetamol")
        .await
        .unwrap();

    let by_author = RecordFilter {
        creator_id: Some(nurse.id.clone()),
        ..Default::default()
    };
    let rows = records.list(&by_author).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].creator_nip, Some(nip));

    service.delete_nurse(&nurse.id).await.unwrap();

    let by_patient = RecordFilter {
        identity_number: Some(identity_number.to_string()),
        ..Default::default()
    };
    let rows = records.list(&by_patient).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].creator_id, None);
    assert_eq!(rows[0].patient_identity_number, identity_number);
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn record_by_deleted_author_is_not_found() {
    let db = pool().await;
    let service = users(&db);
    let patients = PatientService::new(db.clone());
    let records = RecordService::new(db.clone());

    let nip = 303_1_2010_03_00000 + unique(0, 100_000);
    let nurse = service
        .register_nurse(nip, "Gone Nurse", "https://cdn.example.com/ktp.jpg")
        .await
        .unwrap();
    service.delete_nurse(&nurse.id).await.unwrap();

    // the deleted nurse's token would still pass the gate until it expires
    let identity_number = register_patient(&patients, "Orphan Patient").await;
    let err = records
        .create(&nurse.id, identity_number, "cough", "rest")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ward_api::services::record_service::RecordError::AuthorNotFound
    ));
}
