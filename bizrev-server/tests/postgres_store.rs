//! PgStore against a real database
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p bizrev-server -- --ignored

use bizrev_server::db::{self, Fields, PgStore, RecordStore, Value};
use bizrev_server::models::{BUSINESS_SCHEMA, REVIEW_SCHEMA};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = db::create_pool(&url).await.expect("pool creation failed");
    db::migrations::run(&pool).await.expect("migrations failed");
    PgStore::new(pool)
}

fn business(owner_id: i64, name: &str) -> Fields {
    Fields::new()
        .with("owner_id", owner_id)
        .with("name", name)
        .with("street_address", "1 Main St")
        .with("city", "Corvallis")
        .with("state", "OR")
        .with("zip_code", "97331")
}

// Owner ids unlikely to collide with other data in a shared test database
fn unique_owner() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64 & 0x7fff_ffff_ffff)
        .unwrap_or(1)
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_read_update_delete() {
    let store = store().await;
    let id = store
        .create_record(&BUSINESS_SCHEMA, &business(unique_owner(), "Cafe"))
        .await
        .unwrap();

    let row = store.read_record(&BUSINESS_SCHEMA, id).await.unwrap().unwrap();
    assert_eq!(row.text("name").unwrap(), "Cafe");

    let patch = Fields::new().with("name", "New Cafe");
    assert_eq!(store.update_record(&BUSINESS_SCHEMA, id, &patch).await.unwrap(), 1);
    let row = store.read_record(&BUSINESS_SCHEMA, id).await.unwrap().unwrap();
    assert_eq!(row.text("name").unwrap(), "New Cafe");
    assert_eq!(row.text("city").unwrap(), "Corvallis");

    assert_eq!(store.delete_record(&BUSINESS_SCHEMA, id).await.unwrap(), 1);
    assert_eq!(store.delete_record(&BUSINESS_SCHEMA, id).await.unwrap(), 0);
    assert!(store.read_record(&BUSINESS_SCHEMA, id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn filtered_read_in_insertion_order() {
    let store = store().await;
    let owner = unique_owner();
    let a = store.create_record(&BUSINESS_SCHEMA, &business(owner, "A")).await.unwrap();
    store.create_record(&BUSINESS_SCHEMA, &business(owner + 1, "B")).await.unwrap();
    let c = store.create_record(&BUSINESS_SCHEMA, &business(owner, "C")).await.unwrap();

    let rows = store
        .read_filtered(&BUSINESS_SCHEMA, &Fields::new().with("owner_id", owner))
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![a, c]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn injection_attempt_is_just_data() {
    let store = store().await;
    let hostile = "x'); DROP TABLE businesses; --";
    let rows = store
        .read_filtered(&BUSINESS_SCHEMA, &Fields::new().with("name", hostile))
        .await
        .unwrap();
    assert!(rows.is_empty());

    // Table still there
    store.ping().await.unwrap();
    store
        .read_filtered(&BUSINESS_SCHEMA, &Fields::new().with("owner_id", -1_i64))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn null_review_text_round_trips() {
    let store = store().await;
    let fields = Fields::new()
        .with("user_id", unique_owner())
        .with("business_id", 1_i64)
        .with("stars", 3_i64)
        .with("review_text", Value::Null);

    let id = store.create_record(&REVIEW_SCHEMA, &fields).await.unwrap();
    let row = store.read_record(&REVIEW_SCHEMA, id).await.unwrap().unwrap();
    assert_eq!(row.opt_text("review_text").unwrap(), None);

    store.delete_record(&REVIEW_SCHEMA, id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn second_review_for_same_pair_is_duplicate() {
    let store = store().await;
    let fields = Fields::new()
        .with("user_id", unique_owner())
        .with("business_id", 1_i64)
        .with("stars", 4_i64);

    let id = store.create_record(&REVIEW_SCHEMA, &fields).await.unwrap();
    let err = store.create_record(&REVIEW_SCHEMA, &fields).await.unwrap_err();
    assert!(matches!(err, db::DbError::Duplicate { table: "reviews" }));

    store.delete_record(&REVIEW_SCHEMA, id).await.unwrap();
}
