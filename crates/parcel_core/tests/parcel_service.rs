use parcel_core::db::open_db_in_memory;
use parcel_core::{ParcelService, ParcelStatus, RepoError, SqliteParcelRepository};

#[test]
fn register_stores_a_registered_parcel() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn).unwrap());

    let registered = service.register(1000, "test").unwrap();

    assert!(registered.number > 0);
    assert_eq!(registered.status, ParcelStatus::Registered);
    assert_eq!(service.get(registered.number).unwrap(), registered);
}

#[test]
fn service_wraps_repository_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn).unwrap());

    let first = service.register(42, "first").unwrap();
    let second = service.register(42, "second").unwrap();
    service.register(7, "other client").unwrap();

    service.set_address(first.number, "moved").unwrap();
    service.set_status(second.number, ParcelStatus::Sent).unwrap();

    let mut parcels = service.get_by_client(42).unwrap();
    parcels.sort_by_key(|parcel| parcel.number);
    assert_eq!(parcels.len(), 2);
    assert_eq!(parcels[0].address, "moved");
    assert_eq!(parcels[1].status, ParcelStatus::Sent);

    service.delete(first.number).unwrap();
    assert!(matches!(
        service.get(first.number),
        Err(RepoError::NotFound(id)) if id == first.number
    ));
    assert_eq!(service.get_by_client(42).unwrap().len(), 1);
}

#[test]
fn add_keeps_caller_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn).unwrap());

    let mut parcel = parcel_core::Parcel::new(3, "depot");
    parcel.status = ParcelStatus::Delivered;
    parcel.created_at = "2020-01-01T00:00:00+03:00".to_string();

    let id = service.add(&parcel).unwrap();
    let stored = service.get(id).unwrap();
    assert_eq!(stored.status, ParcelStatus::Delivered);
    assert_eq!(stored.created_at, "2020-01-01T00:00:00+03:00");
}
