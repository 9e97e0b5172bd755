use rooming_core::db::open_db_in_memory;
use rooming_core::model::manager::ManagerPatch;
use rooming_core::{
    EntityKind, ErrorKind, ManagerService, ServiceError, SqliteManagerRepository, ValidationError,
};
use rusqlite::Connection;

fn managers(conn: &Connection) -> ManagerService<SqliteManagerRepository<'_>> {
    ManagerService::new(SqliteManagerRepository::new(conn))
}

#[test]
fn register_and_lookup_by_id_and_username() {
    let conn = open_db_in_memory().unwrap();
    let managers = managers(&conn);

    let profile = managers.register_manager(" mira ", "$argon2id$hash").unwrap();
    assert_eq!(profile.username, "mira");

    assert_eq!(managers.get_manager(profile.id).unwrap(), profile);
    assert_eq!(managers.find_manager_by_username("mira").unwrap(), profile);
    assert!(matches!(
        managers.find_manager_by_username("nobody").unwrap_err(),
        ServiceError::UnknownName {
            kind: EntityKind::Manager,
            ..
        }
    ));
    assert_eq!(
        managers.get_manager(999).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn credential_is_only_exposed_through_credential_lookup() {
    let conn = open_db_in_memory().unwrap();
    let managers = managers(&conn);
    let profile = managers.register_manager("mira", "$argon2id$hash").unwrap();

    let json = serde_json::to_value(&profile).unwrap();
    assert!(json.get("credentialHash").is_none());
    assert_eq!(json["username"], "mira");

    let credential = managers.credential_for("mira").unwrap().unwrap();
    assert_eq!(credential.id, profile.id);
    assert_eq!(credential.credential_hash, "$argon2id$hash");
    assert!(managers.credential_for("otto").unwrap().is_none());
}

#[test]
fn registration_rejects_blank_input_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let managers = managers(&conn);
    managers.register_manager("mira", "hash").unwrap();

    assert!(matches!(
        managers.register_manager("  ", "hash").unwrap_err(),
        ServiceError::InvalidInput(ValidationError::BlankField("username"))
    ));
    assert!(matches!(
        managers.register_manager("otto", " ").unwrap_err(),
        ServiceError::InvalidInput(ValidationError::BlankField("credential_hash"))
    ));
    assert!(matches!(
        managers.register_manager("mira", "other").unwrap_err(),
        ServiceError::Conflict {
            kind: EntityKind::Manager,
            ..
        }
    ));
}

#[test]
fn profile_update_requires_a_field() {
    let conn = open_db_in_memory().unwrap();
    let managers = managers(&conn);
    let mira = managers.register_manager("mira", "hash-1").unwrap();
    managers.register_manager("otto", "hash-2").unwrap();

    let err = managers
        .update_manager_profile(mira.id, ManagerPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::NothingToUpdate)
    ));

    let err = managers
        .update_manager_profile(
            mira.id,
            ManagerPatch {
                username: Some("otto".to_string()),
                credential_hash: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let updated = managers
        .update_manager_profile(
            mira.id,
            ManagerPatch {
                username: Some("mira-k".to_string()),
                credential_hash: Some("hash-3".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.username, "mira-k");
    assert_eq!(
        managers
            .credential_for("mira-k")
            .unwrap()
            .unwrap()
            .credential_hash,
        "hash-3"
    );

    let err = managers
        .update_manager_profile(
            404,
            ManagerPatch {
                username: Some("ghost".to_string()),
                credential_hash: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
