use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rooming_core::db::open_db_in_memory;
use rooming_core::{
    AssignmentService, CreateAssignmentRequest, ErrorKind, FixedClock, LedgerService,
    ManagerService, RecordPaymentRequest, RoomService, SqliteAssignmentRepository,
    SqliteLedgerRepository, SqliteManagerRepository, SqliteRoomRepository,
    SqliteSummaryRepository, SqliteTenantRepository, Summary, SummaryService, TenantService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusqlite::Connection;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
}

fn summary_service(conn: &Connection) -> SummaryService<SqliteSummaryRepository<'_>, FixedClock> {
    SummaryService::with_clock(SqliteSummaryRepository::new(conn), FixedClock(now()))
}

struct Seeded {
    room_a: i64,
    ana: i64,
    manager: i64,
}

fn seed_two_rooms_one_tenant(conn: &Connection) -> Seeded {
    let rooms = RoomService::new(SqliteRoomRepository::new(conn));
    let room_a = rooms.create_room("A", None).unwrap().id;
    rooms.create_room("B", None).unwrap();
    let ana = TenantService::new(SqliteTenantRepository::new(conn))
        .create_tenant("Ana", None)
        .unwrap()
        .id;
    let manager = ManagerService::new(SqliteManagerRepository::new(conn))
        .register_manager("mira", "hash")
        .unwrap()
        .id;
    AssignmentService::new(SqliteAssignmentRepository::new(conn))
        .create_assignment(CreateAssignmentRequest::new(
            ana,
            room_a,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        ))
        .unwrap();
    Seeded {
        room_a,
        ana,
        manager,
    }
}

fn pay(conn: &Connection, seeded: &Seeded, amount: Decimal, paid_at: Option<DateTime<Utc>>) {
    let month = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    LedgerService::with_clock(SqliteLedgerRepository::new(conn), FixedClock(now()))
        .record_tenant_transaction(
            seeded.manager,
            RecordPaymentRequest {
                tenant_id: Some(seeded.ana),
                room_id: Some(seeded.room_a),
                amount: Some(amount),
                start_month: Some(month),
                end_month: Some(month),
                payment_date: paid_at,
                notes: None,
            },
        )
        .unwrap();
}

#[test]
fn empty_store_summary_is_all_zero() {
    let conn = open_db_in_memory().unwrap();
    let summary = summary_service(&conn).compute_summary_now().unwrap();

    assert_eq!(
        summary,
        Summary {
            total_rooms: 0,
            occupied_rooms: 0,
            total_tenants: 0,
            total_income_this_month: "0.00".to_string(),
        }
    );
}

#[test]
fn two_rooms_one_occupied_with_two_payments() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed_two_rooms_one_tenant(&conn);
    pay(&conn, &seeded, dec!(300), None);
    pay(&conn, &seeded, dec!(250), None);

    let summary = summary_service(&conn).compute_summary_now().unwrap();
    assert_eq!(summary.total_rooms, 2);
    assert_eq!(summary.occupied_rooms, 1);
    assert_eq!(summary.total_tenants, 1);
    assert_eq!(summary.total_income_this_month, "550.00");
}

#[test]
fn income_window_is_the_whole_calendar_month() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed_two_rooms_one_tenant(&conn);
    pay(
        &conn,
        &seeded,
        dec!(100),
        Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
    );
    pay(
        &conn,
        &seeded,
        dec!(0.10),
        Some(Utc.with_ymd_and_hms(2025, 5, 31, 23, 59, 59).unwrap()),
    );
    pay(
        &conn,
        &seeded,
        dec!(0.20),
        Some(Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap()),
    );
    pay(
        &conn,
        &seeded,
        dec!(999),
        Some(Utc.with_ymd_and_hms(2025, 4, 30, 23, 59, 59).unwrap()),
    );
    pay(
        &conn,
        &seeded,
        dec!(999),
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
    );

    let summary = summary_service(&conn).compute_summary_now().unwrap();
    assert_eq!(summary.total_income_this_month, "100.30");

    let april = summary_service(&conn)
        .compute_summary(Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap())
        .unwrap();
    assert_eq!(april.total_income_this_month, "999.00");
}

#[test]
fn occupied_rooms_counts_active_assignments_not_rooms() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed_two_rooms_one_tenant(&conn);
    let ben = TenantService::new(SqliteTenantRepository::new(&conn))
        .create_tenant("Ben", None)
        .unwrap()
        .id;
    AssignmentService::new(SqliteAssignmentRepository::new(&conn))
        .create_assignment(CreateAssignmentRequest::new(
            ben,
            seeded.room_a,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        ))
        .unwrap();

    let summary = summary_service(&conn).compute_summary_now().unwrap();
    assert_eq!(summary.total_rooms, 2);
    assert_eq!(summary.occupied_rooms, 2);
    assert_eq!(summary.total_tenants, 2);
}

#[test]
fn closed_assignments_are_not_occupied() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed_two_rooms_one_tenant(&conn);
    let assignments = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let current = assignments
        .current_assignment_for(seeded.room_a)
        .unwrap()
        .unwrap();
    assignments
        .close_assignment(
            current.assignment.id,
            Some(NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()),
        )
        .unwrap();

    let summary = summary_service(&conn).compute_summary_now().unwrap();
    assert_eq!(summary.occupied_rooms, 0);
}

#[test]
fn summary_serializes_camel_case() {
    let conn = open_db_in_memory().unwrap();
    let summary = summary_service(&conn).compute_summary_now().unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "totalRooms": 0,
            "occupiedRooms": 0,
            "totalTenants": 0,
            "totalIncomeThisMonth": "0.00"
        })
    );
}

#[test]
fn overflowing_stored_income_is_a_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed_two_rooms_one_tenant(&conn);
    for _ in 0..2 {
        conn.execute(
            "INSERT INTO tenant_transactions
                (tenant_id, room_id, manager_id, amount, start_month, end_month, payment_date)
             VALUES (?1, ?2, ?3, '79228162514264337593543950335', '2025-05-01', '2025-05-01', ?4);",
            rusqlite::params![
                seeded.ana,
                seeded.room_a,
                seeded.manager,
                now().timestamp_millis()
            ],
        )
        .unwrap();
    }

    let err = summary_service(&conn).compute_summary_now().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}
