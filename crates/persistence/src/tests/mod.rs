// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod initialization_tests;

use helpdesk_domain::{NewTicket, PartitionKey, Priority, TicketCode};

use crate::allocator::{AttemptOutcome, attempt_with_code};
use crate::{BackendConnection, Persistence};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Creates the area every test ticket is filed under and returns its id.
pub fn create_test_area(persistence: &mut Persistence) -> i64 {
    persistence
        .create_area("Service Desk", Some("General requests"))
        .expect("area created")
        .area_id
}

pub fn year(year: i32) -> PartitionKey {
    PartitionKey::for_year(year).expect("valid year")
}

pub fn sample_ticket(area_id: i64) -> NewTicket {
    NewTicket::new(
        "Printer on floor 3 is jammed",
        "Paper tray 2 reports a jam after every job.",
        Priority::Normal,
        area_id,
        "jdoe",
    )
}

/// Inserts a ticket with a fixed code, bypassing the scan.
pub fn seed_code(persistence: &mut Persistence, code: &str, area_id: i64) {
    let code: TicketCode = code.parse().expect("valid seed code");
    let BackendConnection::Sqlite(conn) = &mut persistence.conn else {
        panic!("standard tests run on SQLite");
    };

    match attempt_with_code(conn, &code, &sample_ticket(area_id)) {
        AttemptOutcome::Committed(_) => {}
        other => panic!("seeding {code} failed: {other:?}"),
    }
}
