// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module goes through `Persistence::new_in_memory()`, so
//! migrations and foreign key enforcement are exercised implicitly. These
//! tests cover isolation and file-backed databases explicitly.

use super::{create_test_area, sample_ticket, year};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    let area_id = create_test_area(&mut db1);
    db1.create_ticket(&year(2026), &sample_ticket(area_id))
        .unwrap();

    assert_eq!(db1.count_tickets(true).unwrap(), 1);
    assert_eq!(db2.count_tickets(true).unwrap(), 0);

    // The sequence is per database, not per process
    let other_area = create_test_area(&mut db2);
    let allocated = db2
        .create_ticket(&year(2026), &sample_ticket(other_area))
        .unwrap();
    assert_eq!(allocated.code.to_string(), "2026-0001");
}

#[test]
fn test_file_database_continues_sequence_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("helpdesk.db");

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        let area_id = create_test_area(&mut persistence);
        persistence
            .create_ticket(&year(2026), &sample_ticket(area_id))
            .unwrap();
        persistence
            .create_ticket(&year(2026), &sample_ticket(area_id))
            .unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let area_id = reopened.list_areas().unwrap()[0].area_id;
    let allocated = reopened
        .create_ticket(&year(2026), &sample_ticket(area_id))
        .unwrap();

    assert_eq!(allocated.code.to_string(), "2026-0003");
}
