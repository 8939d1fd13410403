// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attention area mutations.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::areas;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new attention area.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The unique area name
/// * `description` - Optional free-form description
/// * `created_at` - Creation timestamp
///
/// # Returns
///
/// The id assigned to the new area.
///
/// # Errors
///
/// Returns `DuplicateArea` if the name is taken, or a database error.
pub fn insert_area(
    conn: &mut _,
    name: &str,
    description: Option<&str>,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let result = diesel::insert_into(areas::table)
        .values((
            areas::name.eq(name),
            areas::description.eq(description),
            areas::is_active.eq(1),
            areas::created_at.eq(created_at),
        ))
        .execute(conn);

    match result {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateArea(name.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let area_id: i64 = conn.get_last_insert_rowid()?;
    info!(area_id, name, "Created area");
    Ok(area_id)
}
}

backend_fn! {
/// Activates or deactivates an area.
///
/// Inactive areas keep their tickets but accept no new ones.
///
/// # Errors
///
/// Returns `AreaNotFound` if the area does not exist.
pub fn set_area_active(conn: &mut _, area_id: i64, active: bool) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(areas::table)
        .filter(areas::area_id.eq(area_id))
        .set(areas::is_active.eq(i32::from(active)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AreaNotFound(area_id));
    }

    info!(area_id, active, "Updated area activation");
    Ok(())
}
}
