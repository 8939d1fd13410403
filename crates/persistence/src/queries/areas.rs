// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attention area queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::AreaRow;
use crate::diesel_schema::areas;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an area by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_area(conn: &mut _, area_id: i64) -> Result<Option<AreaRow>, PersistenceError> {
    areas::table
        .filter(areas::area_id.eq(area_id))
        .select(AreaRow::as_select())
        .first::<AreaRow>(conn)
        .optional()
        .map_err(Into::into)
}
}

backend_fn! {
/// Lists all areas ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_areas(conn: &mut _) -> Result<Vec<AreaRow>, PersistenceError> {
    areas::table
        .select(AreaRow::as_select())
        .order(areas::name.asc())
        .load::<AreaRow>(conn)
        .map_err(Into::into)
}
}

/// Reads whether an area accepts tickets, on an open `SQLite` write
/// transaction.
///
/// `BEGIN IMMEDIATE` already excludes every other writer, so the answer
/// holds until commit.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn area_accepts_tickets_sqlite(
    conn: &mut SqliteConnection,
    area_id: i64,
) -> QueryResult<Option<bool>> {
    areas::table
        .filter(areas::area_id.eq(area_id))
        .select(areas::is_active)
        .first::<i32>(conn)
        .optional()
        .map(|active| active.map(|flag| flag != 0))
}

/// Reads whether an area accepts tickets, locking the area row until the
/// surrounding transaction ends.
///
/// A concurrent deactivation either waits for this transaction or is seen
/// by it.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn area_accepts_tickets_mysql(
    conn: &mut MysqlConnection,
    area_id: i64,
) -> QueryResult<Option<bool>> {
    areas::table
        .filter(areas::area_id.eq(area_id))
        .select(areas::is_active)
        .for_update()
        .get_result::<i32>(conn)
        .optional()
        .map(|active| active.map(|flag| flag != 0))
}
