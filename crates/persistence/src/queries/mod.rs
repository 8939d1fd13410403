// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic read-only queries.
//!
//! Every query is written once in Diesel DSL and expanded by `backend_fn!`
//! into `_sqlite` and `_mysql` variants.
//!
//! - `tickets`: ticket lookups, listings and the issued-code scan
//! - `areas`: attention area lookups

pub mod areas;
pub mod tickets;
