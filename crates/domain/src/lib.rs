// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod ticket;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use ticket::{
    MAX_AREA_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_PERSON_LEN, MAX_TITLE_LEN, NewTicket, Priority,
    TicketStatus,
};
pub use types::{
    CODE_SEPARATOR, MIN_SEQUENCE_WIDTH, PartitionKey, TicketCode, max_issued_sequence,
};
pub use validation::{validate_area_name, validate_new_ticket};
