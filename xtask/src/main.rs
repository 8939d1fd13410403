// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Helpdesk project automation
//!
//! Everyday commands (`build`, `lint`, `test`) wrap cargo. Two commands need
//! Docker and are opt-in:
//!
//! - `cargo xtask test-mariadb` starts a throwaway `MariaDB` 11 container and
//!   runs the `#[ignore]`d backend validation tests in `helpdesk-persistence`
//!   against it, including the two-connection ticket code race.
//! - `cargo xtask verify-migrations` applies `migrations/` to `SQLite` and
//!   `migrations_mysql/` to `MariaDB`, then compares the resulting schemas.
//!
//! Plain `cargo test` never needs a database server.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::thread::sleep;
use std::time::Duration;
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

/// The package holding the backend validation tests.
const PERSISTENCE_PACKAGE: &str = "helpdesk-persistence";

/// Tables the helpdesk schema must contain on every backend.
const EXPECTED_TABLES: [&str; 2] = ["areas", "tickets"];

/// Seconds to wait for a fresh `MariaDB` container to accept connections.
const MARIADB_READY_TIMEOUT_SECS: u32 = 30;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks. The Docker-backed commands stay opt-in.
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint clippy, docs and formatting
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default workspace package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run the workspace tests against in-memory `SQLite`
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` container. Dropping it stops and removes the container.
struct MariaDbContainer {
    name: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariaDbContainer {
    /// Starts the container and blocks until it accepts queries.
    fn start(
        name: &'static str,
        database: &'static str,
        password: &'static str,
        port: u16,
    ) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        let container = Self {
            name,
            database,
            user: "helpdesk",
            password,
            port,
        };

        // A container left behind by an interrupted run would hold the port.
        container.remove();

        tracing::info!(container = name, port, "Starting MariaDB container");
        cmd!(
            "docker",
            "run",
            "--name",
            name,
            "-e",
            format!("MARIADB_DATABASE={database}"),
            "-e",
            format!("MARIADB_USER={}", container.user),
            "-e",
            format!("MARIADB_PASSWORD={password}"),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        container.wait_until_ready()?;
        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=MARIADB_READY_TIMEOUT_SECS {
            sleep(Duration::from_secs(1));
            tracing::debug!(
                attempt,
                max = MARIADB_READY_TIMEOUT_SECS,
                "Probing MariaDB"
            );

            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }

        Err(eyre!(
            "MariaDB did not become ready within {MARIADB_READY_TIMEOUT_SECS} seconds"
        ))
    }

    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.name)
            .stdout_null()
            .stderr_null()
            .run();
        let _ = cmd!("docker", "rm", self.name)
            .stdout_null()
            .stderr_null()
            .run();
    }
}

impl Drop for MariaDbContainer {
    fn drop(&mut self) {
        tracing::info!(container = self.name, "Removing MariaDB container");
        self.remove();
    }
}

/// Run `MariaDB` backend validation tests
///
/// Starts `MariaDB` 11 on port 3307 and runs the ignored
/// `backend_validation_tests` in `helpdesk-persistence` with
/// `HELPDESK_TEST_BACKEND=mariadb` and `DATABASE_URL` pointing at the
/// container. The tests run single-threaded because they share one database.
///
/// These cover migrations, foreign key enforcement, sequential allocation,
/// a genuine lost race between two connections, and soft delete keeping a
/// code reserved.
///
/// The container is removed whether or not the tests pass.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");
    let container =
        MariaDbContainer::start("helpdesk-test-mariadb", "helpdesk_test", "test_password", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("HELPDESK_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    drop(container);
    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies each backend's migrations to an ephemeral database (`SQLite` in
/// memory, `MariaDB` in Docker on port 3308), introspects tables, columns,
/// keys and indexes, and fails listing every difference found.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");
    let container = MariaDbContainer::start(
        "helpdesk-verify-migrations",
        "helpdesk_verify",
        "verify_password",
        3308,
    )?;

    tracing::info!("Applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("Applying MySQL migrations");
    let mut mysql_conn = MysqlConnection::establish(&container.database_url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;
    let mysql_schema = introspect_mysql_schema(&mut mysql_conn, container.database)?;

    let mut problems: Vec<String> = Vec::new();
    for (backend, schema) in [("SQLite", &sqlite_schema), ("MySQL", &mysql_schema)] {
        problems.extend(check_helpdesk_invariants(backend, schema));
    }
    problems.extend(compare_schemas(&sqlite_schema, &mysql_schema));

    if !problems.is_empty() {
        return Err(eyre!(
            "Schema parity check FAILED ({} problem(s)):\n{}",
            problems.len(),
            problems.join("\n")
        ));
    }

    tracing::info!("Schema parity verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    /// Non-unique index column lists. Names are not compared.
    indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    tracing::info!("Introspecting SQLite schema");
    let mut schema = Schema::default();

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(format!("PRAGMA table_info({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get columns for table {}", table.name))?;
        for col in columns {
            if col.pk > 0 {
                table_info.primary_keys.insert(col.name.clone());
            }
            table_info.columns.insert(
                col.name,
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    // SQLite reports INTEGER PRIMARY KEY as nullable.
                    nullable: col.notnull == 0 && col.pk == 0,
                },
            );
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get foreign keys for table {}", table.name))?;
        table_info.foreign_keys = fks
            .into_iter()
            .map(|fk| ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            })
            .collect();

        let indexes: Vec<IndexInfo> = diesel::sql_query(format!("PRAGMA index_list({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get indexes for table {}", table.name))?;
        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err_with(|| format!("Failed to get index columns for {}", idx.name))?;
            let columns: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // origin 'u' is a UNIQUE constraint, 'pk' the primary key.
            match (idx.origin.as_str(), idx.unique) {
                ("u", _) | ("c", 1) => {
                    table_info.unique_constraints.insert(columns);
                }
                ("c", _) => {
                    table_info.indexes.insert(columns);
                }
                _ => {}
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    tracing::info!("Introspecting MySQL schema");
    let mut schema = Schema::default();

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(db_name)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get columns for table {}", table.table_name))?;
        for col in columns {
            if col.column_key == "PRI" {
                table_info.primary_keys.insert(col.column_name.clone());
            }
            table_info.columns.insert(
                col.column_name,
                Column {
                    normalized_type: normalize_mysql_type(&col.data_type),
                    nullable: col.is_nullable == "YES",
                },
            );
        }

        let fks: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get foreign keys for table {}", table.table_name))?;
        table_info.foreign_keys = fks
            .into_iter()
            .map(|fk| ForeignKey {
                from_column: fk.column_name,
                to_table: fk.referenced_table_name,
                to_column: fk.referenced_column_name,
            })
            .collect();

        // information_schema.statistics lists UNIQUE constraints as unique indexes.
        let indexes: Vec<IndexInfo> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get indexes for table {}", table.table_name))?;

        let mut grouped: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();
        for idx in indexes {
            let entry = grouped
                .entry(idx.index_name)
                .or_insert_with(|| (idx.non_unique == 0, Vec::new()));
            entry.1.push(idx.column_name);
        }
        for (unique, columns) in grouped.into_values() {
            if unique {
                table_info.unique_constraints.insert(columns);
            } else {
                table_info.indexes.insert(columns);
            }
        }

        schema.tables.insert(table.table_name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type affinity to a common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    let normalized = if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        "text"
    };
    normalized.to_string()
}

/// Normalize `MySQL` data type to a common representation
fn normalize_mysql_type(mysql_type: &str) -> String {
    let normalized = match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => "blob",
        _ => "text",
    };
    normalized.to_string()
}

/// Checks the schema features ticket code allocation relies on.
fn check_helpdesk_invariants(backend: &str, schema: &Schema) -> Vec<String> {
    let mut problems: Vec<String> = EXPECTED_TABLES
        .iter()
        .filter(|table| !schema.tables.contains_key(**table))
        .map(|table| format!("  - {backend}: table '{table}' is missing"))
        .collect();

    if let Some(tickets) = schema.tables.get("tickets") {
        if !tickets.unique_constraints.contains(&vec![String::from("code")]) {
            problems.push(format!(
                "  - {backend}: tickets.code has no single-column unique constraint"
            ));
        }
        if tickets.columns.get("deleted_at").is_none_or(|c| !c.nullable) {
            problems.push(format!(
                "  - {backend}: tickets.deleted_at must exist and be nullable"
            ));
        }
    }

    problems
}

/// Compares two schemas and returns every difference found.
fn compare_schemas(sqlite_schema: &Schema, mysql_schema: &Schema) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    let sqlite_tables: BTreeSet<&String> = sqlite_schema.tables.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql_schema.tables.keys().collect();
    for table in sqlite_tables.difference(&mysql_tables) {
        problems.push(format!("  - Table '{table}' exists in SQLite but not in MySQL"));
    }
    for table in mysql_tables.difference(&sqlite_tables) {
        problems.push(format!("  - Table '{table}' exists in MySQL but not in SQLite"));
    }

    for table_name in sqlite_tables.intersection(&mysql_tables) {
        let sqlite_table = &sqlite_schema.tables[*table_name];
        let mysql_table = &mysql_schema.tables[*table_name];
        problems.extend(compare_tables(table_name, sqlite_table, mysql_table));
    }

    problems
}

fn compare_tables(table_name: &str, sqlite_table: &Table, mysql_table: &Table) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    let sqlite_columns: BTreeSet<&String> = sqlite_table.columns.keys().collect();
    let mysql_columns: BTreeSet<&String> = mysql_table.columns.keys().collect();
    for col in sqlite_columns.difference(&mysql_columns) {
        problems.push(format!(
            "  - {table_name}.{col} exists in SQLite but not in MySQL"
        ));
    }
    for col in mysql_columns.difference(&sqlite_columns) {
        problems.push(format!(
            "  - {table_name}.{col} exists in MySQL but not in SQLite"
        ));
    }
    for col in sqlite_columns.intersection(&mysql_columns) {
        let sqlite_col = &sqlite_table.columns[*col];
        let mysql_col = &mysql_table.columns[*col];
        if sqlite_col != mysql_col {
            problems.push(format!(
                "  - {table_name}.{col} differs: SQLite {sqlite_col:?}, MySQL {mysql_col:?}"
            ));
        }
    }

    if sqlite_table.primary_keys != mysql_table.primary_keys {
        problems.push(format!(
            "  - {table_name}: primary key differs: SQLite {:?}, MySQL {:?}",
            sqlite_table.primary_keys, mysql_table.primary_keys
        ));
    }
    if sqlite_table.foreign_keys != mysql_table.foreign_keys {
        problems.push(format!(
            "  - {table_name}: foreign keys differ: SQLite {:?}, MySQL {:?}",
            sqlite_table.foreign_keys, mysql_table.foreign_keys
        ));
    }
    if sqlite_table.unique_constraints != mysql_table.unique_constraints {
        problems.push(format!(
            "  - {table_name}: unique constraints differ: SQLite {:?}, MySQL {:?}",
            sqlite_table.unique_constraints, mysql_table.unique_constraints
        ));
    }

    // InnoDB adds an index for each foreign key column. Those are the only
    // MySQL-only indexes allowed.
    let fk_columns: BTreeSet<&String> = mysql_table
        .foreign_keys
        .iter()
        .map(|fk| &fk.from_column)
        .collect();
    for columns in sqlite_table.indexes.difference(&mysql_table.indexes) {
        problems.push(format!(
            "  - {table_name}: index on {columns:?} missing in MySQL"
        ));
    }
    for columns in mysql_table.indexes.difference(&sqlite_table.indexes) {
        let is_fk_index = matches!(columns.as_slice(), [only] if fk_columns.contains(only));
        if !is_fk_index {
            problems.push(format!(
                "  - {table_name}: unexpected MySQL index on {columns:?}"
            ));
        }
    }

    problems
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
