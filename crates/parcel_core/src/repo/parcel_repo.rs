//! Parcel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Parcel` records onto rows of the `parcel` table.
//! - Keep every operation a single parameterized statement.
//!
//! # Invariants
//! - `number` is always assigned by SQLite, never taken from the caller.
//! - Writes and reads reject timestamps that are not RFC3339.
//! - Reads reject rows with unknown status.
//! - Updates and deletes that match no row succeed without error.

use crate::db::migrations::{latest_version, user_version};
use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelId, ParcelStatus};
use chrono::DateTime;
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: &[&str] = &["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by parcel persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ParcelId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "parcel not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid parcel data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single-table CRUD contract for parcels.
pub trait ParcelRepository {
    /// Stores a new parcel and returns the number assigned to it.
    ///
    /// `RepoError::InvalidData` when `created_at` is not RFC3339.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelId>;
    /// Loads one parcel; `RepoError::NotFound` when no row has this number.
    fn get(&self, id: ParcelId) -> RepoResult<Parcel>;
    /// Loads every parcel owned by `client`, in storage order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Replaces the delivery address. A missing parcel is not an error.
    fn set_address(&self, id: ParcelId, address: &str) -> RepoResult<()>;
    /// Replaces the status without checking the transition. A missing parcel
    /// is not an error.
    fn set_status(&self, id: ParcelId, status: ParcelStatus) -> RepoResult<()>;
    /// Removes the parcel. A missing parcel is not an error.
    fn delete(&self, id: ParcelId) -> RepoResult<()>;
}

/// SQLite-backed parcel store borrowing an opened connection.
pub struct SqliteParcelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelRepository<'conn> {
    /// Wraps a connection after checking it carries the parcel schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the one this repository writes to.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelRepository for SqliteParcelRepository<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelId> {
        if !is_rfc3339(&parcel.created_at) {
            return Err(RepoError::InvalidData(format!(
                "created_at `{}` is not an RFC3339 timestamp",
                parcel.created_at
            )));
        }

        self.conn.execute(
            "INSERT INTO parcel (client, status, address, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: ParcelId) -> RepoResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_parcel_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_address(&self, id: ParcelId, address: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2;",
            params![address, id],
        )?;
        log_noop("parcel_set_address", id, changed);
        Ok(())
    }

    fn set_status(&self, id: ParcelId, status: ParcelStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), id],
        )?;
        log_noop("parcel_set_status", id, changed);
        Ok(())
    }

    fn delete(&self, id: ParcelId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [id])?;
        log_noop("parcel_delete", id, changed);
        Ok(())
    }
}

fn log_noop(event: &str, id: ParcelId, changed: usize) {
    if let Some(message) = noop_event(event, id, changed) {
        debug!("{message}");
    }
}

/// Log line for a write that matched no row; `None` when a row changed.
fn noop_event(event: &str, id: ParcelId, changed: usize) -> Option<String> {
    (changed == 0)
        .then(|| format!("event={event} module=repo status=noop parcel={id} rows_affected=0"))
}

fn is_rfc3339(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([PARCEL_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    // pragma_table_info yields no rows for an unknown table.
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    if let Some(column) = PARCEL_COLUMNS
        .iter()
        .copied()
        .find(|required| !columns.iter().any(|name| name == required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: PARCEL_TABLE,
            column,
        });
    }

    Ok(())
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    let number: ParcelId = row.get("number")?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<ParcelStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in parcel.status for parcel {number}"
        ))
    })?;

    let created_at: String = row.get("created_at")?;
    if !is_rfc3339(&created_at) {
        return Err(RepoError::InvalidData(format!(
            "invalid timestamp `{created_at}` in parcel.created_at for parcel {number}"
        )));
    }

    Ok(Parcel {
        number,
        client: row.get("client")?,
        status,
        address: row.get("address")?,
        created_at,
    })
}
