//! Read-only access to the consolidated SQLite compound table.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{info, warn};

use crate::{
    compound::Compound,
    core::store::CompoundStore,
    error::LookupResult,
    types::Source,
};

use super::{PersistError, PersistResult};

const TABLE: &str = "compounds";
const REQUIRED_COLUMNS: [&str; 5] = ["source_database", "source_id", "name", "formula", "exact_mass"];
const URL_COLUMN: &str = "source_url";

/// Read-only connection to a consolidated compound file.
pub struct SqliteCompoundSource {
    conn: Connection,
    path: PathBuf,
    has_url_column: bool,
}

impl SqliteCompoundSource {
    /// Opens `path` read-only and checks the `compounds` table shape.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(PersistError::NotFound);
        }
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let columns = table_columns(&conn)?;
        if columns.is_empty() {
            return Err(PersistError::Schema(format!("table `{TABLE}` not found")));
        }
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !columns.contains(*c))
            .collect();
        if !missing.is_empty() {
            return Err(PersistError::Schema(format!(
                "table `{TABLE}` lacks column(s) {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            has_url_column: columns.contains(URL_COLUMN),
            conn,
            path,
        })
    }

    /// Reads every row with a recognised source tag.
    ///
    /// Returns the rows plus the number dropped for carrying an unknown tag.
    pub fn read_compounds(&self) -> PersistResult<(Vec<Compound>, usize)> {
        let url_expr = if self.has_url_column { URL_COLUMN } else { "NULL" };
        let sql = format!(
            "SELECT source_database, source_id, name, formula, exact_mass, {url_expr} FROM {TABLE}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(RawRow {
                source: row.get(0)?,
                id: row.get(1)?,
                name: row.get(2)?,
                formula: row.get(3)?,
                mass: row.get(4)?,
                url: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        let mut unknown_sources = 0usize;
        for row in rows {
            let raw = row?;
            let Some(source) = raw.source.as_deref().and_then(|s| s.parse::<Source>().ok()) else {
                unknown_sources += 1;
                continue;
            };
            let id = raw.id.unwrap_or_default();
            let source_url = match raw.url {
                Some(url) if !url.trim().is_empty() => url,
                _ => source.reference_url(&id),
            };
            out.push(Compound {
                id,
                name: raw.name.unwrap_or_default(),
                formula: raw.formula.unwrap_or_default(),
                monoisotopic_mass: raw.mass.unwrap_or(f64::NAN),
                source,
                source_url,
            });
        }
        Ok((out, unknown_sources))
    }

    /// Reads the table and builds the indexed in-memory store.
    pub fn load_store(&self) -> PersistResult<CompoundStore> {
        let (rows, unknown_sources) = self.read_compounds()?;
        if unknown_sources > 0 {
            warn!(unknown_sources, "dropped rows from undeclared source databases");
        }
        let store = CompoundStore::from_compounds(rows);
        info!(
            path = %self.path.display(),
            compounds = store.len(),
            skipped = store.skipped_rows() + unknown_sources,
            "compound store loaded"
        );
        Ok(store)
    }
}

struct RawRow {
    source: Option<String>,
    id: Option<String>,
    name: Option<String>,
    formula: Option<String>,
    mass: Option<f64>,
    url: Option<String>,
}

fn table_columns(conn: &Connection) -> PersistResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt.query_map(params![TABLE], |row| row.get::<_, String>(0))?;
    let mut out = HashSet::new();
    for name in names {
        out.insert(name?);
    }
    Ok(out)
}

/// Opens the consolidated compound file at `path` and indexes it in memory.
///
/// Fails with [`crate::error::LookupError::StoreUnavailable`] when the file is missing,
/// unreadable, or lacks the expected columns.
pub fn open_store(path: impl AsRef<Path>) -> LookupResult<CompoundStore> {
    let path = path.as_ref();
    SqliteCompoundSource::open(path)
        .and_then(|source| source.load_store())
        .map_err(|err| err.into_lookup(path))
}

/// Creates (or extends) a consolidated file at `path` holding `compounds`.
///
/// Intended for fixtures and packaging; the search path never writes.
pub fn write_compounds(path: impl AsRef<Path>, compounds: &[Compound]) -> PersistResult<usize> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(include_str!("schema.sql"))?;

    let tx = conn.transaction()?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO compounds(source_database, source_id, name, formula, exact_mass, source_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for c in compounds {
            written += stmt.execute(params![
                c.source.tag(),
                c.id,
                c.name,
                c.formula,
                c.monoisotopic_mass,
                c.source_url,
            ])?;
        }
    }
    tx.commit()?;
    Ok(written)
}
