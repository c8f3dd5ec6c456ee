use std::{
    collections::HashSet,
    fs::{self, File, OpenOptions},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::{
    domain::{Amount, Expense, DATE_FORMAT, FIELD_NAMES},
    errors::{LedgerError, Result},
};

use super::{ExportOutcome, RecordStore};

const TMP_SUFFIX: &str = "tmp";

/// Comma-delimited ledger file with an `id,date,description,amount` header.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for CsvStore {
    fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            if !self.path.is_file() {
                return Err(LedgerError::storage(format!(
                    "`{}` exists but is not a file",
                    self.path.display()
                )));
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        write_atomic(&self.path, &render(&[])?)?;
        tracing::info!(path = %self.path.display(), "created empty ledger file");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Expense>> {
        let mut file = File::open(&self.path).map_err(|err| {
            LedgerError::storage(format!("cannot read `{}`: {}", self.path.display(), err))
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        let records = parse(&data).map_err(|err| match err {
            LedgerError::Storage(message) => {
                LedgerError::storage(format!("{}: {}", self.path.display(), message))
            }
            other => other,
        })?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "read ledger");
        Ok(records)
    }

    fn rewrite_all(&self, records: &[Expense]) -> Result<()> {
        let data = render(records)?;
        write_atomic(&self.path, &data).map_err(|err| {
            LedgerError::storage(format!("cannot write `{}`: {}", self.path.display(), err))
        })?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "rewrote ledger");
        Ok(())
    }

    fn export_to(&self, path: &Path, records: &[Expense]) -> Result<ExportOutcome> {
        let data = render(records)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(ExportOutcome::AlreadyExists)
            }
            Err(err) => {
                return Err(LedgerError::storage(format!(
                    "cannot create `{}`: {}",
                    path.display(),
                    err
                )))
            }
        };
        if let Err(err) = file.write_all(&data).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(LedgerError::storage(format!(
                "cannot write `{}`: {}",
                path.display(),
                err
            )));
        }
        tracing::info!(path = %path.display(), records = records.len(), "exported ledger");
        Ok(ExportOutcome::Written {
            records: records.len(),
        })
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Serializes the header plus every record into the on-disk representation.
pub fn render(records: &[Expense]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(FIELD_NAMES)?;
    for expense in records {
        writer.write_record(expense.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|err| LedgerError::storage(err.to_string()))
}

/// Parses the on-disk representation, rejecting anything structurally off.
pub fn parse(data: &[u8]) -> Result<Vec<Expense>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data);

    let header = reader.headers()?.clone();
    if header.iter().map(str::trim).ne(FIELD_NAMES) {
        return Err(LedgerError::storage(format!(
            "unexpected header `{}` (expected `{}`)",
            header.iter().collect::<Vec<_>>().join(","),
            FIELD_NAMES.join(",")
        )));
    }

    let mut seen = HashSet::new();
    let mut expenses = Vec::new();
    for row in reader.records() {
        let row = row.map_err(describe_csv_error)?;
        let line = row.position().map(|pos| pos.line()).unwrap_or_default();
        let expense = parse_row(&row).map_err(|message| {
            LedgerError::storage(format!("line {}: {}", line, message))
        })?;
        if !seen.insert(expense.id) {
            return Err(LedgerError::storage(format!(
                "line {}: duplicate id {}",
                line, expense.id
            )));
        }
        expenses.push(expense);
    }
    Ok(expenses)
}

fn parse_row(row: &StringRecord) -> std::result::Result<Expense, String> {
    let field = |idx: usize| row.get(idx).unwrap_or_default();

    let id = field(0)
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("invalid id `{}`", field(0)))?;
    let date = NaiveDate::parse_from_str(field(1).trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{}`", field(1)))?;
    let amount = Amount::parse_stored(field(3).trim())
        .ok_or_else(|| format!("invalid amount `{}`", field(3)))?;

    Ok(Expense::new(id, date, field(2), amount))
}

fn describe_csv_error(err: csv::Error) -> LedgerError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        let line = pos.as_ref().map(|pos| pos.line()).unwrap_or_default();
        return LedgerError::storage(format!(
            "line {}: expected {} columns, found {}",
            line, expected_len, len
        ));
    }
    LedgerError::from(err)
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Stages `data` next to `path` and renames it into place once fully synced.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    let staged = File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(err) = staged.and_then(|_| fs::rename(&tmp, path)) {
        if tmp.is_file() {
            let _ = fs::remove_file(&tmp);
        }
        return Err(err);
    }
    Ok(())
}
