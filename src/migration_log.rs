//! Destinations for census migration rows.

use crate::census::MigrationRow;
use chrono::Local;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait MigrationSink: Send {
    fn write_row(&mut self, row: &MigrationRow) -> io::Result<()>;
}

/// Comma-separated rows in a file named after `prefix` and the creation time.
pub struct CsvMigrationLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CsvMigrationLog {
    pub fn create(prefix: &Path) -> io::Result<Self> {
        let suffix = Local::now().format("%Y-%m-%d-%H-%M-%S");
        let path = PathBuf::from(format!("{}-{}.csv", prefix.display(), suffix));
        Self::create_at(path)
    }

    pub fn create_at(path: PathBuf) -> io::Result<Self> {
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MigrationSink for CsvMigrationLog {
    fn write_row(&mut self, row: &MigrationRow) -> io::Result<()> {
        write!(self.writer, "{}", row.time)?;
        for count in &row.counts {
            write!(self.writer, ",{}", count)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

/// Keeps rows in memory behind a shared handle.
#[derive(Clone, Default)]
pub struct MemoryMigrationLog {
    rows: Arc<Mutex<Vec<MigrationRow>>>,
}

impl MemoryMigrationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<MigrationRow> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MigrationSink for MemoryMigrationLog {
    fn write_row(&mut self, row: &MigrationRow) -> io::Result<()> {
        self.rows
            .lock()
            .map_err(|_| io::Error::other("migration row buffer poisoned"))?
            .push(row.clone());
        Ok(())
    }
}

pub struct NullMigrationLog;

impl MigrationSink for NullMigrationLog {
    fn write_row(&mut self, _row: &MigrationRow) -> io::Result<()> {
        Ok(())
    }
}
