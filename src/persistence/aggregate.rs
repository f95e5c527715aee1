//! Cross-subject aggregate table.
//!
//! One row per subject, one column per level in an inclusive range. A cell
//! holds that subject's proportion of "too large" answers at the level, or
//! `0.0` when the level was never presented. Storing a subject again
//! replaces their row in place.
//!
//! CSV layout: header `subject,<level>,<level>,...`, one row per subject in
//! insertion order.
use crate::{
    persistence::errors::{PersistenceError, PersistenceResult, validate_subject},
    psychometric::aggregate::aggregate,
    staircase::core::ResponseLog,
};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// Level range of the reference aggregate table.
pub const DEFAULT_TABLE_LEVELS: (i64, i64) = (10, 50);

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub subject: String,
    pub proportions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    levels: Vec<i64>,
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Empty table with columns `min..=max`.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidLevelRange`] when `min > max`.
    pub fn new(min: i64, max: i64) -> PersistenceResult<Self> {
        if min > max {
            return Err(PersistenceError::InvalidLevelRange { min, max });
        }
        Ok(Self { levels: (min..=max).collect(), rows: Vec::new() })
    }

    pub fn levels(&self) -> &[i64] {
        &self.levels
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, subject: &str) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| r.subject == subject)
    }

    /// Insert or replace `subject`'s row from their trial log. Levels outside
    /// the table's columns are ignored.
    pub fn upsert(&mut self, subject: &str, log: &ResponseLog) -> PersistenceResult<()> {
        validate_subject(subject)?;
        let mut proportions = vec![0.0; self.levels.len()];
        for point in aggregate(log) {
            if let Some(col) = self.levels.iter().position(|&l| l as f64 == point.level) {
                proportions[col] = point.proportion;
            }
        }
        match self.rows.iter_mut().find(|r| r.subject == subject) {
            Some(row) => row.proportions = proportions,
            None => self.rows.push(AggregateRow { subject: subject.to_string(), proportions }),
        }
        Ok(())
    }

    pub fn write<W: Write>(&self, mut writer: W) -> PersistenceResult<()> {
        write!(writer, "subject")?;
        for level in &self.levels {
            write!(writer, ",{level}")?;
        }
        writeln!(writer)?;
        for row in &self.rows {
            write!(writer, "{}", row.subject)?;
            for p in &row.proportions {
                write!(writer, ",{p}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Parse a table; its columns come from the header.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidHeader`] when the header is missing or a
    /// level column is not an integer, [`PersistenceError::Parse`] for rows
    /// of the wrong width or non-numeric cells.
    pub fn read<R: BufRead>(reader: R) -> PersistenceResult<Self> {
        let mut lines = reader.lines().enumerate();
        let header = match lines.next() {
            Some((_, line)) => line?,
            None => String::new(),
        };
        let mut columns = header.trim().split(',').map(str::trim);
        let levels: Option<Vec<i64>> = match columns.next() {
            Some("subject") => columns.map(|c| c.parse().ok()).collect(),
            _ => None,
        };
        let levels = levels.ok_or_else(|| PersistenceError::InvalidHeader {
            expected: "subject,<level>,...".to_string(),
            found: header.trim().to_string(),
        })?;

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() != levels.len() + 1 {
                return Err(PersistenceError::Parse {
                    line: line_no,
                    message: format!(
                        "expected {} columns, found {}",
                        levels.len() + 1,
                        parts.len()
                    ),
                });
            }
            let proportions = parts[1..]
                .iter()
                .map(|cell| {
                    cell.parse::<f64>().map_err(|_| PersistenceError::Parse {
                        line: line_no,
                        message: format!("invalid proportion '{cell}'"),
                    })
                })
                .collect::<PersistenceResult<Vec<f64>>>()?;
            rows.push(AggregateRow { subject: parts[0].to_string(), proportions });
        }
        Ok(Self { levels, rows })
    }

    pub fn save(&self, path: &Path) -> PersistenceResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.write(BufWriter::new(File::create(path)?))
    }

    /// Load `path`, or start an empty `min..=max` table when it does not
    /// exist yet.
    pub fn load_or_new(path: &Path, min: i64, max: i64) -> PersistenceResult<Self> {
        match File::open(path) {
            Ok(file) => Self::read(BufReader::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::new(min, max),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for AggregateTable {
    fn default() -> Self {
        let (min, max) = DEFAULT_TABLE_LEVELS;
        Self { levels: (min..=max).collect(), rows: Vec::new() }
    }
}
