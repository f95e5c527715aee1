//! Per-subject trial log as CSV.
//!
//! Layout: header `subject,trial,staircase,direction,level,response`, then
//! one row per trial in log order, for example
//!
//! ```text
//! subject,trial,staircase,direction,level,response
//! S01,1,0,ascending,17,0
//! S01,2,1,descending,50,1
//! ```
//!
//! `staircase` is the 0-based staircase id, `direction` its start
//! direction, `response` the code (1 = too large, 0 = too small). Reading a
//! file back yields a [`ResponseLog`] that can be refitted.
use crate::{
    persistence::errors::{PersistenceError, PersistenceResult, validate_subject},
    staircase::core::{Direction, Response, ResponseLog, Trial},
};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

pub const TRIAL_LOG_HEADER: &str = "subject,trial,staircase,direction,level,response";

/// One subject's stored log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLog {
    pub subject: String,
    pub log: ResponseLog,
}

/// Write `log` as CSV to any writer.
///
/// # Errors
/// [`PersistenceError::InvalidSubject`] for names that cannot be stored
/// unquoted; I/O failures as [`PersistenceError::Io`].
pub fn write_trial_log<W: Write>(
    mut writer: W, subject: &str, log: &ResponseLog,
) -> PersistenceResult<()> {
    validate_subject(subject)?;
    writeln!(writer, "{TRIAL_LOG_HEADER}")?;
    for trial in log {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            subject,
            trial.trial_index,
            trial.staircase_id,
            trial.direction,
            trial.level_presented,
            trial.response.code()
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write to `path`, creating missing parent directories.
pub fn save_trial_log(path: &Path, subject: &str, log: &ResponseLog) -> PersistenceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_trial_log(BufWriter::new(File::create(path)?), subject, log)
}

/// Parse a trial-log CSV.
///
/// Blank lines are skipped. All rows must name the same subject; a
/// header-only file gives an empty log with an empty subject.
///
/// # Errors
/// - [`PersistenceError::InvalidHeader`] when the first line is not the
///   expected header.
/// - [`PersistenceError::Parse`] for malformed rows or mixed subjects.
/// - [`PersistenceError::Log`] when trial indices are not increasing.
pub fn read_trial_log<R: BufRead>(reader: R) -> PersistenceResult<SubjectLog> {
    let mut lines = reader.lines().enumerate();
    let header = match lines.next() {
        Some((_, line)) => line?,
        None => String::new(),
    };
    if header.trim() != TRIAL_LOG_HEADER {
        return Err(PersistenceError::InvalidHeader {
            expected: TRIAL_LOG_HEADER.to_string(),
            found: header.trim().to_string(),
        });
    }

    let mut subject: Option<String> = None;
    let mut trials = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != 6 {
            return Err(parse_error(line_no, format!("expected 6 columns, found {}", parts.len())));
        }
        match &subject {
            None => subject = Some(parts[0].to_string()),
            Some(s) if s != parts[0] => {
                return Err(parse_error(
                    line_no,
                    format!("subject '{}' differs from '{s}'", parts[0]),
                ));
            }
            Some(_) => {}
        }
        let direction =
            Direction::from_str(parts[3]).map_err(|message| parse_error(line_no, message))?;
        let code: i64 = parse_field(parts[5], "response", line_no)?;
        let response =
            Response::from_code(code).map_err(|e| parse_error(line_no, e.to_string()))?;
        trials.push(Trial {
            trial_index: parse_field(parts[1], "trial", line_no)?,
            staircase_id: parse_field(parts[2], "staircase", line_no)?,
            direction,
            level_presented: parse_field(parts[4], "level", line_no)?,
            response,
        });
    }

    Ok(SubjectLog { subject: subject.unwrap_or_default(), log: ResponseLog::from_trials(trials)? })
}

pub fn load_trial_log(path: &Path) -> PersistenceResult<SubjectLog> {
    read_trial_log(BufReader::new(File::open(path)?))
}

fn parse_field<T: FromStr>(raw: &str, name: &str, line: usize) -> PersistenceResult<T> {
    raw.parse().map_err(|_| parse_error(line, format!("invalid {name} value '{raw}'")))
}

fn parse_error(line: usize, message: String) -> PersistenceError {
    PersistenceError::Parse { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The exact CSV text produced by the writer.
    // - Reading that text back, and rejection of malformed input.
    // - The file helpers, including parent directory creation.
    // -------------------------------------------------------------------------

    fn sample_log() -> ResponseLog {
        ResponseLog::from_trials(vec![
            Trial {
                trial_index: 1,
                staircase_id: 0,
                direction: Direction::Ascending,
                level_presented: 17,
                response: Response::TooSmall,
            },
            Trial {
                trial_index: 2,
                staircase_id: 1,
                direction: Direction::Descending,
                level_presented: 50,
                response: Response::TooLarge,
            },
        ])
        .expect("valid log")
    }

    #[test]
    // Purpose
    // -------
    // Pin the on-disk layout.
    //
    // Given
    // -----
    // - Two trials for subject S01.
    //
    // Expect
    // ------
    // - Header plus one row per trial in log order.
    fn writer_emits_header_and_rows() {
        let mut buf = Vec::new();

        write_trial_log(&mut buf, "S01", &sample_log()).expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "subject,trial,staircase,direction,level,response\n\
             S01,1,0,ascending,17,0\n\
             S01,2,1,descending,50,1\n"
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure written logs read back to the same subject and trials.
    //
    // Given
    // -----
    // - The sample log written to memory, with a trailing blank line.
    //
    // Expect
    // ------
    // - Identical `SubjectLog`.
    fn reader_restores_written_log() {
        let mut buf = Vec::new();
        write_trial_log(&mut buf, "S01", &sample_log()).expect("write");
        buf.extend_from_slice(b"\n");

        let restored = read_trial_log(Cursor::new(buf)).expect("read");

        assert_eq!(restored, SubjectLog { subject: "S01".into(), log: sample_log() });
    }

    #[test]
    // Purpose
    // -------
    // Check malformed input is reported with its line number.
    //
    // Given
    // -----
    // - A wrong header; a bad response code on line 2; mixed subjects;
    //   decreasing trial indices.
    //
    // Expect
    // ------
    // - `InvalidHeader`, `Parse { line: 2 }`, `Parse { line: 3 }`, `Log`.
    fn reader_rejects_malformed_input() {
        let h = TRIAL_LOG_HEADER;
        let bad_header = read_trial_log(Cursor::new("name,trial\n"));
        let bad_code = read_trial_log(Cursor::new(format!("{h}\nS,1,0,up,17,2\n")));
        let mixed = read_trial_log(Cursor::new(format!("{h}\nA,1,0,up,17,0\nB,2,1,down,50,1\n")));
        let order = read_trial_log(Cursor::new(format!("{h}\nA,2,0,up,17,0\nA,1,1,down,50,1\n")));

        assert!(matches!(bad_header, Err(PersistenceError::InvalidHeader { .. })));
        assert!(matches!(bad_code, Err(PersistenceError::Parse { line: 2, .. })));
        assert!(matches!(mixed, Err(PersistenceError::Parse { line: 3, .. })));
        assert!(matches!(order, Err(PersistenceError::Log(_))));
    }

    #[test]
    fn writer_rejects_unstorable_subject_names() {
        let log = sample_log();

        assert!(matches!(
            write_trial_log(Vec::new(), "a,b", &log),
            Err(PersistenceError::InvalidSubject { .. })
        ));
        assert!(write_trial_log(Vec::new(), "", &log).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Exercise the file helpers end to end.
    //
    // Given
    // -----
    // - A path inside a not-yet-existing directory under the temp dir.
    //
    // Expect
    // ------
    // - Save creates the directory; load returns the same log.
    fn save_and_load_through_the_filesystem() {
        let dir = std::env::temp_dir()
            .join(format!("rust_psychophysics_trial_log_{}", std::process::id()));
        let path = dir.join("subjects").join("S01.csv");

        save_trial_log(&path, "S01", &sample_log()).expect("save");
        let restored = load_trial_log(&path).expect("load");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(restored.log, sample_log());
        assert_eq!(restored.subject, "S01");
    }
}
