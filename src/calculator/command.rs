//! External calculator invocation over a child process
//!
//! The grid is written as CSV to the tool's stdin; the tool answers with a
//! CSV batch on stdout whose first column is the row id and whose remaining
//! columns are numbered output variables (`v25`, `v39`, ...).

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::grid::{GridRow, MaritalStatus};

use super::{RawResult, TaxCalculator};

/// Input wire row; child-age columns are blank when not applicable
#[derive(Debug, Serialize)]
struct WireRow {
    row_id: u32,
    year: u16,
    state: u8,
    earnings: u32,
    dependent_count: u8,
    /// TAXSIM filing-status code (1 = single)
    mstat: u8,
    child_age1: Option<u8>,
    child_age2: Option<u8>,
}

impl From<&GridRow> for WireRow {
    fn from(row: &GridRow) -> Self {
        let mstat = match row.marital_status {
            MaritalStatus::Single => 1,
        };
        Self {
            row_id: row.row_id,
            year: row.year,
            state: row.state,
            earnings: row.earnings,
            dependent_count: row.dependent_count,
            mstat,
            child_age1: row.child_ages.map(|a| a[0]),
            child_age2: row.child_ages.map(|a| a[1]),
        }
    }
}

/// Batch calculator backed by an external executable
#[derive(Debug, Clone)]
pub struct CommandCalculator {
    program: PathBuf,
    args: Vec<String>,
    /// Deadline for the whole batch; `None` blocks indefinitely
    timeout: Option<Duration>,
}

impl CommandCalculator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn encode_batch(batch: &[GridRow]) -> ScheduleResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in batch {
            writer.serialize(WireRow::from(row))?;
        }
        writer
            .into_inner()
            .map_err(|e| ScheduleError::AdapterOutput(format!("encode failed: {e}")))
    }

    fn parse_output(output: &str) -> ScheduleResult<Vec<RawResult>> {
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        // First column is the row id under whatever name the tool uses;
        // every later column named v<N> is a numbered output field.
        let headers = reader.headers()?.clone();
        let mut field_for_column: Vec<Option<u32>> = vec![None; headers.len()];
        for (i, name) in headers.iter().enumerate().skip(1) {
            if let Some(digits) = name.trim().strip_prefix('v') {
                if let Ok(index) = digits.parse::<u32>() {
                    field_for_column[i] = Some(index);
                }
            }
        }

        let mut results = Vec::new();
        for record in reader.records() {
            let record = record?;
            let id_cell = record.get(0).unwrap_or("");
            let row_id: u32 = id_cell.trim().parse().map_err(|_| {
                ScheduleError::AdapterOutput(format!("bad row id {id_cell:?}"))
            })?;

            let mut fields = HashMap::new();
            for (i, cell) in record.iter().enumerate().skip(1) {
                let Some(field_index) = field_for_column[i] else {
                    continue;
                };
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                let value: f64 = cell.parse().map_err(|_| {
                    let name = super::fields::field_name(field_index).unwrap_or("unmapped");
                    ScheduleError::AdapterOutput(format!(
                        "bad value {cell:?} for field v{field_index} ({name})"
                    ))
                })?;
                fields.insert(field_index, value);
            }
            results.push(RawResult { row_id, fields });
        }
        Ok(results)
    }
}

impl TaxCalculator for CommandCalculator {
    fn calculate(&self, batch: &[GridRow]) -> ScheduleResult<Vec<RawResult>> {
        let input = Self::encode_batch(batch)?;

        log::debug!(
            "submitting {} rows to {}",
            batch.len(),
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ScheduleError::AdapterOutput("calculator stdin unavailable".into()))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ScheduleError::AdapterOutput("calculator stdout unavailable".into()))?;

        // The write and the read each get their own thread: a tool that
        // streams output while consuming input would otherwise fill one
        // pipe while the parent blocks on the other. The channel is the
        // timeout point for the whole exchange.
        let writer = thread::spawn(move || {
            let result = stdin.write_all(&input);
            drop(stdin);
            result
        });

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = String::new();
            let read = stdout.read_to_string(&mut buf).map(|_| buf);
            let _ = tx.send(read);
        });

        let read = match self.timeout {
            Some(limit) => match rx.recv_timeout(limit) {
                Ok(read) => read,
                Err(_) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ScheduleError::AdapterTimeout(limit));
                }
            },
            None => rx.recv().map_err(|_| {
                ScheduleError::AdapterOutput("calculator output stream closed".into())
            })?,
        };
        let output = read?;

        // A tool may close stdin early and still answer in full; a write
        // error with complete output surfaces as a parse failure if it
        // actually truncated anything.
        if let Ok(Err(e)) = writer.join() {
            log::debug!("calculator stopped reading input early: {e}");
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ScheduleError::AdapterOutput(format!(
                "calculator exited with {status}"
            )));
        }

        Self::parse_output(&output)
    }
}
