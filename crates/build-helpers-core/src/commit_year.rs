//! First-commit year discovery.
//!
//! Asks git for the log entry of the repository's root commit and pulls the
//! year out of its `Date:` line. The result feeds the copyright range in a
//! [banner](crate::banner).
//!
//! Resolution is split in two layers:
//!
//! - [`resolve_first_commit_year`] always reports failures as `Err`.
//! - [`first_commit_year`] applies a [`FaultTolerance`] policy on top. The
//!   default policy turns any failure into `0` ("unknown"), so a shallow CI
//!   checkout or a missing `git` never breaks a build.
//!
//! # Example
//!
//! ```
//! use build_helpers_core::commit_year::{FaultTolerance, first_commit_year};
//! use build_helpers_core::exec::ExecResult;
//!
//! let git = |_: &str| -> ExecResult<Vec<u8>> {
//!     Ok(b"commit 456\nDate:   Tue Feb 7 21:31:04 2023 +0000\n".to_vec())
//! };
//! assert_eq!(first_commit_year(&git, FaultTolerance::Strict).unwrap(), 2023);
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, Utc, Weekday};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::exec::{CommandExecutor, ExecError};

/// Prints the log entry of the root commit(s) of `HEAD`.
pub const FIRST_COMMIT_COMMAND: &str = "git log $(git rev-list --max-parents=0 HEAD)";

static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Date:\s*([^\n\r]+)").expect("date line pattern is valid"));

/// Errors from resolving the first commit year.
#[derive(Error, Debug)]
pub enum CommitYearError {
    /// The command could not be run or exited unsuccessfully.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The output has no `Date:` line.
    #[error("stdout doesn't contain 'Date: ...'")]
    MissingDateLine,

    /// The `Date:` line does not hold a recognizable date.
    #[error("stdout 'Date: ...' is invalid")]
    InvalidDate {
        /// The text after `Date:`.
        value: String,
    },

    /// The date parsed but its year cannot be used in a copyright range.
    #[error("first commit year {year} is out of range")]
    YearOutOfRange {
        /// The parsed year.
        year: i32,
    },
}

/// Result alias for commit year resolution.
pub type CommitYearResult<T> = Result<T, CommitYearError>;

/// What to do when the first commit year cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultTolerance {
    /// Log the failure and report year `0`.
    #[default]
    Tolerant,
    /// Return the failure to the caller.
    Strict,
}

impl FaultTolerance {
    /// Whether failures are swallowed.
    pub const fn is_tolerant(self) -> bool {
        matches!(self, Self::Tolerant)
    }
}

impl From<bool> for FaultTolerance {
    fn from(fault_tolerant: bool) -> Self {
        if fault_tolerant {
            Self::Tolerant
        } else {
            Self::Strict
        }
    }
}

/// The `Date:` line of a commit, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDate {
    /// Text that followed `Date:`, trimmed.
    pub raw: String,
    /// The parsed date, in the commit's own offset.
    pub date: DateTime<FixedOffset>,
}

impl CommitDate {
    /// Find and parse the first `Date:` line in `git log` output.
    ///
    /// The label is case-sensitive. Accepted date shapes are git's default
    /// (`Tue Feb 7 21:31:04 2023 +0000`, weekday optional and not checked),
    /// RFC 2822, RFC 3339, and git's ISO-like format
    /// (`2023-02-07 21:31:04 +0000`).
    ///
    /// # Errors
    ///
    /// Returns [`CommitYearError::MissingDateLine`] or
    /// [`CommitYearError::InvalidDate`].
    pub fn from_log(stdout: &str) -> CommitYearResult<Self> {
        let raw = DATE_LINE
            .captures(stdout)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .ok_or(CommitYearError::MissingDateLine)?;

        let date = parse_date(&raw).ok_or_else(|| CommitYearError::InvalidDate {
            value: raw.clone(),
        })?;

        Ok(Self { raw, date })
    }

    /// Calendar year of the commit in UTC.
    pub fn utc_year(&self) -> i32 {
        self.date.with_timezone(&Utc).year()
    }
}

fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(strip_weekday(value), "%b %e %H:%M:%S %Y %z")
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

/// Drop a leading weekday name (`Tue`, `Tuesday,`) if present.
fn strip_weekday(value: &str) -> &str {
    match value.split_once(char::is_whitespace) {
        Some((first, rest)) if first.trim_end_matches(',').parse::<Weekday>().is_ok() => {
            rest.trim_start()
        }
        _ => value,
    }
}

/// Run the first-commit command once and return the commit's UTC year.
///
/// Never swallows failures; see [`first_commit_year`] for the policy wrapper.
///
/// # Errors
///
/// Returns [`CommitYearError`] if the executor fails, its output has no
/// `Date:` line, or the date cannot be parsed.
#[instrument(skip(executor))]
pub fn resolve_first_commit_year<E>(executor: &E) -> CommitYearResult<u32>
where
    E: CommandExecutor + ?Sized,
{
    let stdout = executor.execute(FIRST_COMMIT_COMMAND)?;
    let stdout = String::from_utf8_lossy(&stdout);

    let commit = CommitDate::from_log(&stdout)?;
    let year = commit.utc_year();
    debug!(raw = %commit.raw, year, "parsed first commit date");

    u32::try_from(year)
        .ok()
        .filter(|y| *y > 0)
        .ok_or(CommitYearError::YearOutOfRange { year })
}

/// Resolve the first commit year under a [`FaultTolerance`] policy.
///
/// With [`FaultTolerance::Tolerant`] every resolution failure is logged and
/// becomes `Ok(0)`. With [`FaultTolerance::Strict`] it is returned as `Err`.
///
/// # Errors
///
/// Only in strict mode; see [`resolve_first_commit_year`].
#[instrument(skip(executor))]
pub fn first_commit_year<E>(executor: &E, policy: FaultTolerance) -> CommitYearResult<u32>
where
    E: CommandExecutor + ?Sized,
{
    match resolve_first_commit_year(executor) {
        Ok(year) => Ok(year),
        Err(err) if policy.is_tolerant() => {
            warn!(error = %err, "could not resolve first commit year, using 0");
            Ok(0)
        }
        Err(err) => Err(err),
    }
}

/// Resolve the first commit year, falling back to `0` on any failure.
pub fn first_commit_year_or_zero<E>(executor: &E) -> u32
where
    E: CommandExecutor + ?Sized,
{
    resolve_first_commit_year(executor).unwrap_or_else(|err| {
        warn!(error = %err, "could not resolve first commit year, using 0");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecResult;

    fn log_with(date_line: &str) -> String {
        format!("commit 456...\nAuthor: ...\n{date_line}\n\n    Initial commit\n")
    }

    fn canned(output: String) -> impl Fn(&str) -> ExecResult<Vec<u8>> {
        move |_: &str| Ok(output.clone().into_bytes())
    }

    fn failing(_: &str) -> ExecResult<Vec<u8>> {
        Err(ExecError::Other("Oops!".into()))
    }

    #[test]
    fn executor_failure_is_swallowed_when_tolerant() {
        assert_eq!(first_commit_year(&failing, FaultTolerance::Tolerant).unwrap(), 0);
        assert_eq!(first_commit_year(&failing, FaultTolerance::default()).unwrap(), 0);
        assert_eq!(first_commit_year_or_zero(&failing), 0);
    }

    #[test]
    fn executor_failure_surfaces_message_when_strict() {
        let err = first_commit_year(&failing, FaultTolerance::Strict).unwrap_err();
        assert!(matches!(err, CommitYearError::Exec(_)));
        assert_eq!(err.to_string(), "Oops!");
    }

    #[test]
    fn lowercase_date_label_is_not_a_match() {
        let exec = canned(log_with("date:   Tue Feb 7 21:31:04 2023 +0000"));
        assert_eq!(first_commit_year(&exec, FaultTolerance::Tolerant).unwrap(), 0);

        let err = first_commit_year(&exec, FaultTolerance::Strict).unwrap_err();
        assert_eq!(err.to_string(), "stdout doesn't contain 'Date: ...'");
    }

    #[test]
    fn impossible_date_is_invalid() {
        let exec = canned(log_with("Date:   Tue Feb 32 21:31:04 2023 +0000"));
        assert_eq!(first_commit_year(&exec, FaultTolerance::Tolerant).unwrap(), 0);

        let err = first_commit_year(&exec, FaultTolerance::Strict).unwrap_err();
        assert_eq!(err.to_string(), "stdout 'Date: ...' is invalid");
        match err {
            CommitYearError::InvalidDate { value } => {
                assert_eq!(value, "Tue Feb 32 21:31:04 2023 +0000");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn valid_date_resolves_under_any_policy() {
        let exec = canned(log_with("Date:   Tue Feb 7 21:31:04 2023 +0000"));
        assert_eq!(first_commit_year(&exec, FaultTolerance::Tolerant).unwrap(), 2023);
        assert_eq!(first_commit_year(&exec, FaultTolerance::Strict).unwrap(), 2023);
        assert_eq!(first_commit_year_or_zero(&exec), 2023);
    }

    #[test]
    fn runs_the_root_commit_command_once() {
        let calls = std::cell::RefCell::new(Vec::new());
        let exec = |command: &str| -> ExecResult<Vec<u8>> {
            calls.borrow_mut().push(command.to_string());
            Err(ExecError::Other("no git".into()))
        };
        let _ = first_commit_year(&exec, FaultTolerance::Tolerant);
        assert_eq!(*calls.borrow(), vec![FIRST_COMMIT_COMMAND.to_string()]);
    }

    #[test]
    fn year_is_taken_in_utc() {
        // Local new year's eve, already the next year in UTC.
        let exec = canned(log_with("Date:   Sat Dec 31 23:30:00 2022 -0200"));
        assert_eq!(first_commit_year(&exec, FaultTolerance::Strict).unwrap(), 2023);
    }

    #[test]
    fn first_date_line_wins() {
        let stdout = format!(
            "{}{}",
            log_with("Date:   Mon Jan 2 10:00:00 2017 +0100"),
            log_with("Date:   Tue Feb 7 21:31:04 2023 +0000")
        );
        let commit = CommitDate::from_log(&stdout).unwrap();
        assert_eq!(commit.utc_year(), 2017);
    }

    #[test]
    fn accepts_other_date_shapes() {
        for line in [
            "Date:   Feb 7 21:31:04 2023 +0000",
            "Date:   Tue, 07 Feb 2023 21:31:04 +0000",
            "Date:   2023-02-07T21:31:04+00:00",
            "Date:   2023-02-07 21:31:04 +0000",
        ] {
            let commit = CommitDate::from_log(&log_with(line)).unwrap();
            assert_eq!(commit.utc_year(), 2023, "{line}");
        }
    }

    #[test]
    fn weekday_is_not_cross_checked() {
        // Feb 7 2023 was a Tuesday.
        let commit = CommitDate::from_log(&log_with("Date:   Fri Feb 7 21:31:04 2023 +0000")).unwrap();
        assert_eq!(commit.utc_year(), 2023);
    }

    #[test]
    fn crlf_output_is_handled() {
        let stdout = "commit 456\r\nDate:   Tue Feb 7 21:31:04 2023 +0000\r\n";
        let commit = CommitDate::from_log(stdout).unwrap();
        assert_eq!(commit.raw, "Tue Feb 7 21:31:04 2023 +0000");
    }

    #[test]
    fn non_utf8_output_is_converted_lossily() {
        let mut bytes = b"commit \xff\xfe\n".to_vec();
        bytes.extend_from_slice(b"Date:   Tue Feb 7 21:31:04 2023 +0000\n");
        let exec = move |_: &str| -> ExecResult<Vec<u8>> { Ok(bytes.clone()) };
        assert_eq!(resolve_first_commit_year(&exec).unwrap(), 2023);
    }

    #[test]
    fn fault_tolerance_from_bool() {
        assert_eq!(FaultTolerance::from(true), FaultTolerance::Tolerant);
        assert_eq!(FaultTolerance::from(false), FaultTolerance::Strict);
        assert!(FaultTolerance::default().is_tolerant());
    }

    #[test]
    fn strip_weekday_leaves_month_alone() {
        assert_eq!(strip_weekday("Tue Feb 7"), "Feb 7");
        assert_eq!(strip_weekday("Tuesday, Feb 7"), "Feb 7");
        assert_eq!(strip_weekday("Feb 7"), "Feb 7");
    }
}
