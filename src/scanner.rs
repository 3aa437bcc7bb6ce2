//! Bounded, comment-aware reading of a source file's header.

use crate::classifier::{classify, LineState, Signal};
use crate::error::ScanError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Files above this size get a warning that only a prefix is scanned.
pub const LARGE_FILE_THRESHOLD: u64 = 10_000_000;

/// Classifier state for one file, plus the number of lines retained so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanState {
    pub mode: LineState,
    pub kept: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfImportClause,
    LineBudget,
    EndOfFile,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Retained lines, trimmed, each terminated by `\n`.
    pub text: String,
    pub kept_lines: usize,
    pub stop: StopReason,
    /// State at the moment scanning stopped.
    pub final_state: LineState,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundedScanner {
    line_budget: usize,
    large_file_threshold: u64,
}

impl BoundedScanner {
    pub fn new(line_budget: usize) -> Self {
        Self {
            line_budget,
            large_file_threshold: LARGE_FILE_THRESHOLD,
        }
    }

    pub fn with_large_file_threshold(mut self, threshold: u64) -> Self {
        self.large_file_threshold = threshold;
        self
    }

    /// Scan `path` until the import clause ends or the line budget runs out.
    ///
    /// The file handle is dropped on every return path.
    pub fn scan(&self, path: &Path) -> Result<ScanOutcome, ScanError> {
        let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
        let size = file.metadata().map_err(|e| ScanError::io(path, e))?.len();

        if size > self.large_file_threshold {
            warn!(
                path = %path.display(),
                size,
                line_budget = self.line_budget,
                "file is really large, only scanning its first lines"
            );
        }

        let outcome = self
            .scan_reader(BufReader::new(file))
            .map_err(|e| ScanError::io(path, e))?;

        debug!(
            path = %path.display(),
            kept = outcome.kept_lines,
            stop = ?outcome.stop,
            "scanned file header"
        );
        if outcome.stop == StopReason::LineBudget && outcome.final_state.in_import_clause() {
            debug!(path = %path.display(), "import clause truncated by line budget");
        }

        Ok(outcome)
    }

    /// Same as [`scan`](Self::scan) over any buffered reader.
    pub fn scan_reader<R: BufRead>(&self, mut reader: R) -> io::Result<ScanOutcome> {
        let mut state = ScanState::default();
        let mut text = String::new();
        let mut buf = Vec::new();

        let stop = loop {
            if state.kept >= self.line_budget {
                break StopReason::LineBudget;
            }

            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break StopReason::EndOfFile;
            }

            // Invalid UTF-8 only ever shows up in string literals or comments.
            let line = String::from_utf8_lossy(&buf);
            let classification = classify(&line, state.mode);
            state.mode = classification.next;
            trace!(
                rule = ?classification.rule,
                keep = classification.keep,
                state = ?state.mode,
                "classified line"
            );

            if classification.keep {
                text.push_str(line.trim());
                text.push('\n');
                state.kept += 1;
            }

            if classification.signal == Signal::EndOfImportClause {
                break StopReason::EndOfImportClause;
            }
        };

        Ok(ScanOutcome {
            text,
            kept_lines: state.kept,
            stop,
            final_state: state.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn scan_str(src: &str, budget: usize) -> ScanOutcome {
        BoundedScanner::new(budget)
            .scan_reader(Cursor::new(src.as_bytes()))
            .unwrap()
    }

    #[test]
    fn stops_after_grouped_import_clause() {
        let src = "package app\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {}\n";
        let out = scan_str(src, 50);
        assert_eq!(out.stop, StopReason::EndOfImportClause);
        assert_eq!(out.text, "package app\n\nimport (\n\"fmt\"\n\"os\"\n)\n");
        assert!(!out.text.contains("func main"));
    }

    #[test]
    fn stops_after_single_import() {
        let out = scan_str("package app\nimport \"fmt\"\nimport \"os\"\n", 50);
        assert_eq!(out.stop, StopReason::EndOfImportClause);
        assert_eq!(out.kept_lines, 2);
    }

    #[test]
    fn stops_after_one_line_grouped_import() {
        let out = scan_str("package a\nimport (\"b\")\nfunc f() {\nx := 1\n}\n", 50);
        assert_eq!(out.stop, StopReason::EndOfImportClause);
        assert_eq!(out.kept_lines, 2);
        assert_eq!(out.text, "package a\nimport (\"b\")\n");
    }

    #[test]
    fn comments_are_not_retained_or_counted() {
        let src = "// Copyright\n/*\nimport (\n\"decoy\"\n)\n*/\npackage app\n";
        let out = scan_str(src, 50);
        assert_eq!(out.text, "package app\n");
        assert_eq!(out.kept_lines, 1);
        assert_eq!(out.stop, StopReason::EndOfFile);
    }

    #[test]
    fn budget_bounds_retained_lines() {
        let mut src = String::from("package big\nimport (\n");
        for i in 0..1000 {
            src.push_str(&format!("\t\"dep{i}\"\n"));
        }
        let out = scan_str(&src, 10);
        assert_eq!(out.stop, StopReason::LineBudget);
        assert_eq!(out.kept_lines, 10);
        assert_eq!(out.text.lines().count(), 10);
        assert!(out.final_state.in_import_clause());
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let out = scan_str("package win\r\nimport (\r\n\t\"fmt\"\r\n)\r\n", 50);
        assert_eq!(out.stop, StopReason::EndOfImportClause);
        assert_eq!(out.text, "package win\nimport (\n\"fmt\"\n)\n");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn write_large_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("huge.go");
        let mut body = String::from("package huge\n\nimport (\n");
        for i in 0..5000 {
            body.push_str(&format!("\t\"dep{i}\"\n"));
        }
        body.push_str(")\n");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn large_file_is_still_scanned_within_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_large_file(dir.path());

        let out = BoundedScanner::new(20)
            .with_large_file_threshold(0)
            .scan(&path)
            .unwrap();
        assert_eq!(out.stop, StopReason::LineBudget);
        assert_eq!(out.kept_lines, 20);
        assert!(out.text.starts_with("package huge\n"));
    }

    #[test]
    fn large_file_emits_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_large_file(dir.path());

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let scanner = BoundedScanner::new(20).with_large_file_threshold(0);
        let result = tracing::subscriber::with_default(subscriber, || scanner.scan(&path));
        assert!(result.is_ok());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("file is really large"), "{output}");
    }

    #[test]
    fn small_file_does_not_warn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.go");
        std::fs::write(&path, "package small\n").unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let scanner = BoundedScanner::new(20);
        tracing::subscriber::with_default(subscriber, || scanner.scan(&path)).unwrap();
        assert!(logs.0.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BoundedScanner::new(10)
            .scan(Path::new("/definitely/not/here.go"))
            .unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
