//! Processing many font files independently.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{create_placeholder_font, Error, Options, PlaceholderFont, SourceFont};

/// The overall result of processing a batch of fonts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// At least one font was processed and none failed.
    Success,
    /// Some fonts failed and some succeeded.
    PartialFailure,
    /// No font was processed successfully.
    TotalFailure,
}

impl BatchOutcome {
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (0, _) => BatchOutcome::TotalFailure,
            (_, 0) => BatchOutcome::Success,
            _ => BatchOutcome::PartialFailure,
        }
    }

    /// The process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            BatchOutcome::Success => 0,
            BatchOutcome::PartialFailure => 1,
            BatchOutcome::TotalFailure => 2,
        }
    }
}

/// The result of processing one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<PlaceholderFont, Error>,
}

/// Per-file results, in the order the files were given.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = (&Path, &PlaceholderFont)> {
        self.files
            .iter()
            .filter_map(|file| Some((file.path.as_path(), file.result.as_ref().ok()?)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.files
            .iter()
            .filter_map(|file| Some((file.path.as_path(), file.result.as_ref().err()?)))
    }

    pub fn outcome(&self) -> BatchOutcome {
        BatchOutcome::from_counts(self.succeeded().count(), self.failed().count())
    }
}

/// Create a placeholder for every font file in `paths`.
///
/// Files are processed in parallel; a failure in one file does not affect
/// the others.
pub fn process_batch(
    paths: &[PathBuf],
    donor: Option<&SourceFont>,
    options: &Options,
) -> BatchReport {
    let files = paths
        .par_iter()
        .map(|path| {
            log::info!("processing {}", path.display());
            let result = std::fs::read(path)
                .map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|data| create_placeholder_font(&data, donor, options));
            if let Err(e) = &result {
                log::debug!("{} failed: {e}", path.display());
            }
            FileReport {
                path: path.clone(),
                result,
            }
        })
        .collect();
    BatchReport { files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, BatchOutcome::TotalFailure)]
    #[case(0, 3, BatchOutcome::TotalFailure)]
    #[case(2, 0, BatchOutcome::Success)]
    #[case(2, 1, BatchOutcome::PartialFailure)]
    fn outcome_from_counts(
        #[case] succeeded: usize,
        #[case] failed: usize,
        #[case] expected: BatchOutcome,
    ) {
        assert_eq!(BatchOutcome::from_counts(succeeded, failed), expected);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(BatchOutcome::Success.exit_code(), 0);
        assert_eq!(BatchOutcome::PartialFailure.exit_code(), 1);
        assert_eq!(BatchOutcome::TotalFailure.exit_code(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.ttf");
        let report = process_batch(&[path.clone()], None, &Options::default());
        assert_eq!(report.outcome(), BatchOutcome::TotalFailure);
        let (failed_path, error) = report.failed().next().unwrap();
        assert_eq!(failed_path, path.as_path());
        assert!(matches!(error, Error::Io { .. }));
    }
}
