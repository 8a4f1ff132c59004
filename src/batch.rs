//! Parallel batch driver.
//!
//! Files are independent, so each one is transformed on the rayon pool with
//! its own arena and parser allocator. Results come back in input order.

use crate::error::Diagnostic;
use crate::jsx::{transform, TransformOutput};
use crate::options::Config;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: String,
    pub code: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub path: String,
    /// Transformed module text; `None` when the file failed.
    pub code: Option<String>,
    pub elements_lowered: usize,
    pub diagnostic: Option<Diagnostic>,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.diagnostic.is_none()
    }

    fn from_outcome(path: &str, outcome: Result<TransformOutput, Diagnostic>) -> Self {
        match outcome {
            Ok(output) => Self {
                path: path.to_string(),
                code: Some(output.code),
                elements_lowered: output.elements_lowered,
                diagnostic: None,
            },
            Err(diagnostic) => Self {
                path: path.to_string(),
                code: None,
                elements_lowered: 0,
                diagnostic: Some(diagnostic),
            },
        }
    }
}

/// Transform every file with the same configuration. One failing file does
/// not stop the others.
pub fn transform_all(files: &[SourceFile], config: &Config<String>) -> Vec<FileResult> {
    files
        .par_iter()
        .map(|file| FileResult::from_outcome(&file.path, transform(&file.code, &file.path, config)))
        .collect()
}

/// Number of failed files, with a one-line summary on stderr when non-zero.
pub fn report_failures(results: &[FileResult]) -> usize {
    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        eprintln!(
            "[jsx2ttl] {} of {} file(s) failed to transform",
            failed,
            results.len()
        );
    }
    failed
}
