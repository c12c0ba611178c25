/*!
 * Error types for the nbsplit application.
 *
 * Every error here is fatal: a malformed cell or an inconsistent variant set
 * is a source-authoring bug, so nothing is recovered internally and the first
 * error aborts the run. Errors are defined with the thiserror crate.
 *
 * A wrapping variant only describes itself and exposes what it wraps through
 * `source()`; render the whole chain with `{:#}` on an `anyhow::Error`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while selecting the cells of one variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A non-empty cell has no `lang` attribute
    #[error("Cell {index} \"{preview} ...\" has no \"lang\" property")]
    MissingLanguageTag {
        /// Position of the cell in the source document
        index: usize,
        /// Leading line of the cell content
        preview: String,
    },

    /// The `lang` attribute is present but empty
    #[error("Cell {index} \"{preview} ...\" has empty \"lang\" property")]
    EmptyLanguageTag {
        /// Position of the cell in the source document
        index: usize,
        /// Leading line of the cell content
        preview: String,
    },

    /// The `lang` attribute is not a string
    #[error("Cell {index} \"{preview} ...\" has a \"lang\" property that is not a string")]
    MalformedLanguageTag {
        /// Position of the cell in the source document
        index: usize,
        /// Leading line of the cell content
        preview: String,
    },

    /// A code listed in `lang` is not one of the supported languages
    #[error("Cell {index} \"{preview} ...\" has invalid lang \"{code}\"")]
    UnsupportedLanguageCode {
        /// Position of the cell in the source document
        index: usize,
        /// Leading line of the cell content
        preview: String,
        /// The offending code, as written in the cell
        code: String,
    },
}

/// Errors that abort a rebuild run
#[derive(Error, Debug)]
pub enum BuildError {
    /// A cell of a source document failed validation
    #[error("{}", .document.display())]
    Selection {
        /// Source document holding the cell
        document: PathBuf,
        /// The selection failure
        #[source]
        source: SelectionError,
    },

    /// Student and teacher variants of one language have different sizes
    #[error(
        "student and teacher versions have different number of cells ({language}): \
         {student} vs {teacher} in {}",
        .document.display()
    )]
    AudienceCellCountMismatch {
        /// Source document
        document: PathBuf,
        /// Language code of the variants
        language: String,
        /// Cell count of the student variant
        student: usize,
        /// Cell count of the teacher variant
        teacher: usize,
    },

    /// Teacher variants of different languages have different sizes
    #[error(
        "the number of cells is different between languages ({}): {}",
        .document.display(),
        format_counts(.counts)
    )]
    CrossLanguageCellCountMismatch {
        /// Source document
        document: PathBuf,
        /// Teacher cell count per language, in processing order
        counts: Vec<(String, usize)>,
    },

    /// Reading or writing a notebook failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Any other file system failure
    #[error("File error: {0}")]
    File(String),
}

/// Errors raised while loading or saving a notebook
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read or written
    #[error("I/O error on {}", .path.display())]
    Io {
        /// Path of the notebook
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid notebook
    #[error("Failed to parse notebook {}", .path.display())]
    Parse {
        /// Path of the notebook
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a rebuild run
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(language, count)| format!("{}={}", language, count))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<std::io::Error> for BuildError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<BuildError>() {
            Ok(build_error) => Self::Build(build_error),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<DocumentError> for AppError {
    fn from(error: DocumentError) -> Self {
        Self::Build(BuildError::Document(error))
    }
}
