/*!
 * # nbsplit - per-language, per-audience notebook variants
 *
 * A Rust library that turns one annotated source notebook into a set of
 * derived notebooks: one per language and one per audience.
 *
 * ## Features
 *
 * - Cells declare their languages in `metadata.lang` (e.g. `"en,fr"`)
 * - Cells tagged `soln` are left out of student notebooks, cells tagged
 *   `exer` are left out of teacher notebooks
 * - Document-level metadata and format versions are copied verbatim
 * - Derived notebooks are only rebuilt when older than their source
 * - Student and teacher variants, and teacher variants across languages,
 *   must have the same number of cells
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `selector`: cell selection and `lang` metadata validation
 * - `app_controller`: rebuild of all variants with consistency checks
 * - `notebook`: notebook model, loading and saving
 * - `staleness`: decides which derived notebooks need a rebuild
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `language_utils`: `lang` attribute parsing and ISO language codes
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod notebook;
pub mod selector;
pub mod staleness;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BuildSummary, Controller};
pub use errors::{AppError, BuildError, DocumentError, SelectionError};
pub use language_utils::SupportedLanguages;
pub use notebook::{Cell, Notebook};
pub use selector::{Audience, VariantSelector};
