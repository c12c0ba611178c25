/*!
 * Notebook documents.
 *
 * This module provides the document model shared by the selector and the
 * rebuild orchestrator:
 * - `Notebook`: ordered cells plus document-level fields copied verbatim
 *   into every derived notebook
 * - `Cell`: one content unit, kept as its original JSON object so fields the
 *   tool does not interpret survive a load/filter/save cycle unchanged
 */

pub mod model;

pub use model::{Cell, LangAttribute, Notebook};
