/*!
 * Common test utilities for the nbsplit test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

use nbsplit::app_config::Config;
use nbsplit::notebook::{Cell, Notebook};
use nbsplit::selector::{EXERCISE_TAG, SOLUTION_TAG};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    let _ = env_logger::builder().is_test(true).try_init();
    Ok(TempDir::new()?)
}

/// Configuration rooted in `dir`: sources in `dir/src`, variants in `dir`
pub fn config_in(dir: &Path) -> Config {
    Config {
        source_dir: dir.join("src"),
        output_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

/// Writes a notebook into `dir/src/<name>`
pub fn write_source(dir: &Path, name: &str, notebook: &Notebook) -> Result<PathBuf> {
    let path = dir.join("src").join(name);
    notebook.save(&path)?;
    Ok(path)
}

/// Writes raw JSON into `dir/src/<name>`
pub fn write_source_json(dir: &Path, name: &str, json: &str) -> Result<PathBuf> {
    let src = dir.join("src");
    fs::create_dir_all(&src)?;
    let path = src.join(name);
    fs::write(&path, json)?;
    Ok(path)
}

/// Sets the modification time of an existing file
pub fn set_mtime(path: &Path, mtime: SystemTime) -> Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(mtime)?;
    Ok(())
}

/// Loads a derived notebook and returns the leading line of each cell
pub fn previews(path: &Path) -> Result<Vec<String>> {
    let notebook = Notebook::load(path)?;
    Ok(notebook.cells.iter().map(Cell::preview).collect())
}

/// A bilingual lesson whose variants are all consistent:
/// every variant has 4 cells.
pub fn bilingual_lesson() -> Notebook {
    Notebook::new(4, 5)
        .with_cell(Cell::markdown(&["# Lesson"]).with_lang("en"))
        .with_cell(Cell::markdown(&["# Leçon"]).with_lang("fr"))
        .with_cell(Cell::markdown(&[]))
        .with_cell(Cell::new("code", &["x = 1"]).with_lang("en,fr"))
        .with_cell(Cell::markdown(&["Write the loop"]).with_lang("en").with_tags(&[EXERCISE_TAG]))
        .with_cell(Cell::markdown(&["Écrivez la boucle"]).with_lang("fr").with_tags(&[EXERCISE_TAG]))
        .with_cell(Cell::new("code", &["for i in range(3):\n", "    print(i)"]).with_lang("en,fr").with_tags(&[SOLUTION_TAG]))
}
