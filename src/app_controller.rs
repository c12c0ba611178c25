use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::BuildError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::notebook::Notebook;
use crate::selector::{Audience, VariantSelector};
use crate::staleness::{self, RebuildReason};

// @module: Application controller for notebook variant generation

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Source notebooks processed
    pub documents: usize,
    /// Derived notebooks written
    pub built: usize,
    /// Derived notebooks left untouched because they were up to date
    pub skipped: usize,
}

/// Cell counts of the two audience variants of one language.
///
/// A count is `None` when the variant was up to date and not regenerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantCounts {
    pub student: Option<usize>,
    pub teacher: Option<usize>,
}

impl VariantCounts {
    fn set(&mut self, audience: Audience, count: Option<usize>) {
        match audience {
            Audience::Student => self.student = count,
            Audience::Teacher => self.teacher = count,
        }
    }
}

/// A source notebook loaded on first use
struct SourceDocument<'a> {
    path: &'a Path,
    notebook: Option<Notebook>,
}

impl<'a> SourceDocument<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, notebook: None }
    }

    /// Load and validate the notebook the first time it is needed
    fn get(&mut self, selector: &VariantSelector) -> Result<&Notebook, BuildError> {
        let notebook = match self.notebook.take() {
            Some(notebook) => notebook,
            None => {
                let notebook = Notebook::load(self.path)?;
                selector.validate(&notebook).map_err(|source| BuildError::Selection {
                    document: self.path.to_path_buf(),
                    source,
                })?;
                notebook
            }
        };

        Ok(self.notebook.insert(notebook))
    }
}

/// Main application controller: rebuilds every variant of every source notebook
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Cell selection for the configured languages
    selector: VariantSelector,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let selector = VariantSelector::new(config.supported_languages());

        Ok(Self { config, selector })
    }

    /// Rebuild the variants of all source notebooks.
    ///
    /// Stops at the first error; derived notebooks written before it stay on disk.
    pub fn run(&self, force_rebuild: bool) -> Result<BuildSummary> {
        let start_time = Instant::now();
        let sources = FileManager::list_files(&self.config.source_dir)?;
        let mut summary = BuildSummary::default();

        if sources.is_empty() {
            info!("No source notebooks found in {}", self.config.source_dir.display());
        }

        let progress_bar = ProgressBar::new(sources.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} notebooks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let result = sources.iter().try_for_each(|source| {
            let file_name = source
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            progress_bar.set_message(file_name);

            // Log lines go to stderr too; keep them off the bar
            progress_bar.suspend(|| self.build_document(source, force_rebuild, &mut summary))?;
            summary.documents += 1;
            progress_bar.inc(1);
            Ok::<(), BuildError>(())
        });
        progress_bar.finish_and_clear();
        result?;

        info!(
            "Rebuild complete in {:.2}s: {} notebooks, {} built, {} up to date",
            start_time.elapsed().as_secs_f64(),
            summary.documents,
            summary.built,
            summary.skipped
        );

        Ok(summary)
    }

    /// Rebuild all variants of one source notebook.
    ///
    /// Returns the common teacher cell count, or `None` when no teacher
    /// variant was regenerated.
    pub fn build_document(
        &self,
        source: &Path,
        force_rebuild: bool,
        summary: &mut BuildSummary,
    ) -> Result<Option<usize>, BuildError> {
        let mut document = SourceDocument::new(source);
        let mut teacher_counts: Vec<(String, usize)> = Vec::new();

        for language in self.selector.languages().iter() {
            let counts = self.build_language(&mut document, language, force_rebuild, summary)?;
            if let Some(teacher) = counts.teacher {
                teacher_counts.push((language.to_string(), teacher));
            }
        }

        let common = teacher_counts.first().map(|(_, count)| *count);
        if teacher_counts.iter().any(|(_, count)| Some(*count) != common) {
            return Err(BuildError::CrossLanguageCellCountMismatch {
                document: source.to_path_buf(),
                counts: teacher_counts,
            });
        }

        Ok(common)
    }

    /// Build the student and teacher variants of one language
    fn build_language(
        &self,
        document: &mut SourceDocument<'_>,
        language: &str,
        force_rebuild: bool,
        summary: &mut BuildSummary,
    ) -> Result<VariantCounts, BuildError> {
        debug!(
            "Processing {} ({})",
            document.path.display(),
            language_utils::get_language_name(language).unwrap_or_else(|_| language.to_string())
        );

        let mut counts = VariantCounts::default();
        for audience in Audience::ALL {
            let count = self.build_variant(document, language, audience, force_rebuild, summary)?;
            counts.set(audience, count);
        }

        if let (Some(student), Some(teacher)) = (counts.student, counts.teacher) {
            if student != teacher {
                return Err(BuildError::AudienceCellCountMismatch {
                    document: document.path.to_path_buf(),
                    language: language.to_string(),
                    student,
                    teacher,
                });
            }
        }

        Ok(counts)
    }

    /// Regenerate one derived notebook if it is stale
    fn build_variant(
        &self,
        document: &mut SourceDocument<'_>,
        language: &str,
        audience: Audience,
        force_rebuild: bool,
        summary: &mut BuildSummary,
    ) -> Result<Option<usize>, BuildError> {
        let source_path = document.path;
        let output_path = self.output_path(source_path, audience, language)?;
        if let Some(parent) = output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let reason = match staleness::rebuild_reason(source_path, &output_path, force_rebuild)? {
            Some(reason) => reason,
            None => {
                debug!("Up to date: {}", output_path.display());
                summary.skipped += 1;
                return Ok(None);
            }
        };

        info!("Building {} ...", output_path.display());
        if reason == RebuildReason::Outdated {
            debug!("Source changed since {} was built", output_path.display());
        }

        let source = document.get(&self.selector)?;
        let (variant, cell_count) = self
            .selector
            .select_variant(source, language, audience)
            .map_err(|error| BuildError::Selection {
                document: source_path.to_path_buf(),
                source: error,
            })?;
        variant.save(&output_path)?;
        summary.built += 1;

        debug!("{} {} variant has {} cells", language, audience, cell_count);
        Ok(Some(cell_count))
    }

    /// Path of the `audience` variant of `source` for `language`
    pub fn output_path(&self, source: &Path, audience: Audience, language: &str) -> Result<PathBuf, BuildError> {
        let dir_name = self.config.variant_dir_name(audience, language);
        FileManager::derived_path(source, &self.config.output_dir, &dir_name)
            .map_err(|e| BuildError::File(e.to_string()))
    }
}
