/*!
 * Properties of a generated variant set
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use nbsplit::app_controller::Controller;
use nbsplit::notebook::Notebook;
use nbsplit::selector::{Audience, EXERCISE_TAG, SOLUTION_TAG};
use crate::common;

/// A lesson with opaque fields that must survive the rebuild
const LESSON_JSON: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "id": "intro",
   "metadata": {"lang": "en,fr", "slideshow": {"slide_type": "slide"}},
   "source": ["# Été 2024 ✓"]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "id": "setup",
   "metadata": {"lang": "en,fr"},
   "outputs": [{"name": "stdout", "output_type": "stream", "text": ["ok\n"]}],
   "source": ["import math"]
  },
  {
   "cell_type": "markdown",
   "id": "task-en",
   "metadata": {"lang": "en", "tags": ["exer"]},
   "source": ["Compute the area."]
  },
  {
   "cell_type": "markdown",
   "id": "task-fr",
   "metadata": {"lang": "fr", "tags": ["exer"]},
   "source": ["Calculez l'aire."]
  },
  {
   "cell_type": "code",
   "execution_count": null,
   "id": "answer",
   "metadata": {"lang": "en,fr", "tags": ["soln", "hide-input"]},
   "outputs": [],
   "source": ["area = math.pi * r ** 2"]
  },
  {
   "cell_type": "markdown",
   "id": "outro-en",
   "metadata": {"lang": "en"},
   "source": ["Well done!"]
  },
  {
   "cell_type": "markdown",
   "id": "outro-fr",
   "metadata": {"lang": "fr"},
   "source": ["Bravo !"]
  }
 ],
 "metadata": {"kernelspec": {"display_name": "Python 3", "name": "python3"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

fn variant_path(dir: &Path, audience: Audience, language: &str) -> std::path::PathBuf {
    let prefix = match audience {
        Audience::Student => "",
        Audience::Teacher => "solution-",
    };
    dir.join(format!("{}{}", prefix, language)).join("lesson.ipynb")
}

fn cell_ids(notebook: &Notebook) -> Vec<String> {
    notebook
        .cells
        .iter()
        .filter_map(|cell| cell.fields().get("id").and_then(|id| id.as_str()).map(String::from))
        .collect()
}

fn build_lesson(dir: &Path) -> Result<()> {
    common::write_source_json(dir, "lesson.ipynb", LESSON_JSON)?;
    Controller::with_config(common::config_in(dir))?.run(true)?;
    Ok(())
}

/// Test that two forced runs produce byte-identical files
#[test]
fn test_forcedRuns_onUnchangedSource_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    build_lesson(dir)?;

    let mut first = Vec::new();
    for language in ["en", "fr"] {
        for audience in Audience::ALL {
            first.push(fs::read(variant_path(dir, audience, language))?);
        }
    }

    Controller::with_config(common::config_in(dir))?.run(true)?;

    let mut second = Vec::new();
    for language in ["en", "fr"] {
        for audience in Audience::ALL {
            second.push(fs::read(variant_path(dir, audience, language))?);
        }
    }

    assert_eq!(first, second);

    Ok(())
}

/// Test tags, languages and order of every variant
#[test]
fn test_variants_shouldPartitionCellsByTagAndLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    build_lesson(dir)?;

    let source = Notebook::from_json_str(LESSON_JSON)?;
    let source_ids = cell_ids(&source);

    for language in ["en", "fr"] {
        let mut sizes = Vec::new();
        for audience in Audience::ALL {
            let variant = Notebook::load(variant_path(dir, audience, language))?;
            sizes.push(variant.cells.len());

            for cell in &variant.cells {
                // Disjoint tagging
                match audience {
                    Audience::Student => assert!(!cell.has_tag(SOLUTION_TAG)),
                    Audience::Teacher => assert!(!cell.has_tag(EXERCISE_TAG)),
                }
                // Language partition
                let lang = cell.metadata().and_then(|m| m.get("lang")).and_then(|l| l.as_str()).unwrap();
                assert!(lang.split(',').any(|code| code == language));
            }

            // Order preservation: ids appear in source order
            let ids = cell_ids(&variant);
            let positions: Vec<usize> = ids
                .iter()
                .map(|id| source_ids.iter().position(|s| s == id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        // Count equality between audiences
        assert_eq!(sizes[0], sizes[1]);
        assert_eq!(sizes[0], 4);
    }

    let student_en = Notebook::load(variant_path(dir, Audience::Student, "en"))?;
    assert_eq!(cell_ids(&student_en), vec!["intro", "setup", "task-en", "outro-en"]);
    let teacher_fr = Notebook::load(variant_path(dir, Audience::Teacher, "fr"))?;
    assert_eq!(cell_ids(&teacher_fr), vec!["intro", "setup", "answer", "outro-fr"]);

    Ok(())
}

/// Test that retained cells and document fields survive unchanged
#[test]
fn test_variants_shouldPreserveCellsAndDocumentFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    build_lesson(dir)?;

    let source = Notebook::from_json_str(LESSON_JSON)?;
    let teacher_en = Notebook::load(variant_path(dir, Audience::Teacher, "en"))?;

    assert_eq!(teacher_en.metadata, source.metadata);
    assert_eq!(teacher_en.nbformat, source.nbformat);
    assert_eq!(teacher_en.nbformat_minor, source.nbformat_minor);
    assert_eq!(teacher_en.cells[1], source.cells[1]);
    assert_eq!(teacher_en.cells[2], source.cells[4]);

    Ok(())
}

/// Test the text layout of a written variant
#[test]
fn test_variants_shouldBeReadableUtf8WithTrailingNewline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    build_lesson(dir)?;

    let text = fs::read_to_string(variant_path(dir, Audience::Student, "fr"))?;

    assert!(text.starts_with("{\n \"cells\": [\n"));
    assert!(text.ends_with("}\n"));
    assert!(!text.ends_with("\n\n"));
    assert!(text.contains("# Été 2024 ✓"));
    assert!(text.contains("Calculez l'aire."));

    // Key order inside cells is kept
    let id = text.find("\"id\": \"setup\"").unwrap();
    let execution = text.find("\"execution_count\": 3").unwrap();
    assert!(execution < id);

    Ok(())
}
