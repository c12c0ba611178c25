/*!
 * Variant selection.
 *
 * Given a source notebook, a language and an audience, the selector keeps
 * the cells that belong to that variant, in source order, and builds a new
 * notebook around them. Every non-empty cell must declare its languages in
 * `metadata.lang`; a cell that does not is an authoring bug and fails the
 * whole selection.
 */

use std::fmt;

use crate::errors::SelectionError;
use crate::language_utils::{parse_lang_list, SupportedLanguages};
use crate::notebook::{Cell, LangAttribute, Notebook};

/// Tag of cells that only belong to the teacher variant
pub const SOLUTION_TAG: &str = "soln";

/// Tag of cells that only belong to the student variant
pub const EXERCISE_TAG: &str = "exer";

/// Audience of a derived notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Student,
    Teacher,
}

impl Audience {
    /// Both audiences, student first
    pub const ALL: [Audience; 2] = [Audience::Student, Audience::Teacher];

    /// Tag whose cells are dropped from this audience's notebooks
    pub fn removal_tag(&self) -> &'static str {
        match self {
            Self::Student => SOLUTION_TAG,
            Self::Teacher => EXERCISE_TAG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Selects the cells of one language/audience variant
#[derive(Debug, Clone, Default)]
pub struct VariantSelector {
    languages: SupportedLanguages,
}

impl VariantSelector {
    pub fn new(languages: SupportedLanguages) -> Self {
        Self { languages }
    }

    /// Languages a cell may declare
    pub fn languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    /// Build the variant of `source` for `language`, dropping cells tagged `removal_tag`.
    ///
    /// Returns the derived notebook and its number of cells.
    pub fn select(
        &self,
        source: &Notebook,
        language: &str,
        removal_tag: &str,
    ) -> Result<(Notebook, usize), SelectionError> {
        let mut retained = Vec::new();

        for (index, cell) in source.cells.iter().enumerate() {
            // Audience filtering wins over everything else
            if cell.has_tag(removal_tag) {
                continue;
            }

            // No language required for empty cells
            if cell.is_empty() {
                retained.push(cell.clone());
                continue;
            }

            let codes = self.cell_languages(index, cell)?;
            if codes.contains(&language) {
                retained.push(cell.clone());
            }
        }

        let cell_count = retained.len();
        Ok((source.derive(retained), cell_count))
    }

    /// Build the variant of `source` for `language` and `audience`
    pub fn select_variant(
        &self,
        source: &Notebook,
        language: &str,
        audience: Audience,
    ) -> Result<(Notebook, usize), SelectionError> {
        self.select(source, language, audience.removal_tag())
    }

    /// Check the language metadata of every cell some audience would keep.
    ///
    /// Succeeds exactly when `select` succeeds for every language and audience,
    /// so callers can reject a source before writing any of its variants.
    pub fn validate(&self, source: &Notebook) -> Result<(), SelectionError> {
        for (index, cell) in source.cells.iter().enumerate() {
            let removed_everywhere = Audience::ALL
                .iter()
                .all(|audience| cell.has_tag(audience.removal_tag()));
            if cell.is_empty() || removed_everywhere {
                continue;
            }

            self.cell_languages(index, cell)?;
        }

        Ok(())
    }

    /// Parse and check the `lang` attribute of a non-empty cell
    fn cell_languages<'c>(&self, index: usize, cell: &'c Cell) -> Result<Vec<&'c str>, SelectionError> {
        let raw = match cell.lang() {
            LangAttribute::Missing => {
                return Err(SelectionError::MissingLanguageTag { index, preview: cell.preview() });
            }
            LangAttribute::Malformed => {
                return Err(SelectionError::MalformedLanguageTag { index, preview: cell.preview() });
            }
            LangAttribute::Text("") => {
                return Err(SelectionError::EmptyLanguageTag { index, preview: cell.preview() });
            }
            LangAttribute::Text(raw) => raw,
        };

        let codes = parse_lang_list(raw);
        if let Some(code) = codes.iter().find(|code| !self.languages.contains(code)) {
            return Err(SelectionError::UnsupportedLanguageCode {
                index,
                preview: cell.preview(),
                code: code.to_string(),
            });
        }

        Ok(codes)
    }
}
