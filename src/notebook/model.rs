/*!
 * Core notebook model types.
 *
 * Cells are stored as their raw JSON objects. Typed accessors read the few
 * fields selection depends on (`source`, `metadata.tags`, `metadata.lang`);
 * everything else is opaque and written back in its original key order.
 */

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::errors::DocumentError;
use crate::file_utils::FileManager;

/// Indentation used when writing notebooks
const JSON_INDENT: &[u8] = b" ";

/// A notebook document: ordered cells plus opaque document-level fields.
///
/// Top-level keys other than these four are not carried into derived
/// notebooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Ordered content cells
    pub cells: Vec<Cell>,

    /// Document metadata (kernel spec, language info, ...)
    pub metadata: Map<String, Value>,

    /// Major format version
    pub nbformat: Value,

    /// Minor format version
    pub nbformat_minor: Value,
}

impl Notebook {
    /// Create an empty notebook with the given format version
    pub fn new(nbformat: u64, nbformat_minor: u64) -> Self {
        Self {
            cells: Vec::new(),
            metadata: Map::new(),
            nbformat: Value::from(nbformat),
            nbformat_minor: Value::from(nbformat_minor),
        }
    }

    /// Append a cell, builder style
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Parse a notebook from JSON text
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a notebook from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a derived notebook holding `cells` and this notebook's document-level fields
    pub fn derive(&self, cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: self.metadata.clone(),
            nbformat: self.nbformat.clone(),
            nbformat_minor: self.nbformat_minor.clone(),
        }
    }

    /// Serialize with one-space indentation and a trailing newline.
    ///
    /// Non-ASCII characters are written literally.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the notebook to `path`, replacing any existing file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json_string().map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        FileManager::write_atomic(path, json.as_bytes()).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// State of a cell's `lang` metadata attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangAttribute<'a> {
    /// No `lang` key, or a JSON null
    Missing,
    /// A string value, possibly empty
    Text(&'a str),
    /// A value of any other JSON type
    Malformed,
}

/// One notebook cell, kept as its JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell {
    fields: Map<String, Value>,
}

impl Cell {
    /// Wrap an existing JSON object
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Create a cell of the given type with `source` lines and empty metadata
    pub fn new(cell_type: &str, source: &[&str]) -> Self {
        let mut fields = Map::new();
        fields.insert("cell_type".to_string(), Value::from(cell_type));
        fields.insert("metadata".to_string(), Value::Object(Map::new()));
        fields.insert(
            "source".to_string(),
            Value::Array(source.iter().map(|line| Value::from(*line)).collect()),
        );
        Self { fields }
    }

    /// Create a markdown cell
    pub fn markdown(source: &[&str]) -> Self {
        Self::new("markdown", source)
    }

    /// Set `metadata.tags`
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        let tags = Value::Array(tags.iter().map(|tag| Value::from(*tag)).collect());
        self.set_metadata("tags", tags);
        self
    }

    /// Set `metadata.lang`
    pub fn with_lang(mut self, lang: &str) -> Self {
        self.set_metadata("lang", Value::from(lang));
        self
    }

    /// Raw JSON fields of the cell
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Cell metadata, if present and an object
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.fields.get("metadata").and_then(Value::as_object)
    }

    fn set_metadata(&mut self, key: &str, value: Value) {
        match self.fields.get_mut("metadata") {
            Some(Value::Object(metadata)) => {
                metadata.insert(key.to_string(), value);
            }
            _ => {
                let mut metadata = Map::new();
                metadata.insert(key.to_string(), value);
                self.fields.insert("metadata".to_string(), Value::Object(metadata));
            }
        }
    }

    /// Content lines. A string `source` is split after each newline.
    pub fn source_lines(&self) -> Vec<&str> {
        match self.fields.get("source") {
            Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(text)) => text.split_inclusive('\n').collect(),
            _ => Vec::new(),
        }
    }

    /// True when the cell has no content
    pub fn is_empty(&self) -> bool {
        match self.fields.get("source") {
            Some(Value::Array(lines)) => lines.is_empty(),
            Some(Value::String(text)) => text.is_empty(),
            _ => true,
        }
    }

    /// Leading line of the content, used to identify the cell in diagnostics
    pub fn preview(&self) -> String {
        self.source_lines()
            .first()
            .map(|line| line.trim_end().to_string())
            .unwrap_or_default()
    }

    /// Labels in `metadata.tags`; non-string entries are ignored
    pub fn tags(&self) -> Vec<&str> {
        self.metadata()
            .and_then(|metadata| metadata.get("tags"))
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    /// Read `metadata.lang`
    pub fn lang(&self) -> LangAttribute<'_> {
        match self.metadata().and_then(|metadata| metadata.get("lang")) {
            None | Some(Value::Null) => LangAttribute::Missing,
            Some(Value::String(text)) => LangAttribute::Text(text),
            Some(_) => LangAttribute::Malformed,
        }
    }
}
