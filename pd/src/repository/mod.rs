//! Template Repository
//!
//! In-memory table of prompt templates loaded from a directory of CSV files.
//!
//! Each file contributes rows tagged with a major category taken from its
//! filename:
//!
//! ```text
//! data/
//! ├── 経営AI研修プロンプト集 - 新商品アイデア.csv      -> "新商品アイデア"
//! └── 経営AI研修プロンプト集 - 競合分析 のコピー.csv   -> "競合分析"
//! ```

mod cache;
mod columns;
mod loader;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::RepositoryError;

pub use cache::RepositoryCache;
pub use columns::{CATEGORY_KEYWORD, PROMPT_KEYWORD, ResolvedColumns, SCENE_KEYWORD, resolve_columns};
pub use loader::{CATEGORY_PREFIX, COPY_SUFFIX, MIN_COLUMNS, category_from_filename, decode, load};

/// Number of scene characters shown in a display label
const LABEL_SCENE_CHARS: usize = 40;

/// One row of the repository table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    /// Position in the concatenated table
    pub id: usize,
    /// Category derived from the source filename
    pub major_category: String,
    /// Free-text sub category from the source row
    pub minor_category: Option<String>,
    /// Situation the template applies to
    pub scene: Option<String>,
    /// Template text, never empty
    pub body: String,
    /// File the row was read from
    #[serde(skip)]
    pub source: PathBuf,
}

impl TemplateRecord {
    /// Short label used when listing records: `【major】 scene...`
    pub fn display_label(&self) -> String {
        let scene: String = self
            .scene
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(LABEL_SCENE_CHARS)
            .collect();
        format!("【{}】 {}...", self.major_category, scene)
    }
}

/// Ordered collection of template records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateTable {
    records: Vec<TemplateRecord>,
}

impl TemplateTable {
    pub fn new(records: Vec<TemplateRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateRecord> {
        self.records.iter()
    }

    /// Look up a record by its id
    pub fn get(&self, id: usize) -> Option<&TemplateRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct major categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.major_category.as_str()) {
                seen.push(&record.major_category);
            }
        }
        seen
    }

    /// Number of rows in a major category
    pub fn count_in(&self, major_category: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.major_category == major_category)
            .count()
    }
}

impl FromIterator<TemplateRecord> for TemplateTable {
    fn from_iter<I: IntoIterator<Item = TemplateRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TemplateTable {
    type Item = &'a TemplateRecord;
    type IntoIter = std::slice::Iter<'a, TemplateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A source file that could not be loaded
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: RepositoryError,
}

/// Result of loading a directory
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Concatenated rows, `None` when no file contributed any
    pub table: Option<TemplateTable>,
    /// Files that failed to load, one entry each
    pub failures: Vec<FileFailure>,
    /// Files skipped for having too few columns
    pub skipped: Vec<PathBuf>,
}

impl LoadReport {
    /// True when there is no data to browse
    pub fn is_empty(&self) -> bool {
        self.table.is_none()
    }
}
