//! Filter/search over the template table

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::repository::{TemplateRecord, TemplateTable};

/// Label the original sheet used for "all categories"
pub const ALL_CATEGORIES_LABEL: &str = "すべて";

/// Which major categories to keep
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelector {
    #[default]
    All,
    Exact(String),
}

impl CategorySelector {
    pub fn matches(&self, record: &TemplateRecord) -> bool {
        match self {
            Self::All => true,
            Self::Exact(category) => record.major_category == *category,
        }
    }
}

impl From<&str> for CategorySelector {
    fn from(s: &str) -> Self {
        debug!(%s, "CategorySelector::from: called");
        if s == ALL_CATEGORIES_LABEL || s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Exact(s.to_string())
        }
    }
}

impl FromStr for CategorySelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_CATEGORIES_LABEL),
            Self::Exact(category) => write!(f, "{}", category),
        }
    }
}

/// Rows in `selector` whose scene or minor category contains `keyword`
///
/// The keyword match is a case-insensitive substring test; an empty or
/// absent keyword keeps every row of the category. Row ids and order are
/// preserved.
pub fn filter(table: &TemplateTable, selector: &CategorySelector, keyword: Option<&str>) -> TemplateTable {
    let keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);
    debug!(%selector, ?keyword, rows = table.len(), "filter: called");

    let filtered: TemplateTable = table
        .iter()
        .filter(|r| selector.matches(r))
        .filter(|r| match &keyword {
            Some(kw) => contains_keyword(r, kw),
            None => true,
        })
        .cloned()
        .collect();

    debug!(rows = filtered.len(), "filter: done");
    filtered
}

fn contains_keyword(record: &TemplateRecord, lowered: &str) -> bool {
    [&record.scene, &record.minor_category]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(lowered))
}
