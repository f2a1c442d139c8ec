//! Column resolution
//!
//! Maps the header row of a source file onto the three columns a template
//! record needs, by keyword containment in the column names.

use tracing::debug;

use crate::error::ColumnError;

/// Keyword identifying the scene column
pub const SCENE_KEYWORD: &str = "想定シーン";

/// Keyword identifying the prompt body column
pub const PROMPT_KEYWORD: &str = "プロンプト";

/// Keyword identifying the minor category column
pub const CATEGORY_KEYWORD: &str = "カテゴリ";

/// Indices of the columns a record is projected from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub minor_category: usize,
    pub scene: usize,
    pub body: usize,
}

/// Resolve the minor category, scene and body columns from header names
///
/// Each keyword must be contained in exactly one header.
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> Result<ResolvedColumns, ColumnError> {
    debug!(header_count = headers.len(), "resolve_columns: called");
    Ok(ResolvedColumns {
        minor_category: find_unique(headers, CATEGORY_KEYWORD)?,
        scene: find_unique(headers, SCENE_KEYWORD)?,
        body: find_unique(headers, PROMPT_KEYWORD)?,
    })
}

fn find_unique<S: AsRef<str>>(headers: &[S], keyword: &'static str) -> Result<usize, ColumnError> {
    let matches: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_ref().contains(keyword))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => {
            debug!(keyword, "find_unique: no match");
            Err(ColumnError::Missing { keyword })
        }
        [index] => {
            debug!(keyword, index, "find_unique: resolved");
            Ok(*index)
        }
        _ => {
            debug!(keyword, count = matches.len(), "find_unique: ambiguous");
            Err(ColumnError::Ambiguous {
                keyword,
                candidates: matches.iter().map(|&i| headers[i].as_ref().to_string()).collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_typical_header() {
        let headers = ["カテゴリ", "番号", "", "想定シーン", "プロンプト本文"];
        let cols = resolve_columns(&headers).unwrap();
        assert_eq!(
            cols,
            ResolvedColumns {
                minor_category: 0,
                scene: 3,
                body: 4,
            }
        );
    }

    #[test]
    fn test_resolve_by_substring() {
        let headers = ["No", "小カテゴリ名", "x", "想定シーン（例）", "プロンプト（コピー用）"];
        let cols = resolve_columns(&headers).unwrap();
        assert_eq!(cols.minor_category, 1);
        assert_eq!(cols.scene, 3);
        assert_eq!(cols.body, 4);
    }

    #[test]
    fn test_resolve_missing_keyword() {
        let headers = ["カテゴリ", "番号", "", "説明", "プロンプト本文"];
        let err = resolve_columns(&headers).unwrap_err();
        assert_eq!(err, ColumnError::Missing { keyword: SCENE_KEYWORD });
    }

    #[test]
    fn test_resolve_ambiguous_keyword() {
        let headers = ["カテゴリ", "想定シーン", "", "プロンプト本文", "プロンプト補足"];
        let err = resolve_columns(&headers).unwrap_err();
        assert_eq!(
            err,
            ColumnError::Ambiguous {
                keyword: PROMPT_KEYWORD,
                candidates: vec!["プロンプト本文".to_string(), "プロンプト補足".to_string()],
            }
        );
    }
}
