//! Repository Loader
//!
//! Reads every `*.csv` file in a directory and concatenates their rows into
//! one table. A file that cannot be decoded or parsed is reported and left
//! out; the others still load.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::columns::resolve_columns;
use super::{FileFailure, LoadReport, TemplateRecord, TemplateTable};
use crate::error::RepositoryError;

/// Literal prefix shared by all source filenames
pub const CATEGORY_PREFIX: &str = "経営AI研修プロンプト集 - ";

/// Marker appended to filenames of duplicated sheets
pub const COPY_SUFFIX: &str = " のコピー";

/// Minimum number of header columns for a file to be mapped
pub const MIN_COLUMNS: usize = 5;

const SOURCE_EXTENSION: &str = ".csv";

/// Load all source files in `dir` into a single table
pub fn load(dir: impl AsRef<Path>) -> Result<LoadReport, RepositoryError> {
    let dir = dir.as_ref();
    debug!(?dir, "load: called");

    let files = source_files(dir)?;
    if files.is_empty() {
        info!("No source files found in {}", dir.display());
        return Ok(LoadReport::default());
    }

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    let mut contributed = false;

    for path in files {
        match load_file(&path, records.len()) {
            Ok(Some(rows)) => {
                debug!(?path, rows = rows.len(), "load: file loaded");
                contributed = true;
                records.extend(rows);
            }
            Ok(None) => {
                debug!(?path, "load: too few columns, skipping");
                report.skipped.push(path);
            }
            Err(error) => {
                warn!("Failed to load {}: {}", path.display(), error);
                report.failures.push(FileFailure { path, error });
            }
        }
    }

    info!(
        "Loaded {} templates from {} ({} failed, {} skipped)",
        records.len(),
        dir.display(),
        report.failures.len(),
        report.skipped.len()
    );

    if contributed {
        report.table = Some(TemplateTable::new(records));
    }
    Ok(report)
}

/// Sorted list of `*.csv` files directly inside `dir`
pub(crate) fn source_files(dir: &Path) -> Result<Vec<PathBuf>, RepositoryError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped)
        .join(format!("*{}", SOURCE_EXTENSION))
        .to_string_lossy()
        .to_string();
    debug!(%pattern, "source_files: called");

    let entries = glob::glob(&pattern).map_err(|source| RepositoryError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(RepositoryError::Read {
                    path,
                    source: e.into_error(),
                });
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Parse one file, numbering rows from `first_id`
///
/// Returns `Ok(None)` when the header has fewer than [`MIN_COLUMNS`] columns.
fn load_file(path: &Path, first_id: usize) -> Result<Option<Vec<TemplateRecord>>, RepositoryError> {
    debug!(?path, first_id, "load_file: called");
    let bytes = fs::read(path).map_err(|source| RepositoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes).ok_or_else(|| RepositoryError::Decode {
        path: path.to_path_buf(),
        tried: "UTF-8, Shift_JIS".to_string(),
    })?;

    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let major_category = category_from_filename(&file_name);

    let csv_err = |source| RepositoryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers().map_err(csv_err)?.iter().map(str::to_string).collect();
    if headers.len() < MIN_COLUMNS {
        return Ok(None);
    }

    let columns = resolve_columns(&headers).map_err(|source| RepositoryError::Columns {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        if record.len() > headers.len() {
            return Err(RepositoryError::RowTooLong {
                path: path.to_path_buf(),
                row: row as u64 + 1,
                found: record.len(),
                expected: headers.len(),
            });
        }

        let Some(body) = field(&record, columns.body) else {
            continue;
        };

        records.push(TemplateRecord {
            id: first_id + records.len(),
            major_category: major_category.clone(),
            minor_category: field(&record, columns.minor_category),
            scene: field(&record, columns.scene),
            body,
            source: path.to_path_buf(),
        });
    }

    Ok(Some(records))
}

/// Non-empty field value, `None` when absent or empty
fn field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record.get(index).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Decode file bytes as UTF-8, falling back to Shift_JIS (CP932)
///
/// Returns `None` when neither encoding decodes cleanly.
pub fn decode(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let without_bom = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(without_bom) {
        debug!("decode: utf-8");
        return Some(Cow::Borrowed(text));
    }

    debug!("decode: utf-8 failed, trying Shift_JIS");
    encoding_rs::SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Major category name for a source filename
///
/// Strips [`CATEGORY_PREFIX`], the `.csv` extension and [`COPY_SUFFIX`].
pub fn category_from_filename(file_name: &str) -> String {
    let name = file_name.strip_prefix(CATEGORY_PREFIX).unwrap_or(file_name);
    let name = name.strip_suffix(SOURCE_EXTENSION).unwrap_or(name);
    let name = name.strip_suffix(COPY_SUFFIX).unwrap_or(name);
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "カテゴリ,番号,,想定シーン,プロンプト本文";

    fn write(dir: &Path, name: &str, content: &[u8]) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn source_name(category: &str) -> String {
        format!("{}{}.csv", CATEGORY_PREFIX, category)
    }

    #[test]
    fn test_category_from_filename() {
        assert_eq!(category_from_filename("経営AI研修プロンプト集 - 新商品アイデア.csv"), "新商品アイデア");
        assert_eq!(category_from_filename("経営AI研修プロンプト集 - 競合分析 のコピー.csv"), "競合分析");
        assert_eq!(category_from_filename("plain.csv"), "plain");
    }

    #[test]
    fn test_decode_utf8_and_bom() {
        assert_eq!(decode("想定シーン".as_bytes()).as_deref(), Some("想定シーン"));
        let mut with_bom = b"\xEF\xBB\xBF".to_vec();
        with_bom.extend_from_slice("abc".as_bytes());
        assert_eq!(decode(&with_bom).as_deref(), Some("abc"));
    }

    #[test]
    fn test_decode_shift_jis_fallback() {
        let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode("会議の議事録");
        assert!(!had_errors);
        assert!(std::str::from_utf8(&encoded).is_err());
        assert_eq!(decode(&encoded).as_deref(), Some("会議の議事録"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"\xFF\xFE\xFD").is_none());
    }

    #[test]
    fn test_load_projects_and_tags_rows() {
        let temp = TempDir::new().unwrap();
        let csv = format!(
            "{}\nアイデア出し,1,,新商品の企画会議,【商品名】のアイデアを10個\n壁打ち,2,,上司への提案前,[提案内容]を評価して\n",
            HEADER
        );
        write(temp.path(), &source_name("新商品アイデア"), csv.as_bytes());

        let report = load(temp.path()).unwrap();
        assert!(report.failures.is_empty());
        let table = report.table.unwrap();
        assert_eq!(table.len(), 2);

        let first = table.get(0).unwrap();
        assert_eq!(first.major_category, "新商品アイデア");
        assert_eq!(first.minor_category.as_deref(), Some("アイデア出し"));
        assert_eq!(first.scene.as_deref(), Some("新商品の企画会議"));
        assert_eq!(first.body, "【商品名】のアイデアを10個");
    }

    #[test]
    fn test_load_drops_empty_bodies() {
        let temp = TempDir::new().unwrap();
        let csv = format!("{}\nA,1,,scene,\nB,2,,scene,body\nC,3\n", HEADER);
        write(temp.path(), &source_name("x"), csv.as_bytes());

        let table = load(temp.path()).unwrap().table.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().minor_category.as_deref(), Some("B"));
    }

    #[test]
    fn test_load_ids_span_files() {
        let temp = TempDir::new().unwrap();
        let csv = format!("{}\nA,1,,s,b1\nB,2,,s,b2\n", HEADER);
        write(temp.path(), &source_name("a"), csv.as_bytes());
        write(temp.path(), &source_name("b"), csv.as_bytes());

        let table = load(temp.path()).unwrap().table.unwrap();
        let ids: Vec<usize> = table.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(table.categories(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_empty_directory_is_no_data() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "notes.txt", b"not a table");

        let report = load(temp.path()).unwrap();
        assert!(report.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_load_missing_directory_is_no_data() {
        let temp = TempDir::new().unwrap();
        let report = load(temp.path().join("absent")).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_load_skips_narrow_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), &source_name("narrow"), "カテゴリ,想定シーン,プロンプト\na,b,c\n".as_bytes());

        let report = load(temp.path()).unwrap();
        assert!(report.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_load_isolates_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let csv = format!("{}\nA,1,,s,b\n", HEADER);
        write(temp.path(), &source_name("good1"), csv.as_bytes());
        write(temp.path(), &source_name("good2"), csv.as_bytes());
        write(temp.path(), &source_name("bad"), b"\xFF\xFE\xFD");

        let report = load(temp.path()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, RepositoryError::Decode { .. }));
        let table = report.table.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.categories(), vec!["good1", "good2"]);
    }

    #[test]
    fn test_load_shift_jis_file() {
        let temp = TempDir::new().unwrap();
        let csv = format!("{}\n分析,1,,競合調査,【競合名】を分析して\n", HEADER);
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(&csv);
        write(temp.path(), &source_name("競合分析"), &encoded);

        let table = load(temp.path()).unwrap().table.unwrap();
        assert_eq!(table.get(0).unwrap().body, "【競合名】を分析して");
    }

    #[test]
    fn test_load_reports_ambiguous_columns() {
        let temp = TempDir::new().unwrap();
        let csv = "カテゴリ,想定シーン,,プロンプト本文,プロンプト補足\nA,s,,b,c\n";
        write(temp.path(), &source_name("dup"), csv.as_bytes());

        let report = load(temp.path()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, RepositoryError::Columns { .. }));
    }

    #[test]
    fn test_load_reports_overlong_row() {
        let temp = TempDir::new().unwrap();
        let csv = format!("{}\nA,1,,s,b,extra\n", HEADER);
        write(temp.path(), &source_name("long"), csv.as_bytes());

        let report = load(temp.path()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, RepositoryError::RowTooLong { row: 1, .. }));
    }
}
