//! Reference-material guidance per category
//!
//! Suggests what to attach in the AI tool alongside a prompt, chosen by
//! keywords found in the template's major category.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Guidance shown when a category contains any of `keywords`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceRule {
    pub keywords: Vec<String>,
    pub text: String,
}

impl GuidanceRule {
    fn new(keywords: &[&str], text: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            text: text.to_string(),
        }
    }

    fn applies_to(&self, category: &str) -> bool {
        self.keywords.iter().any(|k| category.contains(k.as_str()))
    }
}

/// Ordered rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceTable {
    pub rules: Vec<GuidanceRule>,
    pub fallback: String,
}

impl Default for GuidanceTable {
    fn default() -> Self {
        Self {
            rules: vec![
                GuidanceRule::new(
                    &["商品", "アイデア"],
                    "企画メモ、会議の議事録、ブレストのホワイトボード写真",
                ),
                GuidanceRule::new(&["競合", "分析"], "調査データのExcel/PDF、業界レポート、過去の売上データ"),
                GuidanceRule::new(
                    &["マーケティング", "広報"],
                    "既存の商品パンフレット、過去のプレスリリース、顧客アンケート結果",
                ),
                GuidanceRule::new(&["ナレッジ", "組織"], "社内規定、組織図、業務マニュアル、日報"),
            ],
            fallback: "関連する会議の議事録、または現状のメモ書き（PDF/Text）".to_string(),
        }
    }
}

impl GuidanceTable {
    /// Guidance text for a major category
    pub fn lookup(&self, major_category: &str) -> &str {
        debug!(%major_category, "GuidanceTable::lookup: called");
        self.rules
            .iter()
            .find(|rule| rule.applies_to(major_category))
            .map(|rule| rule.text.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}
