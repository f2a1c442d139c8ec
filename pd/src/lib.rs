//! promptdeck - prompt template browser
//!
//! Loads categorized prompt templates from a directory of CSV files, narrows
//! them by category and keyword, and compiles a chosen template into a
//! finished prompt by filling its bracketed placeholders. The result is
//! plain text meant to be pasted into an AI chat tool.
//!
//! # Flow
//!
//! ```text
//! data/*.csv --load--> TemplateTable --filter--> rows --pick--> body
//!                                                                |
//!                 placeholders <--extract------------------------+
//!                       |
//!                  UserInputs --compile--> prompt text
//! ```
//!
//! # Example
//!
//! ```ignore
//! use promptdeck::{CategorySelector, RepositoryCache, UserInputs, compile, filter};
//!
//! let mut cache = RepositoryCache::new();
//! let report = cache.load("data")?;
//! let table = report.table.as_ref().expect("no data");
//! let rows = filter(table, &CategorySelector::All, Some("議事録"));
//! let inputs: UserInputs = [("会社名", "Acme")].into_iter().collect();
//! let prompt = compile(&rows.iter().next().unwrap().body, &inputs, true);
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod guidance;
pub mod placeholder;
pub mod repository;
pub mod session;

pub use compiler::{SOURCE_INSTRUCTION, UserInputs, compile};
pub use config::Config;
pub use error::{ColumnError, InputError, RepositoryError};
pub use filter::{CategorySelector, filter};
pub use guidance::{GuidanceRule, GuidanceTable};
pub use placeholder::{extract, extract_in_order};
pub use repository::{FileFailure, LoadReport, RepositoryCache, TemplateRecord, TemplateTable, load};
pub use session::{FillSession, Prompter, ReadlinePrompter, Reply};
