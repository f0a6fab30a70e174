pub mod engine;
pub mod fetcher;
pub mod loader;
pub mod parser;
pub mod ruleset;
pub mod source_cache;

pub use engine::BlocklistEngine;
pub use fetcher::HttpFetcher;
pub use loader::{BlocklistLoader, LoadOutcome, LoadSettings};
pub use parser::{parse_list_line, parse_list_text};
pub use ruleset::{Allowlist, DomainRuleset, LocalRecordTable};
pub use source_cache::SourceCache;
