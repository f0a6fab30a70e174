use compact_str::CompactString;
use rustc_hash::FxHashSet;
use sinkhole_domain::{normalize_domain, BlocklistFormat};

/// Addresses that mark a hosts-file line as a block entry.
const NULL_ROUTES: [&str; 4] = ["0.0.0.0", "127.0.0.1", "::1", "0"];

/// Parse one line of a list into a normalized domain.
///
/// - `hosts`: `<null-route> <domain> [# comment]`. Any other first token
///   (a real address, `localhost` mappings on `::`) discards the line.
/// - `wild` / `raw` / other formats: one domain per line, trailing
///   `# comment` stripped. A leading `*.` is dropped, so `*.foo.com` also
///   blocks the apex `foo.com`: the ruleset has no subdomain-only entries and
///   the ancestor walk covers every subdomain of a stored name.
pub fn parse_list_line(line: &str, format: BlocklistFormat) -> Option<CompactString> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let content = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let domain = match format {
        BlocklistFormat::Hosts => {
            let mut fields = content.split_whitespace();
            let addr = fields.next()?;
            let domain = fields.next()?;
            if !NULL_ROUTES.contains(&addr) {
                return None;
            }
            domain
        }
        BlocklistFormat::Wild | BlocklistFormat::Raw | BlocklistFormat::Other => {
            let domain = content.trim();
            domain.strip_prefix("*.").unwrap_or(domain)
        }
    };

    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return None;
    }
    Some(CompactString::from(domain.as_ref()))
}

/// Parse a whole list body into a set of distinct domains.
pub fn parse_list_text(text: &str, format: BlocklistFormat) -> FxHashSet<CompactString> {
    text.lines()
        .filter_map(|line| parse_list_line(line, format))
        .collect()
}
