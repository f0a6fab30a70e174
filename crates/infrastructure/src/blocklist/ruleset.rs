use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use sinkhole_domain::{ancestors, normalize_domain, LocalDnsRecord};
use std::net::IpAddr;

/// Immutable set of blocked domains. A new one is built for every load and
/// swapped in whole.
#[derive(Debug, Default)]
pub struct DomainRuleset {
    domains: FxHashSet<CompactString>,
}

impl DomainRuleset {
    pub fn new(domains: FxHashSet<CompactString>) -> Self {
        Self { domains }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Exact membership of an already-normalized domain.
    #[inline]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Exact match, then every strict ancestor nearest first.
    ///
    /// A bare TLD in the set (`com`) blocks every name under it.
    #[inline]
    pub fn matches(&self, domain: &str) -> bool {
        self.contains(domain) || ancestors(domain).any(|parent| self.contains(parent))
    }
}

/// Exact-match exemptions in insertion order plus a lookup set over the
/// same entries.
#[derive(Debug, Default)]
pub struct Allowlist {
    ordered: Vec<String>,
    lookup: FxHashSet<CompactString>,
}

impl Allowlist {
    /// Entries must already be normalized; duplicates keep their first slot.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for entry in entries {
            let entry = entry.as_ref();
            if list.lookup.insert(CompactString::from(entry)) {
                list.ordered.push(entry.to_string());
            }
        }
        list
    }

    #[inline]
    pub fn contains(&self, domain: &str) -> bool {
        self.lookup.contains(domain)
    }

    pub fn entries(&self) -> &[String] {
        &self.ordered
    }
}

/// Local name → addresses.
#[derive(Debug, Default)]
pub struct LocalRecordTable {
    records: Vec<LocalDnsRecord>,
    by_name: FxHashMap<CompactString, Vec<IpAddr>>,
}

impl LocalRecordTable {
    pub fn from_records(records: &[LocalDnsRecord]) -> Self {
        let mut by_name: FxHashMap<CompactString, Vec<IpAddr>> = FxHashMap::default();
        for record in records {
            let name = normalize_domain(&record.domain);
            let ips = by_name.entry(CompactString::from(name.as_ref())).or_default();
            if !ips.contains(&record.ip) {
                ips.push(record.ip);
            }
        }
        Self {
            records: records.to_vec(),
            by_name,
        }
    }

    #[inline]
    pub fn lookup(&self, domain: &str) -> Option<&[IpAddr]> {
        self.by_name.get(domain).map(Vec::as_slice)
    }

    pub fn records(&self) -> &[LocalDnsRecord] {
        &self.records
    }
}

/// Allowlist exact match wins, otherwise the ruleset decides.
#[inline]
pub fn is_blocked(ruleset: &DomainRuleset, allowlist: &Allowlist, domain: &str) -> bool {
    let domain = normalize_domain(domain);
    if allowlist.contains(&domain) {
        return false;
    }
    ruleset.matches(&domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruleset(domains: &[&str]) -> DomainRuleset {
        DomainRuleset::new(domains.iter().map(|d| CompactString::from(*d)).collect())
    }

    #[test]
    fn test_not_in_ruleset_is_allowed() {
        let rules = ruleset(&["ads.example.com"]);
        assert!(!is_blocked(&rules, &Allowlist::default(), "example.com"));
        assert!(!is_blocked(&rules, &Allowlist::default(), "notads.example.com"));
    }

    #[test]
    fn test_exact_and_ancestor_matches() {
        let rules = ruleset(&["doubleclick.net"]);
        let allow = Allowlist::default();
        assert!(is_blocked(&rules, &allow, "doubleclick.net"));
        assert!(is_blocked(&rules, &allow, "sub.ads.doubleclick.net"));
        assert!(is_blocked(&rules, &allow, "Sub.DoubleClick.NET."));
    }

    #[test]
    fn test_allowlist_is_exact_only() {
        let rules = ruleset(&["example.com"]);
        let allow = Allowlist::from_entries(["example.com"]);
        assert!(!is_blocked(&rules, &allow, "example.com"));
        // Subdomains still hit the ancestor rule.
        assert!(is_blocked(&rules, &allow, "www.example.com"));
    }

    #[test]
    fn test_bare_tld_rule_blocks_everything_below() {
        let rules = ruleset(&["zip"]);
        assert!(is_blocked(&rules, &Allowlist::default(), "malware.zip"));
        assert!(!is_blocked(&rules, &Allowlist::default(), "zip.example"));
    }

    #[test]
    fn test_allowlist_keeps_first_insertion_order() {
        let allow = Allowlist::from_entries(["b.example", "a.example", "b.example"]);
        assert_eq!(allow.entries(), ["b.example", "a.example"]);
    }

    #[test]
    fn test_local_table_groups_addresses() {
        let table = LocalRecordTable::from_records(&[
            LocalDnsRecord::new("NAS.home.lan", "192.168.1.10".parse().unwrap()),
            LocalDnsRecord::new("nas.home.lan", "fd00::10".parse().unwrap()),
        ]);
        assert_eq!(table.lookup("nas.home.lan").map(<[IpAddr]>::len), Some(2));
        assert!(table.lookup("printer.home.lan").is_none());
        assert_eq!(table.records().len(), 2);
    }
}
