//! Domain name normalization shared by the loader, the classifier and the
//! control surface.
//!
//! Every domain stored in a ruleset, allowlist or local record table is
//! lowercase ASCII with at most one trailing `.` removed. Lookups normalize
//! their input the same way so that `Ads.Example.COM.` and `ads.example.com`
//! are the same key.

use crate::DomainError;
use std::borrow::Cow;

/// Lowercase `domain` and strip a single trailing `.`.
///
/// Borrows when the input is already lowercase, which is the common case for
/// names decoded off the wire.
#[inline]
pub fn normalize_domain(domain: &str) -> Cow<'_, str> {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Normalize operator input (allowlist, local records). Surrounding
/// whitespace is ignored and an empty result is rejected.
pub fn normalize_user_domain(domain: &str) -> Result<String, DomainError> {
    let normalized = normalize_domain(domain.trim()).into_owned();
    if normalized.is_empty() {
        return Err(DomainError::InvalidDomainName(format!(
            "empty domain: {:?}",
            domain
        )));
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidDomainName(normalized));
    }
    Ok(normalized)
}

/// Iterate over the strict ancestors of a normalized domain, nearest first.
///
/// `"a.b.example.com"` yields `"b.example.com"`, `"example.com"`, `"com"`.
/// Each item is a subslice of the input; nothing is allocated.
pub fn ancestors(domain: &str) -> impl Iterator<Item = &str> {
    let mut rest = domain;
    std::iter::from_fn(move || {
        let pos = rest.find('.')?;
        rest = &rest[pos + 1..];
        Some(rest)
    })
}
