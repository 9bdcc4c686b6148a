//! `Prefer: return=representation` parsing.
//!
//! Clients shape container responses with `include=` / `omit=` lists of LDP
//! preference tokens. A token may appear bare or inside a quoted,
//! space-separated list; matching is case-sensitive on the full IRI. The
//! only regex-sensitive character in an LDP token is `.`, escaped when the
//! matcher is built.

use regex::Regex;

use oxldp_core::vocab::ldp;

/// Decoded representation preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub include_containment: bool,
    pub omit_containment: bool,
    pub include_membership: bool,
    pub omit_membership: bool,
    /// `PreferMinimalContainer` (alias `PreferEmptyContainer`) requested.
    pub minimal: bool,
}

impl Preferences {
    pub fn parse(header: Option<&str>) -> Self {
        let header = match header {
            Some(h) if h.contains("return=representation") => h,
            _ => return Preferences::default(),
        };
        Preferences {
            include_containment: param_has_token(header, "include", ldp::PREFER_CONTAINMENT),
            omit_containment: param_has_token(header, "omit", ldp::PREFER_CONTAINMENT),
            include_membership: param_has_token(header, "include", ldp::PREFER_MEMBERSHIP),
            omit_membership: param_has_token(header, "omit", ldp::PREFER_MEMBERSHIP),
            minimal: param_has_token(header, "include", ldp::PREFER_MINIMAL_CONTAINER)
                || param_has_token(header, "include", ldp::PREFER_EMPTY_CONTAINER),
        }
    }

    /// Decision table for containment triples in a container response.
    pub fn emit_containment(&self) -> bool {
        if self.include_containment {
            true
        } else if self.omit_containment {
            false
        } else {
            !self.minimal
        }
    }

    /// Same table for membership triples.
    pub fn emit_membership(&self) -> bool {
        if self.include_membership {
            true
        } else if self.omit_membership {
            false
        } else {
            !self.minimal
        }
    }

    pub fn mentions_containment(&self) -> bool {
        self.include_containment || self.omit_containment
    }

    pub fn mentions_membership(&self) -> bool {
        self.include_membership || self.omit_membership
    }
}

/// Whether `param` (`include` or `omit`) carries `token`, bare or inside a
/// quoted space-separated list.
fn param_has_token(header: &str, param: &str, token: &str) -> bool {
    let value_pattern = format!(r#"{param}\s*=\s*(?:"([^"]*)"|([^;,\s"]+))"#);
    let value_re = match Regex::new(&value_pattern) {
        Ok(re) => re,
        Err(_) => return false,
    };
    let escaped = token.replace('.', r"\.");
    let token_pattern = format!(r"(?:^|\s){escaped}(?:$|\s)");
    let token_re = match Regex::new(&token_pattern) {
        Ok(re) => re,
        Err(_) => return false,
    };

    for capture in value_re.captures_iter(header) {
        let value = capture
            .get(1)
            .or_else(|| capture.get(2))
            .map(|m| m.as_str())
            .unwrap_or("");
        if token_re.is_match(value) {
            return true;
        }
    }
    false
}
