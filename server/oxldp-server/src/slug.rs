//! URI allocation for new container members.
//!
//! Allocation is two-phase: a URI is reserved against the backend first and
//! only later promoted to a real resource (or released on abort). The
//! preferred segment comes from the client's `Slug`; when that is empty or
//! taken, a millisecond-stamped `res…` segment is used instead, with a
//! bounded number of retries.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::Url;

use crate::error::{LdpError, LdpResult};
use crate::store::LdpBackend;

/// Collision retries on the fallback segment before giving up.
const MAX_ATTEMPTS: u32 = 8;

/// Keep `-` and `_` readable; everything else non-alphanumeric is
/// percent-encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Reserve a URI for a new member of `container`, honoring `slug`.
pub fn allocate(
    backend: &dyn LdpBackend,
    container: &str,
    slug: Option<&str>,
) -> LdpResult<String> {
    let base = container_base(container)?;

    if let Some(slug) = slug {
        let segment = sanitize(slug);
        if !segment.is_empty() {
            let candidate = format!("{base}{segment}");
            if backend.reserve_uri(&candidate).is_ok() {
                return Ok(candidate);
            }
        }
    }

    for attempt in 0..MAX_ATTEMPTS {
        let millis = chrono::Utc::now().timestamp_millis();
        let candidate = if attempt == 0 {
            format!("{base}res{millis}")
        } else {
            format!("{base}res{millis}-{attempt}")
        };
        if backend.reserve_uri(&candidate).is_ok() {
            return Ok(candidate);
        }
    }
    Err(LdpError::internal(format!(
        "could not allocate a member URI under {container} after {MAX_ATTEMPTS} attempts"
    )))
}

/// The container URI with query and fragment stripped and a trailing slash.
fn container_base(container: &str) -> LdpResult<String> {
    let mut url = Url::parse(container)
        .map_err(|e| LdpError::internal(format!("invalid container URI {container}: {e}")))?;
    url.set_query(None);
    url.set_fragment(None);
    let mut base = url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}

/// Reduce a slug to word characters, whitespace, `-` and `_`, then
/// percent-encode the survivors.
fn sanitize(slug: &str) -> String {
    let disallowed = Regex::new(r"[^\w\s\-_]").expect("slug character class");
    let kept = disallowed.replace_all(slug, "");
    utf8_percent_encode(&kept, SEGMENT).to_string()
}
