//! Wildcard candidate inference
//!
//! Given a glob pattern with one `*`, ask the source tree which entries
//! match it, then align each match against the pattern to read back what
//! the `*` stood for. The pattern is never inverted directly: only entries
//! that really exist count as evidence.

use tracing::debug;

use crate::error::Result;
use crate::matching::{gaps, Gap};
use crate::source::SourceTree;
use crate::wildcard::GLOB_WILDCARD;

/// What `matched` substituted for the wildcard in `pattern`, if anything.
///
/// Accepted only when the alignment leaves exactly one gap and the
/// pattern side of that gap is the bare wildcard.
pub fn candidate_from_match(pattern: &str, matched: &str) -> Option<String> {
    match gaps(pattern, matched).as_slice() {
        [Gap { left, right }] if left == GLOB_WILDCARD => Some(right.clone()),
        _ => None,
    }
}

/// Candidates for `pattern` backed by entries in `source`.
///
/// Matches that don't align cleanly contribute nothing. Duplicates are kept.
pub fn wildcard_candidates<'a>(
    source: &SourceTree,
    pattern: &'a str,
) -> Result<impl Iterator<Item = String> + 'a> {
    let matches = source.glob(pattern)?;
    debug!(pattern, matches = matches.len(), "inferring wildcard candidates");

    Ok(matches.into_iter().filter_map(move |m| {
        let candidate = candidate_from_match(pattern, &m);
        if candidate.is_none() {
            debug!(pattern, path = %m, "match does not align with wildcard");
        }
        candidate
    }))
}
