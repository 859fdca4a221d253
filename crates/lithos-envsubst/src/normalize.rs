// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Rewrites the legacy whitespace-tolerant placeholder dialect
//! (`${ NAME }`, `${ NAME}`, `${NAME }`) into the strict `${NAME}` form.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Whitespace class matching the one the legacy dialect was defined with:
/// ASCII space, tab, newline, form feed and carriage return.
const WS: &str = r"[\t\n\x0C\r ]";
const NAME: &str = r"[A-Za-z0-9_$]+";

static LEGACY_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(\$\{{({WS}+({NAME}){WS}+)\}})|(\$\{{({WS}+({NAME}))\}})|(\$\{{(({NAME}){WS}+)\}})"
    );
    Regex::new(&pattern).expect("legacy placeholder pattern is valid")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(WS).expect("whitespace pattern is valid"));

/// Removes whitespace inside legacy placeholder spans.
///
/// Text outside a matched span is never touched, and sources that contain no
/// legacy spans are returned borrowed.
pub fn normalize_legacy(source: &str) -> Cow<'_, str> {
    LEGACY_PLACEHOLDER.replace_all(source, |caps: &Captures<'_>| {
        WHITESPACE.replace_all(&caps[0], "").into_owned()
    })
}
