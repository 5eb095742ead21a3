//! Round-trip substitution
//!
//! Converts anonymized text back to real values for an action that needs
//! them, then sanitizes whatever the action produced before it is handed
//! back. Both directions substitute known strings literally, longest first
//! across the whole input, and replaced text is never rescanned.

use super::matcher::AcceptedSpans;
use super::tokens::TokenManager;
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;

/// Round-trip failure
///
/// The message has been re-anonymized and is safe to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundTripError {
    #[error("Action failed: {0}")]
    ActionFailed(String),
}

/// De-anonymize / re-anonymize protocol over a token manager
#[derive(Debug, Clone, Copy)]
pub struct RoundTrip<'a> {
    tokens: &'a TokenManager,
}

impl<'a> RoundTrip<'a> {
    pub fn new(tokens: &'a TokenManager) -> Self {
        Self { tokens }
    }

    /// Replace every known token with its literal
    pub fn de_anonymize(&self, text: &str) -> String {
        substitute(text, &self.tokens.reverse_mappings())
    }

    /// Replace every known literal with its token
    pub fn re_anonymize(&self, text: &str) -> String {
        substitute(text, &self.tokens.all_mappings())
    }

    /// De-anonymize `input`, run `action` on the real text, re-anonymize
    /// its output
    ///
    /// A failing action's error text is re-anonymized too; real values never
    /// cross back.
    pub fn run<F, E>(&self, input: &str, action: F) -> Result<String, RoundTripError>
    where
        F: FnOnce(&str) -> Result<String, E>,
        E: std::fmt::Display,
    {
        let real = self.de_anonymize(input);
        match action(&real) {
            Ok(output) => Ok(self.re_anonymize(&output)),
            Err(e) => Err(self.sanitized_failure(e)),
        }
    }

    /// Async variant of [`RoundTrip::run`]
    pub async fn run_async<F, Fut, E>(
        &self,
        input: &str,
        action: F,
    ) -> Result<String, RoundTripError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: std::fmt::Display,
    {
        let real = self.de_anonymize(input);
        match action(real).await {
            Ok(output) => Ok(self.re_anonymize(&output)),
            Err(e) => Err(self.sanitized_failure(e)),
        }
    }

    fn sanitized_failure<E: std::fmt::Display>(&self, error: E) -> RoundTripError {
        let message = self.re_anonymize(&error.to_string());
        tracing::warn!(error = %message, "Round-trip action failed");
        RoundTripError::ActionFailed(message)
    }
}

/// Literal substitution of every key of `table`, longest key first
///
/// Keys claim non-overlapping spans of the original text in descending
/// length order, so a longer key wins over a shorter one that overlaps it
/// anywhere in the text. Spans are spliced in one pass afterwards; inserted
/// values are never rescanned.
fn substitute(text: &str, table: &BTreeMap<String, String>) -> String {
    if text.is_empty() || table.is_empty() {
        return text.to_string();
    }

    let mut keys: Vec<&str> = table
        .keys()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut claimed = AcceptedSpans::default();
    let mut hits: Vec<(usize, usize, &str)> = Vec::new();

    for key in keys {
        let Some(value) = table.get(key) else {
            continue;
        };
        let mut from = 0;
        while let Some(offset) = text[from..].find(key) {
            let start = from + offset;
            let end = start + key.len();
            if claimed.overlaps(start, end) {
                // A later occurrence may still fit past the claimed span
                from = start + text[start..].chars().next().map_or(1, char::len_utf8);
            } else {
                claimed.insert(start, end);
                hits.push((start, end, value.as_str()));
                from = end;
            }
        }
    }

    if hits.is_empty() {
        return text.to_string();
    }
    hits.sort_unstable_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end, value) in hits {
        out.push_str(&text[cursor..start]);
        out.push_str(value);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}
