//! Fuzz target for GraphqlRequest::parse
//!
//! Console queries and variables are free-form user input; recognition
//! and variable binding must never panic.

#![no_main]

use feedline_core::GraphqlRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };

    // Split the input: first line is the query, the rest are variables.
    let (query, rest) = match text.split_once('\n') {
        Some((query, rest)) => (query, rest),
        None => (text, ""),
    };

    let variables: Option<serde_json::Value> = serde_json::from_str(rest).ok();
    let _ = GraphqlRequest::parse(query, variables.as_ref());
});
