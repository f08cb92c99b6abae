//! Fuzz testing for request decoding functions.
//!
//! This fuzz target tests the robustness of the header-decoding paths the
//! pipeline runs on every request. It ensures that decoding functions:
//!
//! - Never panic on any input
//! - Treat malformed input as absent data, not as an error
//! - Handle edge cases like empty segments, long values, and odd separators
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! # Install cargo-fuzz (requires nightly)
//! cargo +nightly install cargo-fuzz
//!
//! # Run the decoding fuzz target
//! cargo +nightly fuzz run fuzz_decoding
//!
//! # Run with a time limit (e.g., 60 seconds)
//! cargo +nightly fuzz run fuzz_decoding -- -max_total_time=60
//!
//! # View coverage
//! cargo +nightly fuzz coverage fuzz_decoding
//! ```
//!
//! # What This Tests
//!
//! - `decode_cookie_header`: Cookie header parsing into a name/value map
//! - `client_key`: Rate-limit key extraction from proxy headers

#![no_main]

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use libfuzzer_sys::fuzz_target;
use lms_api::middleware::{client_key, decode_cookie_header};

fuzz_target!(|data: &[u8]| {
    // Only byte sequences that are valid header values reach the decoders;
    // the HTTP layer rejects everything else before the pipeline runs.
    if let Ok(value) = HeaderValue::from_bytes(data) {
        // Cookie decoding (shouldn't panic, never fails)
        let _ = decode_cookie_header(Some(&value));

        // Client-key extraction from either proxy header (shouldn't panic)
        let req = Request::builder()
            .header("x-forwarded-for", value.clone())
            .body(Body::empty())
            .expect("header value already validated");
        let _ = client_key(&req);

        let req = Request::builder()
            .header("x-real-ip", value)
            .body(Body::empty())
            .expect("header value already validated");
        let _ = client_key(&req);
    }
});
