//! Fuzz target for ChatMessage::from_json
//!
//! Inbound chat frames are attacker-controlled text; decoding must never
//! panic, only return Err for invalid data.

#![no_main]

use feedline_core::ChatMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ChatMessage::from_json(text);
    }
});
