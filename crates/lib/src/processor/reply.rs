//! Reply generation and the processor wire types.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Range the per-reply random number is drawn from (four digits).
pub const RANDOM_RANGE: RangeInclusive<u32> = 1000..=9999;

/// Body of `POST /process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub text: String,
}

/// Response of `POST /process`. `original` is always the request text unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub original: String,
    pub reply: String,
}

/// Build the reply for `text` with a freshly drawn random number.
pub fn process(text: &str) -> ProcessResponse {
    let n = rand::thread_rng().gen_range(RANDOM_RANGE);
    ProcessResponse {
        original: text.to_string(),
        reply: format!(
            "I received your message: '{}' and here is a random number: {}",
            text, n
        ),
    }
}
