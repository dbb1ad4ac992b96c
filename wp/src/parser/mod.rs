//! Rule-based natural-language task parser

mod keywords;
mod prompt;

pub use prompt::{detect_days, parse_prompt};
