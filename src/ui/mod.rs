//! Terminal surface: prompts in, report text out.
pub mod prompt;
pub mod report;
