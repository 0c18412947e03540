//! adoc-callouts-core - Callout conversion for AsciiDoc
//!
//! Finds code blocks annotated with numbered callout markers (`<1>`), pairs
//! them with the explanation that follows (a callout list or a callout
//! table) and rewrites both as a definition list, a bulleted list or inline
//! code comments.
//!
//! # Example
//!
//! ```
//! use adoc_callouts_core::{detect_and_convert, Format};
//!
//! let text = "\
//! [source,yaml]
//! ----
//! name: <app-name> <1>
//! replicas: 2 <2>
//! ----
//! <1> The application name.
//! <2> Number of replicas.
//! ";
//!
//! let outcome = detect_and_convert(text, Format::Deflist, 120);
//! assert_eq!(outcome.conversion_count, 1);
//! assert!(outcome.warnings.is_empty());
//! assert!(outcome.new_text.contains("where:"));
//! assert!(outcome.new_text.contains("`<app-name>`::\nThe application name."));
//! ```

pub mod block;
pub mod config;
pub mod convert;
pub mod error;
pub mod explanation;
pub mod marker;
pub mod render;
pub mod span;
pub mod splice;
pub mod syntax;
pub mod term;
pub mod validate;
pub mod warning;

// Re-export main types and functions
pub use block::{BlockScanner, CodeBlock, DelimiterKind};
pub use config::{Settings, CONFIG_FILE_NAME};
pub use convert::{detect_and_convert, BlockReport, CalloutConverter, ConversionOutcome};
pub use error::ConfigError;
pub use explanation::{Explanation, ExplanationLocator, ExplanationSet, ExplanationShape};
pub use marker::{ExtractedMarkers, Marker, MarkerGroup};
pub use render::{Format, Renderer, DEFAULT_MAX_COMMENT_LENGTH};
pub use span::LineSpan;
pub use validate::{BlockStatus, Classification, ConversionCandidate, Validator};
pub use warning::Warning;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
