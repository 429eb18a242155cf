//! Parser error types for cdt-parser.

/// Errors that can occur while turning source text into doc nodes.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Parse failed for {file}: {message}")]
    ParseFailed { file: String, message: String },

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
