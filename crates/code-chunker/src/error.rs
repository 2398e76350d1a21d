use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Failures of a single chunking call.
///
/// Syntax errors in the input are not among them: tree-sitter always yields a
/// best-effort tree and segmentation runs over whatever it recovered.
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// The parser returned no tree at all (cancelled or out of budget)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unknown extension, a language disabled by configuration, or a grammar
    /// provider with nothing for the language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Fragment cap, name length or language list rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unreadable file or content that is not UTF-8
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Grammar built against an ABI this tree-sitter cannot load
    #[error("Incompatible grammar: {0}")]
    IncompatibleGrammar(String),
}

impl ChunkerError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn incompatible_grammar(msg: impl Into<String>) -> Self {
        Self::IncompatibleGrammar(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            ChunkerError::unsupported_language("cobol").to_string(),
            "Unsupported language: cobol"
        );
        assert_eq!(
            ChunkerError::incompatible_grammar("version 9").to_string(),
            "Incompatible grammar: version 9"
        );
    }
}
