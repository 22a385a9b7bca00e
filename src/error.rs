//! Error types for scene loading and SVG export.

use thiserror::Error;

/// Errors that can occur while reading a scene file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parsing error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("invalid attribute on <{element}>: {source}")]
    Attribute {
        element: String,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("invalid escape sequence in <{element}>: {source}")]
    Escape {
        element: String,
        #[source]
        source: quick_xml::escape::EscapeError,
    },

    #[error("invalid number '{value}' in <{element}>")]
    InvalidNumber { element: String, value: String },

    #[error("<{element}> expects {expected} numbers, found {found}")]
    WrongArity {
        element: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid flag {key}=\"{value}\" on <{element}>, expected 0 or 1")]
    InvalidFlag {
        element: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("unknown handle type '{0}'")]
    UnknownHandleType(String),

    #[error("unknown curve dimensions '{0}'")]
    UnknownDimensions(String),

    #[error("<{element}> must appear inside <{parent}>")]
    Misplaced {
        element: String,
        parent: &'static str,
    },
}

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("precision must be between 0 and {max}, got {value}")]
    InvalidPrecision { value: u32, max: u32 },

    #[error("scale must be at least 1 pixel per unit")]
    InvalidScale,

    #[error("failed to write SVG: {0}")]
    Io(#[from] std::io::Error),

    #[error("SVG output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
