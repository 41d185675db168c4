// Engine Error Taxonomy
//
// This module defines the value-level error surface of the engine.

use thiserror::Error;

/// A source-position span a parser can attach to an error.
///
/// The engine never fabricates positions; spans only appear when a host
/// front end sets them via [`EngineError::with_span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// Errors raised by expression construction and evaluation.
///
/// Each variant carries a human-readable message and an optional source
/// span. Null-valued arithmetic is not an error; these surface only for
/// genuine misuse or failed preconditions.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An operator received operand types it does not accept.
    /// Raised at expression construction time.
    #[error("{message}")]
    UnsupportedType { message: String, span: Option<Span> },

    /// An operator was invoked with a structurally invalid argument list.
    #[error("{message}")]
    UnsupportedOperation { message: String, span: Option<Span> },

    /// An identifier is not present in the environment.
    #[error("{message}")]
    UndefinedReference { message: String, span: Option<Span> },

    /// A value-level precondition failed.
    #[error("{message}")]
    InvalidArgument { message: String, span: Option<Span> },

    /// Set operator operands carry incompatible structures.
    #[error("{message}")]
    StructureMismatch { message: String, span: Option<Span> },
}

impl EngineError {
    pub fn unsupported_type(message: impl Into<String>) -> Self {
        EngineError::UnsupportedType {
            message: message.into(),
            span: None,
        }
    }

    pub fn unsupported_operation(message: impl Into<String>) -> Self {
        EngineError::UnsupportedOperation {
            message: message.into(),
            span: None,
        }
    }

    pub fn undefined_reference(name: impl Into<String>) -> Self {
        EngineError::UndefinedReference {
            message: name.into(),
            span: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            message: message.into(),
            span: None,
        }
    }

    pub fn structure_mismatch(message: impl Into<String>) -> Self {
        EngineError::StructureMismatch {
            message: message.into(),
            span: None,
        }
    }

    /// The error message without any span decoration.
    pub fn message(&self) -> &str {
        match self {
            EngineError::UnsupportedType { message, .. }
            | EngineError::UnsupportedOperation { message, .. }
            | EngineError::UndefinedReference { message, .. }
            | EngineError::InvalidArgument { message, .. }
            | EngineError::StructureMismatch { message, .. } => message,
        }
    }

    /// The span attached by the parser, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            EngineError::UnsupportedType { span, .. }
            | EngineError::UnsupportedOperation { span, .. }
            | EngineError::UndefinedReference { span, .. }
            | EngineError::InvalidArgument { span, .. }
            | EngineError::StructureMismatch { span, .. } => *span,
        }
    }

    /// Attach a source span to this error.
    pub fn with_span(mut self, at: Span) -> Self {
        match &mut self {
            EngineError::UnsupportedType { span, .. }
            | EngineError::UnsupportedOperation { span, .. }
            | EngineError::UndefinedReference { span, .. }
            | EngineError::InvalidArgument { span, .. }
            | EngineError::StructureMismatch { span, .. } => *span = Some(at),
        }
        self
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
