//!
//! Unified `miette`-based diagnostics for gradle-scrub.
//!
//! Every failure mode of the tool is a [`ScrubError`]. Construct errors with the
//! `err_msg!`, `err_ctx!` and `err_src!` macros instead of building the variants
//! by hand:
//!
//! - `err_msg!(Config, "unknown recipe '{}'", kind)` for message-only errors.
//! - `err_ctx!(Parse, "unexpected token", &source, span)` for errors that point
//!   into a script.
//! - `err_src!(Io, "cannot write", &named_source, span)` when a `NamedSource`
//!   already exists.
//!
//! Parse errors are recoverable (the driver records them per file). Every
//! other variant aborts the run.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::syntax::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe classification of a [`ScrubError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A build script is not valid in its dialect.
    Parse,
    /// The rule file is malformed or names an unknown recipe.
    Config,
    /// Reading, writing or deleting a file failed.
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::Config => "Config",
            ErrorType::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The script or file the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Unified error type for all gradle-scrub failure modes.
#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl ScrubError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            ScrubError::Parse { ctx, .. } => ctx,
            ScrubError::Config { ctx, .. } => ctx,
            ScrubError::Io { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            ScrubError::Parse { message, .. }
            | ScrubError::Config { message, .. }
            | ScrubError::Io { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ScrubError::Parse { .. } => ErrorType::Parse,
            ScrubError::Config { .. } => ErrorType::Config,
            ScrubError::Io { .. } => ErrorType::Io,
        }
    }

    /// Names the source an error points into.
    ///
    /// The parser only sees text; the caller that owns the file path fills
    /// in the name so the report shows which script failed.
    pub fn with_source(mut self, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        let ctx = match &mut self {
            ScrubError::Parse { ctx, .. }
            | ScrubError::Config { ctx, .. }
            | ScrubError::Io { ctx, .. } => ctx,
        };
        ctx.source = Some(Arc::new(NamedSource::new(name.as_ref(), text.into())));
        self
    }

    /// Attaches the underlying cause.
    pub fn caused_by(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            ScrubError::Parse { source, .. }
            | ScrubError::Config { source, .. }
            | ScrubError::Io { source, .. } => *source = Some(Box::new(cause)),
        }
        self
    }
}

impl Diagnostic for ScrubError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Parse => "gradle_scrub::parse",
            ErrorType::Config => "gradle_scrub::config",
            ErrorType::Io => "gradle_scrub::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // A span without a source cannot be rendered.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Constructs a ScrubError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::ScrubError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::ScrubError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a ScrubError variant pointing at a span of a source string.
///
/// `$src` is anything `AsRef<str>`; it is wrapped into an anonymous
/// `NamedSource`. Use [`ScrubError::with_source`] afterwards to name it.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::ScrubError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::to_error_source($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::ScrubError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::to_error_source($src)),
                span: Some($span),
                help: None,
            },
            source: None,
        }
    };
}

/// Constructs a ScrubError variant from a pre-built `NamedSource`.
#[macro_export]
macro_rules! err_src {
    ($variant:ident, $msg:expr, $source:expr, $span:expr) => {
        $crate::ScrubError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some(std::sync::Arc::clone($source)),
                span: Some($span),
                help: None,
            },
            source: None,
        }
    };
}

/// Converts a source string into an `Arc<NamedSource<String>>`.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new("source", source.as_ref().to_string()))
}

/// Wraps a `std::io::Error` with the path it concerns.
pub fn io_error(action: &str, path: &std::path::Path, err: std::io::Error) -> ScrubError {
    err_msg!(Io, "failed to {} '{}'", action, path.display()).caused_by(err)
}

/// Prints a ScrubError with full miette diagnostics to stderr.
pub fn print_error(error: ScrubError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
