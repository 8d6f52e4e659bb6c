use std::fmt;

/// Failures of the fallible edges of the builder: loading a saved query,
/// decoding a share token, scanning SQL text, checking against the catalog.
///
/// Every variant maps to a stable numeric code (`code()`), printed in front
/// of the message so failures can be grepped in logs.
#[derive(Debug)]
pub enum Error {
    /// Reading a query file or writing a share link failed (1000).
    Io(std::io::Error),
    /// Share token is not valid base64, UTF-8 or a JSON object (2000).
    Codec(String),
    /// SQL text or an identifier could not be scanned (3000).
    Syntax(String),
    /// Unknown table or column (5000).
    Schema(String),
    /// JSON could not be read or written (6000).
    Serialization(String),
    /// The builder does not handle this yet (7000).
    Unsupported(String),
    /// Anything else, e.g. an unknown template name (9000).
    Other(String),
}

impl Error {
    /// `(code, category, heading)` of the variant. The heading is what
    /// Display prints after the code.
    fn kind(&self) -> (u32, &'static str, &'static str) {
        match self {
            Error::Io(_) => (1000, "I/O", "I/O Error"),
            Error::Codec(_) => (2000, "Codec", "Codec Error"),
            Error::Syntax(_) => (3000, "Syntax", "Syntax Error"),
            Error::Schema(_) => (5000, "Schema", "Schema Error"),
            Error::Serialization(_) => (6000, "Serialization", "Serialization Error"),
            Error::Unsupported(_) => (7000, "Unsupported", "Unsupported Operation"),
            Error::Other(_) => (9000, "Other", "Unknown Error"),
        }
    }

    /// Stable numeric code of the variant.
    ///
    /// ```
    /// use querycraft::errors::Error;
    /// assert_eq!(Error::Schema("Unknown table 'foo'".into()).code(), 5000);
    /// ```
    pub fn code(&self) -> u32 {
        self.kind().0
    }

    /// Short category name, as used in log fields.
    pub fn category(&self) -> &'static str {
        self.kind().1
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (code, _, heading) = self.kind();
        match self {
            Error::Io(e) => write!(f, "[{code}] {heading}: {e}"),
            Error::Codec(msg)
            | Error::Syntax(msg)
            | Error::Schema(msg)
            | Error::Serialization(msg)
            | Error::Unsupported(msg)
            | Error::Other(msg) => write!(f, "[{code}] {heading}: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::Codec(format!("Token payload is not UTF-8: {}", e))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Codec(format!("Base64 decoding error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", e))
    }
}

/// Builds an `Error` variant from a message or a format string.
///
/// ```
/// use querycraft::err;
/// let err = err!(Schema, "Unknown table '{}'", "foo");
/// assert_eq!(err.to_string(), "[5000] Schema Error: Unknown table 'foo'");
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident, $msg:expr) => {
        $crate::errors::Error::$variant($msg.to_string())
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::errors::Error::$variant(format!($fmt, $($arg)*))
    };
}
