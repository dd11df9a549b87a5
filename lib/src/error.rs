use std::{fmt, io};
use std::panic::Location;
use std::convert::Infallible;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The class of failure an [`Error`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input field was missing or empty.
    InvalidInput,
    /// A generation was requested while another was in flight.
    GenerationConflict,
    /// An in-flight generation was abandoned by a reset.
    Cancelled,
    /// A preview or export was requested with no prototype ready.
    NotReady,
    /// Settings could not be read or parsed.
    Config,
    /// The template engine failed.
    Template,
    /// A bundle could not be serialized or deserialized.
    Serialization,
    Io,
    Other,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    _location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn kind(&self) -> ErrorKind { ErrorKind::Other }

    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Places `self` behind `other`. The result keeps `other`'s kind unless
    /// `other` is unclassified, in which case `self`'s kind carries through.
    pub fn chain(self, mut other: Error) -> Self {
        #[inline]
        fn _chain(error: Error, behind: &mut Error) {
            if let Some(prev) = behind.prev.as_mut() {
                _chain(error, prev);
            } else {
                behind.prev = Some(Box::new(error));
            }
        }

        if other.kind == ErrorKind::Other {
            other.kind = self.kind;
        }

        _chain(self, &mut other);
        other
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let mut ctxt = vec![];
        let mut error = self.source();
        while let Some(e) = error {
            ctxt.push((None, e.to_string()));
            error = e.source();
        }

        ctxt
    }
}

impl ErrorDetail for Box<dyn StdError + Send + Sync> {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let error: &(dyn StdError + Send + Sync) = &**self;
        error.context()
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($T:ty => $kind:ident) => {
        impl $crate::error::ErrorDetail for $T {
            fn kind(&self) -> ErrorKind {
                ErrorKind::$kind
            }

            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                error.context()
            }
        }
    }
}

impl_error_detail_with_std_error!(io::Error => Io);
impl_error_detail_with_std_error!(toml::de::Error => Config);
impl_error_detail_with_std_error!(serde_json::Error => Serialization);
impl_error_detail_with_std_error!(minijinja::Error => Template);

impl ErrorDetail for String { }
impl ErrorDetail for &str { }

impl Clone for Error {
    fn clone(&self) -> Self {
        Error {
            kind: self.kind,
            detail: self.detail.iter()
                .map(|detail| MakeshiftError::from(&**detail))
                .map(|error| Box::new(error) as Box<dyn ErrorDetail>)
                .collect(),
            prev: self.prev.clone(),
            _location: self._location,
        }
    }
}

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            kind: detail.kind(),
            prev: None,
            detail: vec![Box::new(detail)],
            _location: std::panic::Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Copy, Clone)] struct Indent(usize);

        impl fmt::Display for Indent {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(self.0 * 4) { write!(f, " ")? }
                Ok(())
            }
        }

        struct NestedError<'a>(Indent, &'a Error);

        impl fmt::Display for NestedError<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let NestedError(indent, e) = self;

                for detail in &e.detail {
                    let indent_line = format!("\n{indent}");

                    writeln!(f, "{indent}{}", format!("{:#}", detail).replace('\n', &indent_line))?;
                    if let Some(prev) = &e.prev {
                        NestedError(Indent(indent.0 + 1), prev).fmt(f)?;
                    }

                    for (key, value) in detail.context() {
                        let value = value.replace('\n', &indent_line);
                        if let Some(key) = key {
                            writeln!(f, "{indent}{key}: {value}")?;
                        } else {
                            writeln!(f, "{indent}{value}")?;
                        }
                    }
                }

                Ok(())
            }
        }

        NestedError(Indent(0), self).fmt(f)
    }
}

#[derive(Debug)]
pub struct MakeshiftError {
    pub kind: ErrorKind,
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

impl From<&dyn ErrorDetail> for MakeshiftError {
    #[inline]
    fn from(detail: &dyn ErrorDetail) -> Self {
        MakeshiftError {
            kind: detail.kind(),
            message: detail.to_string(),
            parameters: detail.context()
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

/// Builds an [`Error`](crate::error::Error) from a message and `key => value`
/// context. A leading `kind = Kind,` classifies the error.
#[doc(hidden)]
#[macro_export]
macro_rules! error {
    (kind = $kind:ident, $msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::MakeshiftError {
            kind: $crate::error::ErrorKind::$kind,
            message: $msg.to_string(),
            parameters: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    (kind = $kind:ident, $msg:expr) => ( $crate::error!(kind = $kind, $msg,) );

    ($msg:expr, $($rest:tt)*) => ( $crate::error!(kind = Other, $msg, $($rest)*) );

    ($msg:expr) => ( $crate::error!(kind = Other, $msg,) );

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

impl fmt::Display for MakeshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl ErrorDetail for MakeshiftError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into()))
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
     {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into()))
        }
    }
}

impl ErrorDetail for Infallible { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_survives_context_chaining() {
        let result: Result<()> = err!(kind = InvalidInput, "field is empty", "field" => "businessName");
        let error = result.chain_with(|| "failed to derive site").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let display = error.to_string();
        assert!(display.starts_with("failed to derive site\n"));
        assert!(display.contains("field is empty"));
        assert!(display.contains("field: businessName"));
    }

    #[test]
    fn classified_outer_error_wins() {
        let inner = error!(kind = Io, "disk full");
        let outer = error!(kind = Config, "failed to read settings");
        assert_eq!(inner.chain(outer).kind(), ErrorKind::Config);
    }

    #[test]
    fn library_errors_are_classified() {
        let json = serde_json::from_str::<u8>("nope").map_err(Error::from).unwrap_err();
        assert_eq!(json.kind(), ErrorKind::Serialization);

        let toml = toml::from_str::<toml::Table>("= 1").map_err(Error::from).unwrap_err();
        assert_eq!(toml.kind(), ErrorKind::Config);
    }
}
