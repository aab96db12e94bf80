use std::fmt;
use std::panic::Location;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error with a message, `(key, value)` context lines, and an optional
/// lower-level cause.
#[derive(Debug, Clone)]
pub struct Error {
    message: String,
    context: Vec<(Option<String>, String)>,
    cause: Option<Box<Error>>,
    location: &'static Location<'static>,
}

/// Anything that can become an [`Error`] via `?`.
pub trait ErrorDetail: fmt::Display {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }
}

impl Error {
    #[track_caller]
    pub fn new<M: fmt::Display>(message: M) -> Self {
        Error {
            message: message.to_string(),
            context: vec![],
            cause: None,
            location: Location::caller(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &[(Option<String>, String)] {
        &self.context
    }

    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }

    #[doc(hidden)]
    pub fn push_context(&mut self, key: Option<String>, value: String) {
        self.context.push((key, value));
    }

    /// Makes `self` the deepest cause of `outer` and returns `outer`.
    pub fn chain(self, mut outer: Error) -> Self {
        fn deepest(error: &mut Error) -> &mut Option<Box<Error>> {
            match error.cause {
                Some(ref mut cause) => deepest(cause),
                None => &mut error.cause,
            }
        }

        *deepest(&mut outer) = Some(Box::new(self));
        outer
    }
}

fn source_chain(error: &(dyn StdError + 'static)) -> Vec<(Option<String>, String)> {
    let mut lines = vec![];
    let mut source = error.source();
    while let Some(e) = source {
        lines.push((None, e.to_string()));
        source = e.source();
    }

    lines
}

macro_rules! impl_error_detail_with_std_error {
    ($($T:ty),* $(,)?) => {
        $(
            impl ErrorDetail for $T {
                fn context(&self) -> Vec<(Option<String>, String)> {
                    source_chain(self)
                }
            }
        )*
    }
}

impl_error_detail_with_std_error! {
    std::io::Error,
    toml::de::Error,
    toml::ser::Error,
    serde_json::Error,
    regex::Error,
    globset::Error,
    std::str::Utf8Error,
}

impl ErrorDetail for String { }
impl ErrorDetail for &str { }

impl<T: ErrorDetail> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            message: detail.to_string(),
            context: detail.context(),
            cause: None,
            location: Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn nested(error: &Error, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let indent = " ".repeat(depth * 4);
            let newline = format!("\n{indent}");

            writeln!(f, "{indent}{}", error.message.replace('\n', &newline))?;
            if let Some(cause) = &error.cause {
                nested(cause, depth + 1, f)?;
            }

            for (key, value) in &error.context {
                let value = value.replace('\n', &newline);
                match key {
                    Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                    None => writeln!(f, "{indent}{value}")?,
                }
            }

            if std::env::var_os("RUST_BACKTRACE").is_some() {
                writeln!(f, "{indent}[{}]", error.location)?;
            }

            Ok(())
        }

        nested(self, 0, f)
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    (@param $e:ident;) => {};

    (@param $e:ident; $key:expr => $value:expr $(, $($rest:tt)*)?) => {
        $e.push_context(Some($key.to_string()), $value.to_string());
        $($crate::error!(@param $e; $($rest)*);)?
    };

    (@param $e:ident; $value:expr $(, $($rest:tt)*)?) => {
        $e.push_context(None, $value.to_string());
        $($crate::error!(@param $e; $($rest)*);)?
    };

    ($msg:expr $(,)?) => ($crate::error::Error::new($msg));

    ($msg:expr, $($rest:tt)+) => ({
        #[allow(unused_mut)]
        let mut error = $crate::error::Error::new($msg);
        $crate::error!(@param error; $($rest)+);
        error
    });
}

pub trait Chainable<T> {
    fn chain(self, outer: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, outer: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(outer.into()))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_nests_cause_under_outer() {
        let inner: Result<()> = err!("no such file", "path" => "docs.toml");
        let error = inner.chain(error!("failed to read settings")).unwrap_err();

        assert_eq!(error.message(), "failed to read settings");
        let cause = error.cause().unwrap();
        assert_eq!(cause.message(), "no such file");
        assert_eq!(cause.context(), &[(Some("path".into()), "docs.toml".into())]);

        let rendered = error.to_string();
        assert!(rendered.starts_with("failed to read settings\n    no such file\n"));
        assert!(rendered.contains("    path: docs.toml"));
    }

    #[test]
    fn unkeyed_params() {
        let error = error!("bad rule", "first", "k" => 3, "last");
        assert_eq!(error.context(), &[
            (None, "first".to_string()),
            (Some("k".to_string()), "3".to_string()),
            (None, "last".to_string()),
        ]);
    }

    #[test]
    fn std_errors_convert() {
        fn parse() -> Result<toml::Value> {
            Ok(toml::from_str("= nope")?)
        }

        assert!(parse().is_err());
    }
}
