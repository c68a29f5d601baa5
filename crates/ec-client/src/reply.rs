//! Decoded-or-verbatim reply wrapper.

/// What a request operation hands back once the transport succeeded.
///
/// The service answers some conditions (unknown setup name, missing result
/// table, engine failures) with a plain-text explanation on the same
/// endpoint, so decode failure is part of the contract rather than an error:
/// the body is returned verbatim as [`Reply::Raw`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The body decoded as expected.
    Parsed(T),
    /// The body did not decode; the server's text, untouched.
    Raw(String),
}

impl<T> Reply<T> {
    pub fn is_raw(&self) -> bool {
        matches!(self, Reply::Raw(_))
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Reply::Parsed(v) => Some(v),
            Reply::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Reply::Parsed(_) => None,
            Reply::Raw(s) => Some(s),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Parsed(v) => Reply::Parsed(f(v)),
            Reply::Raw(s) => Reply::Raw(s),
        }
    }
}
