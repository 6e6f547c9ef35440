use crate::{area, creature};
use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io, result};

#[derive(Debug)]
pub enum ErrorType {
    Io(io::Error),
    Rules(toml::de::Error),
    AreaBuilderError(area::BuilderError),
    CreatureBuilderError(creature::BuilderError),
}

/// The second member contains a trace in reverse order
#[must_use]
pub struct Error(ErrorType, Vec<String>);

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self(ErrorType::Io(e), vec![])
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self(ErrorType::Rules(e), vec![])
    }
}

impl From<area::BuilderError> for Error {
    fn from(e: area::BuilderError) -> Self {
        Self(ErrorType::AreaBuilderError(e), vec![])
    }
}

impl From<creature::BuilderError> for Error {
    fn from(e: creature::BuilderError) -> Self {
        Self(ErrorType::CreatureBuilderError(e), vec![])
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorType {
        &self.0
    }

    pub fn with_trace_step<S: ToString>(mut self, s: S) -> Self {
        self.1.push(s.to_string());
        self
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error:\n{:?}\nTrace:", self.0)?;
        for t in (self.1).iter().rev() {
            writeln!(f, " in {}", t)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            ErrorType::Io(e) => Some(e),
            ErrorType::Rules(e) => Some(e),
            ErrorType::AreaBuilderError(e) => Some(e),
            ErrorType::CreatureBuilderError(e) => Some(e),
        }
    }
}

pub type Result<T = ()> = result::Result<T, Error>;

pub trait ErrorConversion {
    fn with_trace_step<S: ToString>(self, s: S) -> Self;
}

impl<T> ErrorConversion for Result<T> {
    fn with_trace_step<S: ToString>(self, s: S) -> Self {
        self.map_err(|e| e.with_trace_step(s.to_string()))
    }
}

#[test]
fn test_trace_is_printed_outermost_first() {
    let err: Result = Err(io::Error::new(io::ErrorKind::NotFound, "rules.toml").into());
    let err = err
        .with_trace_step("reading rules")
        .with_trace_step("starting demo")
        .unwrap_err();
    let printed = format!("{}", err);
    let outer = printed.find("starting demo").unwrap();
    let inner = printed.find("reading rules").unwrap();
    assert!(outer < inner);
    assert!(matches!(err.kind(), ErrorType::Io(_)));
}
