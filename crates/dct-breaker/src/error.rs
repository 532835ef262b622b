use thiserror::Error;
use std::fmt;

#[derive(Error, Debug)]
pub enum CircuitError<E: fmt::Display + fmt::Debug> {
    #[error("circuit breaker is open, call refused")]
    CircuitOpen,

    #[error("{0}")]
    Inner(E),
}
