//! Sample values and serializers for facade tests.

use std::fmt::{self, Display, Formatter};

use herald_log::StructuredSerializer;
use serde::Serialize;
use thiserror::Error;

/// Value with a recognisable type name and `Display` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Identifier shown in the text form.
    pub id: u32,
}

impl Display for Probe {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "probe #{}", self.id)
    }
}

/// Serializable payload used by `log_serialized` tests.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    /// Queue name.
    pub queue: String,
    /// Pending jobs.
    pub depth: u32,
}

/// Error raised by [`FailingSerializer`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("serializer refused value")]
pub struct FixtureError;

/// Serializer that rejects every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSerializer;

impl StructuredSerializer for FailingSerializer {
    type Error = FixtureError;

    fn serialize<T: Serialize + ?Sized>(&self, _value: &T) -> Result<String, Self::Error> {
        Err(FixtureError)
    }
}

/// Error with a one-level source chain.
#[derive(Debug, Error)]
#[error("job {job} failed")]
pub struct JobFailed {
    /// Job identifier.
    pub job: u32,
    /// Underlying IO failure.
    #[source]
    pub source: std::io::Error,
}
