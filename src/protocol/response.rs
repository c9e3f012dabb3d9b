//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::model::Person;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// Optional data carried next to the message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// Elements for SHOW and FILTER_LESS_THAN_HAIR_COLOR, ascending by id
    Persons(Vec<Person>),

    /// Command names returned by HELP
    Commands(Vec<String>),
}

/// A response to send to client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,

    /// Human-readable outcome
    pub message: String,

    pub data: Option<Payload>,
}

impl Response {
    /// Create a SUCCESS response without data
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: None,
        }
    }

    /// Create a SUCCESS response carrying data
    pub fn with_data(message: impl Into<String>, data: Payload) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
