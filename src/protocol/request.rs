//! Request definitions
//!
//! Represents requests from clients.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::CommandType;
use crate::model::{Color, Person};

/// Typed argument attached to a request.
///
/// The shape is checked against the command type by the dispatcher, not by
/// the codec, so a well-formed envelope can still carry the wrong argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Argument {
    /// ADD, ADD_IF_MIN, REMOVE_GREATER, REMOVE_LOWER
    Person(Person),

    /// UPDATE
    Update { id: i64, person: Person },

    /// REMOVE_BY_ID
    Id(i64),

    /// COUNT_BY_HAIR_COLOR, FILTER_LESS_THAN_HAIR_COLOR (`None` means "no color")
    HairColor(Option<Color>),

    /// EXECUTE_SCRIPT
    Script(PathBuf),
}

/// A request sent by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub command_type: CommandType,
    pub argument: Option<Argument>,
}

impl Request {
    /// Request for a command without arguments
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            argument: None,
        }
    }

    pub fn with_argument(command_type: CommandType, argument: Argument) -> Self {
        Self {
            command_type,
            argument: Some(argument),
        }
    }
}
