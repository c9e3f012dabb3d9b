//! Protocol Module
//!
//! Defines the datagram protocol for client-server communication.
//!
//! ## Exchange
//! One request = one datagram, one response = one datagram. There is no
//! request identifier: a client keeps at most one request in flight.
//!
//! ### Request
//! `command_type` + optional typed `Argument`:
//! - `Person`: ADD, ADD_IF_MIN, REMOVE_GREATER, REMOVE_LOWER
//! - `Update { id, person }`: UPDATE
//! - `Id`: REMOVE_BY_ID
//! - `HairColor`: COUNT_BY_HAIR_COLOR, FILTER_LESS_THAN_HAIR_COLOR
//! - none: HELP, INFO, SHOW, CLEAR, AVERAGE_OF_HEIGHT
//!
//! ### Response
//! `status` (SUCCESS / ERROR) + `message` + optional `Payload`.

mod codec;
mod command;
mod request;
mod response;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, HEADER_SIZE, MAGIC,
    MAX_DATAGRAM_SIZE, MAX_SEND_SIZE,
};
pub use command::CommandType;
pub use request::{Argument, Request};
pub use response::{Payload, Response, Status};
