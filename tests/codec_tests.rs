//! Codec Tests
//!
//! Tests for request and response framing.

mod common;

use std::path::PathBuf;

use persondb::model::Color;
use persondb::protocol::{
    decode_request, decode_response, encode_request, encode_response, Argument, CommandType,
    Payload, Request, Response, Status, HEADER_SIZE, MAX_DATAGRAM_SIZE, MAX_SEND_SIZE,
};
use persondb::DbError;

use common::{person, stored_person};

fn argument_for(command: CommandType) -> Option<Argument> {
    match command {
        CommandType::Add
        | CommandType::AddIfMin
        | CommandType::RemoveGreater
        | CommandType::RemoveLower => Some(Argument::Person(person("Alice", 170))),
        CommandType::Update => Some(Argument::Update {
            id: 4,
            person: person("Bob", 180),
        }),
        CommandType::RemoveById => Some(Argument::Id(12)),
        CommandType::CountByHairColor => Some(Argument::HairColor(Some(Color::Green))),
        CommandType::FilterLessThanHairColor => Some(Argument::HairColor(None)),
        CommandType::ExecuteScript => Some(Argument::Script(PathBuf::from("script.txt"))),
        _ => None,
    }
}

// =============================================================================
// Request Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_every_command_survives_the_wire() {
    for command in CommandType::ALL {
        let request = Request {
            command_type: command,
            argument: argument_for(command),
        };
        let encoded = encode_request(&request).unwrap();
        assert!(encoded.len() <= MAX_DATAGRAM_SIZE);

        let decoded = decode_request(&encoded).unwrap();
        assert_eq!(decoded.command_type, command);
        assert_eq!(format!("{:?}", decoded), format!("{:?}", request));
    }
}

#[test]
fn test_person_fields_survive_the_wire() {
    let mut p = stored_person(3, "Carol");
    p.creation_date = chrono::NaiveDate::from_ymd_opt(2023, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9);
    p.location.name = None;

    let request = Request::with_argument(CommandType::Add, Argument::Person(p.clone()));
    let decoded = decode_request(&encode_request(&request).unwrap()).unwrap();

    match decoded.argument {
        Some(Argument::Person(q)) => {
            assert_eq!(q.id, 3);
            assert_eq!(q.name, "Carol");
            assert_eq!(q.creation_date, p.creation_date);
            assert_eq!(q.location, p.location);
            assert_eq!(q.hair_color, p.hair_color);
        }
        other => panic!("Expected a person argument, got {:?}", other),
    }
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_response_with_persons() {
    let response = Response::with_data(
        "Collection elements:",
        Payload::Persons(vec![stored_person(1, "A"), stored_person(2, "B")]),
    );
    let decoded = decode_response(&encode_response(&response).unwrap()).unwrap();

    assert_eq!(decoded.status, Status::Success);
    assert_eq!(decoded.message, "Collection elements:");
    match decoded.data {
        Some(Payload::Persons(persons)) => {
            let ids: Vec<i64> = persons.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![1, 2]);
        }
        other => panic!("Expected persons, got {:?}", other),
    }
}

#[test]
fn test_encode_decode_error_response() {
    let response = Response::error("Invalid argument for command ADD");
    let decoded = decode_response(&encode_response(&response).unwrap()).unwrap();

    assert_eq!(decoded.status, Status::Error);
    assert!(!decoded.is_success());
    assert_eq!(decoded.message, "Invalid argument for command ADD");
    assert!(decoded.data.is_none());
}

#[test]
fn test_oversized_response_rejected() {
    let persons: Vec<_> = (1..=2000).map(|id| stored_person(id, "Someone")).collect();
    let response = Response::with_data("Collection elements:", Payload::Persons(persons));

    assert!(matches!(encode_response(&response), Err(DbError::Protocol(_))));
}

#[test]
fn test_send_limit_is_the_udp_payload_limit() {
    let overhead = encode_response(&Response::success("")).unwrap().len();

    let fits = Response::success("x".repeat(MAX_SEND_SIZE - overhead));
    assert_eq!(encode_response(&fits).unwrap().len(), MAX_SEND_SIZE);

    // Still below the receive buffer, but no longer sendable over IPv4
    let too_big = Response::success("x".repeat(MAX_SEND_SIZE - overhead + 1));
    assert!(MAX_SEND_SIZE + 1 <= MAX_DATAGRAM_SIZE);
    match encode_response(&too_big) {
        Err(DbError::Protocol(message)) => assert!(message.contains("does not fit")),
        other => panic!("Expected a protocol error, got {:?}", other.map(|b| b.len())),
    }
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_foreign_bytes() {
    assert!(matches!(decode_request(b"hello"), Err(DbError::Protocol(_))));
    assert!(matches!(
        decode_request(b"definitely not a persondb frame"),
        Err(DbError::Protocol(_))
    ));
    assert!(matches!(decode_request(&[]), Err(DbError::Protocol(_))));
}

#[test]
fn test_decode_truncated_frame() {
    let encoded = encode_request(&Request::new(CommandType::Show)).unwrap();

    let result = decode_request(&encoded[..HEADER_SIZE - 1]);
    assert!(matches!(result, Err(DbError::Protocol(_))));

    let result = decode_request(&encoded[..encoded.len() - 1]);
    assert!(matches!(result, Err(DbError::Protocol(_))));
}

#[test]
fn test_decode_corrupted_body() {
    let request = Request::with_argument(CommandType::Add, Argument::Person(person("Alice", 170)));
    let mut encoded = encode_request(&request).unwrap();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xFF;

    assert!(matches!(decode_request(&encoded), Err(DbError::Protocol(_))));
}

#[test]
fn test_decode_bad_magic() {
    let mut encoded = encode_request(&Request::new(CommandType::Info)).unwrap();
    encoded[0] = b'X';

    assert!(matches!(decode_request(&encoded), Err(DbError::Protocol(_))));
}

#[test]
fn test_response_frame_is_not_a_request() {
    let encoded = encode_response(&Response::success("ok")).unwrap();
    assert!(matches!(decode_request(&encoded), Err(DbError::Protocol(_))));
}
