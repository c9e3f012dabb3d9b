//! Server Tests
//!
//! End-to-end tests over a real UDP socket on the loopback interface.

mod common;

use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use persondb::network::{
    Client, ConsoleBridge, ConsoleSender, LoopState, Server, ServerHandle, Transport,
};
use persondb::protocol::{
    decode_response, encode_response, Argument, CommandType, Payload, Request, Response, Status,
    MAX_SEND_SIZE,
};
use persondb::{CollectionFile, Config, DbError, PersonStore};
use tempfile::TempDir;

use common::{person, stored_person};

struct Running {
    addr: SocketAddr,
    handle: ServerHandle,
    console: ConsoleSender,
    thread: JoinHandle<persondb::Result<()>>,
}

fn start_server(data_file: PathBuf, store: PersonStore) -> Running {
    let config = Config::builder()
        .data_file(&data_file)
        .listen_addr("127.0.0.1:0")
        .build();
    let file = CollectionFile::new(&config.data_file);

    let server = Server::bind(config, store, file).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.handle();
    let (console, bridge) = ConsoleBridge::channel();

    let thread = thread::spawn(move || server.run(Some(bridge)));

    Running {
        addr,
        handle,
        console,
        thread,
    }
}

fn client_for(addr: SocketAddr) -> Client {
    let config = Config::builder()
        .listen_addr(addr.to_string())
        .response_timeout_ms(2000)
        .build();
    Client::connect(&config).unwrap()
}

fn wait_for_file(path: &Path) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_add_and_show_over_udp() {
    let dir = TempDir::new().unwrap();
    let server = start_server(dir.path().join("persons.db"), PersonStore::new());
    let mut client = client_for(server.addr);

    let response = client
        .send_and_receive(&Request::with_argument(
            CommandType::Add,
            Argument::Person(person("Alice", 170)),
        ))
        .unwrap();
    assert_eq!(response.status, Status::Success);
    assert!(response.message.contains("ID: 1"));

    let response = client.send_and_receive(&Request::new(CommandType::Show)).unwrap();
    match response.data {
        Some(Payload::Persons(persons)) => {
            assert_eq!(persons.len(), 1);
            assert_eq!(persons[0].name, "Alice");
        }
        other => panic!("Expected persons, got {:?}", other),
    }

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
}

#[test]
fn test_foreign_datagram_gets_error_reply() {
    let dir = TempDir::new().unwrap();
    let server = start_server(dir.path().join("persons.db"), PersonStore::new());

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    socket.send_to(b"hello there", server.addr).unwrap();

    let mut buf = vec![0u8; 65536];
    let (len, _) = socket.recv_from(&mut buf).unwrap();
    let response = decode_response(&buf[..len]).unwrap();
    assert_eq!(response.status, Status::Error);
    assert!(response.message.starts_with("Invalid request format"));

    // The loop keeps serving after a bad datagram
    let mut client = client_for(server.addr);
    let response = client.send_and_receive(&Request::new(CommandType::Info)).unwrap();
    assert_eq!(response.status, Status::Success);

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
}

#[test]
fn test_response_over_send_limit_gets_error_reply() {
    fn show_frame_len(name: &str) -> usize {
        let response = Response::with_data(
            "Collection elements:",
            Payload::Persons(vec![stored_person(1, name)]),
        );
        encode_response(&response).unwrap().len()
    }

    // One name character per frame byte: aim one byte past the send limit
    let base = show_frame_len("a");
    let name = "a".repeat(MAX_SEND_SIZE + 1 - base + 1);

    let dir = TempDir::new().unwrap();
    let store = PersonStore::from_persons(vec![stored_person(1, &name)]);
    let server = start_server(dir.path().join("persons.db"), store);
    let mut client = client_for(server.addr);

    let response = client.send_and_receive(&Request::new(CommandType::Show)).unwrap();
    assert_eq!(response.status, Status::Error);
    assert!(response.message.contains("does not fit"));

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
}

#[test]
fn test_handle_reports_loop_state() {
    let dir = TempDir::new().unwrap();
    let server = start_server(dir.path().join("persons.db"), PersonStore::new());
    let mut client = client_for(server.addr);

    client.send_and_receive(&Request::new(CommandType::Info)).unwrap();
    assert_ne!(server.handle.state(), LoopState::Stopped);

    let observer = server.handle.clone();
    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
    assert_eq!(observer.state(), LoopState::Stopped);
}

#[test]
fn test_clients_share_one_collection() {
    let dir = TempDir::new().unwrap();
    let server = start_server(dir.path().join("persons.db"), PersonStore::new());
    let mut first = client_for(server.addr);
    let mut second = client_for(server.addr);

    first
        .send_and_receive(&Request::with_argument(
            CommandType::Add,
            Argument::Person(person("Alice", 170)),
        ))
        .unwrap();
    let response = second
        .send_and_receive(&Request::with_argument(
            CommandType::Add,
            Argument::Person(person("Bob", 180)),
        ))
        .unwrap();
    assert!(response.message.contains("ID: 2"));

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
}

// =============================================================================
// Console Tests
// =============================================================================

#[test]
fn test_console_save_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persons.db");
    let store = PersonStore::from_persons(vec![stored_person(1, "Alice")]);
    let server = start_server(path.clone(), store);

    assert!(server.console.send("save"));
    assert!(wait_for_file(&path));

    let loaded = CollectionFile::new(&path).load().unwrap();
    assert_eq!(loaded.len(), 1);

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();
}

#[test]
fn test_console_exit_stops_and_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persons.db");
    let server = start_server(path.clone(), PersonStore::new());

    let mut client = client_for(server.addr);
    client
        .send_and_receive(&Request::with_argument(
            CommandType::Add,
            Argument::Person(person("Alice", 170)),
        ))
        .unwrap();

    assert!(server.console.send("bogus"));
    assert!(server.console.send("exit"));
    server.thread.join().unwrap().unwrap();

    let loaded = CollectionFile::new(&path).load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Alice");
}

#[test]
fn test_shutdown_handle_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persons.db");
    let server = start_server(path.clone(), PersonStore::new());

    server.handle.shutdown();
    server.thread.join().unwrap().unwrap();

    assert!(path.exists());
    assert!(CollectionFile::new(&path).load().unwrap().is_empty());
}

// =============================================================================
// Client Tests
// =============================================================================

#[test]
fn test_client_times_out() {
    // Bound but never answers
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let config = Config::builder()
        .listen_addr(silent.local_addr().unwrap().to_string())
        .response_timeout_ms(200)
        .build();
    let mut client = Client::connect(&config).unwrap();

    let started = Instant::now();
    let result = client.send_and_receive(&Request::new(CommandType::Info));
    assert!(matches!(result, Err(DbError::Timeout(200))));
    assert!(started.elapsed() >= Duration::from_millis(150));
}

// =============================================================================
// Process Tests
// =============================================================================

#[cfg(unix)]
#[test]
fn test_sigterm_triggers_final_save() {
    use std::io::{BufRead, BufReader, Write};
    use std::process::{Command, Stdio};

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persons.db");

    let mut child = Command::new(env!("CARGO_BIN_EXE_persondb-server"))
        .arg("--file")
        .arg(&path)
        .arg("--listen")
        .arg("127.0.0.1:0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut line = String::new();
    stdout.read_line(&mut line).unwrap();
    assert!(line.starts_with("Server started"));

    // A handled console save proves the loop, and its signal handlers, are up
    let mut stdin = child.stdin.take().unwrap();
    writeln!(stdin, "save").unwrap();
    assert!(wait_for_file(&path));
    std::fs::remove_file(&path).unwrap();

    let status = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    let exit = child.wait().unwrap();
    assert!(exit.success());
    assert!(path.exists());
    assert!(CollectionFile::new(&path).load().unwrap().is_empty());
}
