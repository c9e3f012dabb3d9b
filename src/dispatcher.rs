//! Command Dispatcher
//!
//! Maps a decoded `Request` onto a `PersonStore` operation and wraps the
//! outcome in a `Response`.
//!
//! ## Error policy
//! - Wrong or missing argument for the command type → ERROR
//! - Validation failure of a submitted person → ERROR
//! - Unknown id on `update` / `remove_by_id` → SUCCESS with a "not found"
//!   message (a business outcome, not a failure)
//! - Panic inside a store operation → ERROR, never propagated to the loop

use std::panic::{self, AssertUnwindSafe};

use crate::error::Result;
use crate::protocol::{Argument, CommandType, Payload, Request, Response};
use crate::store::PersonStore;

/// Executes requests against the store it owns
pub struct Dispatcher {
    store: PersonStore,
}

impl Dispatcher {
    pub fn new(store: PersonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PersonStore {
        &self.store
    }

    /// Execute a request and return a response
    pub fn execute(&mut self, request: Request) -> Response {
        let command_type = request.command_type;
        tracing::debug!("Executing {}", command_type.tag());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(request)));

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!("{} rejected: {}", command_type.tag(), e);
                Response::error(e.to_string())
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown failure".to_string());
                tracing::error!("Command {} failed: {}", command_type.tag(), reason);
                Response::error(format!(
                    "Internal server error while executing {}: {}",
                    command_type.tag(),
                    reason
                ))
            }
        }
    }

    /// Route commands to the store
    fn route(&mut self, request: Request) -> Result<Response> {
        let Request {
            command_type,
            argument,
        } = request;

        let response = match (command_type, argument) {
            // Commands without arguments
            (CommandType::Help, _) => Response::with_data(
                CommandType::help_text(),
                Payload::Commands(
                    CommandType::ALL
                        .iter()
                        .map(|c| c.name().to_string())
                        .collect(),
                ),
            ),
            (CommandType::Info, _) => Response::success(self.store.info().to_string()),
            (CommandType::Show, _) => {
                Response::with_data("Collection elements:", Payload::Persons(self.store.snapshot()))
            }
            (CommandType::Clear, _) => {
                self.store.clear();
                Response::success("Collection cleared.")
            }
            (CommandType::AverageOfHeight, _) => {
                if self.store.is_empty() {
                    Response::success("Collection is empty.")
                } else {
                    Response::success(format!(
                        "Average height: {:.2}",
                        self.store.average_height()
                    ))
                }
            }

            // Commands with arguments
            (CommandType::Add, Some(Argument::Person(person))) => {
                let id = self.store.add(person)?;
                Response::success(format!("Person added with ID: {}", id))
            }
            (CommandType::Update, Some(Argument::Update { id, person })) => {
                if self.store.update(id, person)? {
                    Response::success(format!("Person with ID {} updated.", id))
                } else {
                    Response::success(format!("Person with ID {} not found.", id))
                }
            }
            (CommandType::RemoveById, Some(Argument::Id(id))) => {
                if self.store.remove_by_id(id) {
                    Response::success(format!("Person with ID {} removed.", id))
                } else {
                    Response::success(format!("Person with ID {} not found.", id))
                }
            }
            (CommandType::AddIfMin, Some(Argument::Person(person))) => {
                match self.store.add_if_min(person)? {
                    Some(id) => Response::success(format!("Person added with ID: {}", id)),
                    None => Response::success(
                        "Element was not added: it is not lower than the minimum.",
                    ),
                }
            }
            (CommandType::RemoveGreater, Some(Argument::Person(person))) => {
                person.validate()?;
                let removed = self.store.remove_greater(&person);
                Response::success(format!(
                    "Removed {} element(s) greater than the given one.",
                    removed
                ))
            }
            (CommandType::RemoveLower, Some(Argument::Person(person))) => {
                person.validate()?;
                let removed = self.store.remove_lower(&person);
                Response::success(format!(
                    "Removed {} element(s) lower than the given one.",
                    removed
                ))
            }
            (CommandType::CountByHairColor, Some(Argument::HairColor(color))) => {
                let count = self.store.count_by_hair_color(color);
                Response::success(format!("Element count: {}", count))
            }
            (CommandType::FilterLessThanHairColor, Some(Argument::HairColor(color))) => {
                Response::with_data(
                    "Filtered elements:",
                    Payload::Persons(self.store.filter_less_than_hair_color(color)),
                )
            }

            // Client-local commands never reach the store
            (command_type, _) if command_type.is_client_local() => Response::error(format!(
                "Unsupported command on server: {}",
                command_type.tag()
            )),

            // Argument missing or of the wrong shape
            (command_type, _) => Response::error(format!(
                "Invalid argument for command {}",
                command_type.tag()
            )),
        };

        Ok(response)
    }
}
