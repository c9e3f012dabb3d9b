//! Client Module
//!
//! Console-side driver for the request/response protocol.
//!
//! ## Responsibilities
//! - Read commands from the console or from script files
//! - Prompt for person fields and colors, re-asking on bad input
//! - Guard `execute_script` against self-referencing scripts
//! - Render responses

mod input;
mod prompt;
mod render;
mod script;
mod session;

pub use input::{ConsoleSource, LineSource, ScriptSource};
pub use prompt::PersonReader;
pub use render::{render_response, ELEMENT_DELIMITER};
pub use script::{ScriptGuard, ScriptHistory};
pub use session::Session;
