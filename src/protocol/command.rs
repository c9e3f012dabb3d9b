//! Command definitions
//!
//! The closed catalog of command types plus their console names, usage
//! signatures and descriptions.

use serde::{Deserialize, Serialize};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    Help,
    Info,
    Show,
    Clear,
    /// Client-local, never sent
    Exit,
    AverageOfHeight,
    Add,
    Update,
    RemoveById,
    AddIfMin,
    RemoveGreater,
    RemoveLower,
    CountByHairColor,
    FilterLessThanHairColor,
    /// Client-local, never dispatched by the server
    ExecuteScript,
}

impl CommandType {
    /// Every command in catalog order
    pub const ALL: [CommandType; 15] = [
        CommandType::Help,
        CommandType::Info,
        CommandType::Show,
        CommandType::Clear,
        CommandType::Exit,
        CommandType::AverageOfHeight,
        CommandType::Add,
        CommandType::Update,
        CommandType::RemoveById,
        CommandType::AddIfMin,
        CommandType::RemoveGreater,
        CommandType::RemoveLower,
        CommandType::CountByHairColor,
        CommandType::FilterLessThanHairColor,
        CommandType::ExecuteScript,
    ];

    /// Name typed on the console
    pub fn name(self) -> &'static str {
        match self {
            CommandType::Help => "help",
            CommandType::Info => "info",
            CommandType::Show => "show",
            CommandType::Clear => "clear",
            CommandType::Exit => "exit",
            CommandType::AverageOfHeight => "average_of_height",
            CommandType::Add => "add",
            CommandType::Update => "update",
            CommandType::RemoveById => "remove_by_id",
            CommandType::AddIfMin => "add_if_min",
            CommandType::RemoveGreater => "remove_greater",
            CommandType::RemoveLower => "remove_lower",
            CommandType::CountByHairColor => "count_by_hair_color",
            CommandType::FilterLessThanHairColor => "filter_less_than_hair_color",
            CommandType::ExecuteScript => "execute_script",
        }
    }

    /// Upper-case identifier used in server messages
    pub fn tag(self) -> &'static str {
        match self {
            CommandType::Help => "HELP",
            CommandType::Info => "INFO",
            CommandType::Show => "SHOW",
            CommandType::Clear => "CLEAR",
            CommandType::Exit => "EXIT",
            CommandType::AverageOfHeight => "AVERAGE_OF_HEIGHT",
            CommandType::Add => "ADD",
            CommandType::Update => "UPDATE",
            CommandType::RemoveById => "REMOVE_BY_ID",
            CommandType::AddIfMin => "ADD_IF_MIN",
            CommandType::RemoveGreater => "REMOVE_GREATER",
            CommandType::RemoveLower => "REMOVE_LOWER",
            CommandType::CountByHairColor => "COUNT_BY_HAIR_COLOR",
            CommandType::FilterLessThanHairColor => "FILTER_LESS_THAN_HAIR_COLOR",
            CommandType::ExecuteScript => "EXECUTE_SCRIPT",
        }
    }

    /// Usage signature shown by `help`
    pub fn signature(self) -> &'static str {
        match self {
            CommandType::Update => "update id {element}",
            CommandType::RemoveById => "remove_by_id id",
            CommandType::Add => "add {element}",
            CommandType::AddIfMin => "add_if_min {element}",
            CommandType::RemoveGreater => "remove_greater {element}",
            CommandType::RemoveLower => "remove_lower {element}",
            CommandType::CountByHairColor => "count_by_hair_color hairColor",
            CommandType::FilterLessThanHairColor => "filter_less_than_hair_color hairColor",
            CommandType::ExecuteScript => "execute_script file_name",
            other => other.name(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandType::Help => "show help for the available commands",
            CommandType::Info => "print information about the collection (type, initialization date, element count)",
            CommandType::Show => "print every element of the collection",
            CommandType::Clear => "remove every element from the collection",
            CommandType::Exit => "exit the client (the collection is not saved)",
            CommandType::AverageOfHeight => "print the average height over all elements",
            CommandType::Add => "add a new element to the collection",
            CommandType::Update => "update the element whose id equals the given one",
            CommandType::RemoveById => "remove the element with the given id",
            CommandType::AddIfMin => "add a new element if it is lower than the smallest element",
            CommandType::RemoveGreater => "remove every element greater than the given one",
            CommandType::RemoveLower => "remove every element lower than the given one",
            CommandType::CountByHairColor => "print how many elements have the given hair color",
            CommandType::FilterLessThanHairColor => "print the elements whose hair color is lower than the given one",
            CommandType::ExecuteScript => "read and execute a script from the given file",
        }
    }

    /// Look up a command by its console name (case insensitive)
    pub fn from_name(name: &str) -> Option<CommandType> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Commands handled entirely by the client
    pub fn is_client_local(self) -> bool {
        matches!(self, CommandType::Exit | CommandType::ExecuteScript)
    }

    /// Rendered `help` text
    pub fn help_text() -> String {
        let mut text = String::from("Available commands:");
        for command in Self::ALL {
            text.push_str(&format!(
                "\n  {:<42} : {}",
                command.signature(),
                command.description()
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_command() {
        for command in CommandType::ALL {
            assert_eq!(CommandType::from_name(command.name()), Some(command));
        }
        assert_eq!(CommandType::from_name("SHOW"), Some(CommandType::Show));
        assert_eq!(CommandType::from_name("drop_table"), None);
    }

    #[test]
    fn test_help_text_lists_every_signature() {
        let help = CommandType::help_text();
        for command in CommandType::ALL {
            assert!(help.contains(command.signature()));
        }
    }
}
