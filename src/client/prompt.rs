//! Field-by-field entry of persons and colors.
//!
//! Invalid input is reported and asked for again; only the end of the line
//! source aborts an entry.

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use super::LineSource;
use crate::error::Result;
use crate::model::{
    Color, Coordinates, Country, Location, Person, LOCATION_NAME_MAX_LEN, MAX_COORDINATE_X,
};

/// Numbers the prompts know how to bound
trait Numeric: FromStr + PartialOrd + Display + Copy {
    const KIND: &'static str;

    fn is_usable(&self) -> bool {
        true
    }
}

impl Numeric for i64 {
    const KIND: &'static str = "an integer";
}

impl Numeric for f32 {
    const KIND: &'static str = "a decimal number";

    fn is_usable(&self) -> bool {
        self.is_finite()
    }
}

impl Numeric for f64 {
    const KIND: &'static str = "a decimal number";

    fn is_usable(&self) -> bool {
        self.is_finite()
    }
}

/// Prompts that read from a line source and report to `out`
pub struct PersonReader<'a> {
    source: &'a mut dyn LineSource,
    out: &'a mut dyn Write,
}

impl<'a> PersonReader<'a> {
    pub fn new(source: &'a mut dyn LineSource, out: &'a mut dyn Write) -> Self {
        Self { source, out }
    }

    /// Ask for every field of a new person
    pub fn read_person(&mut self) -> Result<Person> {
        writeln!(self.out, "Entering person data:")?;
        let name = self.read_required("Enter name (must not be empty):")?;

        writeln!(self.out, "Entering coordinates:")?;
        let x: f64 = self.read_number(
            &format!("  Enter X (decimal, max {}):", MAX_COORDINATE_X),
            None,
            Some(MAX_COORDINATE_X),
        )?;
        let y: f32 = self.read_number("  Enter Y (decimal):", None, None)?;

        let height: i64 = self.read_number("Enter height (integer > 0):", Some(1), None)?;
        let eye_color = self.read_color("eye color")?;
        let hair_color = self.read_color("hair color")?;
        let nationality = self.read_country()?;

        writeln!(self.out, "Entering location:")?;
        let lx: f32 = self.read_number("  Enter location X (decimal):", None, None)?;
        let ly: f64 = self.read_number("  Enter location Y (decimal):", None, None)?;
        let lz: f64 = self.read_number("  Enter location Z (decimal):", None, None)?;
        let location_name = self.read_optional(
            &format!(
                "  Enter location name (up to {} characters, empty for none):",
                LOCATION_NAME_MAX_LEN
            ),
            Some(LOCATION_NAME_MAX_LEN),
        )?;

        Person::new(
            name,
            Coordinates::new(x, y)?,
            height,
            eye_color,
            hair_color,
            nationality,
            Location::new(lx, ly, lz, location_name)?,
        )
    }

    /// Ask for a color; empty input means none
    pub fn read_color(&mut self, field: &str) -> Result<Option<Color>> {
        writeln!(self.out, "Choose {}:", field)?;
        writeln!(self.out, "Available values: {}", Color::list_values())?;
        self.read_choice()
    }

    pub fn read_country(&mut self) -> Result<Option<Country>> {
        writeln!(self.out, "Choose nationality:")?;
        writeln!(self.out, "Available values: {}", Country::list_values())?;
        self.read_choice()
    }

    fn read_choice<T: FromStr>(&mut self) -> Result<Option<T>> {
        loop {
            let Some(input) = self.read_optional("Enter a value (empty for none):", None)? else {
                return Ok(None);
            };
            match input.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Error: invalid value, choose one from the list.")?,
            }
        }
    }

    fn read_required(&mut self, prompt: &str) -> Result<String> {
        loop {
            let input = self.source.read_line(prompt, &mut *self.out)?;
            if input.is_empty() {
                writeln!(self.out, "Error: this field must not be empty.")?;
            } else {
                return Ok(input);
            }
        }
    }

    fn read_optional(&mut self, prompt: &str, max_len: Option<usize>) -> Result<Option<String>> {
        loop {
            let input = self.source.read_line(prompt, &mut *self.out)?;
            if input.is_empty() {
                return Ok(None);
            }
            match max_len {
                Some(max) if input.chars().count() > max => {
                    writeln!(self.out, "Error: at most {} characters allowed.", max)?;
                }
                _ => return Ok(Some(input)),
            }
        }
    }

    fn read_number<T: Numeric>(&mut self, prompt: &str, min: Option<T>, max: Option<T>) -> Result<T> {
        loop {
            let input = self.read_required(prompt)?.replace(',', ".");
            let value = match input.parse::<T>() {
                Ok(value) if value.is_usable() => value,
                _ => {
                    writeln!(self.out, "Error: invalid input, enter {}.", T::KIND)?;
                    continue;
                }
            };

            match (min, max) {
                (Some(min), _) if value < min => {
                    writeln!(self.out, "Error: value must be at least {}.", min)?;
                }
                (_, Some(max)) if value > max => {
                    writeln!(self.out, "Error: value must be at most {}.", max)?;
                }
                _ => return Ok(value),
            }
        }
    }
}
