//! Interactive form on a line-oriented terminal.

use crate::config::{parse_age, parse_height, parse_weight};
use crate::profile::{
    ActivityLevel, DietaryRestriction, Region, UserProfile, DEFAULT_AGE, DEFAULT_HEIGHT_CM, DEFAULT_WEIGHT_KG,
};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one trimmed line. End of input is an error.
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Re-prompts until `parse` accepts the answer; empty input takes `default`.
    fn ask<T, F>(&mut self, prompt: &str, default: T, parse: F) -> io::Result<T>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            let answer = self.read_line(prompt)?;
            if answer.is_empty() {
                return Ok(default);
            }
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "Invalid input: {e}. Please try again.")?,
            }
        }
    }

    fn ask_choice<T>(&mut self, label: &str, options: &[T]) -> io::Result<T>
    where
        T: Copy + Display + FromStr<Err = String>,
    {
        let names: Vec<String> = options.iter().map(ToString::to_string).collect();
        let prompt = format!("{label} ({}, default {}): ", names.join("/"), options[0]);
        self.ask(&prompt, options[0], |s| s.parse())
    }

    /// Collects the six form fields.
    pub fn read_profile(&mut self) -> io::Result<UserProfile> {
        let age = self.ask(&format!("Age (years, default {DEFAULT_AGE}): "), DEFAULT_AGE, parse_age)?;
        let height_cm = self.ask(
            &format!("Height (cm, default {DEFAULT_HEIGHT_CM}): "),
            DEFAULT_HEIGHT_CM,
            parse_height,
        )?;
        let weight_kg = self.ask(
            &format!("Weight (kg, default {DEFAULT_WEIGHT_KG}): "),
            DEFAULT_WEIGHT_KG,
            parse_weight,
        )?;
        let activity_level = self.ask_choice("Activity Level", &ActivityLevel::ALL)?;
        let region = self.ask_choice("Region", &Region::ALL)?;
        let dietary_restriction = self.ask_choice("Dietary Restriction", &DietaryRestriction::ALL)?;

        Ok(UserProfile {
            age,
            height_cm,
            weight_kg,
            activity_level,
            region,
            dietary_restriction,
        })
    }

    /// Yes only for answers starting with `y`.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        match self.read_line(prompt) {
            Ok(answer) => Ok(answer.to_lowercase().starts_with('y')),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }
}
