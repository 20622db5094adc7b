// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Quad model
//!
//! A quad is a `(subject, predicate, object, label)` fact. The label is an
//! optional provenance/context value. A [`Direction`] names one of the four
//! slots and is what link-following iterators anchor on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four slots of a quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Subject,
    Predicate,
    Object,
    Label,
}

impl Direction {
    /// All directions in slot order
    pub const ALL: [Direction; 4] = [
        Direction::Subject,
        Direction::Predicate,
        Direction::Object,
        Direction::Label,
    ];

    /// Swap subject and object; predicate and label are their own reverse
    pub fn reverse(self) -> Self {
        match self {
            Direction::Subject => Direction::Object,
            Direction::Object => Direction::Subject,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Subject => "subject",
            Direction::Predicate => "predicate",
            Direction::Object => "object",
            Direction::Label => "label",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subject" | "s" => Ok(Direction::Subject),
            "predicate" | "p" => Ok(Direction::Predicate),
            "object" | "o" => Ok(Direction::Object),
            "label" | "c" => Ok(Direction::Label),
            _ => Err(format!(
                "Unknown direction: {}. Valid options: subject, predicate, object, label",
                s
            )),
        }
    }
}

/// A single fact in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Quad {
    /// Create an unlabelled quad
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            label: None,
        }
    }

    /// Attach a label (context) to this quad
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Value held in the given slot; `None` only for a missing label
    pub fn get(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Subject => Some(&self.subject),
            Direction::Predicate => Some(&self.predicate),
            Direction::Object => Some(&self.object),
            Direction::Label => self.label.as_deref(),
        }
    }

    /// Parse one line of the whitespace separated quad format:
    /// `subject predicate object [label] .`
    ///
    /// Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Quad>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let mut fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.last() == Some(&".") {
            fields.pop();
        }

        match fields.as_slice() {
            [s, p, o] => Ok(Some(Quad::new(*s, *p, *o))),
            [s, p, o, c] => Ok(Some(Quad::new(*s, *p, *o).with_label(*c))),
            _ => Err(format!(
                "Expected 3 or 4 fields, found {}: {}",
                fields.len(),
                trimmed
            )),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(
                f,
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, label
            ),
            None => write!(f, "{} {} {} .", self.subject, self.predicate, self.object),
        }
    }
}
