//! GEDCOM person records and their NAME facts.
//!
//! # Responsibility
//! - Split a GEDCOM document into individual (`INDI`) records.
//! - Expose each `1 NAME` fact (with its subordinate lines) as a `NameFact`.
//! - Splice a rewritten NAME fact back into the person text.
//!
//! # Invariants
//! - A NAME fact spans its `1 NAME` line plus every following line with
//!   level 2 or deeper.
//! - Stored record text is canonical: no leading whitespace and levels
//!   written as plain digits without leading zeros. Only canonical lines
//!   parse, so the candidate scan's literal `\n2 NICK ` marker sees every
//!   nickname the rule sees.
//! - Splicing touches only the addressed fact; all other lines are kept
//!   byte-for-byte.

use crate::model::name::NameRecord;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;

const NAME_TAG: &str = "NAME";
const NICK_TAG: &str = "NICK";
const INDIVIDUAL_TAG: &str = "INDI";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Stable person identifier: the GEDCOM xref without `@` delimiters.
pub type PersonId = String;

/// GEDCOM parse errors for import paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GedcomError {
    /// A non-empty line does not start with a numeric level.
    MalformedLine { line_number: usize, line: String },
    /// The record header is not `0 @XREF@ INDI`.
    NotAnIndividual(String),
}

impl Display for GedcomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedLine { line_number, line } => {
                write!(f, "malformed GEDCOM line {line_number}: `{line}`")
            }
            Self::NotAnIndividual(header) => {
                write!(f, "record header is not an individual: `{header}`")
            }
        }
    }
}

impl Error for GedcomError {}

/// One individual record with its raw GEDCOM text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub gedcom: String,
}

/// One NAME fact of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFact {
    /// Ordinal among the person's NAME facts; used as the update field id.
    pub index: u32,
    /// `1 NAME ...` line plus its subordinate lines.
    pub gedcom: String,
}

struct GedcomLine<'a> {
    level: Option<u32>,
    tag: &'a str,
    value: &'a str,
}

fn parse_line(line: &str) -> GedcomLine<'_> {
    let line = line.trim_end_matches('\r');
    let (level_text, rest) = line.split_once(' ').unwrap_or((line, ""));
    let (tag, value) = rest.split_once(' ').unwrap_or((rest, ""));
    GedcomLine {
        level: parse_level(level_text),
        tag,
        value,
    }
}

/// `0`, `1`, `2`, ... only; `02`, `+2` and ` 2` are not levels.
fn parse_level(text: &str) -> Option<u32> {
    let canonical = !text.is_empty()
        && text.bytes().all(|byte| byte.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if canonical {
        text.parse().ok()
    } else {
        None
    }
}

fn is_subordinate(line: &str) -> bool {
    matches!(parse_line(line).level, Some(level) if level >= 2)
}

impl NameFact {
    /// Display value of the `1 NAME` line.
    pub fn value(&self) -> &str {
        let first_line = self.gedcom.split('\n').next().unwrap_or("");
        parse_line(first_line).value
    }

    /// Value of the first `2 NICK` line, or `""` when absent.
    pub fn nickname(&self) -> &str {
        self.gedcom
            .split('\n')
            .skip(1)
            .map(parse_line)
            .find(|line| line.level == Some(2) && line.tag == NICK_TAG)
            .map_or("", |line| line.value)
    }

    /// Projects this fact onto the record shape the rule works on.
    pub fn record(&self) -> NameRecord {
        NameRecord::new(self.value(), self.nickname())
    }

    /// Returns the fact text with the NAME value replaced.
    ///
    /// The NAME line keeps its `\r\n` terminator in CRLF records.
    pub fn with_value(&self, new_value: &str) -> String {
        if new_value == self.value() {
            return self.gedcom.clone();
        }
        let (first_line, rest) = match self.gedcom.split_once('\n') {
            Some((first_line, rest)) => (first_line, Some(rest)),
            None => (self.gedcom.as_str(), None),
        };
        let carriage_return = if first_line.ends_with('\r') { "\r" } else { "" };
        match rest {
            Some(rest) => format!("1 {NAME_TAG} {new_value}{carriage_return}\n{rest}"),
            None => format!("1 {NAME_TAG} {new_value}{carriage_return}"),
        }
    }
}

impl PersonRecord {
    pub fn new(id: impl Into<PersonId>, gedcom: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gedcom: gedcom.into(),
        }
    }

    /// Builds a record from INDI text, taking the id from its `0 @XREF@ INDI`
    /// header.
    ///
    /// # Errors
    /// - Returns `NotAnIndividual` when the first line is not an INDI header.
    pub fn from_gedcom(gedcom: impl Into<String>) -> Result<Self, GedcomError> {
        let gedcom = gedcom.into();
        let header = gedcom.split('\n').next().unwrap_or("");
        let id = individual_xref(header)
            .ok_or_else(|| GedcomError::NotAnIndividual(header.trim_end().to_string()))?
            .to_string();
        Ok(Self { id, gedcom })
    }

    /// Returns every NAME fact in document order.
    pub fn name_facts(&self) -> Vec<NameFact> {
        let lines: Vec<&str> = self.gedcom.split('\n').collect();
        name_fact_spans(&lines)
            .into_iter()
            .enumerate()
            .map(|(index, span)| NameFact {
                index: index as u32,
                gedcom: lines[span].join("\n"),
            })
            .collect()
    }

    /// Returns one NAME fact by ordinal.
    pub fn name_fact(&self, index: u32) -> Option<NameFact> {
        self.name_facts().into_iter().nth(index as usize)
    }

    /// Returns a copy of this record with one NAME fact replaced.
    ///
    /// Returns `None` when `index` does not address an existing fact.
    pub fn with_name_fact(&self, index: u32, new_gedcom: &str) -> Option<PersonRecord> {
        let lines: Vec<&str> = self.gedcom.split('\n').collect();
        let span = name_fact_spans(&lines).into_iter().nth(index as usize)?;

        let mut spliced: Vec<&str> = Vec::with_capacity(lines.len());
        spliced.extend_from_slice(&lines[..span.start]);
        spliced.push(new_gedcom);
        spliced.extend_from_slice(&lines[span.end..]);

        Some(PersonRecord {
            id: self.id.clone(),
            gedcom: spliced.join("\n"),
        })
    }
}

fn name_fact_spans(lines: &[&str]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = parse_line(lines[index]);
        if line.level == Some(1) && line.tag == NAME_TAG {
            let start = index;
            index += 1;
            while index < lines.len() && is_subordinate(lines[index]) {
                index += 1;
            }
            spans.push(start..index);
        } else {
            index += 1;
        }
    }
    spans
}

fn individual_xref(header: &str) -> Option<&str> {
    let line = parse_line(header);
    if line.level != Some(0) || line.value.trim_end() != INDIVIDUAL_TAG {
        return None;
    }
    let xref = line.tag.strip_prefix('@')?.strip_suffix('@')?;
    if xref.is_empty() {
        None
    } else {
        Some(xref)
    }
}

/// Splits a GEDCOM document into its individual records.
///
/// Non-INDI level-0 records (header, families, sources, trailer) are skipped.
/// Leading whitespace is ignored, as GEDCOM 5.5.1 readers must, and dropped
/// from the stored record text.
///
/// # Errors
/// - Returns `MalformedLine` for a non-empty line without a canonical level
///   (`02` and `+2` are rejected).
pub fn split_individuals(document: &str) -> Result<Vec<PersonRecord>, GedcomError> {
    let document = document.trim_start_matches(BYTE_ORDER_MARK);
    let mut groups: Vec<Vec<&str>> = Vec::new();

    for (offset, raw_line) in document.lines().enumerate() {
        let line = raw_line.trim_start();
        if line.trim_end().is_empty() {
            continue;
        }
        match parse_line(line).level {
            Some(0) => groups.push(vec![line]),
            Some(_) => {
                if let Some(group) = groups.last_mut() {
                    group.push(line);
                }
            }
            None => {
                return Err(GedcomError::MalformedLine {
                    line_number: offset + 1,
                    line: raw_line.to_string(),
                });
            }
        }
    }

    Ok(groups
        .into_iter()
        .filter_map(|group| {
            let xref = individual_xref(group[0])?.to_string();
            Some(PersonRecord::new(xref, group.join("\n")))
        })
        .collect())
}
