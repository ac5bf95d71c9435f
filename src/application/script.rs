//! Line-oriented command script
//!
//! ```text
//! # comment
//! add <name> <value> [<parent>]
//! delete <name>
//! traverse <pre|in|post>
//! show
//! json
//! ```
//!
//! Tokens are bare words or double-quoted strings. Quoted strings may be empty,
//! contain whitespace, and escape `"` and `\` with a backslash.

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0, none_of, one_of};
use nom::combinator::{all_consuming, map};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, terminated};
use nom::IResult;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::TraversalKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Add {
        parent: String,
        name: String,
        value: String,
    },
    Delete {
        name: String,
    },
    Traverse(TraversalKind),
    Show,
    Json,
}

fn quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            many0(alt((preceded(char('\\'), one_of("\\\"")), none_of("\\\"")))),
            char('"'),
        ),
        |chars: Vec<char>| chars.into_iter().collect(),
    )(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && c != '"'),
        String::from,
    )(input)
}

fn tokens(input: &str) -> IResult<&str, Vec<String>> {
    all_consuming(terminated(
        many0(preceded(multispace0, alt((quoted, bare)))),
        multispace0,
    ))(input)
}

/// Splits a line into tokens; `None` for blank and comment lines.
fn tokenize(line: &str) -> Result<Option<Vec<String>>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    tokens(trimmed)
        .map(|(_, tokens)| Some(tokens))
        .map_err(|_| format!("cannot tokenize {:?} (unterminated quote?)", trimmed))
}

fn build_command(tokens: Vec<String>) -> Result<ScriptCommand, String> {
    let mut tokens = tokens.into_iter();
    let verb = tokens.next().unwrap_or_default();
    let args: Vec<String> = tokens.collect();

    match (verb.as_str(), args.as_slice()) {
        ("add", [name, value]) => Ok(ScriptCommand::Add {
            parent: String::new(),
            name: name.clone(),
            value: value.clone(),
        }),
        ("add", [name, value, parent]) => Ok(ScriptCommand::Add {
            parent: parent.clone(),
            name: name.clone(),
            value: value.clone(),
        }),
        ("add", _) => Err("usage: add <name> <value> [<parent>]".to_string()),
        ("delete", [name]) => Ok(ScriptCommand::Delete { name: name.clone() }),
        ("delete", _) => Err("usage: delete <name>".to_string()),
        ("traverse", [kind]) => kind
            .parse::<TraversalKind>()
            .map(ScriptCommand::Traverse)
            .map_err(|e| e.to_string()),
        ("traverse", _) => Err("usage: traverse <pre|in|post>".to_string()),
        ("show", []) => Ok(ScriptCommand::Show),
        ("json", []) => Ok(ScriptCommand::Json),
        ("show" | "json", _) => Err(format!("{verb} takes no arguments")),
        _ => Err(format!("unknown command: {verb}")),
    }
}

/// Parses one script line. `line_no` is 1-based and only used for errors.
#[instrument(level = "trace")]
pub fn parse_line(line_no: usize, line: &str) -> ApplicationResult<Option<ScriptCommand>> {
    let to_err = |message: String| ApplicationError::Script {
        line: line_no,
        message,
    };
    match tokenize(line).map_err(to_err)? {
        Some(tokens) => build_command(tokens).map(Some).map_err(to_err),
        None => Ok(None),
    }
}

/// Parses a whole script, stopping at the first bad line.
#[instrument(level = "debug", skip(script))]
pub fn parse_script(script: &str) -> ApplicationResult<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        if let Some(command) = parse_line(idx + 1, line)? {
            commands.push(command);
        }
    }
    debug!("Parsed {} commands", commands.len());
    Ok(commands)
}
