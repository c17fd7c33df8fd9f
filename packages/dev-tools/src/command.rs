//! REPL command parsing
//!
//! One command per line, whitespace separated:
//!
//! ```text
//! add <type> [parent-id|-] [class=<name>] [content...]
//! update <id> <field>=<value>...     (fields: type, content, class, attr.<key>)
//! remove <id>
//! select <id>|none
//! clear | list | tree | json | form | help | quit
//! show <id>
//! ```
//!
//! Free text is taken verbatim from the line: `add` content runs to the end of
//! the line, and in `update` a field's value runs up to the next `field=`
//! token, so `content=hello  world` keeps both spaces. An empty value clears an
//! optional field. Trailing whitespace is not part of a value.

use thiserror::Error;

/// Placeholder for "no parent" in `add`
pub const NO_PARENT: &str = "-";

/// Prefix of the optional class token in `add`
pub const CLASS_PREFIX: &str = "class=";

/// Command parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Missing argument <{arg}> for '{command}'")]
    MissingArgument { command: String, arg: String },

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field '{0}' cannot be empty")]
    EmptyValue(String),
}

/// A single field edit requested by `update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    NodeType(String),
    Content(Option<String>),
    ClassName(Option<String>),
    Attribute { key: String, value: Option<String> },
}

/// Parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        node_type: String,
        parent_id: Option<String>,
        class_name: Option<String>,
        content: Option<String>,
    },
    Update {
        id: String,
        edits: Vec<FieldEdit>,
    },
    Remove {
        id: String,
    },
    Select {
        id: Option<String>,
    },
    Show {
        id: String,
    },
    Clear,
    List,
    Tree,
    Json,
    Form,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens = tokenize(line);
        let (_, name) = *tokens.first().ok_or(CommandError::Empty)?;
        let spans = &tokens[1..];
        let rest: Vec<&str> = spans.iter().map(|(_, token)| *token).collect();

        let command = match name {
            "add" => parse_add(line, spans)?,
            "update" => {
                let id = required(name, "id", rest.first())?;
                let edits = parse_edits(line, &spans[1..])?;
                if edits.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: name.to_string(),
                        arg: "field=value".to_string(),
                    });
                }
                Command::Update { id, edits }
            }
            "remove" | "rm" => Command::Remove {
                id: single(name, "id", &rest)?,
            },
            "select" => {
                let id = single(name, "id", &rest)?;
                Command::Select {
                    id: (id != "none").then_some(id),
                }
            }
            "show" => Command::Show {
                id: single(name, "id", &rest)?,
            },
            "clear" => no_args(Command::Clear, &rest)?,
            "list" | "ls" => no_args(Command::List, &rest)?,
            "tree" => no_args(Command::Tree, &rest)?,
            "json" => no_args(Command::Json, &rest)?,
            "form" => no_args(Command::Form, &rest)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

/// A token and its byte offset in the input line
type Span<'a> = (usize, &'a str);

fn tokenize(line: &str) -> Vec<Span<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &line[s..]));
    }
    tokens
}

fn parse_add(line: &str, spans: &[Span<'_>]) -> Result<Command, CommandError> {
    let mut spans = spans.iter().copied().peekable();
    let (_, node_type) = spans.next().ok_or_else(|| CommandError::MissingArgument {
        command: "add".to_string(),
        arg: "type".to_string(),
    })?;

    let parent_id = match spans.peek() {
        Some((_, token)) if !token.starts_with(CLASS_PREFIX) => {
            let token = *token;
            spans.next();
            (token != NO_PARENT).then(|| token.to_string())
        }
        _ => None,
    };

    let class_name = match spans.peek() {
        Some((_, token)) if token.starts_with(CLASS_PREFIX) => {
            let value = &token[CLASS_PREFIX.len()..];
            let class_name = (!value.is_empty()).then(|| value.to_string());
            spans.next();
            class_name
        }
        _ => None,
    };

    let content = spans
        .next()
        .map(|(offset, _)| line[offset..].trim_end().to_string());

    Ok(Command::Add {
        node_type: node_type.to_string(),
        parent_id,
        class_name,
        content,
    })
}

fn required(command: &str, arg: &str, token: Option<&&str>) -> Result<String, CommandError> {
    token
        .map(|t| t.to_string())
        .ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
}

fn single(command: &str, arg: &str, rest: &[&str]) -> Result<String, CommandError> {
    let value = required(command, arg, rest.first())?;
    match rest.get(1) {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
        None => Ok(value),
    }
}

fn no_args(command: Command, rest: &[&str]) -> Result<Command, CommandError> {
    match rest.first() {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
        None => Ok(command),
    }
}

fn parse_edits(line: &str, spans: &[Span<'_>]) -> Result<Vec<FieldEdit>, CommandError> {
    // (field, byte offset where its value starts)
    let mut fields: Vec<(&str, usize)> = Vec::new();
    for &(offset, token) in spans {
        match token.split_once('=') {
            Some((field, _)) => fields.push((field, offset + field.len() + 1)),
            None if fields.is_empty() => {
                return Err(CommandError::UnexpectedArgument(token.to_string()))
            }
            // bare token: part of the previous field's value
            None => {}
        }
    }

    let ends = fields
        .iter()
        .skip(1)
        .map(|(field, value_start)| value_start - field.len() - 1)
        .chain(std::iter::once(line.len()));

    fields
        .iter()
        .zip(ends)
        .map(|(&(field, value_start), end)| {
            let value = line[value_start..end].trim_end().to_string();
            let optional = (!value.is_empty()).then(|| value.clone());
            match field {
                "type" if value.is_empty() => Err(CommandError::EmptyValue(field.to_string())),
                "type" => Ok(FieldEdit::NodeType(value)),
                "content" => Ok(FieldEdit::Content(optional)),
                "class" => Ok(FieldEdit::ClassName(optional)),
                _ => match field.strip_prefix("attr.") {
                    Some(key) if !key.is_empty() => Ok(FieldEdit::Attribute {
                        key: key.to_string(),
                        value: optional,
                    }),
                    _ => Err(CommandError::UnknownField(field.to_string())),
                },
            }
        })
        .collect()
}
