//! A menu-driven text shell over an [`AvlTree`].
//!
//! Input is consumed as whitespace-separated tokens, so a whole session can be given on one line
//! (`i 10 i 20 1 q`) as well as answered prompt by prompt.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use thiserror::Error;

use crate::{render, AvlTree, Insertion, LookupError, Order, Value};

/// Errors that end a shell session.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading commands or writing results failed.
    #[error("shell I/O failed: {0}")]
    Io(#[from] io::Error),
}

const MENU: &str = "\
Select an option:
s - Search
i - Insert
d - Delete
1 - Print in-order
2 - Print pre-order
3 - Print post-order
t - Print tree
q - Quit
";

const EMPTY_TREE: &str = "The tree is empty!";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Search,
    Insert,
    Delete,
    Print(Order),
    Levels,
    Quit,
}

impl Command {
    fn parse(token: &str) -> Option<Command> {
        let command = match token {
            "s" => Command::Search,
            "i" => Command::Insert,
            "d" => Command::Delete,
            "1" => Command::Print(Order::In),
            "2" => Command::Print(Order::Pre),
            "3" => Command::Print(Order::Post),
            "t" => Command::Levels,
            "q" => Command::Quit,
            _ => return None,
        };

        Some(command)
    }
}

enum Input {
    Value(Value),
    Invalid(String),
    End,
}

struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// An interactive session: reads menu choices and values from `R`, prints results to `W`.
pub struct Shell<R, W> {
    tree: AvlTree,
    input: Tokens<R>,
    output: W,
    show_menu: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell operating on `tree`.
    pub fn new(tree: AvlTree, input: R, output: W) -> Self {
        Shell {
            tree,
            input: Tokens {
                reader: input,
                pending: VecDeque::new(),
            },
            output,
            show_menu: true,
        }
    }

    /// Hides the menu listing printed before each command.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_menu = !quiet;
        self
    }

    pub fn tree(&self) -> &AvlTree {
        &self.tree
    }

    pub fn into_tree(self) -> AvlTree {
        self.tree
    }

    /// Runs commands until `q` or the end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            if self.show_menu {
                self.output.write_all(MENU.as_bytes())?;
                self.output.flush()?;
            }

            let Some(token) = self.input.next_token()? else {
                break;
            };

            let proceed = match Command::parse(&token) {
                Some(Command::Quit) => false,
                Some(command) => {
                    tracing::debug!(?command, "executing");
                    self.execute(command)?
                }
                None => {
                    tracing::debug!(token = %token, "unknown option");
                    writeln!(self.output, "Invalid option!")?;
                    true
                }
            };

            writeln!(self.output)?;

            if !proceed {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    // Returns `false` once input is exhausted.
    fn execute(&mut self, command: Command) -> Result<bool, ShellError> {
        match command {
            Command::Search => {
                if self.tree.is_empty() {
                    writeln!(self.output, "{EMPTY_TREE}")?;
                    return Ok(true);
                }

                let value = match self.read_value("Value to search:")? {
                    Input::Value(value) => value,
                    Input::Invalid(token) => return self.invalid_number(&token),
                    Input::End => return Ok(false),
                };

                let search = self.tree.search(value);
                match search.node() {
                    Some(node) => writeln!(self.output, "Node {node} found!")?,
                    None => writeln!(self.output, "Value not found!")?,
                }
                writeln!(self.output, "Path: {}", render(search.path_values()))?;
            }

            Command::Insert => {
                let value = match self.read_value("Enter a numeric value:")? {
                    Input::Value(value) => value,
                    Input::Invalid(token) => return self.invalid_number(&token),
                    Input::End => return Ok(false),
                };

                match self.tree.insert(value) {
                    Insertion::Inserted => writeln!(self.output, "Value inserted!")?,
                    Insertion::Duplicate => {
                        writeln!(self.output, "Value already exists in the tree!")?
                    }
                }
            }

            Command::Delete => {
                if self.tree.is_empty() {
                    writeln!(self.output, "{EMPTY_TREE}")?;
                    return Ok(true);
                }

                let value = match self.read_value("Enter a numeric value:")? {
                    Input::Value(value) => value,
                    Input::Invalid(token) => return self.invalid_number(&token),
                    Input::End => return Ok(false),
                };

                match self.tree.remove(value) {
                    Ok(removed) => writeln!(self.output, "Node {removed} removed!")?,
                    Err(LookupError::NotFound(_)) => {
                        writeln!(self.output, "Value does not exist in the tree!")?
                    }
                    Err(LookupError::EmptyTree) => writeln!(self.output, "{EMPTY_TREE}")?,
                }
            }

            Command::Print(order) => {
                if self.tree.is_empty() {
                    writeln!(self.output, "{EMPTY_TREE}")?;
                } else {
                    writeln!(self.output, "{}", self.tree.render(order))?;
                }
            }

            Command::Levels => {
                if self.tree.is_empty() {
                    writeln!(self.output, "{EMPTY_TREE}")?;
                } else {
                    self.output.write_all(self.tree.render_levels().as_bytes())?;
                }
            }

            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn read_value(&mut self, prompt: &str) -> Result<Input, ShellError> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let input = match self.input.next_token()? {
            Some(token) => match token.parse::<Value>() {
                Ok(value) => Input::Value(value),
                Err(_) => Input::Invalid(token),
            },
            None => Input::End,
        };

        Ok(input)
    }

    fn invalid_number(&mut self, token: &str) -> Result<bool, ShellError> {
        tracing::debug!(token, "rejected non-numeric value");
        writeln!(self.output, "Invalid number: {token}")?;
        Ok(true)
    }
}
