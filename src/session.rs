//! Line-oriented command session driving a `Spellchecker`.
//!
//! Protocol, one command per line:
//! - `<word>`: query; replies with the canonical word or `not found`, and
//!   remembers `<word>` as the pending subject.
//! - `+`: register the pending subject; replies `ok` or `fail`.
//! - `-`: unregister the pending subject; replies `ok` or `fail`.
//! - `*`: end the session (end of input does the same).
//!
//! Words outside the keyboard alphabet reply `invalid` and never reach the
//! spellchecker.

use crate::spellchecker::{SpellError, Spellchecker};
use crate::variants;
use core::fmt;
use core::hash::BuildHasher;
use std::io::{self, BufRead, Write};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Query(String),
    Register,
    Unregister,
    Terminate,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "" => None,
            "+" => Some(Command::Register),
            "-" => Some(Command::Unregister),
            "*" => Some(Command::Terminate),
            word => Some(Command::Query(word.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    Found(String),
    NotFound,
    Ok,
    Fail,
    Invalid,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Found(canonical) => f.write_str(canonical),
            Reply::NotFound => f.write_str("not found"),
            Reply::Ok => f.write_str("ok"),
            Reply::Fail => f.write_str("fail"),
            Reply::Invalid => f.write_str("invalid"),
        }
    }
}

/// Counters reported when a session ends.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub commands: usize,
    /// Table entries released at teardown.
    pub released: usize,
}

pub struct Session<S> {
    checker: Spellchecker<S>,
    pending: Option<String>,
}

impl<S> Session<S>
where
    S: BuildHasher,
{
    pub fn new(checker: Spellchecker<S>) -> Self {
        Self {
            checker,
            pending: None,
        }
    }

    pub fn checker(&self) -> &Spellchecker<S> {
        &self.checker
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Execute one command. `Terminate` yields `None`; the caller should
    /// then call [`Session::finish`].
    pub fn execute(&mut self, cmd: Command) -> Option<Reply> {
        let reply = match cmd {
            Command::Terminate => return None,
            Command::Query(word) => {
                if let Err(e) = variants::validate(&word) {
                    tracing::debug!(%word, error = %e, "rejected query");
                    return Some(Reply::Invalid);
                }
                let reply = match self.checker.lookup(&word) {
                    Some(canonical) => Reply::Found(canonical.to_owned()),
                    None => Reply::NotFound,
                };
                self.pending = Some(word);
                reply
            }
            Command::Register => match self.pending.as_deref() {
                None => Reply::Fail,
                Some(word) => to_reply(self.checker.register(word).map(drop)),
            },
            Command::Unregister => match self.pending.as_deref() {
                None => Reply::Fail,
                Some(word) => to_reply(self.checker.unregister(word).map(drop)),
            },
        };
        Some(reply)
    }

    /// Read commands from `input` until `*` or end of input, writing one
    /// reply line per command to `output`, then tear the table down.
    pub fn run<R, W>(mut self, input: R, mut output: W) -> io::Result<Summary>
    where
        R: BufRead,
        W: Write,
    {
        let mut commands = 0;
        for line in input.lines() {
            let Some(cmd) = Command::parse(&line?) else {
                continue;
            };
            commands += 1;
            match self.execute(cmd) {
                Some(reply) => writeln!(output, "{reply}")?,
                None => break,
            }
        }
        output.flush()?;
        Ok(Summary {
            commands,
            released: self.finish(),
        })
    }

    /// End the session and destroy the table. Returns the number of
    /// entries released.
    pub fn finish(self) -> usize {
        self.checker.destroy()
    }
}

fn to_reply(res: Result<(), SpellError>) -> Reply {
    match res {
        Ok(()) => Reply::Ok,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            Reply::Fail
        }
    }
}
