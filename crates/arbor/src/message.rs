//! Commands passed up the tree by widgets and key bindings.
//!
//! Messages are closed enums. Their text form (`exit`, `quit`, `restart`,
//! `toggle-pause`, `enter:<node>`) is what key bindings in config files use.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Commands understood by a [`Hub`](crate::widgets::Hub).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HubCommand {
    /// Return to the hub's center node.
    Exit,
    /// Switch to the named node.
    Enter(String),
}

/// Commands for the application driving the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCommand {
    /// Leave the main loop.
    Quit,
    /// Rebuild the scene from scratch.
    Restart,
    /// Pause or resume the running activity.
    TogglePause,
}

/// A message travelling up the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Message {
    /// Navigation.
    Hub(HubCommand),
    /// Application control.
    App(AppCommand),
}

impl Message {
    /// Shorthand for `Message::Hub(HubCommand::Enter(name))`.
    pub fn enter(name: impl Into<String>) -> Self {
        Self::Hub(HubCommand::Enter(name.into()))
    }
}

impl From<HubCommand> for Message {
    fn from(c: HubCommand) -> Self {
        Self::Hub(c)
    }
}

impl From<AppCommand> for Message {
    fn from(c: AppCommand) -> Self {
        Self::App(c)
    }
}

impl FromStr for Message {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ok(match s {
            "exit" => HubCommand::Exit.into(),
            "quit" => AppCommand::Quit.into(),
            "restart" => AppCommand::Restart.into(),
            "toggle-pause" => AppCommand::TogglePause.into(),
            _ => match s.split_once(':') {
                Some(("enter", name)) if !name.trim().is_empty() => Self::enter(name.trim()),
                _ => return Err(Error::Parse(format!("unknown message: {s:?}"))),
            },
        })
    }
}

impl TryFrom<String> for Message {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Message> for String {
    fn from(m: Message) -> Self {
        m.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hub(HubCommand::Exit) => f.write_str("exit"),
            Self::Hub(HubCommand::Enter(name)) => write!(f, "enter:{name}"),
            Self::App(AppCommand::Quit) => f.write_str("quit"),
            Self::App(AppCommand::Restart) => f.write_str("restart"),
            Self::App(AppCommand::TogglePause) => f.write_str("toggle-pause"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() -> Result<()> {
        assert_eq!("exit".parse::<Message>()?, Message::Hub(HubCommand::Exit));
        assert_eq!("quit".parse::<Message>()?, Message::App(AppCommand::Quit));
        assert_eq!(
            "toggle-pause".parse::<Message>()?,
            Message::App(AppCommand::TogglePause)
        );
        assert_eq!("enter:game".parse::<Message>()?, Message::enter("game"));
        assert!("enter:".parse::<Message>().is_err());
        assert!("jump".parse::<Message>().is_err());
        Ok(())
    }

    #[test]
    fn display_round_trip() -> Result<()> {
        for s in ["exit", "quit", "restart", "toggle-pause", "enter:scores"] {
            assert_eq!(s.parse::<Message>()?.to_string(), s);
        }
        Ok(())
    }

    #[test]
    fn serde_uses_text_form() -> Result<()> {
        let json = serde_json::to_string(&Message::enter("game"))
            .map_err(|e| Error::Parse(e.to_string()))?;
        assert_eq!(json, "\"enter:game\"");
        let back: Message =
            serde_json::from_str("\"restart\"").map_err(|e| Error::Parse(e.to_string()))?;
        assert_eq!(back, Message::App(AppCommand::Restart));
        Ok(())
    }
}
