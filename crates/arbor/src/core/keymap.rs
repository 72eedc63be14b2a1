use std::collections::HashMap;

use crate::{
    error::Result,
    event::key::{Key, KeyCode},
    message::{AppCommand, HubCommand, Message},
};

/// Bindings from keys to messages. Consulted when no widget on the key
/// listener chain handles a key press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    /// Bound keys.
    bindings: HashMap<Key, Message>,
}

impl KeyMap {
    /// An empty key map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock bindings: `esc` exits to the hub center, `q` quits, `r`
    /// restarts and `p` toggles pause.
    pub fn standard() -> Self {
        let mut map = Self::new();
        map.bind(KeyCode::Esc, HubCommand::Exit);
        map.bind('q', AppCommand::Quit);
        map.bind('r', AppCommand::Restart);
        map.bind('p', AppCommand::TogglePause);
        map
    }

    /// Parse bindings from their text forms, e.g. `("ctrl+q", "quit")`.
    pub fn from_bindings<'a>(bindings: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut map = Self::new();
        for (key, message) in bindings {
            map.bind(key.parse::<Key>()?, message.parse::<Message>()?);
        }
        Ok(map)
    }

    /// Bind a key, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<Key>, message: impl Into<Message>) {
        self.bindings.insert(key.into(), message.into());
    }

    /// Remove a binding.
    pub fn unbind(&mut self, key: impl Into<Key>) -> Option<Message> {
        self.bindings.remove(&key.into())
    }

    /// The message bound to a key.
    pub fn get(&self, key: &Key) -> Option<&Message> {
        self.bindings.get(key)
    }

    /// All bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Message)> {
        self.bindings.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Are there no bindings?
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings as text pairs, sorted by key.
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .map(|(k, m)| (k.to_string(), m.to_string()))
            .collect();
        out.sort();
        out
    }
}
