//! Application configuration, loaded from TOML.
//!
//! Every section is optional; missing values take their defaults.
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//!
//! [log]
//! level = "info"
//!
//! [theme]
//! background = "#20242c"
//!
//! [keys]
//! esc = "exit"
//! g = "enter:game"
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    event::key::Key,
    geom::Expanse,
    keymap::KeyMap,
    message::Message,
    style::{BACKGROUND, Color, StyleMap, solid},
};

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// A `tracing` level or filter directive.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Style overrides installed on the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Root background color.
    pub background: Option<Color>,
    /// Font used for labels.
    pub font: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Display settings.
    pub window: WindowConfig,
    /// Logging settings.
    pub log: LogConfig,
    /// Style overrides.
    pub theme: ThemeConfig,
    /// Key bindings, from key text to message text.
    pub keys: BTreeMap<String, Message>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            log: LogConfig::default(),
            theme: ThemeConfig::default(),
            keys: KeyMap::standard()
                .iter()
                .map(|(k, m)| (k.to_string(), m.clone()))
                .collect(),
        }
    }
}

impl Config {
    /// Parse a configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.keymap()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// The configured display size.
    pub fn window_size(&self) -> Expanse {
        Expanse::new(self.window.width, self.window.height)
    }

    /// The configured key bindings.
    pub fn keymap(&self) -> Result<KeyMap> {
        let mut map = KeyMap::new();
        for (key, message) in &self.keys {
            map.bind(key.parse::<Key>()?, message.clone());
        }
        Ok(map)
    }

    /// Style overrides to merge into the root's style map.
    pub fn style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        if let Some(color) = self.theme.background {
            style.insert(BACKGROUND, solid(color));
        }
        style
    }

    /// The label font, if one is configured.
    pub fn font(&self) -> Option<&str> {
        self.theme.font.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        event::key::KeyCode,
        message::{AppCommand, HubCommand},
    };

    #[test]
    fn defaults() -> Result<()> {
        let config = Config::from_toml_str("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.window_size(), Expanse::new(800, 600));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.keymap()?, KeyMap::standard());
        assert!(config.style().is_empty());
        Ok(())
    }

    #[test]
    fn full_document() -> Result<()> {
        let config = Config::from_toml_str(
            r##"
            [window]
            width = 320
            height = 240

            [log]
            level = "debug"

            [theme]
            background = "#102030"

            [keys]
            esc = "exit"
            g = "enter:game"
            "##,
        )?;
        assert_eq!(config.window_size(), Expanse::new(320, 240));
        assert_eq!(config.theme.background, Some(Color::rgb(0x10, 0x20, 0x30)));
        assert!(config.style().contains(BACKGROUND));
        let keys = config.keymap()?;
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get(&Key::from('g')), Some(&Message::enter("game")));
        assert_eq!(
            keys.get(&KeyCode::Esc.into()),
            Some(&Message::Hub(HubCommand::Exit))
        );
        assert_eq!(keys.get(&Key::from('q')), None);
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let mut config = Config::default();
        config.keys.insert("x".into(), AppCommand::Quit.into());
        let text = config.to_toml_string()?;
        assert_eq!(Config::from_toml_str(&text)?, config);
        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Config::from_toml_str("[keys]\nesc = \"fly\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[keys]\n\"hyper+q\" = \"quit\""),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[window]\ndepth = 3"),
            Err(Error::Config(_))
        ));
        assert!(Config::load(Path::new("/nonexistent/arbor.toml")).is_err());
    }
}
