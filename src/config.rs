use crate::calendar::NameStyle;
use crate::cmds::Cmd;
use crate::error::{Error, ErrorKind, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use termion::event::Key;

pub type KeyMap = HashMap<Key, Cmd>;

const CONFIG_PATH_ENV_VAR: &str = "ETHCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Result<Vec<PathBuf>> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::new(
            ErrorKind::IOError(std::io::ErrorKind::NotFound.into()),
            "Unable to find home directory",
        )
    })?;

    let home_config = home.join(".ethcal.toml");

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(dir).join("ethcal").join("config.toml")
    } else {
        home.join(".config").join("ethcal").join("config.toml")
    };

    let mut locations = vec![config_xdg, home_config];

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.insert(0, PathBuf::from(path));
    }

    Ok(locations)
}

/// Loads the config at `path` if given, otherwise the first existing file
/// among the default locations. Falls back to defaults if none exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading config from '{}'", path.display());
        return Config::from_file(path);
    }

    for candidate in find_configfile_locations()? {
        if candidate.is_file() {
            log::info!("Loading config from '{}'", candidate.display());
            return Config::from_file(&candidate);
        }
        log::debug!("No config at '{}'", candidate.display());
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub today_char: Option<char>,
    pub future_char: Option<char>,
    pub focus_char: Option<char>,
    pub color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_char: Some('*'),
            future_char: None,
            focus_char: Some('>'),
            color: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub month_names: NameStyle,
    pub weekday_names: NameStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "tick_rate")]
    tick_rate_ms: u64,
    pub theme: Theme,
    pub display: DisplayConfig,
    #[serde(skip, default = "default_key_map")]
    pub key_map: KeyMap,
}

fn default_key_map() -> KeyMap {
    let mut key_map = HashMap::new();

    key_map.insert(Key::Char('l'), Cmd::NextMonth);
    key_map.insert(Key::Char('n'), Cmd::NextMonth);
    key_map.insert(Key::Right, Cmd::NextMonth);
    key_map.insert(Key::Char('h'), Cmd::PrevMonth);
    key_map.insert(Key::Char('p'), Cmd::PrevMonth);
    key_map.insert(Key::Left, Cmd::PrevMonth);
    key_map.insert(Key::Char('L'), Cmd::NextYear);
    key_map.insert(Key::Char('N'), Cmd::NextYear);
    key_map.insert(Key::Char('H'), Cmd::PrevYear);
    key_map.insert(Key::Char('P'), Cmd::PrevYear);
    key_map.insert(Key::Char('j'), Cmd::NextDay);
    key_map.insert(Key::Down, Cmd::NextDay);
    key_map.insert(Key::Char('k'), Cmd::PrevDay);
    key_map.insert(Key::Up, Cmd::PrevDay);
    key_map.insert(Key::Char('\n'), Cmd::Select);
    key_map.insert(Key::Char('t'), Cmd::Today);
    key_map.insert(Key::Char('q'), Cmd::Exit);
    key_map.insert(Key::Esc, Cmd::Exit);
    key_map.insert(Key::Ctrl('c'), Cmd::Exit);

    key_map
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 500,
            theme: Theme::default(),
            display: DisplayConfig::default(),
            key_map: default_key_map(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::from(err).with_msg(&format!("could not read '{}'", path.display()))
        })?;

        content.parse::<Config>().map_err(|err| {
            let msg = match &err.message {
                Some(detail) => format!("{} (in '{}')", detail, path.display()),
                None => format!("in '{}'", path.display()),
            };
            err.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn cmd_for(&self, key: &Key) -> Cmd {
        self.key_map.get(key).copied().unwrap_or(Cmd::Noop)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        if config.tick_rate_ms == 0 {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "tick_rate must be greater than zero",
            ));
        }
        Ok(config)
    }
}
