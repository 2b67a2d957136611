use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sauce_api::client::ClientSettings;
use sauce_api::creds::Creds;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "configFile.cfg";

const USERNAME_KEY: &str = "UserName";
const PASSWORD_KEY: &str = "password";
const LESSON_KEY: &str = "lessonNumber";
const DOWNLOAD_PATH_KEY: &str = "downloadPath";
const REQUEST_DELAY_KEY: &str = "requestDelayMs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file `{}` does not exist", .0.display())]
    NotFound(PathBuf),

    #[error(
        "could not read config file `{}`, expected `KEY=value` lines without INI sections",
        path.display()
    )]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("config has no `{0}` entry")]
    MissingKey(&'static str),

    #[error("config entry `{key}` has invalid value \"{value}\"")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings read from a `KEY=value` file:
///
/// ```text
/// UserName=jdoe
/// password=hunter2
/// lessonNumber=3
/// downloadPath=/home/jdoe/sauce
/// # optional, milliseconds between requests
/// requestDelayMs=1000
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    creds: Creds,
    lesson: String,
    download_path: PathBuf,
    request_delay: Duration,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let read_error = |source: dotenvy::Error| ConfigError::Read {
            path: path.to_owned(),
            source,
        };

        let entries = dotenvy::from_path_iter(path).map_err(|err| match err {
            dotenvy::Error::Io(io) if io.kind() == ErrorKind::NotFound => {
                ConfigError::NotFound(path.to_owned())
            }
            other => read_error(other),
        })?;
        let entries = entries
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(read_error)?;

        Self::from_entries(entries)
    }

    fn from_entries(mut entries: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut required =
            |key: &'static str| entries.remove(key).ok_or(ConfigError::MissingKey(key));

        let username = required(USERNAME_KEY)?;
        let password = required(PASSWORD_KEY)?;
        let lesson_number = required(LESSON_KEY)?;
        let download_path = required(DOWNLOAD_PATH_KEY)?;

        let lesson_number: u32 = lesson_number
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: LESSON_KEY,
                value: lesson_number.clone(),
            })?;

        let request_delay = match entries.remove(REQUEST_DELAY_KEY) {
            Some(millis) => millis
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue {
                    key: REQUEST_DELAY_KEY,
                    value: millis.clone(),
                })?,
            None => ClientSettings::default().request_delay,
        };

        Ok(Self {
            creds: Creds::new(username, password),
            lesson: format!("Lesson {lesson_number}"),
            download_path: PathBuf::from(download_path),
            request_delay,
        })
    }

    pub fn creds(&self) -> &Creds {
        &self.creds
    }

    /// The lesson label as the portal shows it, e.g. `Lesson 3`.
    pub fn lesson(&self) -> &str {
        &self.lesson
    }

    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            request_delay: self.request_delay,
            ..ClientSettings::default()
        }
    }
}
