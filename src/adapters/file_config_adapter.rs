//! INI file configuration adapter.

use crate::domain::error::TraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| TraderError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TraderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    fn describe<T>(
        &self,
        section: &str,
        key: &str,
        parsed: Result<Option<T>, String>,
    ) -> Option<Result<T, String>> {
        parsed
            .map_err(|reason| {
                let raw = self.config.get(section, key).unwrap_or_default();
                format!("{raw:?} is not valid: {reason}")
            })
            .transpose()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Option<Result<i64, String>> {
        self.describe(section, key, self.config.getint(section, key))
    }

    fn get_double(&self, section: &str, key: &str) -> Option<Result<f64, String>> {
        self.describe(section, key, self.config.getfloat(section, key))
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>> {
        let raw = self.config.get(section, key)?;
        Some(Self::parse_bool(&raw).ok_or_else(|| format!("{raw:?} is not a boolean")))
    }
}
