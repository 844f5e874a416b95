//! Deck root: configuration loading and data directory management.

use std::path::PathBuf;

use config::{Config, File};

use crate::deck_config::DeckConfig;
use crate::error::{DeckError, DeckResult};
use crate::store::LocalStore;

#[derive(Clone)]
pub struct Deck {
    config: DeckConfig,
}

impl Deck {
    pub fn load() -> DeckResult<Self> {
        let config_path = DeckConfig::config_path()?;

        if !config_path.exists() {
            DeckConfig::create_default_config(&config_path)?;
        }

        let config: DeckConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| DeckError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DeckError::Config(e.to_string()))?;

        Ok(Deck { config })
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DeckConfig {
        &mut self.config
    }

    /// Where dashboard state lives, with `~` expanded.
    pub fn data_path(&self) -> DeckResult<PathBuf> {
        match &self.config.data_dir {
            Some(dir) => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => Ok(dirs::data_dir()
                .ok_or_else(|| DeckError::Config("Could not determine data directory".into()))?
                .join("daydeck")),
        }
    }

    pub fn store(&self) -> DeckResult<LocalStore> {
        LocalStore::open(self.data_path()?)
    }
}
