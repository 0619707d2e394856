use crate::error::ClientError;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const SIDEBAR_KEY: &str = "sidebar-collapsed";
const THEME_KEY: &str = "theme";

/// Colour scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

impl FromStr for Theme {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(ClientError::Validation(format!("Unknown theme '{}'", other))),
        }
    }
}

/// UI preferences. They live in the session store but logout never touches them.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    /// Wrap a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether the admin sidebar is collapsed. Defaults to `false`.
    pub async fn sidebar_collapsed(&self) -> Result<bool, ClientError> {
        Ok(self.store.get(SIDEBAR_KEY).await?.as_deref() == Some("true"))
    }

    /// Persist the sidebar state.
    pub async fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), ClientError> {
        self.store
            .set(SIDEBAR_KEY, if collapsed { "true" } else { "false" })
            .await
    }

    /// The stored theme; unknown values fall back to [`Theme::System`].
    pub async fn theme(&self) -> Result<Theme, ClientError> {
        Ok(self
            .store
            .get(THEME_KEY)
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    /// Persist the theme.
    pub async fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        self.store.set(THEME_KEY, &theme.to_string()).await
    }
}
