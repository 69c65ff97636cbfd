use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Light,
    Dark,
}

impl Style {
    pub fn toggled(self) -> Self {
        match self {
            Style::Light => Style::Dark,
            Style::Dark => Style::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Style::Dark
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Light => f.write_str("light"),
            Style::Dark => f.write_str("dark"),
        }
    }
}
