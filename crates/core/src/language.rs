//! Languages the sandbox can edit and evaluate.

use serde::{Deserialize, Serialize};

/// Editor language. Order of `ALL` is the selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Json,
    #[default]
    JavaScript,
    TypeScript,
    Html,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Json,
        Language::JavaScript,
        Language::TypeScript,
        Language::Html,
    ];

    /// Identifier used in config files and the header selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Html => "html",
        }
    }

    /// Next language in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Whether the language runs in the script interpreter.
    pub fn is_script(self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Language::Json),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "html" => Ok(Language::Html),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}
