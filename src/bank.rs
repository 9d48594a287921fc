use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Embed)]
#[folder = "assets/banks/"]
struct BankAssets;

pub const DEFAULT_TITLE: &str = "未命名题目";

/// One recitation question. Only `content` feeds the engine; title and hint
/// are shown alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub hint: String,
    pub content: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub passages: Vec<Passage>,
}

impl Bank {
    /// Resolve a bank by name: user bank directory, then a file path, then the
    /// banks bundled with the binary.
    pub fn load(name: &str) -> Result<Self> {
        if let Some(path) = user_bank_path(name)
            && path.is_file()
        {
            return Self::from_file(&path);
        }

        let path = Path::new(name);
        if path.is_file() {
            return Self::from_file(path);
        }

        if let Some(file) = BankAssets::get(&format!("{name}.json")) {
            let content = std::str::from_utf8(file.data.as_ref())
                .with_context(|| format!("bundled bank `{name}` is not UTF-8"))?;
            return Self::from_json(name, content);
        }

        bail!("Unknown passage bank: {name}")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_json(&name, &content)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let mut passages: Vec<Passage> =
            serde_json::from_str(json).with_context(|| format!("parsing bank `{name}`"))?;
        for p in &mut passages {
            p.title = p.title.trim().to_string();
            p.hint = p.hint.trim().to_string();
            p.content = p.content.trim().to_string();
        }
        info!(bank = name, passages = passages.len(), "passage bank loaded");
        Ok(Self {
            name: name.to_string(),
            passages,
        })
    }

    pub fn bundled() -> Vec<String> {
        let mut names: Vec<String> = BankAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

fn user_bank_path(name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| {
        d.join("recitalist")
            .join("banks")
            .join(format!("{name}.json"))
    })
}
