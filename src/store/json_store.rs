use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::store::schema::{BankData, CompletionData, CompletionFile};

const COMPLETIONS_FILE: &str = "completions.json";
const BANK_FILE: &str = "bank.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recitalist");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = name, error = %e, "unreadable store file, starting fresh");
                T::default()
            }),
            Err(e) => {
                warn!(file = name, error = %e, "failed to read store file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn load_completion_file(&self) -> CompletionFile {
        let file: CompletionFile = self.load(COMPLETIONS_FILE);
        if file.needs_reset() {
            warn!(
                found = file.schema_version,
                "completion file has an old schema, starting fresh"
            );
            return CompletionFile::default();
        }
        file
    }

    /// Completion counts for `bank`, grown to at least `len` passages.
    pub fn load_completions(&self, bank: &str, len: usize) -> CompletionData {
        self.load_completion_file().take_bank(bank, len)
    }

    /// Write the counts for `data.bank`, leaving other banks untouched.
    pub fn save_completions(&self, data: &CompletionData) -> Result<()> {
        let mut file = self.load_completion_file();
        file.put_bank(data);
        self.save(COMPLETIONS_FILE, &file)
    }

    /// The last active bank, if one was saved.
    pub fn load_bank(&self) -> Option<BankData> {
        let data: BankData = self.load(BANK_FILE);
        (!data.needs_reset() && !data.name.is_empty()).then_some(data)
    }

    pub fn save_bank(&self, data: &BankData) -> Result<()> {
        self.save(BANK_FILE, data)
    }
}
