use crate::error::{Error, Result};
use crate::models::question::Category;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Immutable snapshot of the question pool, keyed by category.
///
/// Built once at startup and shared read-only; a bank is never handed out
/// unless every category used by the selection rules is present and
/// non-empty.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    by_category: HashMap<Category, Vec<String>>,
}

impl QuestionBank {
    pub fn from_map(raw: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut by_category: HashMap<Category, Vec<String>> = HashMap::new();
        for (name, questions) in raw {
            match name.parse::<Category>() {
                Ok(category) => {
                    let cleaned: Vec<String> = questions
                        .into_iter()
                        .map(|q| q.trim().to_string())
                        .filter(|q| !q.is_empty())
                        .collect();
                    by_category.entry(category).or_default().extend(cleaned);
                }
                Err(_) => {
                    tracing::warn!(category = %name, "Ignoring unknown question category");
                }
            }
        }

        for category in Category::ALL {
            match by_category.get(&category) {
                Some(questions) if !questions.is_empty() => {}
                Some(_) => {
                    return Err(Error::Config(format!(
                        "required category '{}' has no questions",
                        category
                    )))
                }
                None => {
                    return Err(Error::Config(format!(
                        "required category '{}' not found in questions file",
                        category
                    )))
                }
            }
        }

        Ok(Self { by_category })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid questions file: {}", e)))?;
        Self::from_map(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read questions file {}: {}", path.display(), e))
        })?;
        let bank = Self::from_json(&data)?;
        tracing::info!(
            path = %path.display(),
            questions = bank.len(),
            "Question bank loaded"
        );
        Ok(bank)
    }

    /// Loads from `explicit` when given, otherwise from the first candidate
    /// location that yields a valid bank.
    pub fn discover(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let mut last_err = None;
        for path in candidate_paths() {
            match Self::load(&path) {
                Ok(bank) => return Ok(bank),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Question bank candidate rejected");
                    last_err = Some(e);
                }
            }
        }

        Err(Error::Config(format!(
            "could not load questions.json from any known location: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Bank order for `category`; empty when the category is absent.
    pub fn questions(&self, category: Category) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("data/questions.json"));
        paths.push(cwd.join("questions.json"));
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join("data/questions.json"));
        paths.push(dir.join("questions.json"));
    }
    paths
}
