//! Poll catalog loading and validation.
//!
//! The catalog is seeded into the store once, when the store's poll
//! table is empty. Polls are immutable after that; editing the file
//! later does not rewrite an already-seeded catalog.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use survey_core::Poll;

/// One catalog entry as written in the polls JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
}

/// Load the poll catalog from `path`, falling back to the built-in
/// catalog when the file does not exist.
pub fn load(path: &Path) -> anyhow::Result<Vec<Poll>> {
    if !path.exists() {
        log::info!(
            "poll catalog {} not found, using the built-in catalog",
            path.display()
        );
        return Ok(default_catalog());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading poll catalog {}", path.display()))?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing poll catalog {}", path.display()))?;

    let mut seen = HashSet::new();
    let mut polls = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id.clone()) {
            bail!("duplicate poll id '{}' in {}", entry.id, path.display());
        }
        polls.push(validate(entry)?);
    }
    Ok(polls)
}

fn validate(entry: CatalogEntry) -> anyhow::Result<Poll> {
    if entry.options.len() < 2 {
        bail!("poll '{}' needs at least two options", entry.id);
    }
    // Telegram rejects polls with more than ten options.
    if entry.options.len() > 10 {
        bail!("poll '{}' has more than ten options", entry.id);
    }
    Ok(Poll::new(entry.id, entry.question, entry.options))
}

/// The catalog the bot ships with.
pub fn default_catalog() -> Vec<Poll> {
    vec![
        Poll::new(
            "poll_1",
            "What is your favourite food?",
            vec![
                "Pizza".to_string(),
                "Sushi".to_string(),
                "Burgers".to_string(),
                "Salad".to_string(),
            ],
        ),
        Poll::new(
            "poll_2",
            "How would you rate our service?",
            vec![
                "Great".to_string(),
                "Good".to_string(),
                "Fair".to_string(),
                "Poor".to_string(),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_the_builtin_catalog() {
        let dir = tempdir().unwrap();
        let polls = load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(polls, default_catalog());
        assert!(polls.iter().all(|poll| poll.options.len() >= 2));
    }

    #[test]
    fn catalog_files_load_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polls.json");
        fs::write(
            &path,
            r#"[
                {"id": "b", "question": "Second?", "options": ["x", "y"]},
                {"id": "a", "question": "First?", "options": ["1", "2", "3"]}
            ]"#,
        )
        .unwrap();

        let polls = load(&path).unwrap();
        assert_eq!(polls.len(), 2);
        assert_eq!(polls[0].id.as_str(), "b");
        assert_eq!(polls[1].options.len(), 3);
    }

    #[test]
    fn single_option_polls_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polls.json");
        fs::write(
            &path,
            r#"[{"id": "p", "question": "Only one?", "options": ["x"]}]"#,
        )
        .unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn duplicate_poll_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polls.json");
        fs::write(
            &path,
            r#"[
                {"id": "p", "question": "One?", "options": ["x", "y"]},
                {"id": "p", "question": "Two?", "options": ["x", "y"]}
            ]"#,
        )
        .unwrap();

        assert!(load(&path).is_err());
    }
}
