use fs_err as fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::error::SyncError;
use super::normalize::project_id_from_url;
use super::prompt::Prompt;

/// One line of `modlist.json`. Other keys (filename, version, ...) are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ModEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ModEntry {
    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Skipped,
}

/// Project ids pulled out of a modlist, in first-seen order, without duplicates.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Collected {
    pub project_ids: Vec<String>,
    pub skipped: usize,
}

pub fn load_modlist(path: &Path) -> Result<Vec<ModEntry>, SyncError> {
    if !path.is_file() {
        let shown = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        return Err(SyncError::Input(format!(
            "Modlist file not found: {}",
            shown.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| SyncError::Input(e.to_string()))?;
    parse_modlist(&contents)
}

fn parse_modlist(contents: &str) -> Result<Vec<ModEntry>, SyncError> {
    let data: Value = serde_json::from_str(contents)
        .map_err(|e| SyncError::Input(format!("modlist is not valid JSON: {e}")))?;

    if !data.is_array() {
        return Err(SyncError::Input(
            "modlist.json must be a JSON array of objects".into(),
        ));
    }

    serde_json::from_value(data)
        .map_err(|e| SyncError::Input(format!("modlist.json has a malformed entry: {e}")))
}

/// Asks the operator what to do with an entry that has no usable Modrinth URL.
///
/// Returns `Ok(None)` when the operator aborts.
pub fn resolve_entry(entry: &ModEntry, prompt: &mut impl Prompt) -> anyhow::Result<Option<Resolution>> {
    prompt.say("");
    prompt.say(&format!(
        "Entry needs attention: {}",
        entry.name.as_deref().unwrap_or("<no name>")
    ));
    prompt.say(&format!(
        "  Current URL: {}",
        entry.url().unwrap_or("<missing>")
    ));

    loop {
        let Some(ans) = prompt.ask("  [u] enter Modrinth URL  |  [s] skip this mod  |  [q] abort")? else {
            return Ok(None);
        };

        match ans.to_lowercase().as_str() {
            "q" | "quit" => return Ok(None),
            "s" | "skip" => {
                prompt.say("  -> Skipping this mod.");
                return Ok(Some(Resolution::Skipped));
            }
            "u" | "url" => {
                let Some(new_url) = prompt.ask("  Paste Modrinth URL (https://modrinth.com/mod/...)")? else {
                    return Ok(None);
                };
                match project_id_from_url(&new_url) {
                    Some(id) => {
                        prompt.say(&format!("  -> Using project ID: {}", id));
                        tracing::info!(name = ?entry.name, project_id = %id, "resolved by operator");
                        return Ok(Some(Resolution::Resolved(id)));
                    }
                    None => {
                        prompt.say("  That doesn't look like a valid Modrinth mod URL. Try again.");
                    }
                }
            }
            _ => {}
        }
    }
}

/// Walks the modlist and turns every entry into a project id or a skip.
///
/// Returns `Ok(None)` if the operator aborted partway through.
pub fn collect_project_ids(
    entries: &[ModEntry],
    prompt: &mut impl Prompt,
) -> anyhow::Result<Option<Collected>> {
    let mut collected = Collected::default();

    for entry in entries {
        let resolution = match entry.url().and_then(project_id_from_url) {
            Some(id) => Resolution::Resolved(id),
            None => match resolve_entry(entry, prompt)? {
                Some(r) => r,
                None => return Ok(None),
            },
        };

        match resolution {
            Resolution::Resolved(id) => {
                if !collected.project_ids.contains(&id) {
                    collected.project_ids.push(id);
                }
            }
            Resolution::Skipped => {
                tracing::info!(name = ?entry.name, url = ?entry.url, "skipped");
                collected.skipped += 1;
            }
        }
    }

    Ok(Some(collected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::prompt::ScriptedPrompt;
    use tempfile::tempdir;

    fn entry(name: &str, url: Option<&str>) -> ModEntry {
        ModEntry {
            name: Some(name.into()),
            url: url.map(Into::into),
        }
    }

    #[test]
    fn parses_list_of_objects() {
        let entries = parse_modlist(
            r#"[
                {"name": "Fabric API", "url": "https://modrinth.com/mod/P7dR8mSH"},
                {"name": "JEI", "filename": "jei.jar"}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].url, None);
    }

    #[test]
    fn top_level_object_is_input_error() {
        let err = parse_modlist(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SyncError::Input(_)));
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn missing_modlist_is_input_error() {
        let dir = tempdir().unwrap();
        let err = load_modlist(&dir.path().join("modlist.json")).unwrap_err();
        assert!(err.to_string().contains("Modlist file not found"));
    }

    #[test]
    fn valid_urls_need_no_prompt_and_dedupe() {
        let entries = vec![
            entry("Fabric API", Some("https://modrinth.com/mod/P7dR8mSH")),
            entry("Sodium", Some("https://modrinth.com/mod/AANobbMI/version/0.5")),
            entry("Fabric API again", Some("https://www.modrinth.com/mod/P7dR8mSH")),
        ];
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

        let collected = collect_project_ids(&entries, &mut prompt).unwrap().unwrap();
        assert_eq!(collected.project_ids, vec!["P7dR8mSH", "AANobbMI"]);
        assert_eq!(collected.skipped, 0);
        assert!(prompt.questions.is_empty());
    }

    #[test]
    fn bad_url_is_reprompted_until_valid() {
        let entries = vec![entry(
            "JEI",
            Some("https://www.curseforge.com/minecraft/mc-mods/jei"),
        )];
        let mut prompt = ScriptedPrompt::new([
            "x",
            "U",
            "https://example.com/mod/nope",
            "url",
            "https://modrinth.com/mod/u6dRKJwZ",
        ]);

        let collected = collect_project_ids(&entries, &mut prompt).unwrap().unwrap();
        assert_eq!(collected.project_ids, vec!["u6dRKJwZ"]);
        assert!(prompt
            .transcript()
            .contains("Current URL: https://www.curseforge.com/minecraft/mc-mods/jei"));
        assert!(prompt.transcript().contains("Try again."));
    }

    #[test]
    fn missing_url_shows_marker_and_can_be_skipped() {
        let entries = vec![entry("Mystery", None), entry("Blank", Some(""))];
        let mut prompt = ScriptedPrompt::new(["s", "SKIP"]);

        let collected = collect_project_ids(&entries, &mut prompt).unwrap().unwrap();
        assert!(collected.project_ids.is_empty());
        assert_eq!(collected.skipped, 2);
        assert!(prompt.transcript().contains("Current URL: <missing>"));
    }

    #[test]
    fn quit_aborts_collection() {
        let entries = vec![
            entry("Good", Some("https://modrinth.com/mod/a")),
            entry("Bad", None),
            entry("Never reached", None),
        ];
        let mut prompt = ScriptedPrompt::new(["q"]);

        assert_eq!(collect_project_ids(&entries, &mut prompt).unwrap(), None);
        assert_eq!(prompt.questions.len(), 1);
    }

    #[test]
    fn closed_input_aborts() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert_eq!(
            resolve_entry(&entry("Bad", None), &mut prompt).unwrap(),
            None
        );
    }

    #[test]
    fn operator_supplied_id_dedupes_with_existing() {
        let entries = vec![
            entry("A", Some("https://modrinth.com/mod/abc")),
            entry("A (curse)", Some("https://curseforge.com/x")),
        ];
        let mut prompt = ScriptedPrompt::new(["u", "https://modrinth.com/mod/abc"]);

        let collected = collect_project_ids(&entries, &mut prompt).unwrap().unwrap();
        assert_eq!(collected.project_ids, vec!["abc"]);
    }
}
