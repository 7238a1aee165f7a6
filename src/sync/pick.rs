use serde_json::Value;

use super::error::SyncError;
use super::prompt::Prompt;

fn field<'a>(collection: &'a Value, key: &str) -> Option<&'a str> {
    collection.get(key).and_then(Value::as_str)
}

fn label(collection: &Value) -> &str {
    field(collection, "name")
        .filter(|n| !n.is_empty())
        .unwrap_or("<no name>")
}

/// Picks the collection to sync into.
///
/// An explicit id must be one of `collections`. Otherwise the operator picks
/// by number or by pasting an id. `Ok(None)` means the operator quit.
pub fn choose_collection(
    collections: &[Value],
    explicit_id: Option<&str>,
    prompt: &mut impl Prompt,
) -> anyhow::Result<Option<String>> {
    if let Some(explicit_id) = explicit_id {
        let found = collections
            .iter()
            .find(|c| field(c, "id") == Some(explicit_id))
            .ok_or_else(|| SyncError::CollectionNotFound(explicit_id.to_string()))?;
        prompt.say(&format!(
            "[info] Using collection {:?} ({}) from --collection-id",
            label(found),
            explicit_id
        ));
        return Ok(Some(explicit_id.to_string()));
    }

    if collections.is_empty() {
        return Err(SyncError::NoCollections.into());
    }

    prompt.say("");
    prompt.say("Your collections:");
    for (idx, col) in collections.iter().enumerate() {
        prompt.say(&format!(
            "  [{}] {}  (id={})",
            idx + 1,
            label(col),
            field(col, "id").unwrap_or("?")
        ));
        if let Some(desc) = field(col, "description").filter(|d| !d.is_empty()) {
            prompt.say(&format!("      {}", desc));
        }
    }

    loop {
        let Some(ans) =
            prompt.ask("Select collection by number (or paste collection ID, or 'q' to quit)")?
        else {
            return Ok(None);
        };

        if matches!(ans.to_lowercase().as_str(), "q" | "quit") {
            return Ok(None);
        }

        if let Some(col) = collections.iter().find(|c| field(c, "id") == Some(ans.as_str())) {
            prompt.say(&format!("[info] Using collection {:?} ({})", label(col), ans));
            return Ok(Some(ans));
        }

        let Ok(idx) = ans.parse::<usize>() else {
            prompt.say("Please enter a valid number or a collection ID.");
            continue;
        };
        let Some(col) = idx.checked_sub(1).and_then(|i| collections.get(i)) else {
            prompt.say(&format!(
                "Please enter a number between 1 and {}.",
                collections.len()
            ));
            continue;
        };

        match field(col, "id") {
            Some(id) => {
                prompt.say(&format!("[info] Using collection {:?} ({})", label(col), id));
                return Ok(Some(id.to_string()));
            }
            None => prompt.say(&format!(
                "Collection [{}] has no ID in the API response; pick another one.",
                idx
            )),
        }
    }
}

/// Final yes/no before anything is written remotely. Only `y`/`yes` proceeds.
pub fn confirm(prompt: &mut impl Prompt, question: &str) -> anyhow::Result<bool> {
    Ok(prompt
        .ask(question)?
        .is_some_and(|a| matches!(a.to_lowercase().as_str(), "y" | "yes")))
}
