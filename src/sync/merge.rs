use std::collections::BTreeSet;

use serde_json::Value;

/// Result of folding local project ids into a collection's membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Full membership to send, sorted.
    pub projects: Vec<String>,
    pub added: usize,
}

/// Union of the existing membership and the incoming ids. Never removes.
pub fn merge<'a, E, I>(existing: E, incoming: I) -> Merged
where
    E: IntoIterator<Item = &'a str>,
    I: IntoIterator<Item = &'a str>,
{
    let existing: BTreeSet<&str> = existing.into_iter().collect();
    let before = existing.len();

    let mut all = existing;
    all.extend(incoming);

    Merged {
        added: all.len() - before,
        projects: all.into_iter().map(str::to_owned).collect(),
    }
}

/// Reads the `projects` field of a collection record as a set of ids.
///
/// A missing or null field is an empty set. `None` means the field is there
/// but isn't a list. Non-string entries are stringified the same way they
/// appear on the wire.
pub fn existing_projects(collection: &Value) -> Option<BTreeSet<String>> {
    match collection.get("projects") {
        None | Some(Value::Null) => Some(BTreeSet::new()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Some(_) => None,
    }
}
