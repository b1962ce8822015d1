//! Read-only loading of saved conversations (a JSON array of messages)

use std::path::Path;

use anyhow::{Context, Result};

use crate::state::ChatMessage;

pub fn from_json(json: &str) -> Result<Vec<ChatMessage>> {
    let messages: Vec<ChatMessage> =
        serde_json::from_str(json).context("Transcript must be a JSON array of {role, content}")?;
    Ok(messages)
}

pub fn load(path: &Path) -> Result<Vec<ChatMessage>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read transcript {}", path.display()))?;
    from_json(&content).with_context(|| format!("Could not parse transcript {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Role;
    use std::io::Write;

    #[test]
    fn test_load_preserves_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"user","content":"first"}},{{"role":"ai","content":"second"}},{{"role":"user","content":""}}]"#
        )
        .unwrap();

        let messages = load(file.path()).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Ai, Role::User]);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[2].content, "");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Could not read transcript"));
    }

    #[test]
    fn test_from_json_rejects_unknown_role() {
        assert!(from_json(r#"[{"role":"system","content":"x"}]"#).is_err());
    }

    #[test]
    fn test_from_json_empty() {
        assert!(from_json("[]").unwrap().is_empty());
    }
}
