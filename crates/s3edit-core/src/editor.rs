//! External editor session bridge
//!
//! Writes the fetched text into a temp file named after the object's base
//! filename, blocks on the user's editor, and reads the result back.

use std::env;
use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Editor used when neither `$VISUAL` nor `$EDITOR` is set
const FALLBACK_EDITOR: &str = "vi";

/// Run an edit session with the editor resolved from the environment
pub async fn edit_in_editor(text: &str, filename: &str) -> Result<String> {
    let command = resolve_editor(env::var("VISUAL").ok(), env::var("EDITOR").ok());
    edit_with_command(&command, text, filename).await
}

/// Run an edit session with an explicit editor command line.
///
/// The command may carry arguments (`code --wait`); the temp file path is
/// appended as the final argument.
pub async fn edit_with_command(command: &str, text: &str, filename: &str) -> Result<String> {
    let dir = tempfile::TempDir::new()?;
    let file_path = dir.path().join(sanitize_filename(filename));
    tokio::fs::write(&file_path, text).await?;

    run_editor(command, &file_path).await?;

    let edited = tokio::fs::read_to_string(&file_path).await?;
    Ok(edited)
}

async fn run_editor(command: &str, file_path: &Path) -> Result<()> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::editor("editor command is empty"))?;

    debug!("launching editor: {} {}", command, file_path.display());
    let status = Command::new(program)
        .args(parts)
        .arg(file_path)
        .status()
        .await
        .map_err(|source| Error::editor(format!("failed to launch {}: {}", program, source)))?;

    if !status.success() {
        return Err(Error::editor(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

/// Pick the editor: `$VISUAL`, then `$EDITOR`, then `vi`
fn resolve_editor(visual: Option<String>, editor: Option<String>) -> String {
    visual
        .filter(|v| !v.trim().is_empty())
        .or_else(|| editor.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Keep only the basename so a crafted object path cannot escape the
/// temp directory
fn sanitize_filename(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("untitled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_editor_prefers_visual() {
        assert_eq!(
            resolve_editor(Some("emacs".into()), Some("nano".into())),
            "emacs"
        );
        assert_eq!(resolve_editor(None, Some("nano".into())), "nano");
        assert_eq!(resolve_editor(None, None), "vi");
    }

    #[test]
    fn test_resolve_editor_skips_blank_values() {
        assert_eq!(resolve_editor(Some("  ".into()), Some("nano".into())), "nano");
        assert_eq!(resolve_editor(Some(String::new()), None), "vi");
    }

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a/b/c.md"), "c.md");
    }

    #[cfg(unix)]
    mod unix {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable shell script acting as a fake editor
        fn fake_editor(dir: &tempfile::TempDir, body: &str) -> String {
            let path = dir.path().join("fake-editor.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_str().unwrap().to_string()
        }

        #[tokio::test]
        async fn test_edit_returns_modified_content() {
            let dir = tempfile::TempDir::new().unwrap();
            let editor = fake_editor(&dir, r#"printf 'edited' > "$1""#);
            let result = edit_with_command(&editor, "original", "notes.txt")
                .await
                .unwrap();
            assert_eq!(result, "edited");
        }

        #[tokio::test]
        async fn test_unchanged_file_round_trips() {
            let dir = tempfile::TempDir::new().unwrap();
            let editor = fake_editor(&dir, "exit 0");
            let result = edit_with_command(&editor, "kept as-is\n", "notes.txt")
                .await
                .unwrap();
            assert_eq!(result, "kept as-is\n");
        }

        #[tokio::test]
        async fn test_nonzero_exit_is_an_editor_error() {
            let dir = tempfile::TempDir::new().unwrap();
            let editor = fake_editor(&dir, "exit 3");
            let err = edit_with_command(&editor, "text", "notes.txt")
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Editor { .. }));
        }

        #[tokio::test]
        async fn test_missing_editor_binary_is_an_editor_error() {
            let err = edit_with_command("/nonexistent/editor-binary", "text", "notes.txt")
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Editor { .. }));
        }
    }
}
