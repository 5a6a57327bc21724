//! Writing a finished bundle to disk

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, info};

use crate::domain::{ArtifactBundle, DocumentKind};
use crate::session::Session;

pub const TRANSCRIPT_FILE: &str = "transcript.md";

/// Directory for one session's documents: `<root>/<timestamp>-<slug>`
pub fn bundle_dir(root: &Path, session: &Session) -> PathBuf {
    let stamp = session.created_at().format("%Y%m%d-%H%M%S");
    let slug = session
        .first_user_message()
        .map(idea_slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "idea".to_string());
    root.join(format!("{}-{}", stamp, slug))
}

/// Write the three documents and the transcript; returns the files written in order
pub fn write_bundle(bundle: &ArtifactBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    debug!(?dir, "write_bundle: called");
    fs::create_dir_all(dir).context(format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(4);
    for kind in DocumentKind::ALL {
        written.push(write_file(dir, kind.file_name(), bundle.document(kind))?);
    }
    written.push(write_file(dir, TRANSCRIPT_FILE, bundle.transcript())?);

    info!(?dir, files = written.len(), "Wrote document bundle");
    Ok(written)
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Slug from the first answer's value (`idea: A Tinder for pets` -> `a-tinder-for-pets`)
fn idea_slug(answer: &str) -> String {
    let first_line = answer.lines().next().unwrap_or_default();
    let value = first_line.split_once(": ").map(|(_, v)| v).unwrap_or(first_line);
    slugify(value)
}

fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(40)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Turn;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("A Tinder for adopting pets!!"), "a-tinder-for-adopting-pets");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_idea_slug_drops_field_id() {
        assert_eq!(idea_slug("idea: Pet Adoption\nsecond line"), "pet-adoption");
        assert_eq!(idea_slug("message: recipe swap"), "recipe-swap");
        assert_eq!(idea_slug("no prefix here"), "no-prefix-here");
    }

    #[test]
    fn test_bundle_dir_falls_back_without_answers() {
        let session = Session::new();
        let dir = bundle_dir(Path::new("out"), &session);
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("-idea"));
        assert!(dir.starts_with("out"));
    }

    #[test]
    fn test_write_bundle_creates_four_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("run");
        let bundle = ArtifactBundle::new(
            "# PRD".into(),
            "# Design".into(),
            "# Tech".into(),
            crate::domain::render_transcript(&[Turn::user("idea: x")]),
        );

        let written = write_bundle(&bundle, &dir).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["prd.md", "design.md", "tech.md", "transcript.md"]);
        assert_eq!(fs::read_to_string(dir.join("design.md")).unwrap(), "# Design");
        assert!(fs::read_to_string(dir.join("transcript.md")).unwrap().contains("idea: x"));
    }
}
