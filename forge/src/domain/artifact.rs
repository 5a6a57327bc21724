//! Generated documents and the context threaded between generation stages

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Turn;

/// Which long-form document a generation stage produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Prd,
    Design,
    Tech,
}

impl DocumentKind {
    /// Generation order; each stage depends on the ones before it
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Prd, DocumentKind::Design, DocumentKind::Tech];

    /// Stage identifier on the wire (`prd` | `design` | `tech`)
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Prd => "prd",
            DocumentKind::Design => "design",
            DocumentKind::Tech => "tech",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Prd => "Product Requirements",
            DocumentKind::Design => "Design Guide",
            DocumentKind::Tech => "Technical Specifications",
        }
    }

    /// One-based position in the pipeline
    pub fn step(&self) -> usize {
        match self {
            DocumentKind::Prd => 1,
            DocumentKind::Design => 2,
            DocumentKind::Tech => 3,
        }
    }

    /// Headline shown while this stage runs
    pub fn progress_label(&self) -> &'static str {
        match self {
            DocumentKind::Prd => "Drafting Product Requirements...",
            DocumentKind::Design => "Designing User Interface...",
            DocumentKind::Tech => "Architecting Technical Solution...",
        }
    }

    pub fn progress_detail(&self) -> &'static str {
        match self {
            DocumentKind::Prd => "Analyzing user stories and acceptance criteria.",
            DocumentKind::Design => "Selecting color palettes and typography.",
            DocumentKind::Tech => "Defining database schema and API endpoints.",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::Prd => "prd.md",
            DocumentKind::Design => "design.md",
            DocumentKind::Tech => "tech.md",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Documents produced earlier in the same generation run.
///
/// Empty for the PRD stage, `{prd}` for Design, `{prd, design}` for Tech.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
}

impl GenerationContext {
    pub fn with_prd(mut self, prd: impl Into<String>) -> Self {
        self.prd = Some(prd.into());
        self
    }

    pub fn with_design(mut self, design: impl Into<String>) -> Self {
        self.design = Some(design.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prd.is_none() && self.design.is_none()
    }
}

/// The terminal output of a session: three generated documents plus the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactBundle {
    prd: String,
    design: String,
    tech: String,
    transcript: String,
}

impl ArtifactBundle {
    pub fn new(prd: String, design: String, tech: String, transcript: String) -> Self {
        Self {
            prd,
            design,
            tech,
            transcript,
        }
    }

    pub fn prd(&self) -> &str {
        &self.prd
    }

    pub fn design(&self) -> &str {
        &self.design
    }

    pub fn tech(&self) -> &str {
        &self.tech
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn document(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Prd => &self.prd,
            DocumentKind::Design => &self.design,
            DocumentKind::Tech => &self.tech,
        }
    }
}

/// Render the interview as a markdown transcript, one entry per turn in order
pub fn render_transcript(turns: &[Turn]) -> String {
    debug!(turn_count = turns.len(), "render_transcript: called");
    let mut md = String::from("# Interview Transcript\n\n");
    for turn in turns {
        md.push_str(&format!(
            "**{}**: {}\n\n---\n\n",
            turn.role().transcript_label(),
            turn.content()
        ));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_order() {
        let steps: Vec<usize> = DocumentKind::ALL.iter().map(|k| k.step()).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert_eq!(DocumentKind::Design.as_str(), "design");
    }

    #[test]
    fn test_context_builders() {
        let ctx = GenerationContext::default();
        assert!(ctx.is_empty());
        let ctx = ctx.with_prd("P").with_design("D");
        assert_eq!(ctx.prd.as_deref(), Some("P"));
        assert_eq!(ctx.design.as_deref(), Some("D"));
    }

    #[test]
    fn test_render_transcript() {
        let turns = vec![Turn::assistant("What do you want to build?"), Turn::user("idea: kites")];
        let md = render_transcript(&turns);
        assert!(md.starts_with("# Interview Transcript"));
        assert_eq!(md.matches("\n---\n").count(), 2);
        let ai = md.find("**AI**: What do you want to build?").unwrap();
        let user = md.find("**User**: idea: kites").unwrap();
        assert!(ai < user);
    }

    #[test]
    fn test_render_empty_transcript() {
        assert_eq!(render_transcript(&[]), "# Interview Transcript\n\n");
    }
}
