//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{DocumentKind, GenerationContext};

/// Context for rendering the per-stage generation instruction
#[derive(Debug, Clone, Serialize)]
pub struct SectionContext {
    /// Stage identifier (`prd` | `design` | `tech`)
    pub section: String,
    /// Stage booleans for conditional rendering
    pub is_prd: bool,
    pub is_design: bool,
    pub is_tech: bool,
    /// PRD text from earlier in the run (empty for the PRD stage)
    pub prd: String,
    /// Design text from earlier in the run (empty before the Tech stage)
    pub design: String,
}

impl SectionContext {
    pub fn new(kind: DocumentKind, context: &GenerationContext) -> Self {
        debug!(%kind, "SectionContext::new: called");
        Self {
            section: kind.as_str().to_string(),
            is_prd: kind == DocumentKind::Prd,
            is_design: kind == DocumentKind::Design,
            is_tech: kind == DocumentKind::Tech,
            prd: context.prd.clone().unwrap_or_default(),
            design: context.design.clone().unwrap_or_default(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.ideaforge/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// Looks for `.ideaforge/prompts/` and `prompts/` under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".ideaforge/prompts");
        let repo_dir = root.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
            repo_dir: if repo_dir_exists { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Prompts are markdown, not HTML
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.ideaforge/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found on disk");
        }

        debug!("PromptLoader::load_template: trying embedded fallback");
        if let Some(content) = embedded::get_embedded(name) {
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// System prompt for interview turns
    pub fn interview_prompt(&self) -> Result<String> {
        debug!("PromptLoader::interview_prompt: called");
        self.load_template("interview")
    }

    /// System prompt for document generation
    pub fn generation_prompt(&self) -> Result<String> {
        debug!("PromptLoader::generation_prompt: called");
        self.load_template("generate")
    }

    /// Instruction for one generation stage, with prior documents filled in
    pub fn section_prompt(&self, kind: DocumentKind, context: &GenerationContext) -> Result<String> {
        debug!(%kind, "PromptLoader::section_prompt: called");
        self.render("section", &SectionContext::new(kind, context))
    }
}
