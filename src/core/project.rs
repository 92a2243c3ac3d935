//! Project discovery and on-disk layout
//!
//! ```text
//! <root>/
//!   .jqt/config.yaml
//!   store.jqt.yaml
//!   proposals/PROP-<ULID>.jqt.yaml
//! ```

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::shortid::{Resolution, ShortIdIndex};
use crate::core::store::EntityStore;
use crate::entities::proposal::SavedProposal;
use crate::yaml::{parse_yaml_file, write_yaml_file, YamlError};

/// Marker directory name
pub const PROJECT_DIR: &str = ".jqt";
pub const STORE_FILE: &str = "store.jqt.yaml";
pub const PROPOSALS_DIR: &str = "proposals";
const FILE_SUFFIX: &str = ".jqt.yaml";

const DEFAULT_CONFIG: &str = "\
# Joinery Quote Toolkit project configuration
# author: Your Name
# currency: R$
# default_validity_days: 15
";

#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("Not inside a jqt project (no .jqt/ found above {})", .0.display())]
    #[diagnostic(code(jqt::project::not_found), help("Run `jqt init` to create one"))]
    NotFound(PathBuf),

    #[error("A jqt project already exists at {}", .0.display())]
    #[diagnostic(code(jqt::project::exists))]
    AlreadyExists(PathBuf),

    #[error("No proposal matches '{0}'")]
    #[diagnostic(code(jqt::project::proposal))]
    ProposalNotFound(String),

    #[error("'{0}' matches {1} proposals; use a longer prefix")]
    #[diagnostic(code(jqt::project::proposal))]
    AmbiguousProposal(String, usize),

    #[error(transparent)]
    #[diagnostic(code(jqt::project::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}

/// A project rooted at the directory holding `.jqt/`
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Walk up from the current directory to the project root
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(|root| Self {
                root: root.to_path_buf(),
            })
            .ok_or_else(|| ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create the project layout and write the initial store
    pub fn init(root: &Path, store: &EntityStore) -> Result<Self, ProjectError> {
        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        fs::create_dir_all(root.join(PROJECT_DIR))?;
        fs::create_dir_all(root.join(PROPOSALS_DIR))?;
        fs::write(Self::config_path_for(root), DEFAULT_CONFIG)?;

        let project = Self {
            root: root.to_path_buf(),
        };
        project.save_store(store)?;
        info!(root = %root.display(), "initialized project");
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path_for(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR).join("config.yaml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    pub fn proposals_dir(&self) -> PathBuf {
        self.root.join(PROPOSALS_DIR)
    }

    pub fn proposal_path(&self, id: &EntityId) -> PathBuf {
        self.proposals_dir().join(format!("{}{}", id, FILE_SUFFIX))
    }

    // =====================================================================
    // Store
    // =====================================================================

    /// Load the store, recomputing every piece's cached metrics
    pub fn load_store(&self) -> Result<EntityStore, ProjectError> {
        let path = self.store_path();
        if !path.exists() {
            warn!(path = %path.display(), "store file missing; starting empty");
            return Ok(EntityStore::default());
        }
        let mut store: EntityStore = parse_yaml_file(&path)?;
        store.refresh_derived();
        debug!(pieces = store.pieces().len(), "loaded store");
        Ok(store)
    }

    pub fn save_store(&self, store: &EntityStore) -> Result<(), ProjectError> {
        write_yaml_file(&self.store_path(), store)?;
        debug!(path = %self.store_path().display(), "saved store");
        Ok(())
    }

    // =====================================================================
    // Proposals
    // =====================================================================

    /// All saved proposals, ordered by sequence number
    pub fn load_proposals(&self) -> Result<Vec<SavedProposal>, ProjectError> {
        let dir = self.proposals_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut proposals = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().ends_with(FILE_SUFFIX))
        {
            let mut proposal: SavedProposal = parse_yaml_file(entry.path())?;
            for piece in &mut proposal.data.pieces {
                piece.refresh();
            }
            proposals.push(proposal);
        }

        proposals.sort_by(|a, b| a.sequence.cmp(&b.sequence).then(a.created.cmp(&b.created)));
        Ok(proposals)
    }

    /// Resolve a proposal by ID, prefix, `PROP@N` alias or display number
    pub fn find_proposal(&self, reference: &str) -> Result<SavedProposal, ProjectError> {
        let mut proposals = self.load_proposals()?;

        if let Some(idx) = proposals.iter().position(|p| p.number() == reference) {
            return Ok(proposals.swap_remove(idx));
        }

        let index = ShortIdIndex::from_ids(proposals.iter().map(|p| p.id()));
        match index.resolve(reference) {
            Resolution::Found(id) => proposals
                .into_iter()
                .find(|p| p.id == id)
                .ok_or_else(|| ProjectError::ProposalNotFound(reference.to_string())),
            Resolution::Ambiguous(n) => Err(ProjectError::AmbiguousProposal(reference.to_string(), n)),
            Resolution::Missing => Err(ProjectError::ProposalNotFound(reference.to_string())),
        }
    }

    pub fn save_proposal(&self, proposal: &SavedProposal) -> Result<PathBuf, ProjectError> {
        fs::create_dir_all(self.proposals_dir())?;
        let path = self.proposal_path(&proposal.id);
        write_yaml_file(&path, proposal)?;
        debug!(path = %path.display(), "saved proposal");
        Ok(path)
    }

    pub fn remove_proposal(&self, id: &EntityId) -> Result<(), ProjectError> {
        fs::remove_file(self.proposal_path(id))?;
        info!(id = %id, "removed proposal");
        Ok(())
    }
}
