//! Chart service
//!
//! Loads a record snapshot, assembles it into the chart forest and annotates
//! it for rendering.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{parse_snapshot, ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{annotate, AssemblyReport, ChartNode, RenderNode, TreeAssembler, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Assembled forest together with its diagnostics.
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub forest: Vec<TreeNode>,
    pub report: AssemblyReport,
    /// Records handed to the assembler
    pub loaded: usize,
}

/// Service for building organization charts from snapshots.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ChartService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    fn assembler(&self) -> TreeAssembler {
        TreeAssembler::new(self.settings.role_rules())
    }

    /// Read and decode a snapshot, dropping inactive records if configured.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<ChartNode>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::SnapshotNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        let mut nodes = parse_snapshot(&content)?;

        if !self.settings.include_inactive {
            let before = nodes.len();
            nodes.retain(|n| n.is_active);
            debug!("load: dropped {} inactive records", before - nodes.len());
        }
        Ok(nodes)
    }

    /// Load and assemble a snapshot.
    pub fn assemble(&self, path: &Path) -> ApplicationResult<ChartOutput> {
        let nodes = self.load(path)?;
        let loaded = nodes.len();
        let (forest, report) = self.assembler().assemble_with_report(nodes);
        info!(
            "assembled {} tree(s) from {} records ({} unreachable)",
            forest.len(),
            loaded,
            report.unreachable
        );
        Ok(ChartOutput {
            forest,
            report,
            loaded,
        })
    }

    /// Load, assemble and annotate a snapshot.
    pub fn render(&self, path: &Path) -> ApplicationResult<Vec<RenderNode>> {
        let output = self.assemble(path)?;
        Ok(annotate(output.forest))
    }
}
