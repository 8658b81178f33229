//! Tree service: load a tree, order it, lay it out and render it.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::display::text_tree;
use crate::application::input::{binary_tree_from_tokens, AdjacencyDocument, LabeledTree};
use crate::application::labels::DisplayLabeler;
use crate::application::render::SvgRenderer;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;

/// Where a tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// TOML adjacency document
    File(PathBuf),
    /// Level-order binary-tree tokens
    Binary(Vec<String>),
}

/// Key for the recursive child ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    Id,
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRequest {
    pub source: TreeSource,
    /// Overrides the document's root; ignored for binary input
    pub root: Option<String>,
    pub order: Option<OrderKey>,
}

impl TreeRequest {
    pub fn new(source: TreeSource) -> Self {
        Self {
            source,
            root: None,
            order: None,
        }
    }
}

/// One row of a coordinate listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

pub struct TreeService {
    settings: Settings,
}

impl TreeService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load and optionally order a tree.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, request: &TreeRequest) -> ApplicationResult<LabeledTree> {
        let mut tree = match &request.source {
            TreeSource::File(path) => {
                AdjacencyDocument::load(path)?.into_tree(request.root.clone())?
            }
            TreeSource::Binary(tokens) => binary_tree_from_tokens(tokens),
        };

        match request.order {
            Some(OrderKey::Id) => tree.order(),
            Some(OrderKey::Label) => tree.order_by_key(|node| node.payload.clone()),
            None => {}
        }

        info!(nodes = tree.len(), height = tree.height(), "tree loaded");
        Ok(tree)
    }

    /// Coordinates of every node, top to bottom, then left to right.
    pub fn layout_rows(&self, tree: &LabeledTree) -> Vec<PositionRow> {
        let layout = self.settings.layout;
        let mut rows: Vec<PositionRow> = tree
            .positions(layout.x_spacing, layout.y_spacing)
            .into_iter()
            .map(|(id, placement)| PositionRow {
                id,
                x: placement.point.x,
                y: placement.point.y,
                label: placement.payload.cloned(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }

    pub fn render_svg(&self, tree: &LabeledTree) -> String {
        let layout = self.settings.layout;
        let positions = tree.positions(layout.x_spacing, layout.y_spacing);
        SvgRenderer::new(&self.settings.style).render(tree, &positions, &DisplayLabeler)
    }

    /// Render to SVG and write it, creating parent directories as needed.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn write_svg(&self, tree: &LabeledTree, output: &Path) -> ApplicationResult<()> {
        let content = self.render_svg(tree);
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path_context("create directory", parent)?;
        }
        fs::write(output, content).with_path_context("write svg", output)?;
        debug!(output = %output.display(), "svg written");
        Ok(())
    }

    /// ASCII rendering; empty string for an empty tree.
    pub fn render_text(&self, tree: &LabeledTree) -> ApplicationResult<String> {
        Ok(text_tree(tree, &DisplayLabeler)?
            .map(|t| t.to_string())
            .unwrap_or_default())
    }
}
