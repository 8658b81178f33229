//! Turning node identifiers and payloads into label text.
//!
//! Conversion may fail (a `Display` impl returning `fmt::Error`, or a custom
//! labeler rejecting a value). Callers degrade a failed part to "no text"
//! instead of aborting the render.

use std::fmt::{self, Display, Write};

use thiserror::Error;
use tracing::warn;

use crate::domain::TreeNode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("value could not be formatted")]
    Format,

    #[error("{0}")]
    Unsupported(String),
}

impl From<fmt::Error> for LabelError {
    fn from(_: fmt::Error) -> Self {
        LabelError::Format
    }
}

/// Produces label lines for identifiers and payloads.
///
/// Override either method to customise labels, e.g. to show selected fields
/// of a payload on separate lines.
pub trait Labeler<I, P> {
    fn id_lines(&self, id: &I) -> Result<Vec<String>, LabelError>;
    fn payload_lines(&self, payload: &P) -> Result<Vec<String>, LabelError>;
}

/// Labels everything through `Display`, one line per `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayLabeler;

impl<I: Display, P: Display> Labeler<I, P> for DisplayLabeler {
    fn id_lines(&self, id: &I) -> Result<Vec<String>, LabelError> {
        display_lines(id)
    }

    fn payload_lines(&self, payload: &P) -> Result<Vec<String>, LabelError> {
        display_lines(payload)
    }
}

/// Labels only the identifier; payloads are left unlabelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdLabeler;

impl<I: Display, P> Labeler<I, P> for IdLabeler {
    fn id_lines(&self, id: &I) -> Result<Vec<String>, LabelError> {
        display_lines(id)
    }

    fn payload_lines(&self, _payload: &P) -> Result<Vec<String>, LabelError> {
        Ok(Vec::new())
    }
}

/// Format a value without panicking on a failing `Display` impl.
pub fn display_lines<T: Display + ?Sized>(value: &T) -> Result<Vec<String>, LabelError> {
    let mut text = String::new();
    write!(text, "{}", value)?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Label lines of one node: identifier lines, then payload lines.
///
/// A part whose conversion fails is logged and omitted.
pub fn node_label<I, P, L>(node: &TreeNode<I, P>, labeler: &L) -> Vec<String>
where
    L: Labeler<I, P> + ?Sized,
{
    let mut lines = match labeler.id_lines(&node.id) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error = %e, "skipping identifier label");
            Vec::new()
        }
    };
    if let Some(payload) = node.payload.as_ref() {
        match labeler.payload_lines(payload) {
            Ok(more) => lines.extend(more),
            Err(e) => warn!(error = %e, "skipping payload label"),
        }
    }
    lines
}
