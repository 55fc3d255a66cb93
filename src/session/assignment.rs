use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Result;

/// Where a dropped file goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssignTarget {
    #[default]
    Volume,
    Segmentation,
    LogitsLeft,
    LogitsRight,
}

impl AssignTarget {
    pub const ALL: [AssignTarget; 4] = [
        AssignTarget::Volume,
        AssignTarget::Segmentation,
        AssignTarget::LogitsLeft,
        AssignTarget::LogitsRight,
    ];

    /// Load order: the volume first, so later items can be shape-checked.
    pub fn priority(&self) -> u8 {
        match self {
            AssignTarget::Volume => 0,
            AssignTarget::Segmentation => 1,
            AssignTarget::LogitsLeft => 2,
            AssignTarget::LogitsRight => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssignTarget::Volume => "Volume",
            AssignTarget::Segmentation => "Segmentation",
            AssignTarget::LogitsLeft => "Logits (left)",
            AssignTarget::LogitsRight => "Logits (right)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: PathBuf,
    pub target: AssignTarget,
}

impl Assignment {
    pub fn new(path: impl Into<PathBuf>, target: AssignTarget) -> Self {
        Self {
            path: path.into(),
            target,
        }
    }
}

/// Outcome of one assigned load, in the order the loads ran.
#[derive(Debug)]
pub struct LoadReport {
    pub assignment: Assignment,
    pub result: Result<()>,
}

/// Stable sort by target priority; drop order breaks ties.
pub(crate) fn ordered(mut assignments: Vec<Assignment>) -> Vec<Assignment> {
    assignments.sort_by_key(|assignment| assignment.target.priority());
    assignments
}
