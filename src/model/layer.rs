use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where an item came from and how it is labelled in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemInfo {
    pub name: String,
    /// `parent/file`, short enough for a side label.
    pub second_name: String,
    pub source: Option<PathBuf>,
}

impl ItemInfo {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut tail = path
            .components()
            .rev()
            .take(2)
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        tail.reverse();
        Self {
            name,
            second_name: tail.join("/"),
            source: Some(path.to_path_buf()),
        }
    }

    pub fn in_memory(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            second_name: name.clone(),
            name,
            source: None,
        }
    }
}

/// Capability shared by every loaded array: a name and a visibility flag.
pub trait Layer {
    fn info(&self) -> &ItemInfo;

    fn visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn name(&self) -> &str {
        &self.info().name
    }
}
