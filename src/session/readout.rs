use serde::Serialize;

pub const TABLE_BACKGROUND: [u8; 3] = [0x20, 0x20, 0x20];
pub const HIGHLIGHT_COLOR: [u8; 3] = [0xA5, 0x2A, 0x2A];

/// Everything known about the voxel under the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoxelReadout {
    pub depth: usize,
    pub row: usize,
    pub col: usize,
    pub intensity: i32,
    pub label: Option<i32>,
    pub left: Option<Vec<f32>>,
    pub right: Option<Vec<f32>>,
}

impl VoxelReadout {
    /// `(row, col, depth) intensity    cls: label`
    pub fn status_line(&self) -> String {
        let label = self
            .label
            .map(|label| label.to_string())
            .unwrap_or_default();
        format!(
            "({}, {}, {}) {}    cls: {}",
            self.row, self.col, self.depth, self.intensity, label
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutColumn {
    Left,
    Right,
}

impl ReadoutColumn {
    pub const ALL: [ReadoutColumn; 2] = [ReadoutColumn::Left, ReadoutColumn::Right];

    pub fn title(&self) -> &'static str {
        match self {
            ReadoutColumn::Left => "Left",
            ReadoutColumn::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Background,
    Highlight,
}

impl CellTone {
    pub fn color(&self) -> [u8; 3] {
        match self {
            CellTone::Background => TABLE_BACKGROUND,
            CellTone::Highlight => HIGHLIGHT_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadoutRow {
    pub class: usize,
    pub left: f32,
    pub right: f32,
}

impl ReadoutRow {
    pub fn value(&self, column: ReadoutColumn) -> f32 {
        match column {
            ReadoutColumn::Left => self.left,
            ReadoutColumn::Right => self.right,
        }
    }
}

/// Per-class values for the left and right logits at one voxel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadoutTable {
    rows: Vec<ReadoutRow>,
}

impl ReadoutTable {
    pub fn zeros(classes: usize) -> Self {
        Self {
            rows: (0..classes)
                .map(|class| ReadoutRow {
                    class,
                    left: 0.0,
                    right: 0.0,
                })
                .collect(),
        }
    }

    /// A side without logits reads as zeros; with no logits at all the
    /// table has `default_classes` zero rows.
    pub fn from_readout(readout: &VoxelReadout, default_classes: usize) -> Self {
        let left = readout.left.as_deref().unwrap_or_default();
        let right = readout.right.as_deref().unwrap_or_default();
        if left.is_empty() && right.is_empty() {
            return Self::zeros(default_classes);
        }
        let classes = left.len().max(right.len());
        Self {
            rows: (0..classes)
                .map(|class| ReadoutRow {
                    class,
                    left: left.get(class).copied().unwrap_or(0.0),
                    right: right.get(class).copied().unwrap_or(0.0),
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ReadoutRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_all_zero(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.left == 0.0 && row.right == 0.0)
    }

    pub fn column_max(&self, column: ReadoutColumn) -> Option<f32> {
        self.rows
            .iter()
            .map(|row| row.value(column))
            .filter(|value| !value.is_nan())
            .reduce(f32::max)
    }

    /// All cells are dark while the table is all zero; otherwise the
    /// column maximum is highlighted.
    pub fn tone(&self, row: usize, column: ReadoutColumn) -> CellTone {
        if self.is_all_zero() {
            return CellTone::Background;
        }
        let Some(value) = self.rows.get(row).map(|row| row.value(column)) else {
            return CellTone::Background;
        };
        if self.column_max(column) == Some(value) {
            CellTone::Highlight
        } else {
            CellTone::Background
        }
    }

    pub fn format_value(value: f32) -> String {
        format!("{value:.3}")
    }
}
