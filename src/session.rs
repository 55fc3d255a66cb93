mod assignment;
mod error;
mod readout;
mod state;

#[cfg(test)]
mod tests;

pub use assignment::{AssignTarget, Assignment, LoadReport};
pub use error::{Result, SessionError};
pub use readout::{
    CellTone, HIGHLIGHT_COLOR, ReadoutColumn, ReadoutRow, ReadoutTable, TABLE_BACKGROUND,
    VoxelReadout,
};
pub use state::{InteractionSession, KeyCommand, LogitsSide};
