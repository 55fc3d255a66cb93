use std::path::PathBuf;

use thiserror::Error;

use crate::formats::IoError;
use crate::model::ModelError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("cannot load {}: {source}", .path.display())]
    Unloadable {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("{0} requires a loaded volume")]
    NotReady(&'static str),

    #[error("no {0} is loaded")]
    MissingLayer(&'static str),
}

impl SessionError {
    /// Operations attempted before a volume exists degrade to a no-op.
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::NotReady(_))
    }

    /// Window and threshold inversions: the control snaps back to the kept
    /// value instead of reporting anything.
    pub fn is_control_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::Model(
                ModelError::InvalidWindow { .. } | ModelError::InvalidThreshold { .. }
            )
        )
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, SessionError::Model(ModelError::ShapeMismatch { .. }))
    }
}
