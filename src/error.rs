//! Error types shared by the spin engine, the scoring model and the widgets.

use thiserror::Error;

/// Precondition violations of the spin engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("cannot spin over an empty candidate list")]
    EmptyCandidates,

    #[error("invalid step range {min}..={max}")]
    InvalidSteps { min: u32, max: u32 },
}

/// Precondition violations of the grid scoring model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid {cols}x{rows} has no cells")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("cell {cell} is outside a grid of {count} cells")]
    CellOutOfRange { cell: usize, count: usize },
}

/// Bad widget configuration, detected when a widget is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("widget has no candidates to show")]
    EmptyCandidates,

    #[error("tier for score {0} has a blank label or message")]
    BlankLabel(i32),

    #[error("tier scores go the wrong way: {from} then {to}")]
    TierOrder { from: i32, to: i32 },

    #[error("weighted table has zero total weight")]
    ZeroWeight,

    #[error("weighted table total does not fit in u32")]
    WeightOverflow,

    #[error("malformed candidate list: {0}")]
    Malformed(String),

    #[error("unknown widget variant '{0}'")]
    UnknownVariant(String),

    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// An interaction the widget refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("a spin is already running")]
    Busy,

    #[error("result already revealed")]
    Locked,

    #[error("this widget does not allow rerolls")]
    RerollDisabled,

    #[error("nothing to reroll yet")]
    NothingToReroll,

    #[error("widget is unavailable: {0}")]
    Unavailable(ConfigError),

    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Clipboard write failure. Always recovered by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("clipboard is not available")]
    Unsupported,

    #[error("clipboard write was rejected: {0}")]
    Rejected(String),

    #[error("nothing to share yet")]
    NoOutcome,
}
