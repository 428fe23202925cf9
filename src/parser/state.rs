use crate::Position;

/// Everything needed to put the engine back at an earlier consumption point.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub position: Position,
    pub skipper: Option<String>,
}
