pub mod graph;
pub mod navigator;

pub use graph::{FlowGraph, FlowNode, FlowOption, GraphError, GraphStatus, START_NODE};
pub use navigator::{
    FlowNavigator, NavigationError, NavigatorState, Progress, StepOutcome,
    DEFAULT_PROGRESS_STEP_PCT,
};
