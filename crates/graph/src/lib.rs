mod offline;
pub use offline::{OfflineGraph, OfflineInput};

mod online;
pub use online::OnlineGraph;

mod router;
pub use router::{FlowType, Routed, route};

mod state;
pub use state::{GraphOutcome, QaType, SessionContext};

mod tools;
pub use tools::{MemoryTool, SYSTEM_PROMPT, tool_specs};
