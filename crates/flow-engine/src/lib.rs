#![allow(missing_docs)]

pub mod engine;
pub mod event;
pub mod render;
pub mod state;
pub mod timer;

pub use engine::{EngineError, FlowForm};
pub use event::{FlowEvent, InputEvent};
pub use render::{
    RenderPayload, RenderQuestion, RenderStatus, build_render_payload, render_json_ui, render_text,
};
pub use state::FlowState;
pub use timer::FlowTimer;
