//! Embassy async tasks
//!
//! The receive task frames host bytes into command lines; the control task
//! owns the panel group and is the only place panels are touched.

pub mod command_rx;
pub mod control;

pub use command_rx::command_rx_task;
pub use control::{control_task, PanelBus, PanelHandle, Panels};
