//! Backend bridge: commands from the UI thread and the worker that serves them.

pub mod commands;
pub mod runtime;
