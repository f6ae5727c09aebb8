//! Usage: IPC command modules.
//!
//! This layer is the stable interface called by the frontend through the stdio host.
//! Command names / args / return JSON shapes are considered a frozen contract.

pub(crate) mod claude_config;
pub(crate) mod codex;
pub(crate) mod installer;
pub(crate) mod settings;
pub(crate) mod skills;

pub(crate) use claude_config::*;
pub(crate) use codex::*;
pub(crate) use installer::*;
pub(crate) use settings::*;
pub(crate) use skills::*;
