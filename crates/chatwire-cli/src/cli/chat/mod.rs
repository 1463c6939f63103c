//! Interactive streaming chat.
//!
//! Creates a session, shows the scenario's opening line, sends the silent
//! intro turn, then reads user messages and streams each reply while still
//! listening for Ctrl+C to stop it. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
