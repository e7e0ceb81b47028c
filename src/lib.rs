//! Blockfall - a falling-block puzzle for the terminal
//!
//! The simulation (`game` and the modules under it) is independent of the
//! terminal; `driver` connects it to a `Renderer` and an `AudioSink`.

pub mod audio;
pub mod board;
pub mod clear;
pub mod driver;
pub mod error;
pub mod game;
pub mod generator;
pub mod input;
pub mod piece;
pub mod ports;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod ui;
