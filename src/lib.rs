//! Two single-screen arcade games rendered in the terminal.
//!
//! - `pong`: two paddles, one ball, first to three points
//! - `snake`: grid snake with wrap-around edges
//!
//! Game logic lives in `pong` and `snake` and works in world units (the
//! pixels of the original fixed-size windows). `game` drives either one
//! through the terminal front end in `term`.

pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod geom;
pub mod input;
pub mod logging;
pub mod pong;
pub mod pong_game;
pub mod snake;
pub mod snake_game;
pub mod term;

pub use error::{Error, Result};

/// Milliseconds on the monotonic game clock.
pub type Millis = u64;
