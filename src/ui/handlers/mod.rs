//! Handler modules for keyboard input, navigation, play, and the file library.

mod board_handler;
mod file_handler;
mod input_handler;
mod nav_handler;

pub use board_handler::BoardHandler;
pub use file_handler::FileHandler;
pub use input_handler::InputHandler;
pub use nav_handler::NavHandler;
