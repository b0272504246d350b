pub mod chat;
pub mod common;
pub mod gemini;
pub mod image;

pub use chat::*;
pub use common::*;
pub use gemini::*;
pub use image::*;
