pub mod chat;
pub mod core;

pub use chat::chat;
pub use self::core::*;
