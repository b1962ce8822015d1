pub mod parts;
pub mod state;
pub mod transcript;

// Re-export main types for convenience
pub use parts::{ContentPart, ImagePart, InlineData, TextPart};
pub use state::{ChatMessage, Role};
