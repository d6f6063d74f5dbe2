pub mod ask;
pub mod chat;
pub mod nearby;
pub mod reference;
pub mod search;

// Re-export handler functions for convenience
pub use ask::handle_ask_command;
pub use chat::handle_chat_command;
pub use nearby::handle_nearby_command;
pub use reference::{handle_schema_command, handle_templates_command};
pub use search::handle_search_command;
