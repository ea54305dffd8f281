pub mod chunk;
pub mod conversation;
pub mod message;

pub use chunk::{chunk_record_id, Chunk};
pub use conversation::Conversation;
pub use message::{Message, Role};
