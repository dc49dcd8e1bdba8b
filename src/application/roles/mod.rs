pub mod list;
pub mod lookup;
pub mod search_commands;
pub mod user_count;
