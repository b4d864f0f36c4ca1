pub mod chat;
pub mod view;
