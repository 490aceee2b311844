pub mod article;
pub mod author;
pub mod document;
pub mod source;
