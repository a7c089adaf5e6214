pub mod emotes;
pub mod health;
pub mod root;
pub mod submit;
