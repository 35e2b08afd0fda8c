pub mod reply;
pub mod resource;
pub mod settings;
pub mod tone;
