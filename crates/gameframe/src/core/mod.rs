pub mod fullscreen;
pub mod layout;
pub mod scale;
pub mod session;
pub mod style;
