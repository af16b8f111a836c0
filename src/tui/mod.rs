pub mod app;
pub mod events;
pub mod services;
#[cfg(feature = "platform-tts")]
pub mod speech;
pub mod theme;
pub mod views;
pub mod widgets;
