pub mod speak;

pub use speak::{FormField, SpeakViewState};
