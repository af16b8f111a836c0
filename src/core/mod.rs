pub mod logging;
pub mod speech;
