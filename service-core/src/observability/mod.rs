pub mod logging;
pub mod panic;

pub use logging::init_tracing;
pub use panic::{install_panic_hook, panic_reason};
