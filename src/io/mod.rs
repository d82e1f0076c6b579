pub mod input;
pub mod reference;

pub use input::*;
pub use reference::*;
