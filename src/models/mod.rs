pub mod classification;
pub mod reference;
pub mod transcript;

pub use classification::*;
pub use reference::*;
pub use transcript::*;
