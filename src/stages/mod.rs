pub mod connection;
pub mod disposition;
pub mod grievance;
pub mod normalize;
pub mod summary;

pub use connection::*;
pub use disposition::*;
pub use grievance::*;
pub use normalize::*;
pub use summary::*;
