pub mod parameters;
pub mod pipeline;
pub mod session;
