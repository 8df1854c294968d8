pub mod item;
pub mod session;
