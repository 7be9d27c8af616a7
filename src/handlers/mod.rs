pub mod proxy;
pub mod threads;
pub mod utils;
