pub mod health;
pub mod publish;
pub mod suggest;
pub mod thread;
pub mod tweet;
