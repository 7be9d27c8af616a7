// handlers/threads - the persisted thread list and everything hanging off it
//
// Route prefix: /api/threads

pub mod media;
pub mod publish;
pub mod thread;
pub mod tweet;

pub use thread::{create as thread_create, delete as thread_delete, get as thread_get, list as thread_list};
pub use thread::{current_get, current_put, patch as thread_patch, put as thread_put};

pub use tweet::{add as tweet_add, remove as tweet_remove, reposition as tweet_reposition, update as tweet_update};

pub use media::{attach as media_attach, detach as media_detach};

pub use publish::{publish as thread_publish, suggestions as thread_suggestions};
