// handlers/proxy - stateless endpoints forwarding to Twitter and OpenAI
//
// Nothing here touches the thread store; the browser editor calls these
// with whatever it has in hand.

pub mod media;
pub mod suggestions;
pub mod twitter;

pub use media::upload as media_upload;
pub use suggestions::{prompts as suggestion_prompts, suggest as suggestions_post};
pub use twitter::post_thread as twitter_post;
