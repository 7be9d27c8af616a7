use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::models::{normalize_title, MAX_MEDIA_PER_TWEET};
use super::{MediaAttachment, StateFile, StoreError, Thread, ThreadState, ThreadSummary, Tweet};

/// Thread list shared by all handlers.
///
/// Mutations run against a copy of the state; the copy is written to disk and
/// only then swapped in, so a failed save leaves memory and disk in agreement.
#[derive(Clone)]
pub struct ThreadStore {
    state: Arc<RwLock<ThreadState>>,
    file: StateFile,
    max_media_bytes: usize,
}

impl ThreadStore {
    pub async fn open(file: StateFile, max_media_bytes: usize) -> Result<Self, StoreError> {
        let state = file.load().await?;
        info!(
            path = %file.path().display(),
            threads = state.threads.len(),
            "Thread store opened"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            file,
            max_media_bytes,
        })
    }

    pub fn file(&self) -> &StateFile {
        &self.file
    }

    pub async fn list_threads(&self) -> Vec<ThreadSummary> {
        self.state.read().await.threads.iter().map(Thread::summary).collect()
    }

    pub async fn get_thread(&self, thread_id: Uuid) -> Result<Thread, StoreError> {
        let state = self.state.read().await;
        find_thread(&state, thread_id).cloned()
    }

    pub async fn current_thread(&self) -> Option<Thread> {
        let state = self.state.read().await;
        let current = state.current_thread_id?;
        state.threads.iter().find(|t| t.id == current).cloned()
    }

    pub async fn create_thread(&self, title: Option<&str>) -> Result<Thread, StoreError> {
        let thread = Thread::new(title);
        let created = thread.clone();
        self.mutate(move |state| {
            state.current_thread_id = Some(thread.id);
            state.threads.push(thread);
            Ok(())
        })
        .await?;
        info!(thread_id = %created.id, title = %created.title, "Thread created");
        Ok(created)
    }

    /// Replaces the full tweet list, as the editor does after every change
    pub async fn update_thread(&self, thread_id: Uuid, mut tweets: Vec<Tweet>) -> Result<Thread, StoreError> {
        let max_media_bytes = self.max_media_bytes;
        // Client-supplied size and digest are never trusted
        for tweet in &mut tweets {
            tweet.media = std::mem::take(&mut tweet.media)
                .into_iter()
                .map(MediaAttachment::resealed)
                .collect();
        }
        self.mutate(move |state| {
            validate_tweets(&tweets, max_media_bytes)?;
            let thread = find_thread_mut(state, thread_id)?;
            thread.tweets = tweets;
            thread.touch();
            Ok(thread.clone())
        })
        .await
    }

    pub async fn update_thread_title(&self, thread_id: Uuid, title: &str) -> Result<Thread, StoreError> {
        let title = normalize_title(title);
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            thread.title = title;
            thread.touch();
            Ok(thread.clone())
        })
        .await
    }

    pub async fn delete_thread(&self, thread_id: Uuid) -> Result<(), StoreError> {
        self.mutate(move |state| {
            let before = state.threads.len();
            state.threads.retain(|t| t.id != thread_id);
            if state.threads.len() == before {
                return Err(StoreError::ThreadNotFound(thread_id));
            }
            if state.current_thread_id == Some(thread_id) {
                state.current_thread_id = None;
            }
            Ok(())
        })
        .await?;
        info!(thread_id = %thread_id, "Thread deleted");
        Ok(())
    }

    pub async fn set_current_thread(&self, thread_id: Uuid) -> Result<Thread, StoreError> {
        self.mutate(move |state| {
            let thread = find_thread(state, thread_id)?.clone();
            state.current_thread_id = Some(thread_id);
            Ok(thread)
        })
        .await
    }

    pub async fn add_tweet(&self, thread_id: Uuid, content: String) -> Result<Tweet, StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let tweet = Tweet::new(content);
            thread.tweets.push(tweet.clone());
            thread.touch();
            Ok(tweet)
        })
        .await
    }

    pub async fn update_tweet(&self, thread_id: Uuid, tweet_id: Uuid, content: String) -> Result<Tweet, StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let index = tweet_index(thread, tweet_id)?;
            thread.tweets[index].content = content;
            thread.touch();
            Ok(thread.tweets[index].clone())
        })
        .await
    }

    pub async fn remove_tweet(&self, thread_id: Uuid, tweet_id: Uuid) -> Result<(), StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let index = tweet_index(thread, tweet_id)?;
            thread.tweets.remove(index);
            thread.touch();
            Ok(())
        })
        .await
    }

    /// Moves the tweet at `from` so that it ends up at index `to`
    pub async fn move_tweet(&self, thread_id: Uuid, from: usize, to: usize) -> Result<Thread, StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            reorder(thread, from, to)?;
            Ok(thread.clone())
        })
        .await
    }

    /// Same as [`move_tweet`](Self::move_tweet) with the source looked up by id
    pub async fn move_tweet_to(&self, thread_id: Uuid, tweet_id: Uuid, to: usize) -> Result<Thread, StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let from = tweet_index(thread, tweet_id)?;
            reorder(thread, from, to)?;
            Ok(thread.clone())
        })
        .await
    }

    pub async fn attach_media(
        &self,
        thread_id: Uuid,
        tweet_id: Uuid,
        media: MediaAttachment,
    ) -> Result<MediaAttachment, StoreError> {
        if media.size > self.max_media_bytes {
            return Err(StoreError::MediaTooLarge {
                size: media.size,
                max: self.max_media_bytes,
            });
        }

        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let index = tweet_index(thread, tweet_id)?;
            let tweet = &mut thread.tweets[index];
            if tweet.media.len() >= MAX_MEDIA_PER_TWEET {
                return Err(StoreError::TooManyAttachments { max: MAX_MEDIA_PER_TWEET });
            }
            tweet.media.push(media.clone());
            thread.touch();
            Ok(media)
        })
        .await
    }

    pub async fn detach_media(&self, thread_id: Uuid, tweet_id: Uuid, media_id: Uuid) -> Result<(), StoreError> {
        self.mutate(move |state| {
            let thread = find_thread_mut(state, thread_id)?;
            let index = tweet_index(thread, tweet_id)?;
            let tweet = &mut thread.tweets[index];
            let before = tweet.media.len();
            tweet.media.retain(|m| m.id != media_id);
            if tweet.media.len() == before {
                return Err(StoreError::MediaNotFound { tweet_id, media_id });
            }
            thread.touch();
            Ok(())
        })
        .await
    }

    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut ThreadState) -> Result<T, StoreError>,
    {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.file.save(&next).await?;
        *guard = next;
        Ok(out)
    }
}

fn find_thread(state: &ThreadState, thread_id: Uuid) -> Result<&Thread, StoreError> {
    state
        .threads
        .iter()
        .find(|t| t.id == thread_id)
        .ok_or(StoreError::ThreadNotFound(thread_id))
}

fn find_thread_mut(state: &mut ThreadState, thread_id: Uuid) -> Result<&mut Thread, StoreError> {
    state
        .threads
        .iter_mut()
        .find(|t| t.id == thread_id)
        .ok_or(StoreError::ThreadNotFound(thread_id))
}

fn tweet_index(thread: &Thread, tweet_id: Uuid) -> Result<usize, StoreError> {
    thread.tweet_index(tweet_id).ok_or(StoreError::TweetNotFound {
        thread_id: thread.id,
        tweet_id,
    })
}

fn reorder(thread: &mut Thread, from: usize, to: usize) -> Result<(), StoreError> {
    let len = thread.tweets.len();
    for position in [from, to] {
        if position >= len {
            return Err(StoreError::InvalidPosition { position, len });
        }
    }
    let tweet = thread.tweets.remove(from);
    thread.tweets.insert(to, tweet);
    thread.touch();
    Ok(())
}

fn validate_tweets(tweets: &[Tweet], max_media_bytes: usize) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for tweet in tweets {
        if !seen.insert(tweet.id) {
            return Err(StoreError::DuplicateTweet(tweet.id));
        }
        if tweet.media.len() > MAX_MEDIA_PER_TWEET {
            return Err(StoreError::TooManyAttachments { max: MAX_MEDIA_PER_TWEET });
        }
        if let Some(m) = tweet.media.iter().find(|m| m.data.len() > max_media_bytes) {
            return Err(StoreError::MediaTooLarge {
                size: m.data.len(),
                max: max_media_bytes,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store() -> (TempDir, ThreadStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ThreadStore::open(StateFile::in_dir(dir.path()), 1024).await.unwrap();
        (dir, store)
    }

    fn contents(thread: &Thread) -> Vec<&str> {
        thread.tweets.iter().map(|t| t.content.as_str()).collect()
    }

    #[tokio::test]
    async fn create_thread_becomes_current() {
        let (_dir, store) = open_store().await;
        let first = store.create_thread(None).await.unwrap();
        let second = store.create_thread(Some("second")).await.unwrap();

        assert_eq!(store.current_thread().await.unwrap().id, second.id);
        let ids: Vec<Uuid> = store.list_threads().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn deleting_current_thread_clears_pointer() {
        let (_dir, store) = open_store().await;
        let a = store.create_thread(Some("a")).await.unwrap();
        let b = store.create_thread(Some("b")).await.unwrap();

        store.delete_thread(a.id).await.unwrap();
        assert_eq!(store.current_thread().await.unwrap().id, b.id);

        store.delete_thread(b.id).await.unwrap();
        assert!(store.current_thread().await.is_none());
        assert!(matches!(
            store.delete_thread(b.id).await,
            Err(StoreError::ThreadNotFound(_))
        ));
    }

    #[tokio::test]
    async fn title_update_truncates_and_touches() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        let updated = store
            .update_thread_title(thread.id, "Twenty-one characters!")
            .await
            .unwrap();
        assert_eq!(updated.title, "Twenty-one character");
        assert!(updated.updated_at >= thread.updated_at);
    }

    #[tokio::test]
    async fn tweet_edits_round_trip_through_disk() {
        let (dir, store) = open_store().await;
        let thread = store.create_thread(Some("t")).await.unwrap();
        let first = store.add_tweet(thread.id, "one".into()).await.unwrap();
        store.add_tweet(thread.id, "two".into()).await.unwrap();
        store.update_tweet(thread.id, first.id, "uno".into()).await.unwrap();

        let reopened = ThreadStore::open(StateFile::in_dir(dir.path()), 1024).await.unwrap();
        let loaded = reopened.get_thread(thread.id).await.unwrap();
        assert_eq!(contents(&loaded), vec!["uno", "two"]);
        assert_eq!(reopened.current_thread().await.unwrap().id, thread.id);
    }

    #[tokio::test]
    async fn move_tweet_follows_drag_semantics() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        for c in ["a", "b", "c", "d"] {
            store.add_tweet(thread.id, c.into()).await.unwrap();
        }

        let moved = store.move_tweet(thread.id, 0, 2).await.unwrap();
        assert_eq!(contents(&moved), vec!["b", "c", "a", "d"]);

        let d = moved.tweets[3].id;
        let moved = store.move_tweet_to(thread.id, d, 0).await.unwrap();
        assert_eq!(contents(&moved), vec!["d", "b", "c", "a"]);

        assert!(matches!(
            store.move_tweet(thread.id, 1, 4).await,
            Err(StoreError::InvalidPosition { position: 4, len: 4 })
        ));
    }

    #[tokio::test]
    async fn update_thread_rejects_duplicate_ids() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        let tweet = Tweet::new("same");
        let result = store
            .update_thread(thread.id, vec![tweet.clone(), tweet])
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateTweet(_))));
        assert!(store.get_thread(thread.id).await.unwrap().tweets.is_empty());
    }

    #[tokio::test]
    async fn update_thread_measures_the_payload_not_the_size_field() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();

        let mut big = MediaAttachment::new("big.png", "image/png", vec![7; 4096]);
        big.size = 1;
        let mut tweet = Tweet::new("x");
        tweet.media.push(big);
        assert!(matches!(
            store.update_thread(thread.id, vec![tweet]).await,
            Err(StoreError::MediaTooLarge { size: 4096, max: 1024 })
        ));

        let honest = MediaAttachment::new("a.png", "image/png", vec![1, 2, 3]);
        let mut forged = honest.clone();
        forged.size = 999;
        forged.sha256 = "bogus".into();
        let mut tweet = Tweet::new("y");
        tweet.media.push(forged);
        let updated = store.update_thread(thread.id, vec![tweet]).await.unwrap();
        assert_eq!(updated.tweets[0].media[0], honest);
    }

    #[tokio::test]
    async fn media_limits_are_enforced() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        let tweet = store.add_tweet(thread.id, "pics".into()).await.unwrap();

        let too_big = MediaAttachment::new("big.bin", "application/octet-stream", vec![0; 2048]);
        assert!(matches!(
            store.attach_media(thread.id, tweet.id, too_big).await,
            Err(StoreError::MediaTooLarge { size: 2048, max: 1024 })
        ));

        for i in 0..MAX_MEDIA_PER_TWEET {
            let m = MediaAttachment::new(format!("{i}.png"), "image/png", vec![i as u8]);
            store.attach_media(thread.id, tweet.id, m).await.unwrap();
        }
        let extra = MediaAttachment::new("5.png", "image/png", vec![5]);
        assert!(matches!(
            store.attach_media(thread.id, tweet.id, extra).await,
            Err(StoreError::TooManyAttachments { .. })
        ));
    }

    #[tokio::test]
    async fn detach_unknown_media_fails() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        let tweet = store.add_tweet(thread.id, "x".into()).await.unwrap();
        let media = store
            .attach_media(thread.id, tweet.id, MediaAttachment::new("a.gif", "image/gif", vec![1]))
            .await
            .unwrap();

        store.detach_media(thread.id, tweet.id, media.id).await.unwrap();
        assert!(matches!(
            store.detach_media(thread.id, tweet.id, media.id).await,
            Err(StoreError::MediaNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn set_current_requires_known_thread() {
        let (_dir, store) = open_store().await;
        let thread = store.create_thread(None).await.unwrap();
        store.create_thread(None).await.unwrap();

        store.set_current_thread(thread.id).await.unwrap();
        assert_eq!(store.current_thread().await.unwrap().id, thread.id);
        assert!(store.set_current_thread(Uuid::new_v4()).await.is_err());
    }
}
