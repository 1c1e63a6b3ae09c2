//! Upload resolution for picked images.
//!
//! Every picked image gets its placeholder attachment right away, which pins
//! its position in the post. Resolution then runs as one task per image on a
//! `JoinSet`, with a semaphore bounding how many transfers are active. Tasks
//! never touch the composition: their outcomes are collected by the owner
//! and applied through [`CompositionState::apply_upload`], matched by id.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, Id, JoinSet};

use crate::composition::CompositionState;
use crate::error::{CompositionResult, UploadError};
use crate::models::{AttachmentId, CompositionConfig, LocalImage};

/// Object-storage collaborator: turns a local image into a remote URL
pub trait UploadResolver: Send + Sync {
    fn resolve(
        &self,
        image: &LocalImage,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;
}

/// Result of one resolution task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub id: AttachmentId,
    pub result: Result<String, UploadError>,
}

pub struct UploadCoordinator<R> {
    resolver: Arc<R>,
    limiter: Arc<Semaphore>,
    tasks: JoinSet<UploadOutcome>,
    handles: HashMap<AttachmentId, AbortHandle>,
    owners: HashMap<Id, AttachmentId>,
}

impl<R: UploadResolver + 'static> UploadCoordinator<R> {
    pub fn new(resolver: R, config: &CompositionConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            limiter: Arc::new(Semaphore::new(config.max_concurrent_uploads.max(1))),
            tasks: JoinSet::new(),
            handles: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Reserves placeholders for `images` in pick order and starts resolving them.
    ///
    /// Must be called from within a tokio runtime. Fails without reserving
    /// anything if the batch does not fit.
    pub fn accept_batch(
        &mut self,
        state: &mut CompositionState,
        images: Vec<LocalImage>,
    ) -> CompositionResult<Vec<AttachmentId>> {
        let ids = state.reserve_batch(&images)?;

        for (id, image) in ids.iter().copied().zip(images) {
            let resolver = Arc::clone(&self.resolver);
            let limiter = Arc::clone(&self.limiter);

            let handle = self.tasks.spawn(async move {
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return UploadOutcome {
                            id,
                            result: Err(UploadError::Other("upload queue closed".to_string())),
                        }
                    }
                };
                log::debug!("Resolving {} for attachment {}", image.uri, id);
                let result = resolver.resolve(&image).await;
                UploadOutcome { id, result }
            });
            self.owners.insert(handle.id(), id);
            self.handles.insert(id, handle);
        }

        log::info!("Started {} upload(s)", ids.len());
        Ok(ids)
    }

    /// Number of resolutions not yet collected
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Aborts the resolution task of a removed attachment
    pub fn cancel(&mut self, id: AttachmentId) -> bool {
        match self.handles.remove(&id) {
            Some(handle) => {
                handle.abort();
                log::debug!("Cancelled upload of attachment {}", id);
                true
            }
            None => false,
        }
    }

    /// Waits for the next resolution to finish, in completion order.
    ///
    /// A task that panicked yields a failed outcome for its attachment.
    /// Returns `None` once nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<UploadOutcome> {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            match joined {
                Ok((task, outcome)) => {
                    self.owners.remove(&task);
                    self.handles.remove(&outcome.id);
                    return Some(outcome);
                }
                Err(e) => {
                    let Some(id) = self.owners.remove(&e.id()) else {
                        continue;
                    };
                    self.handles.remove(&id);
                    if e.is_cancelled() {
                        continue;
                    }
                    log::error!("Upload task for attachment {} failed: {}", id, e);
                    return Some(UploadOutcome {
                        id,
                        result: Err(UploadError::Other("upload task panicked".to_string())),
                    });
                }
            }
        }
        None
    }

    /// Applies every outstanding outcome to `state`; returns how many applied
    pub async fn drain(&mut self, state: &mut CompositionState) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.next_outcome().await {
            if state.apply_upload(outcome) {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Resolver whose completions are released by the test, one image at a time
    pub struct ManualResolver {
        pending: Mutex<HashMap<String, oneshot::Receiver<Result<String, UploadError>>>>,
    }

    pub struct Releases {
        senders: HashMap<String, oneshot::Sender<Result<String, UploadError>>>,
    }

    impl Releases {
        pub fn complete(&mut self, uri: &str, result: Result<String, UploadError>) {
            if let Some(tx) = self.senders.remove(uri) {
                let _ = tx.send(result);
            }
        }
    }

    pub fn manual_resolver(uris: &[&str]) -> (ManualResolver, Releases) {
        let mut receivers = HashMap::new();
        let mut senders = HashMap::new();
        for uri in uris {
            let (tx, rx) = oneshot::channel();
            senders.insert(uri.to_string(), tx);
            receivers.insert(uri.to_string(), rx);
        }
        (
            ManualResolver {
                pending: Mutex::new(receivers),
            },
            Releases { senders },
        )
    }

    impl UploadResolver for ManualResolver {
        fn resolve(
            &self,
            image: &LocalImage,
        ) -> impl Future<Output = Result<String, UploadError>> + Send {
            let rx = self.pending.lock().unwrap().remove(&image.uri);
            async move {
                match rx {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(UploadError::Other("released".to_string()))),
                    None => Err(UploadError::Other("unexpected image".to_string())),
                }
            }
        }
    }

    /// Panics on URIs containing "panic", resolves the rest
    pub struct PanickingResolver;

    impl UploadResolver for PanickingResolver {
        fn resolve(
            &self,
            image: &LocalImage,
        ) -> impl Future<Output = Result<String, UploadError>> + Send {
            let uri = image.uri.clone();
            async move {
                if uri.contains("panic") {
                    panic!("resolver blew up on {}", uri);
                }
                Ok(format!("https://cdn.example.com/{}", uri))
            }
        }
    }

    /// Resolves immediately; URIs containing "broken" fail
    pub struct InstantResolver;

    impl UploadResolver for InstantResolver {
        fn resolve(
            &self,
            image: &LocalImage,
        ) -> impl Future<Output = Result<String, UploadError>> + Send {
            let uri = image.uri.clone();
            async move {
                if uri.contains("broken") {
                    Err(UploadError::CorruptImage(uri))
                } else {
                    Ok(format!("https://cdn.example.com/{}", uri))
                }
            }
        }
    }
}
