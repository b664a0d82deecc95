use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_SWAP_DELAY: Duration = Duration::from_millis(300);

/// Where rendered views go. `swap` is fire-and-forget; `replace_region`
/// rewrites one element inside the current markup right away.
pub trait ContentSink {
    fn swap(&self, html: String);

    fn replace_region(&self, element_id: &str, html: &str) -> bool;
}

impl<T: ContentSink + ?Sized> ContentSink for Arc<T> {
    fn swap(&self, html: String) {
        (**self).swap(html)
    }

    fn replace_region(&self, element_id: &str, html: &str) -> bool {
        (**self).replace_region(element_id, html)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentArea {
    html: String,
    opacity: f32,
}

impl Default for ContentArea {
    fn default() -> Self {
        Self {
            html: String::new(),
            opacity: 1.0,
        }
    }
}

impl ContentArea {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    fn begin_fade(&mut self) {
        self.opacity = 0.0;
    }

    fn finish(&mut self, html: String) {
        self.html = html;
        self.opacity = 1.0;
    }

    /// Replaces the inner markup of the element carrying `id="{element_id}"`.
    /// Only markup produced by the renderer is expected here, so tags are
    /// balanced and text content is escaped.
    pub fn replace_inner(&mut self, element_id: &str, inner: &str) -> bool {
        let attr = format!("id=\"{element_id}\"");
        let Some(attr_at) = self.html.find(&attr) else {
            return false;
        };
        let Some(tag_at) = self.html[..attr_at].rfind('<') else {
            return false;
        };
        let tag: String = self.html[tag_at + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        let Some(open_end) = self.html[attr_at..].find('>') else {
            return false;
        };
        let start = attr_at + open_end + 1;

        let open = format!("<{tag}");
        let close = format!("</{tag}>");
        let mut depth = 1usize;
        let mut cursor = start;
        let end = loop {
            let rest = &self.html[cursor..];
            let Some(next_close) = rest.find(&close) else {
                return false;
            };
            match rest.find(&open) {
                Some(next_open) if next_open < next_close => {
                    depth += 1;
                    cursor += next_open + open.len();
                }
                _ => {
                    depth -= 1;
                    if depth == 0 {
                        break cursor + next_close;
                    }
                    cursor += next_close + close.len();
                }
            }
        };
        self.html.replace_range(start..end, inner);
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Timed fade-and-replace over a shared content area. Every swap takes a new
/// generation; a pending swap that is no longer the latest when its timer
/// fires is dropped, so older markup can never overwrite newer markup.
#[derive(Clone, Debug)]
pub struct ContentSwapper {
    area: Arc<Mutex<ContentArea>>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ContentSwapper {
    pub fn new(delay: Duration) -> Self {
        Self {
            area: Arc::new(Mutex::new(ContentArea::default())),
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn snapshot(&self) -> ContentArea {
        lock(&self.area).clone()
    }

    pub fn html(&self) -> String {
        lock(&self.area).html().to_string()
    }

    pub fn pending(&self) -> usize {
        lock(&self.pending).iter().filter(|h| !h.is_finished()).count()
    }

    /// Waits for every swap issued so far to either land or be discarded.
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *lock(&self.pending));
        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "content swap task failed");
            }
        }
    }
}

impl Default for ContentSwapper {
    fn default() -> Self {
        Self::new(DEFAULT_SWAP_DELAY)
    }
}

impl ContentSink for ContentSwapper {
    fn swap(&self, html: String) {
        let generation = {
            let mut area = lock(&self.area);
            area.begin_fade();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let area = Arc::clone(&self.area);
        let latest = Arc::clone(&self.generation);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut area = lock(&area);
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "discarding superseded content swap");
                return;
            }
            area.finish(html);
        });

        let mut pending = lock(&self.pending);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn replace_region(&self, element_id: &str, html: &str) -> bool {
        lock(&self.area).replace_inner(element_id, html)
    }
}
