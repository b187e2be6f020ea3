//! Thumbnail cache and image acquisition.
//!
//! Decoding and fetching happen on short-lived worker threads. Every job is
//! single-shot and cannot be cancelled; it pushes its result into a shared
//! inbox that the event thread drains with [`ImageCache::drain`]. A failed
//! job leaves its slot blank and is never retried.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gymplan_core::{Color, ImageData, ImageHandle};
use gymplan_model::ImageRef;
use parking_lot::{Condvar, Mutex};

use crate::icons;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("no network access for {0}")]
    Offline(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("malformed data URL")]
    DataUrl,
    #[error("bad base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("stored image '{0}' is missing")]
    MissingBlob(String),
    #[error("preset icon '{0}' is drawn in place and has no encoded bytes")]
    PresetSource(String),
    #[error("could not start image worker: {0}")]
    Spawn(std::io::Error),
}

/// Transport for `http(s)` image URLs.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// Fails every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl Fetch for Offline {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::Offline(url.to_string()))
    }
}

/// Where the pixels of an image come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Preset(String),
    Url(String),
    File(PathBuf),
    Stored { id: String, data_url: String },
}

/// Cache key; the same values an item's [`ImageRef`] carries.
pub type ImageKey = ImageRef;

#[derive(Clone, Debug)]
enum Slot {
    Pending,
    Ready(ImageHandle),
    Failed,
}

/// A finished URL/file acquisition waiting to be attached to an item.
#[derive(Debug)]
pub struct Acquired {
    pub item_id: String,
    pub result: Result<String, ImageError>,
}

enum Completion {
    Thumb {
        key: ImageKey,
        result: Result<ImageData, ImageError>,
    },
    Acquired(Acquired),
}

#[derive(Default)]
struct Inbox {
    done: Vec<Completion>,
    running: usize,
}

#[derive(Default)]
struct Shared {
    inbox: Mutex<Inbox>,
    idle: Condvar,
}

impl Shared {
    fn finish(&self, c: Completion) {
        let mut inbox = self.inbox.lock();
        inbox.done.push(c);
        inbox.running = inbox.running.saturating_sub(1);
        if inbox.running == 0 {
            self.idle.notify_all();
        }
    }
}

/// Result of draining the inbox.
#[derive(Debug, Default)]
pub struct Drained {
    /// At least one thumbnail became ready.
    pub thumbs_ready: bool,
    pub acquired: Vec<Acquired>,
}

pub struct ImageCache {
    slots: HashMap<ImageKey, Slot>,
    shared: Arc<Shared>,
    fetch: Arc<dyn Fetch>,
    background: Color,
    accent: Color,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(Arc::new(Offline))
    }
}

impl ImageCache {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        let theme = gymplan_core::Theme::default();
        Self {
            slots: HashMap::new(),
            shared: Arc::new(Shared::default()),
            fetch,
            background: theme.background,
            accent: theme.accent,
        }
    }

    /// Colors for synthesized icons. Already cached icons are dropped so they
    /// are redrawn.
    pub fn set_icon_colors(&mut self, background: Color, accent: Color) {
        if (background, accent) != (self.background, self.accent) {
            self.slots.retain(|k, _| !matches!(k, ImageRef::Preset(_)));
        }
        self.background = background;
        self.accent = accent;
    }

    /// Decoded image for `key`, if it has arrived.
    pub fn get(&self, key: &ImageKey) -> Option<ImageHandle> {
        match self.slots.get(key) {
            Some(Slot::Ready(h)) => Some(h.clone()),
            _ => None,
        }
    }

    pub fn is_pending(&self, key: &ImageKey) -> bool {
        matches!(self.slots.get(key), Some(Slot::Pending))
    }

    pub fn is_failed(&self, key: &ImageKey) -> bool {
        matches!(self.slots.get(key), Some(Slot::Failed))
    }

    /// Starts resolving `key` unless it is cached, in flight or has failed.
    /// `blob` is the stored data URL for `Stored` keys.
    pub fn request(&mut self, key: &ImageKey, blob: Option<&str>) {
        if self.slots.contains_key(key) {
            return;
        }
        let source = match key {
            ImageRef::Preset(k) => ImageSource::Preset(k.clone()),
            ImageRef::Stored(id) => match blob {
                Some(data_url) => ImageSource::Stored {
                    id: id.clone(),
                    data_url: data_url.to_string(),
                },
                None => {
                    log::warn!("{}", ImageError::MissingBlob(id.clone()));
                    self.slots.insert(key.clone(), Slot::Failed);
                    return;
                }
            },
        };
        self.slots.insert(key.clone(), Slot::Pending);

        let (bg, accent) = (self.background, self.accent);
        let fetch = self.fetch.clone();
        let job_key = key.clone();
        let shared = self.shared.clone();
        let spawned = self.spawn(move || {
            let result = load_thumbnail(&source, fetch.as_ref(), bg, accent);
            shared.finish(Completion::Thumb {
                key: job_key,
                result,
            });
        });
        if let Err(e) = spawned {
            log::warn!("{e}");
            self.slots.insert(key.clone(), Slot::Failed);
        }
    }

    /// Fetches or reads an image for `item_id` and re-encodes it as a PNG
    /// data URL. The result comes back through [`drain`](Self::drain).
    pub fn acquire(&mut self, item_id: &str, source: ImageSource) -> Result<(), ImageError> {
        let fetch = self.fetch.clone();
        let shared = self.shared.clone();
        let item_id = item_id.to_string();
        log::info!("acquiring image for item {item_id} from {source:?}");
        self.spawn(move || {
            let result = read_source(&source, fetch.as_ref()).and_then(|bytes| reencode_png(&bytes));
            shared.finish(Completion::Acquired(Acquired { item_id, result }));
        })
    }

    fn spawn(&self, job: impl FnOnce() + Send + 'static) -> Result<(), ImageError> {
        self.shared.inbox.lock().running += 1;
        let spawned = std::thread::Builder::new()
            .name("gymplan-image".into())
            .spawn(job);
        match spawned {
            Ok(_) => Ok(()),
            Err(e) => {
                let mut inbox = self.shared.inbox.lock();
                inbox.running = inbox.running.saturating_sub(1);
                Err(ImageError::Spawn(e))
            }
        }
    }

    /// Moves finished thumbnails into the cache and hands back finished
    /// acquisitions.
    pub fn drain(&mut self) -> Drained {
        let done = std::mem::take(&mut self.shared.inbox.lock().done);
        let mut out = Drained::default();
        for c in done {
            match c {
                Completion::Thumb { key, result } => match result {
                    Ok(img) => {
                        log::debug!("thumbnail ready: {key:?}");
                        self.slots.insert(key, Slot::Ready(Arc::new(img)));
                        out.thumbs_ready = true;
                    }
                    Err(e) => {
                        log::warn!("thumbnail {key:?} failed: {e}");
                        self.slots.insert(key, Slot::Failed);
                    }
                },
                Completion::Acquired(a) => out.acquired.push(a),
            }
        }
        out
    }

    /// Number of jobs still running.
    pub fn in_flight(&self) -> usize {
        self.shared.inbox.lock().running
    }

    /// Blocks until every job has reported or `timeout` passes. Returns
    /// `true` when idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let mut inbox = self.shared.inbox.lock();
        if inbox.running == 0 {
            return true;
        }
        let deadline = std::time::Instant::now() + timeout;
        while inbox.running > 0 {
            if self.shared.idle.wait_until(&mut inbox, deadline).timed_out() {
                return inbox.running == 0;
            }
        }
        true
    }
}

fn load_thumbnail(
    source: &ImageSource,
    fetch: &dyn Fetch,
    background: Color,
    accent: Color,
) -> Result<ImageData, ImageError> {
    if let ImageSource::Preset(key) = source {
        return Ok(icons::icon_data(key, background, accent));
    }
    decode(&read_source(source, fetch)?)
}

/// Raw encoded bytes of a non-preset source.
fn read_source(source: &ImageSource, fetch: &dyn Fetch) -> Result<Vec<u8>, ImageError> {
    match source {
        ImageSource::Preset(key) => Err(ImageError::PresetSource(key.clone())),
        ImageSource::Url(url) if url.starts_with("data:") => decode_data_url(url),
        ImageSource::Url(url) => fetch.fetch(url),
        ImageSource::File(path) => std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.clone(),
            source,
        }),
        ImageSource::Stored { data_url, .. } => decode_data_url(data_url),
    }
}

pub fn decode(bytes: &[u8]) -> Result<ImageData, ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

fn encode_png(img: image::DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

/// Any decodable image bytes to a `data:image/png;base64,...` string.
pub fn reencode_png(bytes: &[u8]) -> Result<String, ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok(encode_data_url("image/png", &encode_png(img)?))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Payload bytes of a base64 data URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageError> {
    let rest = url.strip_prefix("data:").ok_or(ImageError::DataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::DataUrl)?;
    if !header.ends_with(";base64") {
        return Err(ImageError::DataUrl);
    }
    Ok(STANDARD.decode(payload.trim())?)
}
