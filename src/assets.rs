// assets.rs - resolves each content orb's image off the render thread
//
// Requests carry the scene generation. The scene drains results once per
// frame and drops anything from an older generation, so a load that finishes
// after teardown never touches the new scene.

use crate::error::AssetError;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Path of the image for 1-based orb `number`.
pub fn image_path(asset_dir: &Path, number: usize) -> PathBuf {
    asset_dir.join(format!("img{number}.png"))
}

/// Where decoded images come from.
pub trait ImageSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<RgbaImage, AssetError>;
}

/// Reads and decodes files with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn load(&self, path: &Path) -> Result<RgbaImage, AssetError> {
        let file = File::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let img = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|r| r.decode())
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let rgba = img.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(AssetError::Empty(path.to_path_buf()));
        }
        Ok(rgba)
    }
}

#[derive(Debug)]
pub struct AssetEvent {
    pub generation: u64,
    pub index: usize,
    pub result: Result<Arc<RgbaImage>, AssetError>,
}

struct Request {
    generation: u64,
    index: usize,
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// One worker thread decodes requests in order.
    Background,
    /// Resolve inside `request`; results still arrive through `drain`.
    Inline,
}

pub struct AssetLoader {
    source: Arc<dyn ImageSource>,
    mode: LoadMode,
    requests: Option<Sender<Request>>,
    results_tx: Sender<AssetEvent>,
    results_rx: Receiver<AssetEvent>,
    /// Generation whose requests are still wanted; 0 means none.
    live: Arc<AtomicU64>,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn ImageSource>, mode: LoadMode) -> Self {
        let (results_tx, results_rx) = channel();
        Self {
            source,
            mode,
            requests: None,
            results_tx,
            results_rx,
            live: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Marks `generation` as the only one whose requests get decoded.
    pub fn begin_generation(&mut self, generation: u64) {
        self.live.store(generation, Ordering::Release);
    }

    pub fn from_files() -> Self {
        Self::new(Arc::new(FileImageSource), LoadMode::Background)
    }

    pub fn request(&mut self, generation: u64, index: usize, path: PathBuf) {
        match self.mode {
            LoadMode::Inline => {
                let result = self.source.load(&path).map(Arc::new);
                let _ = self.results_tx.send(AssetEvent { generation, index, result });
            }
            LoadMode::Background => {
                let request = Request { generation, index, path };
                let tx = self.requests.get_or_insert_with(|| spawn_worker(self.source.clone(), self.results_tx.clone(), self.live.clone()));
                if let Err(err) = tx.send(request) {
                    // worker gone: restart once
                    let tx = spawn_worker(self.source.clone(), self.results_tx.clone(), self.live.clone());
                    let _ = tx.send(err.0);
                    self.requests = Some(tx);
                }
            }
        }
    }

    /// Everything that finished since the last call.
    pub fn drain(&mut self) -> Vec<AssetEvent> {
        self.results_rx.try_iter().collect()
    }

    /// Stops the worker; queued requests are abandoned.
    pub fn shutdown(&mut self) {
        self.live.store(0, Ordering::Release);
        self.requests = None;
        // discard anything already decoded
        while self.results_rx.try_recv().is_ok() {}
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(source: Arc<dyn ImageSource>, results: Sender<AssetEvent>, live: Arc<AtomicU64>) -> Sender<Request> {
    let (tx, rx) = channel::<Request>();
    thread::spawn(move || {
        for req in rx {
            if req.generation != live.load(Ordering::Acquire) {
                continue;
            }
            let result = source.load(&req.path).map(Arc::new);
            if let Err(e) = &result {
                log::debug!("asset fallback for orb {}: {}", req.index + 1, e);
            }
            let event = AssetEvent {
                generation: req.generation,
                index: req.index,
                result,
            };
            if results.send(event).is_err() {
                break;
            }
        }
    });
    tx
}
