//! Async file picking and dropped-file reading with cross-platform support.
//!
//! Uses channel-based communication to bridge async file dialogs
//! with egui's synchronous update loop.

use crate::state::ImageCandidate;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Extensions offered by the image file dialog.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Result of a file pick operation.
#[derive(Clone)]
pub struct FilePickResult {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

impl From<FilePickResult> for ImageCandidate {
    fn from(result: FilePickResult) -> Self {
        ImageCandidate::from_named_bytes(result.file_name, result.file_data)
    }
}

/// Channel-based file picker for async file dialog integration.
///
/// File dialogs are async but egui's update() is synchronous.
/// This struct provides a channel to pass results from the async
/// file picker task back to the UI thread.
pub struct FilePickerChannel {
    sender: Sender<Option<FilePickResult>>,
    receiver: Receiver<Option<FilePickResult>>,
}

impl Default for FilePickerChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePickerChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns an async file picker dialog.
    ///
    /// On native: spawns a new thread using pollster to block on the async dialog.
    /// On WASM: uses wasm_bindgen_futures::spawn_local.
    ///
    /// When the dialog completes (or is cancelled), the result is sent through
    /// the channel and ctx.request_repaint() is called to trigger a UI update.
    pub fn pick_file(&self, ctx: egui::Context) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(async_pick_file());
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = async_pick_file().await;
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a completed file pick.
    ///
    /// Returns Some(Some(result)) if a file was picked,
    /// Some(None) if the dialog was cancelled,
    /// None if no result is ready yet.
    pub fn try_recv(&self) -> Option<Option<FilePickResult>> {
        self.receiver.try_recv().ok()
    }
}

/// Async file picker implementation using rfd.
async fn async_pick_file() -> Option<FilePickResult> {
    let file = rfd::AsyncFileDialog::new()
        .set_title("Select Rainy Image")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
        .await?;

    let file_name = file.file_name();
    let file_data = file.read().await;
    log::info!("Picked {} ({} bytes)", file_name, file_data.len());

    Some(FilePickResult {
        file_name,
        file_data,
    })
}

/// Channel-based reader for files dropped onto the window.
///
/// Browsers deliver dropped bytes with the event, but native drops only carry
/// a path. Reading that path happens off the UI thread and the candidate
/// arrives through the channel like a picked file does.
pub struct DroppedFileChannel {
    sender: Sender<Option<ImageCandidate>>,
    receiver: Receiver<Option<ImageCandidate>>,
}

impl Default for DroppedFileChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DroppedFileChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Queue a dropped file for conversion into a candidate.
    ///
    /// Files that already carry their bytes are converted immediately.
    pub fn read(&self, ctx: egui::Context, file: egui::DroppedFile) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        if file.bytes.is_none() && file.path.is_some() {
            std::thread::spawn(move || {
                let _ = sender.send(candidate_from_dropped(&file));
                ctx.request_repaint();
            });
            return;
        }

        let _ = sender.send(candidate_from_dropped(&file));
        ctx.request_repaint();
    }

    /// Non-blocking check for a read drop.
    ///
    /// Returns Some(Some(candidate)) for a readable file, Some(None) for a
    /// drop without content, None if nothing is ready yet.
    pub fn try_recv(&self) -> Option<Option<ImageCandidate>> {
        self.receiver.try_recv().ok()
    }
}

/// Turn a file dropped onto the window into a candidate.
///
/// Browsers hand over the bytes and a MIME type. Native drops only carry a
/// path, so the file is read here (blocking) and its type comes from the
/// extension. Returns `None` when no content can be obtained.
pub fn candidate_from_dropped(file: &egui::DroppedFile) -> Option<ImageCandidate> {
    let name = if file.name.is_empty() {
        file.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        file.name.clone()
    };

    let bytes = match (&file.bytes, &file.path) {
        (Some(bytes), _) => bytes.clone(),
        (None, Some(path)) => match std::fs::read(path) {
            Ok(data) => data.into(),
            Err(e) => {
                log::warn!("Failed to read dropped file {}: {}", path.display(), e);
                return None;
            }
        },
        (None, None) => return None,
    };

    if file.mime.is_empty() {
        Some(ImageCandidate::from_named_bytes(name, bytes))
    } else {
        Some(ImageCandidate::new(name, file.mime.clone(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_dropped_bytes_keep_declared_mime() {
        let file = egui::DroppedFile {
            name: "rain.bin".to_string(),
            mime: "image/png".to_string(),
            bytes: Some(Arc::from(vec![1u8, 2, 3])),
            ..Default::default()
        };

        let candidate = candidate_from_dropped(&file).unwrap();
        assert_eq!(candidate.name, "rain.bin");
        assert_eq!(candidate.content_type, "image/png");
        assert_eq!(candidate.bytes.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_dropped_without_mime_infers_from_name() {
        let file = egui::DroppedFile {
            name: "notes.txt".to_string(),
            bytes: Some(Arc::from(b"hello".to_vec())),
            ..Default::default()
        };

        let candidate = candidate_from_dropped(&file).unwrap();
        assert!(!candidate.is_image());
    }

    #[test]
    fn test_dropped_from_path() {
        let dir = std::env::temp_dir().join("derain-workbench-drop-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("photo.jpg");
        std::fs::write(&path, b"jpeg-ish").unwrap();

        let file = egui::DroppedFile {
            path: Some(path.clone()),
            ..Default::default()
        };

        let candidate = candidate_from_dropped(&file).unwrap();
        assert_eq!(candidate.name, "photo.jpg");
        assert_eq!(candidate.content_type, "image/jpeg");
        assert_eq!(candidate.bytes.as_ref(), b"jpeg-ish");

        std::fs::remove_file(path).ok();
    }

    fn wait_for(channel: &DroppedFileChannel) -> Option<ImageCandidate> {
        let deadline = web_time::Instant::now() + std::time::Duration::from_secs(10);
        loop {
            if let Some(result) = channel.try_recv() {
                return result;
            }
            assert!(web_time::Instant::now() < deadline, "no drop result received");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn test_channel_reads_dropped_path() {
        let dir = std::env::temp_dir().join("derain-workbench-drop-channel-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storm.png");
        std::fs::write(&path, b"png-ish").unwrap();

        let channel = DroppedFileChannel::new();
        channel.read(
            egui::Context::default(),
            egui::DroppedFile {
                path: Some(path.clone()),
                ..Default::default()
            },
        );

        let candidate = wait_for(&channel).expect("candidate read");
        assert_eq!(candidate.name, "storm.png");
        assert_eq!(candidate.content_type, "image/png");
        assert_eq!(candidate.bytes.as_ref(), b"png-ish");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_channel_passes_bytes_through() {
        let channel = DroppedFileChannel::new();
        channel.read(
            egui::Context::default(),
            egui::DroppedFile {
                name: "rain.png".to_string(),
                mime: "image/png".to_string(),
                bytes: Some(Arc::from(vec![7u8])),
                ..Default::default()
            },
        );
        assert_eq!(
            channel.try_recv().flatten().map(|c| c.name),
            Some("rain.png".to_string())
        );

        channel.read(egui::Context::default(), egui::DroppedFile::default());
        assert_eq!(channel.try_recv().map(|c| c.is_none()), Some(true));
    }

    #[test]
    fn test_empty_drop() {
        assert!(candidate_from_dropped(&egui::DroppedFile::default()).is_none());
    }

    #[test]
    fn test_pick_result_infers_type() {
        let candidate: ImageCandidate = FilePickResult {
            file_name: "photo.png".to_string(),
            file_data: vec![0; 4],
        }
        .into();
        assert_eq!(candidate.content_type, "image/png");
    }
}
