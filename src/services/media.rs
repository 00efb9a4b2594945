//! Uploaded images: book covers and reader avatars
//!
//! Geometry is computed by pure functions so it can be tested without I/O;
//! [`MediaService`] decodes the upload, applies the transformation on the
//! blocking pool and writes the result below the media root.

use std::{future::Future, path::PathBuf};

use image::{imageops::FilterType, DynamicImage, ImageFormat};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Covers are shrunk to fit this box
pub const COVER_MAX_SIZE: u32 = 240;
/// Avatars are squared then scaled to this side
pub const AVATAR_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Cover,
    Avatar,
}

impl MediaKind {
    /// Sub-directory of the media root
    pub fn dir(&self) -> &'static str {
        match self {
            MediaKind::Cover => "book",
            MediaKind::Avatar => "user",
        }
    }

    pub fn transform(&self, img: DynamicImage) -> DynamicImage {
        match self {
            MediaKind::Cover => make_cover(img),
            MediaKind::Avatar => make_avatar(img),
        }
    }
}

/// Size of an image scaled down to fit `max`×`max`, aspect ratio kept.
/// Images already inside the box are left alone.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let ratio = f64::min(max as f64 / width as f64, max as f64 / height as f64);
    let scaled = |side: u32| ((side as f64 * ratio).round() as u32).clamp(1, max);
    (scaled(width), scaled(height))
}

/// Largest centered square: `(x, y, side)`
pub fn center_square(width: u32, height: u32) -> (u32, u32, u32) {
    if width > height {
        ((width - height) / 2, 0, height)
    } else {
        (0, (height - width) / 2, width)
    }
}

pub fn make_cover(img: DynamicImage) -> DynamicImage {
    let (width, height) = fit_within(img.width(), img.height(), COVER_MAX_SIZE);
    if (width, height) == (img.width(), img.height()) {
        return img;
    }
    img.resize_exact(width, height, FilterType::CatmullRom)
}

pub fn make_avatar(img: DynamicImage) -> DynamicImage {
    let (x, y, side) = center_square(img.width(), img.height());
    img.crop_imm(x, y, side, side)
        .resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::CatmullRom)
}

/// JPEG uploads stay JPEG, everything else is stored as PNG
fn output_format(input: ImageFormat) -> (ImageFormat, &'static str) {
    match input {
        ImageFormat::Jpeg => (ImageFormat::Jpeg, "jpg"),
        _ => (ImageFormat::Png, "png"),
    }
}

#[derive(Clone)]
pub struct MediaService {
    root: PathBuf,
}

impl MediaService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Decode, transform and store an upload.
    /// Returns the stored path relative to the media root, e.g. `book/<uuid>.png`.
    pub async fn store(&self, kind: MediaKind, bytes: Vec<u8>) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Empty upload".to_string()));
        }

        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let name = Uuid::new_v4();
        let relative = tokio::task::spawn_blocking(move || -> AppResult<String> {
            let input = image::guess_format(&bytes)?;
            let img = image::load_from_memory_with_format(&bytes, input)?;
            let (format, ext) = output_format(input);

            let mut out = kind.transform(img);
            if format == ImageFormat::Jpeg {
                out = DynamicImage::ImageRgb8(out.to_rgb8());
            }

            let file_name = format!("{}.{}", name, ext);
            out.save_with_format(dir.join(&file_name), format)?;
            Ok(format!("{}/{}", kind.dir(), file_name))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Image task failed: {}", e)))??;

        tracing::debug!(path = %relative, "stored upload");
        Ok(relative)
    }

    /// Store an upload and hand its path to `attach`, which records it.
    ///
    /// The new file is removed again when `attach` fails; otherwise the
    /// `previous` file is.
    pub async fn replace<T, F, Fut>(
        &self,
        kind: MediaKind,
        bytes: Vec<u8>,
        previous: Option<String>,
        attach: F,
    ) -> AppResult<(String, T)>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let path = self.store(kind, bytes).await?;

        match attach(path.clone()).await {
            Ok(record) => {
                if let Some(old) = previous {
                    self.remove(&old).await;
                }
                Ok((path, record))
            }
            Err(e) => {
                self.remove(&path).await;
                Err(e)
            }
        }
    }

    /// Best-effort removal of a previously stored file
    pub async fn remove(&self, relative: &str) {
        if relative.is_empty() || relative.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::debug!(path = %relative, "could not remove old media file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(480, 240, 240), (240, 120));
        assert_eq!(fit_within(300, 600, 240), (120, 240));
        assert_eq!(fit_within(1000, 1, 240), (240, 1));
        // never enlarged
        assert_eq!(fit_within(100, 50, 240), (100, 50));
        assert_eq!(fit_within(240, 240, 240), (240, 240));
    }

    #[test]
    fn test_center_square() {
        assert_eq!(center_square(400, 300), (50, 0, 300));
        assert_eq!(center_square(300, 400), (0, 50, 300));
        assert_eq!(center_square(301, 300), (0, 0, 300));
        assert_eq!(center_square(128, 128), (0, 0, 128));
    }

    #[test]
    fn test_cover_transform() {
        let big = DynamicImage::new_rgb8(960, 480);
        let cover = make_cover(big);
        assert_eq!((cover.width(), cover.height()), (240, 120));

        let small = DynamicImage::new_rgb8(120, 80);
        let cover = make_cover(small);
        assert_eq!((cover.width(), cover.height()), (120, 80));
    }

    #[test]
    fn test_avatar_transform() {
        for (w, h) in [(640, 480), (50, 90), (200, 200)] {
            let avatar = make_avatar(DynamicImage::new_rgb8(w, h));
            assert_eq!((avatar.width(), avatar.height()), (AVATAR_SIZE, AVATAR_SIZE));
        }
    }

    #[tokio::test]
    async fn test_store_writes_under_kind_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaService::new(tmp.path().to_path_buf());

        let path = media.store(MediaKind::Avatar, png_bytes(300, 150)).await.unwrap();
        assert!(path.starts_with("user/"));
        assert!(path.ends_with(".png"));

        let stored = image::open(tmp.path().join(&path)).unwrap();
        assert_eq!((stored.width(), stored.height()), (200, 200));

        let cover = media.store(MediaKind::Cover, png_bytes(600, 300)).await.unwrap();
        assert!(cover.starts_with("book/"));
        let stored = image::open(tmp.path().join(&cover)).unwrap();
        assert_eq!((stored.width(), stored.height()), (240, 120));

        media.remove(&cover).await;
        assert!(!tmp.path().join(&cover).exists());
    }

    #[tokio::test]
    async fn test_store_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaService::new(tmp.path().to_path_buf());

        assert!(matches!(
            media.store(MediaKind::Cover, Vec::new()).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            media.store(MediaKind::Cover, b"not an image".to_vec()).await,
            Err(AppError::Image(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_swaps_files() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaService::new(tmp.path().to_path_buf());
        let old = media.store(MediaKind::Cover, png_bytes(60, 40)).await.unwrap();

        let (path, id) = media
            .replace(MediaKind::Cover, png_bytes(60, 40), Some(old.clone()), |_| async { Ok(3) })
            .await
            .unwrap();
        assert_eq!(id, 3);
        assert!(tmp.path().join(&path).exists());
        assert!(!tmp.path().join(&old).exists());
    }

    #[tokio::test]
    async fn test_replace_drops_new_file_when_attach_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaService::new(tmp.path().to_path_buf());
        let old = media.store(MediaKind::Avatar, png_bytes(60, 40)).await.unwrap();

        let result: AppResult<(String, ())> = media
            .replace(MediaKind::Avatar, png_bytes(60, 40), Some(old.clone()), |_| async {
                Err(AppError::NotFound("User profile 9 not found".to_string()))
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // only the previous avatar is left
        let files: Vec<_> = std::fs::read_dir(tmp.path().join("user")).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(tmp.path().join(&old).exists());
    }
}
