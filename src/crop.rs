use std::path::{Path, PathBuf};

use image::GenericImageView;
use thiserror::Error;

use crate::config::DayMenu;
use crate::system::{expand_args, run_cmd};

const LEFT_MARGIN_RATIO: f64 = 0.105;
const DAY_WIDTH_RATIO: f64 = 0.172;
const TOP_RATIO: f64 = 0.175;
const HEIGHT_RATIO: f64 = 0.70;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("rasterizing {path} failed: {message}")]
    Rasterize { path: String, message: String },
    #[error("cannot open image {path}: {message}")]
    Open { path: String, message: String },
    #[error("invalid crop geometry: {0}")]
    Geometry(String),
    #[error("cannot write {path}: {message}")]
    Save { path: String, message: String },
    #[error("crop task failed: {0}")]
    Join(String),
}

impl CropError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rasterize { .. } => "CROP_RASTERIZE_ERROR",
            Self::Open { .. } => "CROP_OPEN_ERROR",
            Self::Geometry(_) => "CROP_GEOMETRY_ERROR",
            Self::Save { .. } => "CROP_SAVE_ERROR",
            Self::Join(_) => "CROP_TASK_JOIN_ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Region of day `day_index` (1 = Monday .. 5 = Friday) on the weekly menu.
///
/// The menu is a grid of five equal day columns after a left margin. Each
/// coordinate is rounded half away from zero, then clamped to the image.
pub fn crop_rect(
    day_index: u32,
    image_width: u32,
    image_height: u32,
) -> Result<CropRect, CropError> {
    if !(1..=5).contains(&day_index) {
        return Err(CropError::Geometry(format!(
            "day index {} is outside Monday..Friday",
            day_index
        )));
    }

    let w = f64::from(image_width);
    let h = f64::from(image_height);
    let column = f64::from(day_index - 1);
    let x = (w * LEFT_MARGIN_RATIO + column * w * DAY_WIDTH_RATIO).round() as u32;
    let y = (h * TOP_RATIO).round() as u32;
    let width = (w * DAY_WIDTH_RATIO).round() as u32;
    let height = (h * HEIGHT_RATIO).round() as u32;

    let width = width.min(image_width.saturating_sub(x));
    let height = height.min(image_height.saturating_sub(y));
    if width == 0 || height == 0 {
        return Err(CropError::Geometry(format!(
            "empty region for day {} in {}x{} image",
            day_index, image_width, image_height
        )));
    }

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

pub trait Cropper {
    async fn crop_day(
        &self,
        source: &Path,
        day_index: u32,
        dest: &Path,
    ) -> Result<CropRect, CropError>;
}

/// Crops with the `image` crate; PDF menus are first rendered to PNG by an
/// external command.
pub struct ImageCropper {
    rasterize_command: Vec<String>,
    rasterize_timeout_secs: u64,
}

impl ImageCropper {
    pub fn from_config(day_menu: &DayMenu) -> Self {
        Self {
            rasterize_command: day_menu.rasterize_command.clone(),
            rasterize_timeout_secs: day_menu.rasterize_timeout_secs,
        }
    }

    async fn rasterize(&self, source: &Path, dest: &Path) -> Result<PathBuf, CropError> {
        let page = dest.with_extension("page.png");
        let source_str = source.to_string_lossy();
        let page_str = page.to_string_lossy();
        let argv = expand_args(
            &self.rasterize_command,
            &[("input", &*source_str), ("output", &*page_str)],
        );

        let output = run_cmd(&argv, self.rasterize_timeout_secs)
            .await
            .map_err(|error| CropError::Rasterize {
                path: source.display().to_string(),
                message: error.to_string(),
            })?;
        if output.status != 0 {
            return Err(CropError::Rasterize {
                path: source.display().to_string(),
                message: format!("exit status {}: {}", output.status, output.stderr.trim()),
            });
        }

        log::info!(
            "menu_rasterized source={} page={}",
            source.display(),
            page.display()
        );
        Ok(page)
    }
}

impl Cropper for ImageCropper {
    async fn crop_day(
        &self,
        source: &Path,
        day_index: u32,
        dest: &Path,
    ) -> Result<CropRect, CropError> {
        let rasterized = if is_pdf(source) {
            Some(self.rasterize(source, dest).await?)
        } else {
            None
        };
        let image_path = rasterized.clone().unwrap_or_else(|| source.to_path_buf());
        let dest = dest.to_path_buf();

        let result = tokio::task::spawn_blocking(move || crop_file(&image_path, day_index, &dest))
            .await
            .map_err(|error| CropError::Join(error.to_string()))?;

        if let Some(page) = rasterized {
            if let Err(error) = tokio::fs::remove_file(&page).await {
                log::warn!(
                    "rasterized_page_cleanup_failed path={} error={}",
                    page.display(),
                    error
                );
            }
        }

        result
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"))
}

fn crop_file(source: &Path, day_index: u32, dest: &Path) -> Result<CropRect, CropError> {
    let image = image::open(source).map_err(|error| CropError::Open {
        path: source.display().to_string(),
        message: error.to_string(),
    })?;
    let (width, height) = image.dimensions();
    let rect = crop_rect(day_index, width, height)?;

    image
        .crop_imm(rect.x, rect.y, rect.width, rect.height)
        .save(dest)
        .map_err(|error| CropError::Save {
            path: dest.display().to_string(),
            message: error.to_string(),
        })?;
    Ok(rect)
}

#[cfg(test)]
pub(crate) struct MockCropper {
    calls: std::sync::Mutex<Vec<u32>>,
    fail: bool,
}

#[cfg(test)]
impl MockCropper {
    pub(crate) fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn calls(&self) -> Vec<u32> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[cfg(test)]
impl Cropper for MockCropper {
    async fn crop_day(
        &self,
        source: &Path,
        day_index: u32,
        dest: &Path,
    ) -> Result<CropRect, CropError> {
        self.calls.lock().expect("calls lock").push(day_index);
        if self.fail {
            return Err(CropError::Rasterize {
                path: source.display().to_string(),
                message: "rasterizer exited with status 1".to_string(),
            });
        }
        std::fs::write(dest, b"thumbnail").map_err(|error| CropError::Save {
            path: dest.display().to_string(),
            message: error.to_string(),
        })?;
        crop_rect(day_index, 1000, 800)
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, RgbImage};
    use tempfile::tempdir;

    use super::{CropError, CropRect, Cropper, ImageCropper, crop_rect};
    use crate::config::DayMenu;

    #[test]
    fn wednesday_rect_matches_grid() {
        let rect = crop_rect(3, 1000, 800).expect("valid geometry");
        assert_eq!(
            rect,
            CropRect {
                x: 449,
                y: 140,
                width: 172,
                height: 560,
            }
        );
    }

    #[test]
    fn friday_stays_inside_the_image() {
        let rect = crop_rect(5, 997, 601).expect("valid geometry");
        assert!(rect.x + rect.width <= 997);
        assert!(rect.y + rect.height <= 601);
    }

    #[test]
    fn weekend_index_is_rejected() {
        assert!(matches!(crop_rect(6, 1000, 800), Err(CropError::Geometry(_))));
        assert!(matches!(crop_rect(0, 1000, 800), Err(CropError::Geometry(_))));
    }

    #[tokio::test]
    async fn crops_png_menu_without_rasterizing() {
        let temp = tempdir().expect("tempdir should be created");
        let source = temp.path().join("menu.png");
        let dest = temp.path().join("monday.png");
        RgbImage::new(1000, 800).save(&source).expect("source image saved");

        let cropper = ImageCropper::from_config(&DayMenu::default());
        let rect = cropper
            .crop_day(&source, 1, &dest)
            .await
            .expect("crop should succeed");

        assert_eq!(rect.x, 105);
        let thumbnail = image::open(&dest).expect("thumbnail readable");
        assert_eq!(thumbnail.dimensions(), (172, 560));
    }

    #[tokio::test]
    async fn unreadable_image_is_a_crop_error() {
        let temp = tempdir().expect("tempdir should be created");
        let source = temp.path().join("menu.png");
        std::fs::write(&source, b"not an image").expect("source written");

        let cropper = ImageCropper::from_config(&DayMenu::default());
        let error = cropper
            .crop_day(&source, 2, &temp.path().join("out.png"))
            .await
            .expect_err("garbage cannot be decoded");
        assert_eq!(error.code(), "CROP_OPEN_ERROR");
    }
}
