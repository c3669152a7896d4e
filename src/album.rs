use crate::canvas::Caption;
use crate::color::{Rgb, PINK, ROSE, WHITE};
use crate::config::Photos;
use crate::surface::Surface;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::path::PathBuf;

const PLACEHOLDER_WIDTH: u32 = 800;
const PLACEHOLDER_HEIGHT: u32 = 600;
const MIN_SLIDES: usize = 3;
const FRAME_BORDER: f32 = 12.0;

/// One picture in the album, decoded or generated.
pub struct Slide {
    image: RgbImage,
    label: String,
    placeholder: bool,
}

impl Slide {
    pub fn photo(image: RgbImage, index: usize) -> Self {
        Self {
            image,
            label: format!("Our photo {index}"),
            placeholder: false,
        }
    }

    /// Pink gradient card with a faint heart, standing in for photo `index`.
    pub fn placeholder(index: usize) -> Self {
        let (w, h) = (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
        let image = RgbImage::from_fn(w, h, |x, y| {
            let t = (x + y) as f32 / (w + h) as f32;
            let base = PINK.lerp(ROSE, t);

            // Heart centred at (400, 450), ~100 px tall
            let hx = (x as f32 - 400.0) / 50.0;
            let hy = (450.0 - y as f32) / 50.0;
            let shade = if in_heart(hx, hy) { base.lerp(WHITE, 0.3) } else { base };
            image::Rgb([shade.0, shade.1, shade.2])
        });

        Self {
            image,
            label: format!("Photo {index} · Sweet memories"),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Implicit heart curve `(x² + y² - 1)³ - x²y³ <= 0`.
fn in_heart(x: f32, y: f32) -> bool {
    let a = x * x + y * y - 1.0;
    a * a * a - x * x * y * y * y <= 0.0
}

/// Source of album pictures.
pub trait PhotoSupplier {
    /// Every slide that could be produced, in album order. Failures are
    /// the supplier's to substitute or skip.
    fn load(&mut self) -> Vec<Slide>;
}

/// Reads `{dir}/{prefix}{n}{extension}` for `n` in `1..=count`.
pub struct DirectorySupplier {
    photos: Photos,
}

impl DirectorySupplier {
    pub fn new(photos: Photos) -> Self {
        Self { photos }
    }

    fn path(&self, index: usize) -> PathBuf {
        let name = format!("{}{}{}", self.photos.prefix, index, self.photos.extension);
        self.photos.dir.join(name)
    }
}

impl PhotoSupplier for DirectorySupplier {
    fn load(&mut self) -> Vec<Slide> {
        (1..=self.photos.count)
            .map(|index| {
                let path = self.path(index);
                match image::open(&path) {
                    Ok(img) => {
                        log::info!("photo {index} loaded: {}", path.display());
                        // thumbnail() also enlarges, so only shrink oversized photos
                        let oversized = img.width() > PLACEHOLDER_WIDTH || img.height() > PLACEHOLDER_HEIGHT;
                        let img = if oversized {
                            img.thumbnail(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
                        } else {
                            img
                        };
                        Slide::photo(img.to_rgb8(), index)
                    }
                    Err(err) => {
                        log::warn!("photo {index} failed to load ({}): {err}", path.display());
                        Slide::placeholder(index)
                    }
                }
            })
            .collect()
    }
}

/// Loads the album, topping it up with placeholders if nothing came back.
pub fn preload(supplier: &mut dyn PhotoSupplier) -> Vec<Slide> {
    let mut slides = supplier.load();
    if slides.is_empty() {
        log::warn!("no photos loaded, using {MIN_SLIDES} placeholders");
        slides = (1..=MIN_SLIDES).map(Slide::placeholder).collect();
    }
    log::info!("album ready with {} slides", slides.len());
    slides
}

/// Rotating photo frame.
pub struct Slideshow {
    slides: Vec<Slide>,
    current: usize,
    scaled: Option<((u32, u32), RgbImage)>,
}

impl Slideshow {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, current: 0, scaled: None }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// More than one slide, so rotation does something.
    pub fn can_rotate(&self) -> bool {
        self.slides.len() > 1
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn next_slide(&mut self) {
        if !self.can_rotate() {
            return;
        }
        self.current = (self.current + 1) % self.slides.len();
        self.scaled = None;
    }

    pub fn caption(&self) -> Option<Caption> {
        self.current()
            .map(|slide| Caption::centered(slide.label.clone(), 0.92, WHITE))
    }

    /// Draws the current slide framed in the middle of the surface.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let Some(slide) = self.slides.get(self.current) else { return };

        let (sw, sh) = (surface.width(), surface.height());
        let (iw, ih) = slide.image.dimensions();
        let fit = (sw * 0.8 / iw as f32).min(sh * 0.7 / ih as f32);
        let (fw, fh) = (iw as f32 * fit, ih as f32 * fit);
        let (x0, y0) = ((sw - fw) / 2.0, (sh - fh) / 2.0 - sh * 0.04);

        surface.fill_rect(
            x0 - FRAME_BORDER,
            y0 - FRAME_BORDER,
            fw + FRAME_BORDER * 2.0,
            fh + FRAME_BORDER * 2.0,
            WHITE,
            0.9,
        );

        let px = surface.pixel_size();
        let cells = (((fw / px) as u32).max(1), ((fh / px) as u32).max(1));
        if !matches!(&self.scaled, Some((size, _)) if *size == cells) {
            let img = imageops::resize(&slide.image, cells.0, cells.1, FilterType::Triangle);
            self.scaled = Some((cells, img));
        }
        let Some((_, scaled)) = &self.scaled else { return };

        for (x, y, pixel) in scaled.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            surface.fill_rect(
                x0 + x as f32 * px,
                y0 + y as f32 * px,
                px,
                px,
                Rgb(r, g, b),
                1.0,
            );
        }
    }
}
