/// Background image loading.
///
/// The terminal renderer cannot blit an image, so the picture is kept as
/// plain RGB pixels and sampled down to one colour per character cell.

use std::path::Path;

use crate::error::AssetError;

pub type Rgb = [u8; 3];

/// Decoded background picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries.
    pixels: Vec<Rgb>,
}

impl Background {
    /// Load a PNG from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        log::debug!("Loading background from {:?}", path);
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let background = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded background {}x{} from {:?}",
            background.width,
            background.height,
            path
        );
        Ok(background)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[cfg(test)]
    pub(crate) fn solid(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Nearest-neighbour resample to a `cols x rows` grid, stretched over the
    /// whole picture.  Returned row-major.
    pub fn cells(&self, cols: u16, rows: u16) -> Vec<Vec<Rgb>> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        (0..rows as u32)
            .map(|row| {
                let py = (row * self.height / rows.max(1) as u32).min(self.height - 1);
                (0..cols as u32)
                    .map(|col| {
                        let px = (col * self.width / cols.max(1) as u32).min(self.width - 1);
                        self.pixel(px, py).unwrap_or([0, 0, 0])
                    })
                    .collect()
            })
            .collect()
    }
}

/// Load the optional background.  Any failure is logged and yields `None`:
/// the game just runs without a background.
pub fn load_background(path: Option<&Path>) -> Option<Background> {
    let path = path?;
    match Background::from_file(path) {
        Ok(bg) => Some(bg),
        Err(e) => {
            log::warn!("No background: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_png() -> Vec<u8> {
        let mut img = image::RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        img.put_pixel(1, 1, image::Rgb([255, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_pixels() {
        let bg = Background::from_bytes(&checker_png()).unwrap();
        assert_eq!((bg.width, bg.height), (2, 2));
        assert_eq!(bg.pixel(1, 0), Some([0, 255, 0]));
        assert_eq!(bg.pixel(2, 0), None);
    }

    #[test]
    fn cells_stretch_over_picture() {
        let bg = Background::from_bytes(&checker_png()).unwrap();
        let cells = bg.cells(4, 2);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], vec![[255, 0, 0], [255, 0, 0], [0, 255, 0], [0, 255, 0]]);
        assert_eq!(cells[1][3], [255, 255, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Background::from_bytes(b"not a png").unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn missing_file_degrades_to_none() {
        assert!(load_background(Some(Path::new("/no/such/background.png"))).is_none());
        assert!(load_background(None).is_none());
    }

    #[test]
    fn solid_fills_every_cell() {
        let bg = Background::solid(8, 8, [10, 20, 30]);
        assert!(bg.cells(3, 3).iter().flatten().all(|c| *c == [10, 20, 30]));
    }
}
