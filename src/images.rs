use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// A decoded unicorn (or sparkle) sprite.
#[derive(Clone, Debug)]
pub struct LeapImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl LeapImage {
    /// Reads and decodes the file as a PNG. Yields `None` when the file is
    /// absent or not a valid PNG; the caller treats that as a fatal
    /// configuration error. One file read, no other side effects.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = fs::read(path).ok()?;
        let dyn_img =
            image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).ok()?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Some(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Fixed lookup directory for image files: `~/.unicornleap`.
pub fn images_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".unicornleap")
}

/// Absolute filenames are used as-is, anything else resolves against
/// [`images_dir`].
pub fn resolve(filename: &str) -> PathBuf {
    let path = Path::new(filename);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        images_dir().join(filename)
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
