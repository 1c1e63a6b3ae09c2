use std::path::PathBuf;

use post_composition::{ImagePicker, LocalImage, PickerError, PickerRequest};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "heic"];

/// Picker backed by image files named on the command line
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl ImagePicker for PathPicker {
    fn pick_images(&self, request: &PickerRequest) -> Result<Vec<LocalImage>, PickerError> {
        if self.paths.is_empty() {
            return Err(PickerError::Cancelled("no images given".to_string()));
        }

        let mut picked = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            if !path.is_file() {
                return Err(PickerError::NotFound(path.display().to_string()));
            }

            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if !is_image {
                return Err(PickerError::Other(format!(
                    "not an image file: {}",
                    path.display()
                )));
            }

            let absolute = std::fs::canonicalize(path)
                .map_err(|e| PickerError::Other(format!("{}: {}", path.display(), e)))?;
            picked.push(LocalImage::new(format!("file://{}", absolute.display())));
        }

        Ok(request.limit(picked))
    }
}
