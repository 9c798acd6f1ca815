//! The texture images the scene refers to.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A texture image used by the scene.
///
/// The named variants are the bundled set; [`TextureAsset::File`] lets a custom
/// body table point at any other image relative to the texture directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureAsset {
    Stars,
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    SaturnRing,
    Uranus,
    UranusRing,
    Neptune,
    Pluto,
    File(PathBuf),
}

impl TextureAsset {
    /// Every bundled texture, in the order they are first used by the scene.
    pub const BUNDLED: [TextureAsset; 13] = [
        TextureAsset::Stars,
        TextureAsset::Sun,
        TextureAsset::Mercury,
        TextureAsset::Venus,
        TextureAsset::Earth,
        TextureAsset::Mars,
        TextureAsset::Jupiter,
        TextureAsset::Saturn,
        TextureAsset::SaturnRing,
        TextureAsset::Uranus,
        TextureAsset::UranusRing,
        TextureAsset::Neptune,
        TextureAsset::Pluto,
    ];

    /// Path of the image relative to the texture directory.
    pub fn relative_path(&self) -> &Path {
        let name = match self {
            TextureAsset::Stars => "stars.jpg",
            TextureAsset::Sun => "sun.jpeg",
            TextureAsset::Mercury => "mercury.jpg",
            TextureAsset::Venus => "venus.jpg",
            TextureAsset::Earth => "earth.jpg",
            TextureAsset::Mars => "mars.jpg",
            TextureAsset::Jupiter => "jupiter.jpg",
            TextureAsset::Saturn => "saturn.jpg",
            TextureAsset::SaturnRing => "saturn ring.png",
            TextureAsset::Uranus => "uranus.jpeg",
            TextureAsset::UranusRing => "uranus ring.png",
            TextureAsset::Neptune => "neptune.jpg",
            TextureAsset::Pluto => "pluto.jpg",
            TextureAsset::File(path) => return path.as_path(),
        };
        Path::new(name)
    }

    /// Resolve the image against a texture directory.
    pub fn resolve(&self, texture_dir: &Path) -> PathBuf {
        texture_dir.join(self.relative_path())
    }
}
