//! # Assets Module
//!
//! The sprite manifest and the generic loader that turns it into a [`SpriteSet`].
//!
//! Every sprite in the game is a [`Drawable`]: a texture key, a placement (position and
//! scale), a tint and an optional source rectangle into the texture. Drawables are looked up by
//! their logical [`SpriteId`]. Placements are load-time constants; the only thing the loader
//! discovers at runtime is each texture's pixel size, which also fixes the sprite's hit region.
//!
//! Loading never fails as a whole. A texture that cannot be read is logged and leaves its
//! drawable with a zero size, so the sprite draws nothing and cannot be clicked.

use crate::error::AssetError;
use crate::math::Rect;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Font used for the title text.
pub const TITLE_FONT_FILE: &str = "RomanAntique.ttf";

/// Side length of one frame of the wipe sprite sheet.
pub const WIPE_FRAME_SIZE: f32 = 144.0;

/// RGBA multiplier applied to a sprite's texture.
pub type Tint = [u8; 4];

pub const TINT_WHITE: Tint = [255, 255, 255, 255];
pub const TINT_BLACK: Tint = [0, 0, 0, 255];
pub const TINT_CYAN: Tint = [0, 255, 255, 255];

/// Logical name of every sprite the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    FadeBlack,
    Frame,
    LabBackground,
    LabShade,
    BlackBlood,
    BlueBlood,
    RedBlood,
    DarkBlueSerum,
    BlueSerum,
    YellowSerum,
    GreenSerum,
    Vial,
    PlayButton,
    SelectButton,
}

/// Static description of a sprite: which file it comes from and where it sits.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSpec {
    pub id: SpriteId,
    pub file: &'static str,
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub tint: Tint,
    pub source: Option<Rect>,
}

impl SpriteSpec {
    const fn new(id: SpriteId, file: &'static str, position: [f32; 2], scale: f32) -> Self {
        Self {
            id,
            file,
            position,
            scale: [scale, scale],
            tint: TINT_WHITE,
            source: None,
        }
    }

    const fn scaled(mut self, x: f32, y: f32) -> Self {
        self.scale = [x, y];
        self
    }

    const fn tinted(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    const fn cropped(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }
}

/// Every sprite of the game, in load order.
pub const SPRITE_MANIFEST: &[SpriteSpec] = &[
    SpriteSpec::new(SpriteId::FadeBlack, "AS TransitionBlack.png", [0.0, 0.0], 1.0)
        .scaled(800.0 / WIPE_FRAME_SIZE, 600.0 / WIPE_FRAME_SIZE)
        .tinted(TINT_CYAN)
        .cropped(Rect::new(0.0, 0.0, WIPE_FRAME_SIZE, WIPE_FRAME_SIZE)),
    SpriteSpec::new(SpriteId::Frame, "AS Frame.png", [0.0, 0.0], 1.0)
        .scaled(4.0, 3.0)
        .tinted(TINT_BLACK),
    SpriteSpec::new(SpriteId::LabBackground, "AS Lab BG.png", [50.0, 50.0], 3.5),
    SpriteSpec::new(SpriteId::LabShade, "AS Lab BG_Multi.png", [50.0, 50.0], 3.5)
        .tinted(TINT_BLACK),
    SpriteSpec::new(SpriteId::BlackBlood, "AS Black Serum.png", [310.0, 125.0], 3.0),
    SpriteSpec::new(SpriteId::BlueBlood, "AS DarkBlue Blood.png", [515.0, 125.0], 3.0),
    SpriteSpec::new(SpriteId::RedBlood, "AS Red Blood.png", [415.0, 125.0], 3.0),
    SpriteSpec::new(SpriteId::DarkBlueSerum, "AS DarkBlue Serum.png", [100.0, 320.0], 3.0),
    SpriteSpec::new(SpriteId::BlueSerum, "AS Blue Serum.png", [405.0, 380.0], 3.0),
    SpriteSpec::new(SpriteId::YellowSerum, "AS Yellow Serum.png", [250.0, 330.0], 3.0),
    SpriteSpec::new(SpriteId::GreenSerum, "AS Green Serum.png", [100.0, 85.0], 3.0),
    SpriteSpec::new(SpriteId::Vial, "AS Beaker.png", [350.0, 120.0], 5.0),
    SpriteSpec::new(SpriteId::PlayButton, "AS ButtonOne.png", [200.0, 280.0], 3.0),
    SpriteSpec::new(SpriteId::SelectButton, "AS ButtonOne.png", [80.0, 500.0], 2.0),
];

/// A textured quad ready to be drawn: destination in screen pixels, normalized texture
/// coordinates and the tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub dest: Rect,
    pub uv: Rect,
    pub tint: Tint,
}

/// A loaded sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Key of the texture in the renderer's cache (the image path).
    pub texture: PathBuf,
    /// Pixel size of the texture, `[0, 0]` when it failed to load.
    pub texture_size: [u32; 2],
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub tint: Tint,
    pub source: Option<Rect>,
}

impl Drawable {
    fn is_loaded(&self) -> bool {
        self.texture_size[0] > 0 && self.texture_size[1] > 0
    }

    fn full_texture(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.texture_size[0] as f32,
            self.texture_size[1] as f32,
        )
    }

    fn placed(&self, source: Rect) -> Rect {
        Rect::new(
            self.position[0],
            self.position[1],
            source.width * self.scale[0],
            source.height * self.scale[1],
        )
    }

    /// Screen-space bounds of the sprite, used as its hit region. Empty when the texture is
    /// missing.
    pub fn bounds(&self) -> Rect {
        if !self.is_loaded() {
            return Rect::default();
        }
        self.placed(self.source.unwrap_or_else(|| self.full_texture()))
    }

    /// Builds the quad for this sprite, optionally overriding the source rectangle and tint.
    ///
    /// Returns `None` when the texture is missing.
    pub fn quad(&self, source: Option<Rect>, tint: Option<Tint>) -> Option<SpriteQuad> {
        if !self.is_loaded() {
            return None;
        }
        let source = source
            .or(self.source)
            .unwrap_or_else(|| self.full_texture());
        let (tex_w, tex_h) = (self.texture_size[0] as f32, self.texture_size[1] as f32);

        Some(SpriteQuad {
            dest: self.placed(source),
            uv: Rect::new(
                source.x / tex_w,
                source.y / tex_h,
                source.width / tex_w,
                source.height / tex_h,
            ),
            tint: tint.unwrap_or(self.tint),
        })
    }
}

/// All loaded sprites keyed by logical name.
#[derive(Debug, Default, Clone)]
pub struct SpriteSet {
    drawables: HashMap<SpriteId, Drawable>,
}

impl SpriteSet {
    pub fn get(&self, id: SpriteId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    pub fn insert(&mut self, id: SpriteId, drawable: Drawable) {
        self.drawables.insert(id, drawable);
    }

    /// Hit region of a sprite; empty for unknown or unloaded sprites.
    pub fn bounds(&self, id: SpriteId) -> Rect {
        self.get(id).map(Drawable::bounds).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

/// Something that can turn an image path into a usable texture.
///
/// The GPU sprite renderer implements this; tests substitute fakes.
pub trait TextureLoader {
    /// Loads (or fetches from cache) the texture at `path` and returns its pixel size.
    fn load_texture(&mut self, path: &Path) -> Result<[u32; 2], AssetError>;
}

/// Loads every sprite of [`SPRITE_MANIFEST`] from `images_dir`.
///
/// Failures are logged and leave the affected drawable without a texture.
pub fn load_sprites(images_dir: &Path, loader: &mut impl TextureLoader) -> SpriteSet {
    let mut sprites = SpriteSet::default();

    for spec in SPRITE_MANIFEST {
        let path = images_dir.join(spec.file);
        let texture_size = match loader.load_texture(&path) {
            Ok(size) => {
                debug!("Loaded {:?} from {} ({}x{})", spec.id, path.display(), size[0], size[1]);
                size
            }
            Err(err) => {
                warn!("{}", err);
                [0, 0]
            }
        };

        sprites.insert(
            spec.id,
            Drawable {
                texture: path,
                texture_size,
                position: spec.position,
                scale: spec.scale,
                tint: spec.tint,
                source: spec.source,
            },
        );
    }

    sprites
}

/// Reads an image file and converts it to RGBA8.
pub fn decode_image(path: &Path) -> Result<image::RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })
}
