use crate::assets::TITLE_FONT_FILE;
use crate::error::AssetError;
use glyphon::fontdb::{Database, Source};
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, Style,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport,
    Weight,
};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use wgpu::{Device, Queue, RenderPass};

/// Id of the main menu title buffer.
pub const TITLE_ID: &str = "title";
pub const TITLE_TEXT: &str = "Altered Strains";
pub const TITLE_FONT_SIZE: f32 = 80.0;
/// Top-left corner of the title in window pixels.
pub const TITLE_POSITION: (f32, f32) = (180.0, 40.0);

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Family name of a loaded font. `None` uses the system serif face.
    pub font_family: Option<String>,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Color,
    pub weight: Weight,
    pub style: Style,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            line_height: 20.0,
            color: Color::rgb(255, 255, 255),
            weight: Weight::NORMAL,
            style: Style::Normal,
        }
    }
}

impl TextStyle {
    fn attrs(&self) -> Attrs<'_> {
        let family = match &self.font_family {
            Some(name) => Family::Name(name.as_str()),
            None => Family::Serif,
        };
        Attrs::new()
            .family(family)
            .weight(self.weight)
            .style(self.style)
    }
}

/// Style of the main menu title for the given font family.
pub fn title_style(font_family: Option<String>) -> TextStyle {
    TextStyle {
        font_family,
        font_size: TITLE_FONT_SIZE,
        line_height: TITLE_FONT_SIZE * 1.25,
        color: Color::rgb(255, 255, 255),
        weight: Weight::BOLD,
        style: Style::Italic,
    }
}

/// Registers the font file at `path` and returns the family name of its first face.
pub fn load_font_file(db: &mut Database, path: &Path) -> Result<String, AssetError> {
    let data = fs::read(path).map_err(|source| AssetError::Font {
        path: path.to_path_buf(),
        source,
    })?;

    let ids = db.load_font_source(Source::Binary(Arc::new(data)));
    ids.iter()
        .find_map(|&id| db.face(id)?.families.first().map(|(name, _)| name.clone()))
        .ok_or_else(|| AssetError::EmptyFont {
            path: path.to_path_buf(),
        })
}

/// Resizes every buffer to the render target and reshapes its text.
pub fn fit_buffers(
    font_system: &mut FontSystem,
    text_buffers: &mut HashMap<String, TextBuffer>,
    width: u32,
    height: u32,
) {
    for text_buffer in text_buffers.values_mut() {
        text_buffer
            .buffer
            .set_size(font_system, Some(width as f32), Some(height as f32));
        text_buffer.buffer.shape_until_scroll(font_system, false);
    }
}

#[derive(Debug)]
pub struct TextBuffer {
    pub buffer: Buffer,
    pub style: TextStyle,
    pub position: (f32, f32),
    pub visible: bool,
}

/// Named glyphon text buffers drawn over the sprites.
pub struct TextRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub viewport: Viewport,
    pub atlas: TextAtlas,
    pub text_renderer: GlyphonTextRenderer,
    pub text_buffers: HashMap<String, TextBuffer>,
    width: u32,
    height: u32,
}

impl TextRenderer {
    /// Creates the renderer and the hidden title buffer.
    ///
    /// The title font is read from `fonts_dir`. If it cannot be loaded the title falls back to
    /// a system serif face.
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        fonts_dir: &Path,
    ) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let text_renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        let mut renderer = Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            text_buffers: HashMap::new(),
            width,
            height,
        };

        let family = match renderer.load_font(&fonts_dir.join(TITLE_FONT_FILE)) {
            Ok(family) => Some(family),
            Err(e) => {
                warn!("{}; drawing the title with a serif fallback", e);
                None
            }
        };
        renderer.create_text_buffer(TITLE_ID, TITLE_TEXT, title_style(family), TITLE_POSITION);
        renderer.set_visible(TITLE_ID, false);

        renderer
    }

    /// Loads a font file and returns its family name.
    pub fn load_font(&mut self, path: &Path) -> Result<String, AssetError> {
        let family = load_font_file(self.font_system.db_mut(), path)?;
        debug!("Loaded font '{}' from {}", family, path.display());
        Ok(family)
    }

    pub fn create_text_buffer(
        &mut self,
        id: &str,
        text: &str,
        style: TextStyle,
        position: (f32, f32),
    ) {
        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        buffer.set_size(
            &mut self.font_system,
            Some(self.width as f32),
            Some(self.height as f32),
        );
        buffer.set_text(&mut self.font_system, text, style.attrs(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        self.text_buffers.insert(
            id.to_string(),
            TextBuffer {
                buffer,
                style,
                position,
                visible: true,
            },
        );
    }

    /// Shows or hides a buffer. Unknown ids are ignored.
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(text_buffer) = self.text_buffers.get_mut(id) {
            text_buffer.visible = visible;
        }
    }

    /// Updates the viewport size and lays every buffer out again for it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        fit_buffers(&mut self.font_system, &mut self.text_buffers, width, height);
    }

    /// Lays out the visible buffers for the next [`render`](Self::render).
    pub fn prepare(&mut self, device: &Device, queue: &Queue) -> Result<(), glyphon::PrepareError> {
        self.viewport.update(
            queue,
            Resolution {
                width: self.width,
                height: self.height,
            },
        );

        let (width, height) = (self.width as i32, self.height as i32);
        let text_areas: Vec<TextArea> = self
            .text_buffers
            .values()
            .filter(|text_buffer| text_buffer.visible)
            .map(|text_buffer| TextArea {
                buffer: &text_buffer.buffer,
                left: text_buffer.position.0,
                top: text_buffer.position.1,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: width,
                    bottom: height,
                },
                default_color: text_buffer.style.color,
                custom_glyphs: &[],
            })
            .collect();

        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )
    }

    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.text_renderer
            .render(&self.atlas, &self.viewport, render_pass)
    }

    /// Frees atlas space used by glyphs not drawn this frame.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_title_style() {
        let style = title_style(Some("Roman Antique".to_string()));
        assert_eq!(style.font_size, 80.0);
        assert_eq!(style.weight, Weight::BOLD);
        assert_eq!(style.style, Style::Italic);
        assert_eq!(style.color, Color::rgb(255, 255, 255));
        assert_eq!(style.font_family.as_deref(), Some("Roman Antique"));
    }

    #[test]
    fn test_fallback_family_is_serif() {
        let style = title_style(None);
        assert_eq!(style.attrs().family, Family::Serif);
        let named = title_style(Some("Roman Antique".to_string()));
        assert_eq!(named.attrs().family, Family::Name("Roman Antique"));
    }

    #[test]
    fn test_resize_refits_buffers() {
        let mut font_system =
            FontSystem::new_with_locale_and_db("en-US".to_string(), Database::new());
        let mut buffer = Buffer::new(&mut font_system, Metrics::new(16.0, 20.0));
        buffer.set_size(&mut font_system, Some(800.0), Some(600.0));

        let mut text_buffers = HashMap::new();
        text_buffers.insert(
            TITLE_ID.to_string(),
            TextBuffer {
                buffer,
                style: TextStyle::default(),
                position: TITLE_POSITION,
                visible: true,
            },
        );

        fit_buffers(&mut font_system, &mut text_buffers, 1600, 1200);
        assert_eq!(
            text_buffers[TITLE_ID].buffer.size(),
            (Some(1600.0), Some(1200.0))
        );
    }

    #[test]
    fn test_missing_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::new();
        let err = load_font_file(&mut db, &dir.path().join(TITLE_FONT_FILE)).unwrap_err();
        assert!(matches!(err, AssetError::Font { .. }));
        assert!(err.to_string().contains(TITLE_FONT_FILE));
    }

    #[test]
    fn test_garbage_font_file_has_no_faces() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a truetype font").unwrap();

        let mut db = Database::new();
        let err = load_font_file(&mut db, file.path()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyFont { .. }));
        assert_eq!(db.len(), 0);
    }
}
