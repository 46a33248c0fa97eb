/// Opaque font reference carried on bitmap label styles.
///
/// Markers never render text; they hand the builder the manager's null font.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontHandle {
    /// Face name, empty for the null font.
    pub name: String,
}

impl FontHandle {
    /// The font used by labels that carry no text.
    pub fn null() -> Self {
        Self::default()
    }

    /// Whether this is the null font.
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
    }
}

/// Source of font handles.
pub trait FontManager: Send + Sync {
    /// Handle used for bitmap-only labels.
    fn null_font(&self) -> FontHandle;
}

/// [`FontManager`] with no faces loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFontManager;

impl FontManager for NullFontManager {
    fn null_font(&self) -> FontHandle {
        FontHandle::null()
    }
}
