/// A single inline style: property name and value.
pub type StyleDecl = (&'static str, String);

/// Something with mutable inline styles, e.g. a DOM element's `style`.
pub trait StyleSurface {
    /// Current inline value, or an empty string when unset.
    fn property(&self, name: &str) -> String;
    fn set_property(&self, name: &str, value: &str);
    fn remove_property(&self, name: &str);
}

/// Write every declaration to `surface`.
pub fn apply<S: StyleSurface + ?Sized>(surface: &S, decls: &[StyleDecl]) {
    for (name, value) in decls {
        surface.set_property(name, value);
    }
}

/// Scoped style override.
///
/// Snapshots the prior inline values of every property it touches, applies
/// the override, and puts the snapshot back when dropped. Properties that
/// were unset before are removed again rather than set to "".
pub struct StyleGuard<S: StyleSurface> {
    surface: S,
    saved: Vec<(&'static str, String)>,
}

impl<S: StyleSurface> StyleGuard<S> {
    pub fn acquire(surface: S, decls: &[StyleDecl]) -> Self {
        let saved = decls
            .iter()
            .map(|(name, _)| (*name, surface.property(name)))
            .collect();
        apply(&surface, decls);
        Self { surface, saved }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Re-apply new values for already-guarded properties, e.g. after a
    /// resize while the override is active. Unguarded names are skipped.
    pub fn update(&self, decls: &[StyleDecl]) {
        for (name, value) in decls {
            if self.saved.iter().any(|(saved, _)| saved == name) {
                self.surface.set_property(name, value);
            }
        }
    }
}

impl<S: StyleSurface> Drop for StyleGuard<S> {
    fn drop(&mut self) {
        // Reverse order so a property listed twice ends on its original value.
        for (name, prior) in self.saved.iter().rev() {
            if prior.is_empty() {
                self.surface.remove_property(name);
            } else {
                self.surface.set_property(name, prior);
            }
        }
    }
}

/// Declarations that stop the page behind the game from scrolling.
pub fn scroll_lock() -> Vec<StyleDecl> {
    vec![("overflow", "hidden".to_string())]
}
