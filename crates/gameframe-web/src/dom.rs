use gameframe::core::layout::chrome_styles;
use gameframe::core::style::{apply, StyleDecl};
use gameframe::{FrameConfig, FrameLayout, StyleSurface, UserId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, HtmlIFrameElement};

/// Inline style of one DOM element.
#[derive(Clone)]
pub struct ElementStyle(CssStyleDeclaration);

impl ElementStyle {
    pub fn of(element: &HtmlElement) -> Self {
        Self(element.style())
    }
}

impl StyleSurface for ElementStyle {
    fn property(&self, name: &str) -> String {
        self.0.get_property_value(name).unwrap_or_default()
    }

    fn set_property(&self, name: &str, value: &str) {
        if let Err(err) = self.0.set_property(name, value) {
            log::debug!("style: cannot set {}: {:?}", name, err);
        }
    }

    fn remove_property(&self, name: &str) {
        let _ = self.0.remove_property(name);
    }
}

/// The element tree the runner owns. Removed from the page on drop.
///
/// ```text
/// root
/// ├── header (title, id badge)       controls only
/// ├── overlay (rotate prompt, lock + dismiss buttons)
/// ├── container > wrapper > iframe
/// └── fullscreen button               controls only
/// ```
pub struct FrameDom {
    pub root: HtmlElement,
    pub header: Option<HtmlElement>,
    pub overlay: HtmlElement,
    pub lock_button: Option<HtmlElement>,
    pub dismiss_button: Option<HtmlElement>,
    pub container: HtmlElement,
    pub wrapper: HtmlElement,
    pub iframe: HtmlIFrameElement,
    pub fullscreen_button: Option<HtmlElement>,
}

impl FrameDom {
    pub fn build(
        document: &Document,
        parent: &Element,
        config: &FrameConfig,
        user_id: &UserId,
        src: &str,
    ) -> Result<Self, JsValue> {
        let root = create(document, "div")?;
        set_styles(&root, &ROOT_STYLES);
        apply(&ElementStyle::of(&root), &chrome_styles(false));

        let header = if config.show_controls {
            let header = create(document, "div")?;
            set_styles(&header, &HEADER_STYLES);
            let title = create(document, "h1")?;
            title.set_text_content(Some(&config.title));
            set_styles(&title, &[("font-size", "20px"), ("margin", "0")]);
            let badge = create(document, "span")?;
            badge.set_text_content(Some(&format!("ID: {}", user_id)));
            set_styles(&badge, &BADGE_STYLES);
            header.append_child(&title)?;
            header.append_child(&badge)?;
            root.append_child(&header)?;
            Some(header)
        } else {
            None
        };

        let overlay = create(document, "div")?;
        set_styles(&overlay, &OVERLAY_STYLES);
        let icon = create(document, "span")?;
        icon.set_text_content(Some("📱 ↻"));
        set_styles(&icon, &[("font-size", "32px"), ("display", "block")]);
        let message = create(document, "p")?;
        message.set_text_content(Some(&config.rotate_message));
        set_styles(&message, &[("margin", "8px 0 0 0"), ("font-size", "14px")]);
        overlay.append_child(&icon)?;
        overlay.append_child(&message)?;
        let (lock_button, dismiss_button) = if config.show_controls {
            let row = create(document, "div")?;
            set_styles(&row, &[("display", "flex"), ("gap", "8px"), ("justify-content", "center")]);
            let lock = create(document, "button")?;
            lock.set_text_content(Some("Abrir en pantalla completa"));
            set_styles(&lock, &LOCK_STYLES);
            let dismiss = create(document, "button")?;
            dismiss.set_text_content(Some("Continuar igualmente"));
            set_styles(&dismiss, &DISMISS_STYLES);
            row.append_child(&lock)?;
            row.append_child(&dismiss)?;
            overlay.append_child(&row)?;
            (Some(lock), Some(dismiss))
        } else {
            (None, None)
        };
        root.append_child(&overlay)?;

        let container = create(document, "div")?;
        set_styles(&container, &[("margin", "0 auto 24px auto")]);
        let wrapper = create(document, "div")?;
        let iframe: HtmlIFrameElement = document.create_element("iframe")?.dyn_into()?;
        iframe.set_src(src);
        iframe.set_title(&config.title);
        iframe.set_attribute("allow", "autoplay; fullscreen")?;
        iframe.set_attribute("sandbox", "allow-scripts allow-same-origin allow-forms")?;
        iframe.set_attribute("scrolling", "no")?;
        wrapper.append_child(&iframe)?;
        container.append_child(&wrapper)?;
        root.append_child(&container)?;

        let fullscreen_button = if config.show_controls {
            let row = create(document, "div")?;
            set_styles(&row, &[("width", "100%"), ("display", "flex"), ("justify-content", "center")]);
            let button = create(document, "button")?;
            set_styles(&button, &FULLSCREEN_BUTTON_STYLES);
            row.append_child(&button)?;
            root.append_child(&row)?;
            Some(button)
        } else {
            None
        };

        parent.append_child(&root)?;

        let dom = Self {
            root,
            header,
            overlay,
            lock_button,
            dismiss_button,
            container,
            wrapper,
            iframe,
            fullscreen_button,
        };
        dom.set_fullscreen(false);
        dom.set_overlay_visible(false);
        Ok(dom)
    }

    pub fn apply_layout(&self, layout: &FrameLayout) {
        apply(&ElementStyle::of(&self.container), &layout.container_styles());
        apply(&ElementStyle::of(&self.wrapper), &layout.wrapper_styles());
        apply(&ElementStyle::of(&self.iframe), &layout.frame_styles());
    }

    /// Swap the chrome between windowed and fullscreen presentation.
    pub fn set_fullscreen(&self, fullscreen: bool) {
        apply(&ElementStyle::of(&self.root), &chrome_styles(fullscreen));
        if let Some(header) = &self.header {
            set_display(header, !fullscreen, "flex");
        }
        if let Some(button) = &self.fullscreen_button {
            button.set_text_content(Some(if fullscreen { "✕" } else { "⛶" }));
            let background = if fullscreen {
                "rgba(255,77,77,0.8)"
            } else {
                "rgba(255,255,255,0.15)"
            };
            ElementStyle::of(button).set_property("background", background);
        }
    }

    pub fn set_overlay_visible(&self, visible: bool) {
        set_display(&self.overlay, visible, "block");
    }

    /// Width available to the frame, for width-fitted layouts.
    pub fn parent_width(&self) -> Option<f64> {
        self.root
            .parent_element()
            .map(|parent| parent.client_width() as f64)
            .filter(|w| *w > 0.0)
    }
}

impl Drop for FrameDom {
    fn drop(&mut self) {
        self.root.remove();
    }
}

fn create(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)
}

fn set_styles(element: &HtmlElement, decls: &[(&'static str, &str)]) {
    let owned: Vec<StyleDecl> = decls.iter().map(|(k, v)| (*k, v.to_string())).collect();
    apply(&ElementStyle::of(element), &owned);
}

fn set_display(element: &HtmlElement, visible: bool, shown: &str) {
    ElementStyle::of(element).set_property("display", if visible { shown } else { "none" });
}

const ROOT_STYLES: [(&str, &str); 9] = [
    ("width", "100vw"),
    ("background", "#000"),
    ("overflow", "hidden"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("align-items", "center"),
    ("position", "relative"),
    ("box-sizing", "border-box"),
    ("color", "#fff"),
];

const HEADER_STYLES: [(&str, &str); 4] = [
    ("justify-content", "space-between"),
    ("margin-bottom", "8px"),
    ("width", "100%"),
    ("max-width", "1440px"),
];

const BADGE_STYLES: [(&str, &str); 3] = [
    ("background", "rgba(255,255,255,0.1)"),
    ("padding", "6px 12px"),
    ("border-radius", "16px"),
];

const OVERLAY_STYLES: [(&str, &str); 7] = [
    ("background-color", "rgba(255, 193, 7, 0.15)"),
    ("border", "2px solid rgba(255, 193, 7, 0.4)"),
    ("border-radius", "10px"),
    ("padding", "12px"),
    ("margin-bottom", "12px"),
    ("text-align", "center"),
    ("color", "#ffc107"),
];

const LOCK_STYLES: [(&str, &str); 7] = [
    ("margin-top", "8px"),
    ("padding", "10px 16px"),
    ("border-radius", "6px"),
    ("border", "none"),
    ("background", "#1a73e8"),
    ("color", "#fff"),
    ("cursor", "pointer"),
];

const DISMISS_STYLES: [(&str, &str); 6] = [
    ("margin-top", "8px"),
    ("padding", "10px 16px"),
    ("border-radius", "6px"),
    ("border", "1px solid rgba(255,255,255,0.15)"),
    ("background", "transparent"),
    ("color", "#fff"),
];

const FULLSCREEN_BUTTON_STYLES: [(&str, &str); 10] = [
    ("width", "54px"),
    ("height", "54px"),
    ("border-radius", "50%"),
    ("border", "none"),
    ("color", "#fff"),
    ("font-size", "28px"),
    ("cursor", "pointer"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
];
