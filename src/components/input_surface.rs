use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use crate::style::KeypadStyle;

use super::digit_source::KeypadLayout;

/// Content of the custom keypad installed as a text-entry primitive's input surface.
#[derive(Clone, Debug, PartialEq)]
pub struct KeypadSurface {
    pub layout: KeypadLayout,
    pub style: KeypadStyle,
    pub secure_active: bool,
    revision: u64,
}

impl KeypadSurface {
    pub fn new(layout: KeypadLayout, style: KeypadStyle, secure_active: bool) -> Self {
        Self {
            layout,
            style,
            secure_active,
            revision: 0,
        }
    }

    /// Number of in-place updates applied since the surface was installed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn apply(&mut self, next: KeypadSurface) {
        self.layout = next.layout;
        self.style = next.style;
        self.secure_active = next.secure_active;
        self.revision += 1;
    }
}

/// A text-entry primitive whose keyboard can be replaced by a custom surface.
pub trait TextEntryPrimitive {
    fn input_surface(&self) -> Option<&KeypadSurface>;
    fn input_surface_mut(&mut self) -> Option<&mut KeypadSurface>;
    fn install_input_surface(&mut self, surface: KeypadSurface);
}

pub type SharedTextEntry = Rc<RefCell<dyn TextEntryPrimitive>>;

/// The zero-sized text field every pin view owns when the host registers none.
#[derive(Clone, Debug, Default)]
pub struct HiddenTextEntry {
    surface: Option<KeypadSurface>,
    install_count: usize,
}

impl HiddenTextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_count(&self) -> usize {
        self.install_count
    }
}

impl TextEntryPrimitive for HiddenTextEntry {
    fn input_surface(&self) -> Option<&KeypadSurface> {
        self.surface.as_ref()
    }

    fn input_surface_mut(&mut self) -> Option<&mut KeypadSurface> {
        self.surface.as_mut()
    }

    fn install_input_surface(&mut self, surface: KeypadSurface) {
        self.surface = Some(surface);
        self.install_count += 1;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SurfaceSync {
    Attached,
    Updated,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SurfaceAttachError {
    PrimitiveUnavailable,
    PrimitiveBusy,
}

impl Display for SurfaceAttachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceAttachError::PrimitiveUnavailable => {
                f.write_str("text-entry primitive is no longer available")
            }
            SurfaceAttachError::PrimitiveBusy => {
                f.write_str("text-entry primitive is borrowed elsewhere")
            }
        }
    }
}

impl std::error::Error for SurfaceAttachError {}

/// Direct reference from a pin view to the primitive whose input surface it overrides.
///
/// The binding never locates the primitive by itself: it is handed one at construction.
/// Host-supplied primitives are held weakly, the default hidden entry is owned.
pub struct SurfaceBinding {
    target: Weak<RefCell<dyn TextEntryPrimitive>>,
    owned: Option<Rc<RefCell<HiddenTextEntry>>>,
}

impl Default for SurfaceBinding {
    fn default() -> Self {
        Self::owned()
    }
}

impl SurfaceBinding {
    pub fn owned() -> Self {
        let entry = Rc::new(RefCell::new(HiddenTextEntry::new()));
        let shared: SharedTextEntry = entry.clone();
        Self {
            target: Rc::downgrade(&shared),
            owned: Some(entry),
        }
    }

    pub fn external(primitive: &SharedTextEntry) -> Self {
        Self {
            target: Rc::downgrade(primitive),
            owned: None,
        }
    }

    pub fn hidden_entry(&self) -> Option<Rc<RefCell<HiddenTextEntry>>> {
        self.owned.clone()
    }

    pub fn is_available(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Installs `content` on first use and updates the installed surface afterwards.
    pub fn sync(&self, content: KeypadSurface) -> Result<SurfaceSync, SurfaceAttachError> {
        let target = self
            .target
            .upgrade()
            .ok_or(SurfaceAttachError::PrimitiveUnavailable)?;
        let mut primitive = target
            .try_borrow_mut()
            .map_err(|_| SurfaceAttachError::PrimitiveBusy)?;
        if let Some(existing) = primitive.input_surface_mut() {
            existing.apply(content);
            return Ok(SurfaceSync::Updated);
        }
        primitive.install_input_surface(content);
        Ok(SurfaceSync::Attached)
    }

    pub fn current(&self) -> Option<KeypadSurface> {
        let target = self.target.upgrade()?;
        let primitive = target.try_borrow().ok()?;
        primitive.input_surface().cloned()
    }
}
