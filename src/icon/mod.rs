use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use rust_embed::RustEmbed;

/// Glyphs drawn on the keypad's non-digit keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeypadIcon {
    Backspace,
    Eye,
    EyeOff,
}

impl KeypadIcon {
    pub const ALL: [KeypadIcon; 3] = [KeypadIcon::Backspace, KeypadIcon::Eye, KeypadIcon::EyeOff];

    /// Icon for the visibility key. A masked code shows the crossed-out eye.
    pub fn visibility(secure_active: bool) -> Self {
        if secure_active {
            KeypadIcon::EyeOff
        } else {
            KeypadIcon::Eye
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            KeypadIcon::Backspace => "backspace.svg",
            KeypadIcon::Eye => "eye.svg",
            KeypadIcon::EyeOff => "eye-off.svg",
        }
    }

    /// Text shown when the icon pack could not be extracted.
    pub fn fallback(self) -> &'static str {
        match self {
            KeypadIcon::Backspace => "⌫",
            KeypadIcon::Eye => "Show",
            KeypadIcon::EyeOff => "Hide",
        }
    }

    pub fn path(self) -> Option<PathBuf> {
        let root = pack_root()?;
        let path = root.join(self.file_name());
        path.is_file().then_some(path)
    }
}

fn pack_root() -> Option<&'static Path> {
    static ROOT: OnceLock<Option<PathBuf>> = OnceLock::new();
    ROOT.get_or_init(|| extract_embedded_pack::<EmbeddedKeypadIcons>("keypad"))
        .as_deref()
}

fn extract_embedded_pack<T: RustEmbed>(folder_name: &str) -> Option<PathBuf> {
    let root = std::env::temp_dir()
        .join("calmui-otp-icons")
        .join(env!("CARGO_PKG_VERSION"))
        .join(folder_name);
    let marker = root.join(".extract-ready");

    if marker.exists() && embedded_pack_is_complete::<T>(&root) {
        return Some(root);
    }

    let _ = fs::remove_dir_all(&root);
    if let Err(error) = fs::create_dir_all(&root) {
        tracing::warn!(%error, path = %root.display(), "cannot create keypad icon directory");
        return None;
    }

    for relative in T::iter() {
        let relative = relative.as_ref();
        let Some(safe_relative) = sanitize_relative_path(relative) else {
            continue;
        };
        let Some(content) = T::get(relative) else {
            continue;
        };
        if let Err(error) = fs::write(root.join(safe_relative), content.data.as_ref()) {
            tracing::warn!(%error, icon = relative, "cannot extract keypad icon");
            return None;
        }
    }

    fs::write(marker, b"ok").ok()?;
    Some(root)
}

fn embedded_pack_is_complete<T: RustEmbed>(root: &Path) -> bool {
    T::iter().all(|relative| {
        sanitize_relative_path(relative.as_ref()).is_some_and(|safe| root.join(safe).is_file())
    })
}

fn sanitize_relative_path(input: &str) -> Option<PathBuf> {
    let mut output = PathBuf::new();
    for component in Path::new(input).components() {
        match component {
            Component::Normal(value) => output.push(value),
            _ => return None,
        }
    }
    Some(output)
}

#[derive(RustEmbed)]
#[folder = "assets/icons/keypad"]
struct EmbeddedKeypadIcons;
