// i18n.rs - runtime UI strings
//
// - Tables live in assets/i18n/<lang>.json ({ "key": "value" })
// - Lookup order: selected lang -> en on disk -> en compiled in -> key itself
// - tr("key") / tr_with("key", &[("name", ...)]) with {name} placeholders
//
// Language: --lang <code>, else MOONR_LANG, else en.

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";
const BUILTIN_EN: &str = include_str!("../assets/i18n/en.json");

#[derive(Debug, Clone, Default)]
pub struct Strings {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

impl Strings {
    pub fn from_maps(lang: impl Into<String>, map: HashMap<String, String>, fallback_map: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            map,
            fallback_map,
        }
    }

    pub fn get(&self, key: &str) -> String {
        self.map
            .get(key)
            .or_else(|| self.fallback_map.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

static STRINGS: OnceCell<RwLock<Strings>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("ignoring malformed string table {}: {}", path.display(), e);
            None
        }
    }
}

/// assets/i18n/<lang>.json next to the executable, then under the working dir.
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{lang}.json");
    let exe_dir = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));

    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::from(".")))
        .map(|dir| dir.join("assets").join("i18n").join(&file))
        .find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    find_lang_file(lang)
        .and_then(|p| load_json_map(&p))
        .unwrap_or_default()
}

fn builtin_fallback() -> HashMap<String, String> {
    serde_json::from_str(BUILTIN_EN).unwrap_or_default()
}

/// Initialize the global table. Later calls switch language.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let map = load_lang(&lang);

    let mut fallback_map = builtin_fallback();
    fallback_map.extend(load_lang(FALLBACK_LANG));

    if map.is_empty() && lang != FALLBACK_LANG {
        log::warn!("no strings found for language {lang:?}, using {FALLBACK_LANG}");
    }

    let strings = Strings::from_maps(lang, map, fallback_map);
    if let Some(lock) = STRINGS.get() {
        if let Ok(mut w) = lock.write() {
            *w = strings;
        }
    } else {
        let _ = STRINGS.set(RwLock::new(strings));
    }
}

/// Localized text for `key`, or the key itself.
pub fn tr(key: &str) -> String {
    match STRINGS.get().and_then(|l| l.read().ok()) {
        Some(s) => s.get(key),
        None => key.to_string(),
    }
}

/// Localized text with `{name}` placeholders substituted. Unknown
/// placeholders are kept.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(tr(key), args)
}

fn substitute(mut s: String, args: &[(&str, String)]) -> String {
    for (k, v) in args {
        s = s.replace(&format!("{{{k}}}"), v);
    }
    s
}

/// CLI value, then MOONR_LANG, then the fallback.
pub fn resolve_lang(cli: Option<&str>) -> String {
    if let Some(v) = cli.filter(|v| !v.trim().is_empty()) {
        return v.to_string();
    }
    if let Ok(v) = std::env::var("MOONR_LANG") {
        if !v.trim().is_empty() {
            return v;
        }
    }
    FALLBACK_LANG.to_string()
}
