//! Display names for raw application identifiers.

/// Name used when the activity service reports no application.
pub const UNKNOWN_APP: &str = "Unknown";

/// Known process names (lowercase, without `.exe`) and their display names.
///
/// System hosts keep their canonical casing so they still match the
/// timeline's system-app list after normalization.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("code", "Visual Studio Code"),
    ("explorer", "File Explorer"),
    ("applicationframehost", "System"),
    ("shellexperiencehost", "ShellExperienceHost"),
    ("runtimebroker", "RuntimeBroker"),
    ("searchapp", "SearchApp"),
    ("lockapp", "LockApp"),
    ("chrome", "Google Chrome"),
];

/// Normalizes a raw process identifier into a display name.
///
/// Surrounding whitespace is trimmed first, so `"code.exe "` still maps to
/// its display name. Then a trailing `.exe` (any case) is stripped and
/// well-known processes map to their display names; anything else gets its
/// first letter capitalized. Never returns an empty string.
pub fn clean_app_name(raw: &str) -> String {
    let name = strip_exe_suffix(raw.trim());
    if name.is_empty() {
        return UNKNOWN_APP.to_string();
    }

    let lower = name.to_lowercase();
    DISPLAY_NAMES
        .iter()
        .find(|(process, _)| *process == lower)
        .map_or_else(|| capitalize(name), |(_, display)| (*display).to_string())
}

fn strip_exe_suffix(name: &str) -> &str {
    let Some(split) = name.len().checked_sub(".exe".len()) else {
        return name;
    };
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(".exe") => stem,
        _ => name,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
