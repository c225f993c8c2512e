//! Application categories as the single source of truth for category labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Activity category of an application.
///
/// Declaration order is the classification priority and the tie-break order
/// for breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Entertainment,
    Code,
    Design,
    Documenting,
    Utility,
    Browsing,
    Messaging,
    Miscellaneous,
    Productivity,
    Writing,
    Admin,
    Uncategorized,
}

impl Category {
    /// Every category, in classification order.
    pub const ALL: [Self; 12] = [
        Self::Entertainment,
        Self::Code,
        Self::Design,
        Self::Documenting,
        Self::Utility,
        Self::Browsing,
        Self::Messaging,
        Self::Miscellaneous,
        Self::Productivity,
        Self::Writing,
        Self::Admin,
        Self::Uncategorized,
    ];

    /// Label used for display and serialization.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entertainment => "Entertainment",
            Self::Code => "Code",
            Self::Design => "Design",
            Self::Documenting => "Documenting",
            Self::Utility => "Utility",
            Self::Browsing => "Browsing",
            Self::Messaging => "Messaging",
            Self::Miscellaneous => "Miscellaneous",
            Self::Productivity => "Productivity",
            Self::Writing => "Writing",
            Self::Admin => "Admin",
            Self::Uncategorized => "Uncategorized",
        }
    }

    /// Lowercase substrings of an app name that place it in this category.
    const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Entertainment => &[
                "vlc",
                "spotify",
                "netflix",
                "prime video",
                "xbox",
                "steam",
                "discord",
                "youtube music",
                "itunes",
                "lightroom",
            ],
            Self::Code => &[
                "code",
                "devenv",
                "pycharm",
                "webstorm",
                "intellij",
                "clion",
                "github",
                "git",
                "docker desktop",
                "postman",
                "node",
                "python",
                "wsl",
                "notepad++",
                "xampp-control",
                "wampmanager",
                "mongodbcompass",
                "mysqlworkbench",
            ],
            Self::Design => &[
                "photoshop",
                "illustrator",
                "figma",
                "canva",
                "xd",
                "blender",
                "resolve",
                "premiere pro",
                "afterfx",
                "krita",
                "gimp",
                "inkscape",
            ],
            Self::Documenting => &[
                "winword",
                "excel",
                "powerpnt",
                "onenote",
                "notion",
                "obsidian",
                "evernote",
                "soffice",
                "typora",
                "acrobat",
                "foxitreader",
            ],
            Self::Utility => &[
                "7zfm",
                "winrar",
                "sharex",
                "everything",
                "powertoys",
                "rufus",
                "cpuz",
                "hwmonitor",
                "crystaldiskinfo",
                "obs64",
                "nvidia control panel",
                "amd software",
            ],
            Self::Browsing => &["chrome", "msedge", "firefox", "brave", "opera", "tor browser"],
            Self::Messaging => &["whatsapp", "telegram", "slack", "teams", "skype", "zoom"],
            Self::Miscellaneous => &[
                "googledrivesync",
                "onedrive",
                "dropbox",
                "steamcmd",
                "epicgameslauncher",
                "battle.net",
            ],
            Self::Productivity => &[
                "todoist",
                "trello",
                "asana",
                "clockify",
                "rescuetime",
                "forest",
                "focustodo",
                "pomodone",
            ],
            Self::Writing => &["grammarly", "hemingway", "scrivener", "focuswriter"],
            Self::Admin => &[
                "taskmgr",
                "windowsterminal",
                "cmd",
                "powershell",
                "regedit",
                "diskmgmt",
                "devmgmt",
                "mmc",
            ],
            Self::Uncategorized => &[],
        }
    }
}

/// Window-title fragments checked when the app name matched nothing.
const TITLE_FALLBACKS: &[(&str, Category)] = &[
    ("google docs", Category::Documenting),
    ("youtube", Category::Entertainment),
    ("github", Category::Code),
];

/// Classifies an application by its (cleaned) name and window title.
///
/// The first category, in declaration order, owning a keyword contained in
/// the lowercased app name wins. Titles are only consulted afterwards, for
/// web apps running inside a browser-less wrapper.
pub fn categorize(app: &str, title: &str) -> Category {
    let app = app.to_lowercase();
    let by_app = Category::ALL.into_iter().find(|category| {
        category
            .keywords()
            .iter()
            .any(|keyword| app.contains(keyword))
    });
    if let Some(category) = by_app {
        return category;
    }

    let title = title.to_lowercase();
    TITLE_FALLBACKS
        .iter()
        .find(|(fragment, _)| title.contains(fragment))
        .map_or(Category::Uncategorized, |(_, category)| *category)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category labels.
#[derive(Debug, Clone, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(String);
