use git_version::git_version;

pub mod id;
pub mod scale;

pub fn version() -> String {
    format!(
        "{} ({})",
        env!("CARGO_PKG_VERSION"),
        git_version!(fallback = "unknown commit"),
    )
}

/// Boolean-like command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

impl Switch {
    /// Parses a boolean-like token, ignoring case.
    ///
    /// Returns `None` for anything that isn't recognized.
    pub fn parse(token: &str) -> Option<Self> {
        const ON: [&str; 7] = ["1", "yes", "on", "true", "enable", "enabled", "active"];
        const OFF: [&str; 7] = ["0", "no", "off", "false", "disable", "disabled", "inactive"];

        if ON.iter().any(|s| token.eq_ignore_ascii_case(s)) {
            Some(Self::On)
        } else if OFF.iter().any(|s| token.eq_ignore_ascii_case(s)) {
            Some(Self::Off)
        } else if token.eq_ignore_ascii_case("toggle") {
            Some(Self::Toggle)
        } else {
            None
        }
    }

    pub fn resolve(self, current: bool) -> bool {
        match self {
            Switch::On => true,
            Switch::Off => false,
            Switch::Toggle => !current,
        }
    }
}
