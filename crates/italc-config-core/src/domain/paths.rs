//! Expansion of the path variables accepted in path-valued settings.
//!
//! Settings such as `Logging/LogFileDirectory` are stored unexpanded so the
//! same configuration can be deployed to many machines and users:
//!
//! | Variable                            | Expands to                        |
//! |-------------------------------------|-----------------------------------|
//! | `$HOME`, `%HOME%`                   | the user's home directory         |
//! | `$PROFILE`, `%PROFILE%`             | the user's home directory         |
//! | `$APPDATA`, `%APPDATA%`             | per-user iTALC data directory     |
//! | `$GLOBALAPPDATA`, `%GLOBALAPPDATA%` | system-wide iTALC data directory  |
//! | `$TMP`, `$TEMP`, `%TMP%`, `%TEMP%`  | the platform temp directory       |
//!
//! Duplicate directory separators are collapsed afterwards, except for a
//! leading `\\` or `//` which may start a UNC path on Windows.

use std::path::PathBuf;

/// Resolved values for every supported path variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathVariables {
    pub home: String,
    pub personal_config: String,
    pub system_config: String,
    pub temp: String,
}

impl PathVariables {
    /// Resolves the variables for the current user and platform.
    pub fn from_environment() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Self {
            home: display(&home),
            personal_config: display(&personal_config_dir(&home)),
            system_config: display(&system_config_dir()),
            temp: display(&std::env::temp_dir()),
        }
    }

    /// Replaces every known variable in `path` and normalises separators.
    pub fn expand(&self, path: &str) -> String {
        let replacements: [(&str, &str); 12] = [
            ("$HOME", &self.home),
            ("%HOME%", &self.home),
            ("$PROFILE", &self.home),
            ("%PROFILE%", &self.home),
            ("$GLOBALAPPDATA", &self.system_config),
            ("%GLOBALAPPDATA%", &self.system_config),
            ("$APPDATA", &self.personal_config),
            ("%APPDATA%", &self.personal_config),
            ("$TEMP", &self.temp),
            ("$TMP", &self.temp),
            ("%TEMP%", &self.temp),
            ("%TMP%", &self.temp),
        ];

        let expanded = replacements
            .iter()
            .fold(path.to_string(), |acc, (variable, value)| acc.replace(variable, value));
        collapse_separators(&expanded)
    }
}

/// Expands path variables using the current environment.
pub fn expand(path: &str) -> String {
    PathVariables::from_environment().expand(path)
}

fn collapse_separators(path: &str) -> String {
    let prefix_len = if path.starts_with("\\\\") || path.starts_with("//") {
        2
    } else {
        0
    };

    let mut out = String::with_capacity(path.len());
    out.push_str(&path[..prefix_len]);

    let mut previous_separator = prefix_len > 0;
    for c in path[prefix_len..].chars() {
        let separator = c == '/' || c == '\\';
        if separator && previous_separator {
            continue;
        }
        previous_separator = separator;
        out.push(c);
    }
    out
}

fn display(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

fn personal_config_dir(home: &std::path::Path) -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let _ = home;
        dirs::config_dir().unwrap_or_default().join("iTALC")
    }

    #[cfg(not(target_os = "windows"))]
    {
        home.join(".italc")
    }
}

fn system_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("PROGRAMDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
            .join("iTALC")
    }

    #[cfg(not(target_os = "windows"))]
    {
        PathBuf::from("/etc/italc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> PathVariables {
        PathVariables {
            home: "/home/admin".to_string(),
            personal_config: "/home/admin/.italc".to_string(),
            system_config: "/etc/italc".to_string(),
            temp: "/tmp".to_string(),
        }
    }

    #[test]
    fn test_expand_replaces_dollar_and_percent_forms() {
        let vars = fixed();
        assert_eq!(vars.expand("$HOME/logs"), "/home/admin/logs");
        assert_eq!(vars.expand("%TEMP%"), "/tmp");
        assert_eq!(vars.expand("$PROFILE"), "/home/admin");
    }

    #[test]
    fn test_expand_distinguishes_appdata_from_globalappdata() {
        let vars = fixed();
        assert_eq!(vars.expand("$GLOBALAPPDATA/keys"), "/etc/italc/keys");
        assert_eq!(vars.expand("$APPDATA/keys"), "/home/admin/.italc/keys");
    }

    #[test]
    fn test_expand_collapses_duplicate_separators() {
        let vars = fixed();
        assert_eq!(vars.expand("$TEMP//italc///logs"), "/tmp/italc/logs");
    }

    #[test]
    fn test_expand_keeps_unc_prefix() {
        let vars = fixed();
        assert_eq!(vars.expand("\\\\server\\\\share"), "\\\\server\\share");
    }

    #[test]
    fn test_expand_leaves_plain_paths_untouched() {
        assert_eq!(fixed().expand("/var/log/italc"), "/var/log/italc");
    }

    #[test]
    fn test_from_environment_resolves_temp_dir() {
        let vars = PathVariables::from_environment();
        assert!(!vars.temp.is_empty());
    }
}
