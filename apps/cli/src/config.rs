// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defaults loaded from environment variables.

/// Pipeline defaults; command line flags take precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Voxel edge length.
    pub resolution: f64,
    /// Padding cells around the mesh.
    pub padding: usize,
    /// Neighborhood size: 6, 18 or 26.
    pub connectivity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: 0.5,
            padding: 2,
            connectivity: 18,
        }
    }
}

impl Settings {
    /// Load settings from `VOXCITY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup. Unset or
    /// unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            resolution: lookup("VOXCITY_RESOLUTION")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.resolution),
            padding: lookup("VOXCITY_PADDING")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.padding),
            connectivity: lookup("VOXCITY_CONNECTIVITY")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.connectivity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("VOXCITY_RESOLUTION", "0.25"),
            ("VOXCITY_PADDING", " 3 "),
            ("VOXCITY_CONNECTIVITY", "26"),
        ]));
        assert_eq!(settings.resolution, 0.25);
        assert_eq!(settings.padding, 3);
        assert_eq!(settings.connectivity, 26);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[("VOXCITY_PADDING", "lots")]));
        assert_eq!(settings.padding, 2);
    }
}
