//! Named joint positions ("home", "rest", ...) that can be used as move targets.

use std::collections::BTreeMap;

use crate::kinematic_traits::Joints;
use crate::kinematics_error::ConfigurationError;
use crate::parameter_error::ParameterError;

/// Ordered map from preset name to joint angles (degrees).
///
/// A preset is only an alternate source of a target vector. It is validated
/// like any other target when a move is requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presets {
    positions: BTreeMap<String, Joints>,
}

impl Presets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a preset, returns the previous angles if any.
    /// Non-finite angles are refused.
    pub fn insert(&mut self, name: impl Into<String>, angles: Joints) -> Result<Option<Joints>, ParameterError> {
        if let Some(joint) = angles.iter().position(|a| !a.is_finite()) {
            return Err(ConfigurationError::NonFinite { joint, field: "preset angle" }.into());
        }
        Ok(self.positions.insert(name.into(), angles))
    }

    pub fn get(&self, name: &str) -> Option<&Joints> {
        self.positions.get(name)
    }

    /// Like [`Presets::get`] but reports a missing name as an error.
    pub fn require(&self, name: &str) -> Result<&Joints, ParameterError> {
        self.get(name).ok_or_else(|| ParameterError::UnknownPreset(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Option<Joints> {
        self.positions.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Joints)> {
        self.positions.iter().map(|(name, angles)| (name.as_str(), angles))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Writes the presets as a YAML mapping, one flow sequence per name:
    /// ```yaml
    /// "home": [0.0, 45.0, -30.0]
    /// ```
    pub fn to_yaml(&self) -> String {
        self.positions
            .iter()
            .map(|(name, angles)| {
                format!(
                    "{}: [{}]\n",
                    yaml_quoted(name),
                    angles.iter().map(|a| format!("{:?}", a)).collect::<Vec<_>>().join(", ")
                )
            })
            .collect()
    }
}

/// Double quoted YAML scalar. Control and other non-printable characters use `\u` escapes.
fn yaml_quoted(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}') => {
                quoted.push_str(&format!("\\u{:04X}", c as u32))
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(feature = "allow_filesystem")]
mod yaml {
    use std::path::Path;

    use super::*;

    impl Presets {
        /// Parses presets written by [`Presets::to_yaml`] (or by hand, in the same format).
        /// An empty document gives no presets.
        pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
            if contents.trim().is_empty() {
                return Ok(Self::default());
            }
            let positions: BTreeMap<String, Joints> =
                serde_saphyr::from_str(contents).map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
            for (name, angles) in &positions {
                if !angles.iter().all(|a| a.is_finite()) {
                    return Err(ParameterError::ParseError(format!("preset '{}' has non finite angles", name)));
                }
            }
            Ok(Presets { positions })
        }

        pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
            let contents = std::fs::read_to_string(path)?;
            Self::from_yaml_str(&contents)
        }

        pub fn save_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ParameterError> {
            std::fs::write(path, self.to_yaml())?;
            Ok(())
        }
    }
}
