use std::collections::BTreeMap;
use std::fmt;

/// A parsed extended g-code command: `NAME KEY=VALUE KEY=VALUE ...`.
///
/// - The command name is upper-cased.
/// - Parameter keys are upper-cased; values are kept verbatim.
/// - Later duplicates of a key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcodeCommand {
    name: String,
    params: BTreeMap<String, String>,
}

/// A parameter was present but could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub key: String,
    pub value: String,
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to parse '{}' as a number for parameter {}",
            self.value, self.key
        )
    }
}

impl std::error::Error for ParamError {}

impl GcodeCommand {
    /// Build a command without parameters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_ascii_uppercase(),
            params: BTreeMap::new(),
        }
    }

    /// Parse a command line. Returns `None` for blank lines and comments.
    pub fn parse(line: &str) -> Option<Self> {
        let line = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut parts = line.split_whitespace();
        let mut cmd = Self::new(parts.next()?);
        for part in parts {
            if let Some((k, v)) = part.split_once('=') {
                cmd = cmd.with_param(k, v);
            }
        }
        Some(cmd)
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params
            .insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw parameter value; keys are matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Float parameter with a default for absent keys.
    pub fn get_float(&self, key: &str, default: f64) -> Result<f64, ParamError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParamError {
                    key: key.to_ascii_uppercase(),
                    value: raw.to_string(),
                }),
        }
    }
}

impl fmt::Display for GcodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (k, v) in &self.params {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}
