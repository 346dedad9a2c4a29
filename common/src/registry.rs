//! Typed model for remote registry values.

use std::fmt;

/// A registry value together with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryData {
    String(String),
    ExpandString(String),
    Binary(Vec<u8>),
    DWord(u32),
    MultiString(Vec<String>),
    QWord(u64),
}

impl RegistryData {
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryData::String(_) => "String",
            RegistryData::ExpandString(_) => "ExpandString",
            RegistryData::Binary(_) => "Binary",
            RegistryData::DWord(_) => "DWord",
            RegistryData::MultiString(_) => "MultiString",
            RegistryData::QWord(_) => "QWord",
        }
    }

    /// Builds a value from a kind token and its textual form, as supplied on the
    /// command line. Binary expects hex digits, multi-strings are `;`-separated.
    pub fn parse(kind: &str, raw: &str) -> Result<Self, String> {
        match kind.to_ascii_lowercase().as_str() {
            "string" => Ok(RegistryData::String(raw.to_string())),
            "expandstring" => Ok(RegistryData::ExpandString(raw.to_string())),
            "binary" => parse_hex(raw).map(RegistryData::Binary),
            "dword" => raw
                .parse::<u32>()
                .map(RegistryData::DWord)
                .map_err(|e| format!("invalid dword '{raw}': {e}")),
            "multistring" => Ok(RegistryData::MultiString(
                raw.split(';').map(str::to_string).collect(),
            )),
            "qword" => raw
                .parse::<u64>()
                .map(RegistryData::QWord)
                .map_err(|e| format!("invalid qword '{raw}': {e}")),
            other => Err(format!("unknown registry value kind '{other}'")),
        }
    }
}

impl fmt::Display for RegistryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryData::String(s) | RegistryData::ExpandString(s) => write!(f, "{s}"),
            RegistryData::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            RegistryData::DWord(v) => write!(f, "{v}"),
            RegistryData::MultiString(parts) => write!(f, "{}", parts.join(";")),
            RegistryData::QWord(v) => write!(f, "{v}"),
        }
    }
}

/// One requested registry change: write `value` at `path`\`name`, capturing the
/// previous value as rollback data first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMutation {
    pub path: String,
    pub name: String,
    pub value: RegistryData,
}

fn parse_hex(raw: &str) -> Result<Vec<u8>, String> {
    let raw = raw.trim();
    if raw.len() % 2 != 0 {
        return Err(format!("binary value '{raw}' has odd length"));
    }
    (0..raw.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&raw[i..i + 2], 16)
                .map_err(|e| format!("invalid binary value '{raw}': {e}"))
        })
        .collect()
}
