//! Remote registry access via `reg.exe`, funnelled through the transport so an
//! established session is reused where one exists.

use std::sync::Arc;

use async_trait::async_trait;

use fleetprobe_common::error::{RemoteError, RemoteResult};
use fleetprobe_common::registry::RegistryData;
use fleetprobe_core::ports::{ExecTarget, RegistryStore, RemoteTransport};

pub struct CommandRegistry {
    transport: Arc<dyn RemoteTransport>,
}

impl CommandRegistry {
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl RegistryStore for CommandRegistry {
    async fn get_value(
        &self,
        target: ExecTarget<'_>,
        path: &str,
        name: &str,
    ) -> RemoteResult<Option<RegistryData>> {
        let command = format!(r#"reg query "{path}" /v "{name}""#);
        match self.transport.execute(target, &command).await {
            Ok(output) => parse_query_output(&output, name).map(Some),
            // reg query exits non-zero when the value does not exist.
            Err(RemoteError::Failed(msg)) if msg.to_ascii_lowercase().contains("unable to find") => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn set_value(
        &self,
        target: ExecTarget<'_>,
        path: &str,
        name: &str,
        value: &RegistryData,
    ) -> RemoteResult<()> {
        let (kind, data) = wire_form(value);
        let mut command = format!(r#"reg add "{path}" /v "{name}" /t {kind} /d "{data}" /f"#);
        if matches!(value, RegistryData::MultiString(_)) {
            command.push_str(" /s ;");
        }
        self.transport.execute(target, &command).await.map(|_| ())
    }
}

fn wire_form(value: &RegistryData) -> (&'static str, String) {
    match value {
        RegistryData::String(_) => ("REG_SZ", value.to_string()),
        RegistryData::ExpandString(_) => ("REG_EXPAND_SZ", value.to_string()),
        RegistryData::Binary(_) => ("REG_BINARY", value.to_string()),
        RegistryData::DWord(_) => ("REG_DWORD", value.to_string()),
        RegistryData::MultiString(_) => ("REG_MULTI_SZ", value.to_string()),
        RegistryData::QWord(_) => ("REG_QWORD", value.to_string()),
    }
}

/// Pulls the typed value out of `reg query` output, e.g.
/// `    CheckInterval    REG_DWORD    0x3c`.
fn parse_query_output(output: &str, name: &str) -> RemoteResult<RegistryData> {
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some(name) {
            continue;
        }
        let Some(kind) = parts.next() else { continue };
        let data = parts.collect::<Vec<_>>().join(" ");
        return decode(kind, &data)
            .ok_or_else(|| RemoteError::Failed(format!("unparseable registry line '{line}'")));
    }
    Err(RemoteError::Failed(format!(
        "value '{name}' missing from reg query output"
    )))
}

fn decode(kind: &str, data: &str) -> Option<RegistryData> {
    match kind {
        "REG_SZ" => Some(RegistryData::String(data.to_string())),
        "REG_EXPAND_SZ" => Some(RegistryData::ExpandString(data.to_string())),
        "REG_BINARY" => {
            let bytes = (0..data.len())
                .step_by(2)
                .map(|i| u8::from_str_radix(data.get(i..i + 2)?, 16).ok())
                .collect::<Option<Vec<u8>>>()?;
            Some(RegistryData::Binary(bytes))
        }
        "REG_DWORD" => {
            let raw = data.strip_prefix("0x")?;
            u32::from_str_radix(raw, 16).ok().map(RegistryData::DWord)
        }
        "REG_MULTI_SZ" => Some(RegistryData::MultiString(
            data.split(';').map(str::to_string).collect(),
        )),
        "REG_QWORD" => {
            let raw = data.strip_prefix("0x")?;
            u64::from_str_radix(raw, 16).ok().map(RegistryData::QWord)
        }
        _ => None,
    }
}
