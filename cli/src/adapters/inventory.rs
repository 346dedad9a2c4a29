//! Inventory facts collected by running CIM one-liners over the transport.
//!
//! Each query emits `|`-delimited lines so the parsing here stays trivial; the
//! queries always produce a sequence, even when the host has a single processor or
//! volume.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fleetprobe_common::error::{RemoteError, RemoteResult};
use fleetprobe_core::ports::{ExecTarget, InventorySource, OsFacts, ProcessorInfo, RemoteTransport, VolumeInfo};

const OS_FACTS_QUERY: &str = r#"Get-CimInstance Win32_OperatingSystem | ForEach-Object { "$($_.Caption)|$($_.LastBootUpTime.ToUniversalTime().ToString('o'))" }"#;
const MEMORY_QUERY: &str = r#"Get-CimInstance Win32_PhysicalMemory | ForEach-Object { $_.Capacity }"#;
const MODEL_QUERY: &str = r#"(Get-CimInstance Win32_ComputerSystem).Model"#;
const PROCESSOR_QUERY: &str = r#"Get-CimInstance Win32_Processor | ForEach-Object { "$($_.Name)|$($_.NumberOfCores)|$($_.DataWidth)" }"#;
const VOLUME_QUERY: &str = r#"Get-CimInstance Win32_LogicalDisk | ForEach-Object { "$($_.DeviceID)|$($_.DriveType)|$($_.Size)|$($_.FreeSpace)" }"#;

pub struct CommandInventory {
    transport: Arc<dyn RemoteTransport>,
}

impl CommandInventory {
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self { transport }
    }

    async fn query(&self, host: &str, command: &str) -> RemoteResult<Vec<String>> {
        let output = self
            .transport
            .execute(ExecTarget::Host(host), command)
            .await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl InventorySource for CommandInventory {
    async fn os_facts(&self, host: &str) -> RemoteResult<OsFacts> {
        let lines = self.query(host, OS_FACTS_QUERY).await?;
        let line = lines
            .first()
            .ok_or_else(|| RemoteError::Failed("empty OS facts response".into()))?;
        let (caption, boot) = line
            .rsplit_once('|')
            .ok_or_else(|| RemoteError::Failed(format!("malformed OS facts line '{line}'")))?;
        let last_boot: DateTime<Utc> = boot
            .parse()
            .map_err(|e| RemoteError::Failed(format!("bad boot timestamp '{boot}': {e}")))?;
        Ok(OsFacts {
            caption: caption.trim().to_string(),
            last_boot,
        })
    }

    async fn memory_modules(&self, host: &str) -> RemoteResult<Vec<u64>> {
        self.query(host, MEMORY_QUERY)
            .await?
            .iter()
            .map(|line| {
                line.parse::<u64>()
                    .map_err(|e| RemoteError::Failed(format!("bad module capacity '{line}': {e}")))
            })
            .collect()
    }

    async fn machine_model(&self, host: &str) -> RemoteResult<String> {
        let lines = self.query(host, MODEL_QUERY).await?;
        Ok(lines.into_iter().next().unwrap_or_default())
    }

    async fn processors(&self, host: &str) -> RemoteResult<Vec<ProcessorInfo>> {
        self.query(host, PROCESSOR_QUERY)
            .await?
            .iter()
            .map(|line| parse_processor(line))
            .collect()
    }

    async fn volumes(&self, host: &str) -> RemoteResult<Vec<VolumeInfo>> {
        self.query(host, VOLUME_QUERY)
            .await?
            .iter()
            .map(|line| parse_volume(line))
            .collect()
    }
}

fn parse_processor(line: &str) -> RemoteResult<ProcessorInfo> {
    let mut parts = line.rsplitn(3, '|');
    let data_width = next_number::<u16>(&mut parts, line)?;
    let cores = next_number::<u32>(&mut parts, line)?;
    let name = parts
        .next()
        .ok_or_else(|| RemoteError::Failed(format!("malformed processor line '{line}'")))?;
    Ok(ProcessorInfo {
        name: name.trim().to_string(),
        cores,
        data_width,
    })
}

fn parse_volume(line: &str) -> RemoteResult<VolumeInfo> {
    let fields: Vec<&str> = line.split('|').collect();
    let &[label, drive_type, size, free] = fields.as_slice() else {
        return Err(RemoteError::Failed(format!("malformed volume line '{line}'")));
    };
    Ok(VolumeInfo {
        label: label.trim().to_string(),
        drive_type: parse_field(drive_type, line)?,
        // Media-less drives report empty size/free.
        capacity_bytes: if size.is_empty() { 0 } else { parse_field(size, line)? },
        free_bytes: if free.is_empty() { 0 } else { parse_field(free, line)? },
    })
}

fn next_number<T: std::str::FromStr>(
    parts: &mut std::str::RSplitN<'_, char>,
    line: &str,
) -> RemoteResult<T>
where
    T::Err: std::fmt::Display,
{
    let raw = parts
        .next()
        .ok_or_else(|| RemoteError::Failed(format!("malformed line '{line}'")))?;
    parse_field(raw, line)
}

fn parse_field<T: std::str::FromStr>(raw: &str, line: &str) -> RemoteResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| RemoteError::Failed(format!("bad field '{raw}' in '{line}': {e}")))
}
