use crate::agent::Agent;
use anyhow::{Context, Result};
use flock_common::{OutputConfig, Snapshot};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serialization formats for recorded snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    /// Parses the configured format name. Unknown names fall back to JSON with a warning;
    /// an absent name means JSON.
    pub fn from_config(name: Option<&str>) -> Self {
        match name.unwrap_or("json") {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" | "msgpack" => OutputFormat::MessagePack,
            other => {
                warn!("Unknown output format: {}. Using JSON instead.", other);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes all snapshots to `<base_filename>_snapshots.<ext>` and returns the path written.
pub fn save_snapshots(snapshots: &[Snapshot], output: &OutputConfig) -> Result<PathBuf> {
    let format = OutputFormat::from_config(output.format.as_deref());
    let path = PathBuf::from(format!("{}_snapshots.{}", output.base_filename, format.extension()));
    write_snapshots(snapshots, format, &path)?;
    Ok(path)
}

/// Writes snapshots to an explicit path in the given format.
pub fn write_snapshots(snapshots: &[Snapshot], format: OutputFormat, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => serde_json::to_writer(&mut writer, snapshots)
            .context("Error serializing snapshots to JSON")?,
        OutputFormat::Bincode => bincode::serialize_into(&mut writer, snapshots)
            .context("Error serializing snapshots to bincode")?,
        OutputFormat::MessagePack => rmp_serde::encode::write(&mut writer, snapshots)
            .context("Error serializing snapshots to MessagePack")?,
    }
    writer
        .flush()
        .with_context(|| format!("Error writing snapshot file '{}'", path.display()))?;

    info!("{} snapshots saved to {} ({:?} format)", snapshots.len(), path.display(), format);
    Ok(())
}

/// Writes `id,x,y,dx,dy,heading` rows for every agent to `<base_filename>_final_states.csv`.
pub fn save_final_states(population: &[Agent], output: &OutputConfig) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_final_states.csv", output.base_filename));
    write_final_states(population, &path)?;
    Ok(path)
}

pub fn write_final_states(population: &[Agent], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    writer.write_record(["id", "x", "y", "dx", "dy", "heading"])?;
    for agent in population {
        writer.write_record(&[
            agent.id.0.to_string(),
            format!("{:.4}", agent.position.x),
            format!("{:.4}", agent.position.y),
            format!("{:.4}", agent.velocity.x),
            format!("{:.4}", agent.velocity.y),
            format!("{:.4}", agent.heading()),
        ])?;
    }
    writer.flush()?;
    info!("Final states of {} agents saved to {}", population.len(), path.display());
    Ok(())
}
