//! Raster -> WebP re-encoding.
//!
//! The raster file is removed only after the WebP file has been written.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::ExtendedColorType;
use image::codecs::webp::WebPEncoder;

use super::{Outcome, discard_partial};
use crate::config::{EncodeBackend, PipelineConfig};
use crate::tool::{ToolCommand, file_vars};
use crate::debug;

/// The encoder command, if the external backend is in use.
pub fn external_command(config: &PipelineConfig) -> Option<&ToolCommand> {
    match config.encode.backend {
        EncodeBackend::External => Some(&config.encode.command),
        EncodeBackend::Builtin => None,
    }
}

/// `images/weapons/Sword.png` -> `images/weapons/Sword.webp`
pub fn target_path(raster: &Path) -> PathBuf {
    raster.with_extension("webp")
}

/// Encode one raster file and delete it.
pub fn encode_file(config: &PipelineConfig, raster: &Path) -> Result<Outcome> {
    let target = target_path(raster);
    if target == raster {
        bail!("`{}` is already a WebP file", raster.display());
    }
    // a stale file would hide an encoder that exits 0 without writing
    if target.exists() {
        fs::remove_file(&target)
            .with_context(|| format!("failed to replace `{}`", target.display()))?;
    }

    debug!(
        "encode";
        "{} -> {}",
        config.root_relative(raster).display(),
        config.root_relative(&target).display()
    );

    let written = match external_command(config) {
        Some(command) => encode_external(command, config.encode.quality, raster, &target),
        None => encode_builtin(raster, &target),
    };
    if let Err(err) = written {
        discard_partial(&target);
        return Err(err);
    }

    fs::remove_file(raster)
        .with_context(|| format!("failed to remove `{}`", raster.display()))?;
    Ok(Outcome::Done)
}

fn encode_external(command: &ToolCommand, quality: u8, input: &Path, output: &Path) -> Result<()> {
    let mut vars = file_vars(input, output);
    vars.insert("QUALITY", quality.to_string());

    command.invoke(&vars)?.check()?;
    if !output.is_file() {
        bail!("encoder did not write `{}`", output.display());
    }
    Ok(())
}

/// Lossless WebP through the `image` crate.
fn encode_builtin(input: &Path, output: &Path) -> Result<()> {
    let img = image::open(input).with_context(|| format!("failed to decode `{}`", input.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let file =
        File::create(output).with_context(|| format!("failed to create `{}`", output.display()))?;
    let mut writer = BufWriter::new(file);
    WebPEncoder::new_lossless(&mut writer)
        .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .with_context(|| format!("failed to encode `{}`", output.display()))?;

    writer
        .into_inner()
        .map_err(|err| err.into_error())
        .with_context(|| format!("failed to write `{}`", output.display()))?;
    Ok(())
}
