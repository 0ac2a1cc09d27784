//! Create and open Kronosphere use cases

use crate::application::AppContext;
use crate::error::Result;
use crate::infrastructure::{Config, DirectoryPicker, Workspace};
use std::path::Path;
use tracing::debug;

/// Provision a new Kronosphere in the picked directory and make it active
pub fn create_workspace(
    ctx: &mut AppContext,
    name: &str,
    picker: &dyn DirectoryPicker,
) -> Result<Workspace> {
    let workspace = ctx.registry_mut().create_workspace(name, picker)?;
    ensure_config(ctx, &workspace.root_path)?;
    Ok(workspace)
}

/// Register an existing Kronosphere and make it active
pub fn open_workspace(ctx: &mut AppContext, picker: &dyn DirectoryPicker) -> Result<Workspace> {
    let workspace = ctx.registry_mut().open_existing(picker)?;
    ensure_config(ctx, &workspace.root_path)?;
    Ok(workspace)
}

/// Write a default config unless the workspace already has one
fn ensure_config(ctx: &AppContext, root: &Path) -> Result<()> {
    if Config::path_in(root).is_file() {
        return Ok(());
    }

    debug!(root = %root.display(), "Writing default config");
    Config::new(ctx.clock().now()).save_to_dir(root)
}
