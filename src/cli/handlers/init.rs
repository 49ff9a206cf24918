use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::workspace_io::{self, CONFIG_FILE};

pub fn cmd_init(dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    workspace_io::init_workspace(dir, args.force)?;
    println!("initialized {}", dir.display());
    println!("  edit {} to change topic fields and task columns", dir.join(CONFIG_FILE).display());
    Ok(())
}
