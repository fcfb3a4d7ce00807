//! Objects command: inspect a device file.

use semlink_core::{default_device_file_path, load_device_file, CoreError};

use crate::cli::ObjectsArgs;
use crate::error::Result;
use crate::output::get_formatter;

/// Run the objects command
pub async fn run_objects(args: ObjectsArgs, json: bool) -> Result<()> {
    let formatter = get_formatter(json);

    let path = match args.config {
        Some(path) => path,
        None => default_device_file_path().map_err(CoreError::from)?,
    };

    let file = load_device_file(&path).await.map_err(CoreError::from)?;

    println!("{}", formatter.format_objects(&file.objects));

    Ok(())
}
