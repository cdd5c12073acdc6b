//! List command implementation

use xsec_core::archive::SurfaceArchive;

use crate::Result;

/// Run the list command
pub fn run(archive: &impl SurfaceArchive) -> Result<()> {
    let names = archive.names();
    if names.is_empty() {
        println!("Archive is empty");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
