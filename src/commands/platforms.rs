use anyhow::Result;
use staysync_core::staysync::Staysync;

use crate::render::render_platform;

pub fn run(staysync: &Staysync) -> Result<()> {
    for (id, config) in staysync.registry().iter() {
        println!("{}", render_platform(id, config));
    }

    Ok(())
}
