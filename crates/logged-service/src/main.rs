use tracing::info;

use crate::core::context::Context;
use crate::core::Error;
use crate::demo::Shop;

mod core;
mod demo;

fn main() -> Result<(), Error> {
    let context = Context::load()?;
    crate::core::logging::install(&context.configuration.verbosity)?;

    let shop = Shop::new(context.sink(), context.configuration.logging.clone())?;

    info!("running shop...");
    demo::run(&shop);

    info!("shop closed");
    Ok(())
}
