use std::path::PathBuf;

use registrar::Store;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The university's name
    #[arg(long, short)]
    name: String,

    /// The university's motto
    #[arg(long, short, default_value = "")]
    motto: String,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::init(root, self.name, self.motto)?;

        println!(
            "Initialized registry for {} in {}",
            store.registry().name(),
            store.root().display()
        );
        println!("  Created: config.toml");
        println!("  Created: {}", store.config().data_file());
        println!();
        println!("Next steps:");
        println!("  reg add-course CS101 \"Intro to Programming\"");
        println!("  reg add-student \"Ana\" 1");

        Ok(())
    }
}
