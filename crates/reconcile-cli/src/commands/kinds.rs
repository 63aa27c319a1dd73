//! Kind listing command

use clap::Args;
use reconcile_core::KindRegistry;
use serde_json::json;

#[derive(Debug, Args)]
pub struct KindsArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: KindsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = KindRegistry::builtin();

    if args.json {
        let kinds: Vec<_> = registry
            .iter()
            .map(|kind| {
                json!({
                    "name": kind.name(),
                    "discriminator": kind.discriminator(),
                    "variants": kind.known_variants(),
                    "attributes": kind.attributes(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&kinds)?);
        return Ok(());
    }

    for kind in registry.iter() {
        match kind.discriminator() {
            Some(discriminator) => println!(
                "{} ({}: {})",
                kind.name(),
                discriminator,
                kind.known_variants().join(", ")
            ),
            None => println!("{}", kind.name()),
        }
        for decl in kind.attributes() {
            println!("  {} {}", decl.name, decl.kind);
        }
    }
    Ok(())
}
