//! Plan and apply commands
//!
//! The current state is read from a JSON file and served by an in-memory
//! remote; `apply` writes the rendered post-apply state back to that file
//! and to the `--state` file, which holds the local state of a managed
//! object. Without local state the object must be taken over with `--adopt`.

use clap::Args;
use reconcile_core::core_types::RequestContext;
use reconcile_core::{
    record_from_str, record_to_json, record_to_json_redacted, AttributeRecord, KindRegistry,
    ObjectIdentity, ObjectKind,
};
use reconcile_engine::{InMemoryRemote, ReconcileOptions, ReconcileOutcome, Reconciler};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Object kind, e.g. match-criteria
    #[arg(long)]
    pub kind: String,

    /// Remote key of the object
    #[arg(long)]
    pub id: String,

    /// Owning object for nested kinds, e.g. the backend of an index
    #[arg(long)]
    pub parent: Option<String>,

    /// JSON file with the desired attributes
    #[arg(long)]
    pub desired: PathBuf,

    /// JSON file with the current remote attributes
    #[arg(long)]
    pub current: PathBuf,

    /// JSON file with the local state saved by the last apply
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Take over an object with no local state
    #[arg(long)]
    pub adopt: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_plan(args: ReconcileArgs) -> Result<(), Box<dyn std::error::Error>> {
    run(args, true)
}

pub fn execute_apply(args: ReconcileArgs) -> Result<(), Box<dyn std::error::Error>> {
    run(args, false)
}

fn run(args: ReconcileArgs, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = KindRegistry::builtin();
    let kind = registry.get(&args.kind).ok_or_else(|| {
        format!(
            "unknown kind '{}' (known: {})",
            args.kind,
            registry.names().collect::<Vec<_>>().join(", ")
        )
    })?;

    let identity = match &args.parent {
        Some(parent) => ObjectIdentity::nested(kind.name(), parent.clone(), args.id.clone()),
        None => ObjectIdentity::new(kind.name(), args.id.clone()),
    };
    let desired = read_record(kind, &args.desired)?;
    let current = read_record(kind, &args.current)?;

    let prior = match &args.state {
        Some(path) if path.exists() => Some(read_record(kind, path)?),
        _ => None,
    };

    let remote = InMemoryRemote::new();
    remote.insert(identity.clone(), current);

    let mut options = match (&prior, args.adopt) {
        (_, true) => ReconcileOptions::adopt(),
        (Some(prior), false) => ReconcileOptions::update(prior),
        (None, false) => ReconcileOptions::default(),
    };
    options.dry_run = dry_run;

    let outcome = Reconciler::new(&remote, &remote).reconcile(
        &RequestContext::new(),
        &identity,
        kind,
        &desired,
        &options,
    )?;

    if !dry_run {
        let state = serde_json::to_string_pretty(&record_to_json(kind, &outcome.state))? + "\n";
        std::fs::write(&args.current, &state)?;
        if let Some(path) = &args.state {
            std::fs::write(path, &state)?;
        }
    }

    if args.json {
        print_json(kind, &outcome)?;
    } else {
        print_text(kind, &outcome);
    }
    Ok(())
}

fn read_record(
    kind: &ObjectKind,
    path: &Path,
) -> Result<AttributeRecord, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(record_from_str(kind, &text)?)
}

fn print_text(kind: &ObjectKind, outcome: &ReconcileOutcome) {
    println!("{} ({}): {}", outcome.identity, outcome.variant, outcome.status);
    if outcome.adopted {
        println!("  adopted existing object");
    }
    for op in &outcome.operations {
        println!("  {}", op.display_for(kind));
    }
}

fn print_json(kind: &ObjectKind, outcome: &ReconcileOutcome) -> Result<(), serde_json::Error> {
    let operations: Vec<_> = outcome
        .operations
        .iter()
        .map(|op| op.redacted(kind))
        .collect();
    let report = json!({
        "object": outcome.identity.to_string(),
        "variant": outcome.variant,
        "status": outcome.status,
        "adopted": outcome.adopted,
        "operations": operations,
        "transitions": outcome.transitions,
        "state": record_to_json_redacted(kind, &outcome.state),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
