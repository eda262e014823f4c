// src/lib.rs

pub mod cli;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod project;
pub mod sink;
pub mod supervisor;
pub mod types;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::supervisor::Supervisor;
use crate::types::{RunRequest, run_id};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project scanning (package.json)
/// - the run supervisor
/// - live output to stdout
/// - Ctrl-C handling (stop the run, then shut the supervisor down)
pub async fn run(args: CliArgs) -> Result<()> {
    let project = project::scan_project(&args.project_dir)
        .with_context(|| format!("scanning project at {}", args.project_dir.display()))?;

    if args.list {
        println!("{} ({})", project.name, project.path.display());
        for script in &project.scripts {
            println!("  {script}");
        }
        return Ok(());
    }

    // `required_unless_present` guarantees the script is set past this point.
    let script = args.script.clone().context("no script given")?;
    if !project.has_script(&script) {
        bail!(
            "script '{}' not found in {}; available: {}",
            script,
            project.path.join("package.json").display(),
            project.scripts.join(", ")
        );
    }

    let package_manager = args.package_manager.unwrap_or(project.package_manager);
    let id = run_id(&project.name, &script);

    let handle = Supervisor::spawn(&args.log_root);

    // Live output to stdout; the exit notification ends the wait below.
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<()>();
    let _output_sub = handle.events().subscribe_output(|event| {
        println!("{}", event.data);
    });
    let expected = id.clone();
    let _exit_sub = handle.events().subscribe_exit(move |event| {
        if event.run_id == expected {
            let _ = done_tx.send(());
        }
    });

    // Ctrl-C → stop the run; its exit notification then ends the loop.
    {
        let handle = handle.clone();
        let id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            handle.stop(id).await;
        });
    }

    info!(run_id = %id, pm = %package_manager, "launching script");
    let request = RunRequest {
        run_id: id.clone(),
        working_dir: project.path.clone(),
        script_name: script,
        package_manager,
        runtime_path: args.runtime.clone(),
    };

    if let Err(err) = handle.start(request).await {
        handle.shutdown().await;
        return Err(err.into());
    }

    // Wait until the run exits (normal completion, failure, or Ctrl-C stop).
    let _ = done_rx.recv().await;
    handle.shutdown().await;
    Ok(())
}
