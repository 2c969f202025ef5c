//! `fatsort` binary: CLI entry point.
//!
//! Dispatches to either the information report (spec.md §4.8) or the
//! sort/list driver (spec.md §4.7), matching `main()`'s mode dispatch
//! in `fatsort.c`. Argument parsing lives in [`fatsort::cli`]; this
//! file only wires parsed flags to the library core and maps errors to
//! process exit codes (spec.md §6: 0 on success, nonzero on any fatal
//! error).

use anyhow::Context;
use clap::Parser;

use fatsort::cli::Cli;
use fatsort::device::OpenMode;
use fatsort::driver;
use fatsort::error::Error;
use fatsort::info;
use fatsort::volume::Volume;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { log::LevelFilter::Warn } else { log::LevelFilter::Info };
    env_logger::Builder::new().filter_level(level).format_timestamp(None).try_init().ok();

    if cli.info {
        run_info(&cli)
    } else {
        run_sort(&cli)
    }
}

fn run_info(cli: &Cli) -> anyhow::Result<()> {
    let mut volume = Volume::open(&cli.device, OpenMode::ReadOnly)
        .with_context(|| format!("failed to open {}", cli.device.display()))?;

    let (device, boot, _decoder) = volume.parts();
    let report = info::gather(device, boot).context("failed to gather FAT geometry")?;
    println!("{report}");

    if cli.verbose {
        let (device, boot, _decoder) = volume.parts();
        for (cluster, len) in info::chain_lengths(device, boot)? {
            println!("cluster {cluster:#010x}: chain length {len}");
        }
    }

    volume.close()?;
    Ok(())
}

fn run_sort(cli: &Cli) -> anyhow::Result<()> {
    let policy = cli.sort_policy();
    let filters = cli.filters()?;

    let mode = match (cli.list_only, cli.force) {
        (true, true) => OpenMode::ReadOnly,
        (true, false) => OpenMode::ReadOnlyExclusive,
        (false, true) => OpenMode::ReadWrite,
        (false, false) => OpenMode::ReadWriteExclusive,
    };

    let mut volume = Volume::open(&cli.device, mode)
        .with_context(|| format!("failed to open {}", cli.device.display()))?;

    if !policy.list_only && !volume.fats_match()? {
        return Err(Error::FatMismatch.into());
    }

    let root = volume.root_source()?;
    let mut rng = rand::thread_rng();
    let mut reports = Vec::new();

    {
        let (device, boot, decoder) = volume.parts();
        let boot = boot.clone();
        driver::visit(
            device,
            &boot,
            decoder,
            &policy,
            &filters,
            &mut rng,
            root,
            std::path::Path::new("/"),
            &mut reports,
        )?;
    }

    for report in &reports {
        if policy.list_only {
            println!("{}:", report.path.display());
            for name in &report.entry_names {
                println!("  {name}");
            }
        } else if report.rewritten {
            log::info!("sorted {}", report.path.display());
        }
    }

    volume.close()?;
    Ok(())
}
