//! Dungeon graph generator
//!
//! Headless driver: builds a config from flags or a JSON file, runs the
//! generation pipeline and prints the report.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dg_core::dungeon::{NodeGraph, NodeKind};
use dg_core::{GenerationPipeline, GenerationReport, GeneratorConfig, StepEvent};

/// Rectilinear room-and-door dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a room-and-door dungeon graph", long_about = None)]
struct Args {
    /// JSON config file; flags override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Start rectangle width
    #[arg(long = "width")]
    width: Option<i32>,

    /// Start rectangle height
    #[arg(long = "height")]
    height: Option<i32>,

    /// Minimum room width
    #[arg(long = "min-x")]
    min_x: Option<i32>,

    /// Minimum room height
    #[arg(long = "min-y")]
    min_y: Option<i32>,

    /// Seed for a reproducible layout
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Pause between generation steps, in milliseconds
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,

    /// Share of the node count that may be pruned (0..=1)
    #[arg(long = "prune-fraction")]
    prune_fraction: Option<f64>,

    /// Log every generation step
    #[arg(short = 'd', long = "debug-draw")]
    debug_draw: bool,

    /// Print the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Print every node of the published graph
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn build_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load_from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(width) = self.width {
            config.start_size.width = width;
        }
        if let Some(height) = self.height {
            config.start_size.height = height;
        }
        if let Some(x) = self.min_x {
            config.min_room_size.x = x;
        }
        if let Some(y) = self.min_y {
            config.min_room_size.y = y;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(delay) = self.delay_ms {
            config.stage_delay_ms = delay;
        }
        if let Some(fraction) = self.prune_fraction {
            config.prune_fraction = fraction;
        }
        config.debug_draw |= self.debug_draw;

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn log_step(event: &StepEvent, graph: &NodeGraph) {
    match event {
        StepEvent::StageEntered(state) => info!(stage = %state, nodes = graph.len(), "stage"),
        StepEvent::Split(split) => info!(
            parent = %split.parent,
            bounds = %split.parent_bounds,
            axis = %split.axis,
            offset = split.offset,
            "split"
        ),
        StepEvent::DoorPlaced(door) => info!(
            door = %door.door,
            a = %door.rooms[0],
            b = %door.rooms[1],
            x = door.cell.x,
            y = door.cell.y,
            "door"
        ),
        StepEvent::RoomPruned(step) => {
            let pruned = step.pruned();
            info!(
                room = %pruned.room,
                bounds = %pruned.bounds,
                doors = pruned.doors_removed,
                "pruned"
            )
        }
    }
}

fn print_report(report: &GenerationReport) {
    println!("seed:        {}", report.seed);
    println!("state:       {}", report.state);
    println!("splits:      {}", report.splits);
    println!(
        "pruned:      {} of {} allowed ({} rooms, {} doors before)",
        report.rooms_pruned,
        report.prune_budget,
        report.rooms_before_pruning,
        report.doors_before_pruning
    );
    let stats = &report.stats;
    println!("rooms:       {}", stats.rooms);
    println!("doors:       {}", stats.doors);
    println!(
        "room area:   {} total, {}..={} per room",
        stats.total_room_area, stats.smallest_room_area, stats.largest_room_area
    );
    println!("avg degree:  {:.2}", stats.average_room_degree);
    println!("components:  {}", stats.components);
    println!("connected:   {}", report.is_connected());
    for issue in &report.issues {
        println!("issue:       {issue}");
    }
}

fn print_nodes(graph: &NodeGraph) {
    for kind in NodeKind::iter() {
        println!();
        println!("{kind}s:");
        for node in graph.iter().filter(|n| n.kind() == kind) {
            let neighbors: Vec<String> = node.neighbors().iter().map(|id| id.to_string()).collect();
            println!(
                "  {} {} center=({}, {}) -> [{}]",
                node.id(),
                node.bounds(),
                node.center().x,
                node.center().y,
                neighbors.join(", ")
            );
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = args.build_config()?;
    let debug_draw = config.debug_draw;

    let mut pipeline = GenerationPipeline::new(config).context("creating pipeline")?;
    if debug_draw {
        pipeline.on_step(log_step);
    }

    let report = pipeline.generate()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if args.list {
        print_nodes(pipeline.graph());
    }

    Ok(if report.is_connected() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("dungeon-gen: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "dungeon-gen",
            "--width",
            "40",
            "--height",
            "30",
            "--min-x",
            "5",
            "--seed",
            "42",
            "--prune-fraction",
            "0.2",
            "-d",
        ])
        .unwrap();
        let config = args.build_config().unwrap();

        assert_eq!(config.start_size.width, 40);
        assert_eq!(config.start_size.height, 30);
        assert_eq!(config.min_room_size.x, 5);
        assert_eq!(config.min_room_size.y, GeneratorConfig::default().min_room_size.y);
        assert_eq!(config.seed, Some(42));
        assert!(config.debug_draw);
        assert!((config.prune_fraction - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = Args::try_parse_from(["dungeon-gen", "--width", "0"]).unwrap();
        assert!(args.build_config().is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let args = Args::try_parse_from(["dungeon-gen", "-vvv"]).unwrap();
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn test_run_tiny_layout() {
        let args = Args::try_parse_from([
            "dungeon-gen",
            "--width",
            "3",
            "--height",
            "3",
            "--min-x",
            "4",
            "--min-y",
            "4",
            "--seed",
            "1",
        ])
        .unwrap();
        assert!(run(&args).is_ok());
    }
}
