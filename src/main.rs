//! RV32IM pipeline simulator CLI.
//!
//! Loads a hex memory image, runs the five-stage pipeline to completion or
//! to its cycle cap, then prints the statistics summary and final register
//! dump.

use clap::Parser;
use std::{fs, process};

use rv32im_pipeline_sim::common::SimError;
use rv32im_pipeline_sim::config::Config;
use rv32im_pipeline_sim::core::Cpu;
use rv32im_pipeline_sim::sim::{loader, run};

/// Command-line arguments for the RV32IM pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "RV32IM Cycle-Accurate Pipeline Simulator")]
struct Args {
    /// Path to a TOML configuration file. Optional: every knob defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the hex memory image. Overrides `general.image` in the config.
    #[arg(short, long)]
    image: Option<String>,

    /// Overrides `general.cycle_limit`.
    #[arg(long)]
    cycle_limit: Option<u64>,

    /// Overrides `general.trace`.
    #[arg(long)]
    trace: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error: could not read config file '{}': {}", path, e);
                process::exit(2);
            });
            toml::from_str(&text).unwrap_or_else(|e| {
                eprintln!("error: could not parse config file '{}': {}", path, e);
                process::exit(2);
            })
        }
        None => Config::default(),
    };

    if let Some(limit) = args.cycle_limit {
        config.general.cycle_limit = limit;
    }
    if args.trace {
        config.general.trace = true;
    }
    let image_path = args
        .image
        .or_else(|| config.general.image.clone())
        .unwrap_or_else(|| {
            eprintln!("error: no memory image given (pass --image or set general.image)");
            process::exit(2);
        });

    let mut cpu = Cpu::new(&config);
    if let Err(e) = loader::load_image(&mut cpu, &image_path) {
        eprintln!("error: {}", e);
        process::exit(2);
    }

    match run(&mut cpu) {
        Ok(()) => {
            tracing::info!(cycle = cpu.stats.cycles, "halted");
            cpu.stats.print();
            print_registers(&cpu);
            process::exit(0);
        }
        Err(SimError::CycleLimitReached { cycles }) => {
            eprintln!("\n[!] cycle limit of {} reached without a halt", cycles);
            cpu.stats.print();
            print_registers(&cpu);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("\n[!] fatal: {}", e);
            process::exit(2);
        }
    }
}

fn print_registers(cpu: &Cpu) {
    let regs = cpu.register_dump();
    println!("\nFinal register state:");
    for (i, chunk) in regs.chunks(4).enumerate() {
        let base = i * 4;
        println!(
            "  x{:<2} {:#010x}   x{:<2} {:#010x}   x{:<2} {:#010x}   x{:<2} {:#010x}",
            base, chunk[0], base + 1, chunk[1], base + 2, chunk[2], base + 3, chunk[3],
        );
    }
}
