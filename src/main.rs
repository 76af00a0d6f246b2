//! Instructional SSD flash translation layer simulator: CLI collaborator.
//!
//! Parses construction parameters and a logical command stream, either
//! explicit or synthesized by a seeded random workload generator, drives
//! the core `ssdsim::Ftl`, and renders the dump/stats views. None of this
//! module touches FTL internals directly; it only calls `Ftl`'s public
//! methods, the same surface a test or another host program would use.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use ssdsim::{Ftl, FtlError, SsdConfig};

mod cli;
mod dump;
mod workload;

use cli::{parse_cmd_list, Args, Command};
use workload::WorkloadGenerator;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_module(
            "ssdsim::gc",
            if args.trace_gc {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .filter_level(LevelFilter::Info)
        .init();

    let ssd_type = args.ssd_type()?;

    println!("ARG seed {}", args.seed);
    println!("ARG num_cmds {}", args.num_cmds);
    println!("ARG op_percentages {}", args.op_percentages);
    println!("ARG skew {}", args.skew.as_deref().unwrap_or(""));
    println!("ARG skew_start {}", args.skew_start);
    println!("ARG read_fail {}", args.read_fail_percent);
    println!("ARG cmd_list {}", args.cmd_list.as_deref().unwrap_or(""));
    println!("ARG ssd_type {}", args.ssd_type);
    println!("ARG num_logical_pages {}", args.num_logical_pages);
    println!("ARG num_blocks {}", args.num_blocks);
    println!("ARG pages_per_block {}", args.pages_per_block);
    println!("ARG high_water_mark {}", args.high_water_mark);
    println!("ARG low_water_mark {}", args.low_water_mark);
    println!("ARG erase_time {}", args.erase_time);
    println!("ARG program_time {}", args.program_time);
    println!("ARG read_time {}", args.read_time);
    println!("ARG show_gc {}", args.trace_gc as u8);
    println!("ARG show_state {}", args.show_state as u8);
    println!("ARG show_cmds {}", args.show_cmds as u8);
    println!("ARG quiz_cmds {}", args.quiz_cmds as u8);
    println!("ARG show_stats {}", args.show_stats as u8);
    println!("ARG compute {}", args.solve as u8);
    println!();

    let config = SsdConfig {
        ssd_type,
        num_logical_pages: args.num_logical_pages,
        num_blocks: args.num_blocks,
        pages_per_block: args.pages_per_block,
        block_erase_time: args.erase_time,
        page_program_time: args.program_time,
        page_read_time: args.read_time,
        gc_high_water_mark: args.high_water_mark,
        gc_low_water_mark: args.low_water_mark,
        trace_gc: args.trace_gc,
        show_state: args.show_state,
    };
    let mut ftl = Ftl::new(config)?;

    let commands = match &args.cmd_list {
        Some(list) => parse_cmd_list(list)?,
        None => {
            let mut generator = WorkloadGenerator::new(
                args.seed,
                args.num_logical_pages,
                &args.op_percentages,
                args.skew.as_deref(),
                args.skew_start,
                args.read_fail_percent,
            )?;
            generator.generate(args.num_cmds)
        }
    };

    dump::dump(&mut ftl);
    println!();

    for (op, command) in commands.into_iter().enumerate() {
        run_command(&mut ftl, op, command, args.show_cmds, args.quiz_cmds, args.solve);

        if args.show_state {
            println!();
            dump::dump(&mut ftl);
            println!();
        }

        ftl.upkeep();
    }

    if !args.show_state {
        println!();
        dump::dump(&mut ftl);
    }
    println!();

    if args.show_stats {
        dump::stats(&ftl);
        println!();
    }

    Ok(())
}

/// Runs one command and, depending on `show_cmds`/`quiz_cmds`/`solve`,
/// prints it: plainly, masked as `??` for a student to predict, or not at
/// all. `show_cmds` (or quiz mode with `--solve`) always wins over a bare
/// quiz mask.
fn run_command(
    ftl: &mut Ftl,
    op: usize,
    command: Command,
    show_cmds: bool,
    quiz_cmds: bool,
    solve: bool,
) {
    let reveal = show_cmds || (quiz_cmds && solve);
    match command {
        Command::Read(addr) => {
            let outcome = ftl.read(addr);
            if reveal {
                println!("cmd {op:3}:: read({addr}) -> {}", render_read(outcome));
            } else if quiz_cmds {
                println!("cmd {op:3}:: read({addr}) -> ??");
            }
        }
        Command::Write(addr, byte) => {
            let outcome = ftl.write(addr, byte);
            if reveal {
                println!(
                    "cmd {op:3}:: write({addr}, {}) -> {}",
                    byte as char,
                    render_write(outcome)
                );
            } else if quiz_cmds {
                println!("cmd {op:3}:: command(??) -> ??");
            }
        }
        Command::Trim(addr) => {
            let outcome = ftl.trim(addr);
            if reveal {
                println!("cmd {op:3}:: trim({addr}) -> {}", render_write(outcome));
            } else if quiz_cmds {
                println!("cmd {op:3}:: command(??) -> ??");
            }
        }
    }
}

/// Renders a read outcome as the wire-contract string: `"<byte>"` on
/// success, otherwise the matching `"fail: ..."` string.
fn render_read(outcome: Result<u8, FtlError>) -> String {
    match outcome {
        Ok(byte) => (byte as char).to_string(),
        Err(err) => render_error(err),
    }
}

/// Renders a write/trim outcome as the wire-contract string.
fn render_write(outcome: Result<(), FtlError>) -> String {
    match outcome {
        Ok(()) => "success".to_string(),
        Err(err) => render_error(err),
    }
}

fn render_error(err: FtlError) -> String {
    match err {
        FtlError::DeviceFull => "failure: device full".to_string(),
        other => format!("fail: {other}"),
    }
}
