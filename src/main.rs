/*!
arsnes - command-line debugger front end.

Loads a cartridge, prints its header, powers up the system, and drops
into a small interactive loop:

    n          step one instruction and dump the register file
    b <hex>    set a breakpoint at a 24-bit program address
    r          run until a breakpoint is hit
    q          quit

An empty line repeats the previous command.
*/

use std::io::{self, BufRead, Write};
use std::process;

use clap::{App, Arg};

use arsnes::{Cartridge, Snes};

// Safety cap for `r` with no reachable breakpoint.
const RUN_INSTRUCTION_CAP: u64 = 50_000_000;

fn main() {
    let matches = App::new("arsnes")
        .version(env!("CARGO_PKG_VERSION"))
        .about("SNES emulator core with an instruction-level debugger")
        .arg(
            Arg::with_name("rom")
                .help("Path to a LoROM cartridge image (.smc/.sfc)")
                .required(true)
                .index(1),
        )
        .get_matches();

    let rom_path = matches.value_of("rom").unwrap();
    let cartridge = match Cartridge::from_file(rom_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: failed to load {rom_path}: {e}");
            process::exit(1);
        }
    };

    println!("{}", cartridge.header());

    let mut snes = match Snes::power_up(cartridge) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!();
    println!("Execution starts at 0x{:06X}", snes.program_address());
    debugger_loop(&mut snes);
    snes.power_down();
}

fn debugger_loop(snes: &mut Snes) {
    let stdin = io::stdin();
    let mut breakpoints: Vec<u32> = Vec::new();
    let mut last_command = String::from("n");

    prompt();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        let command = if trimmed.is_empty() {
            last_command.clone()
        } else {
            last_command = trimmed.to_string();
            trimmed.to_string()
        };

        let mut parts = command.split_whitespace();
        match parts.next() {
            Some("n") => {
                snes.step();
                println!("{}", snes.cpu());
            }
            Some("b") => match parts.next().map(|s| u32::from_str_radix(s, 16)) {
                Some(Ok(addr)) if addr <= 0xFF_FFFF => {
                    breakpoints.push(addr);
                    println!("breakpoint #{} at 0x{:06X}", breakpoints.len(), addr);
                }
                _ => println!("usage: b <hex address>, e.g. b 8000 or b 7E1234"),
            },
            Some("r") => {
                run_to_breakpoint(snes, &breakpoints);
                println!("{}", snes.cpu());
            }
            Some("q") => return,
            Some(other) => println!("unknown command '{other}' (n, b <hex>, r, q)"),
            None => {}
        }
        prompt();
    }
}

fn run_to_breakpoint(snes: &mut Snes, breakpoints: &[u32]) {
    for _ in 0..RUN_INSTRUCTION_CAP {
        snes.step();
        if breakpoints.contains(&snes.program_address()) {
            println!("breakpoint hit at 0x{:06X}", snes.program_address());
            return;
        }
    }
    println!(
        "no breakpoint hit after {} instructions; stopping at 0x{:06X}",
        RUN_INSTRUCTION_CAP,
        snes.program_address()
    );
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
