//! Shared support for the execution tests: translate VM source with the real
//! writer, assemble the result and run it on a Hack CPU model.

#![allow(dead_code)]

use std::collections::HashMap;

use vmtc_gen::{CodeWriter, WriterOptions};
use vmtc_lex::Lexer;

pub const SP: usize = 0;
pub const LCL: usize = 1;
pub const ARG: usize = 2;
pub const THIS: usize = 3;
pub const THAT: usize = 4;

/// Translate `(unit, source)` pairs into one assembly text, optionally with
/// the bootstrap in front.
pub fn translate(units: &[(&str, &str)], bootstrap: bool) -> String {
    let mut writer = CodeWriter::with_options(Vec::new(), WriterOptions::default());
    if bootstrap {
        writer.write_init("Sys.init", 256).unwrap();
    }
    for (unit, source) in units {
        writer.set_unit(*unit);
        for item in Lexer::new(source) {
            let (line, command) = item.unwrap();
            writer
                .write_command(&command)
                .unwrap_or_else(|e| panic!("{}:{}: {}", unit, line, e));
        }
    }
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

/// Translate one unit named `Test` without bootstrap, load it and preset the
/// segment registers the way a test harness script would.
pub fn machine(source: &str) -> Hack {
    let mut cpu = Hack::load(&translate(&[("Test", source)], false));
    cpu.ram[SP] = 256;
    cpu.ram[LCL] = 300;
    cpu.ram[ARG] = 400;
    cpu.ram[THIS] = 3000;
    cpu.ram[THAT] = 4000;
    cpu
}

#[derive(Debug, Clone)]
enum Instruction {
    Address(i16),
    Compute {
        dest_a: bool,
        dest_d: bool,
        dest_m: bool,
        comp: String,
        jump: String,
    },
}

/// A Hack computer: 32K ROM of parsed instructions, 64K words of RAM.
pub struct Hack {
    rom: Vec<Instruction>,
    labels: HashMap<String, usize>,
    symbols: HashMap<String, i16>,
    pub ram: Vec<i16>,
    pub a: i16,
    pub d: i16,
    pub pc: usize,
    pub steps: usize,
}

impl Hack {
    /// Assemble `asm` (two passes: labels, then variables from RAM[16]).
    pub fn load(asm: &str) -> Self {
        let lines: Vec<&str> = asm
            .lines()
            .map(|line| line.split("//").next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .collect();

        let mut labels = HashMap::new();
        let mut address = 0;
        for line in &lines {
            if let Some(label) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                let previous = labels.insert(label.to_string(), address);
                assert!(previous.is_none(), "label ({}) defined twice", label);
            } else {
                address += 1;
            }
        }

        let mut symbols: HashMap<String, i16> = [
            ("SP", 0),
            ("LCL", 1),
            ("ARG", 2),
            ("THIS", 3),
            ("THAT", 4),
            ("SCREEN", 16384),
            ("KBD", 24576),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .chain((0..16).map(|r| (format!("R{}", r), r)))
        .collect();
        for (label, address) in &labels {
            symbols.insert(label.clone(), *address as i16);
        }

        let mut next_variable = 16;
        let mut rom = Vec::new();
        for line in lines {
            if line.starts_with('(') {
                continue;
            }
            if let Some(symbol) = line.strip_prefix('@') {
                let value = match symbol.parse::<i16>() {
                    Ok(value) => value,
                    Err(_) => *symbols.entry(symbol.to_string()).or_insert_with(|| {
                        next_variable += 1;
                        next_variable - 1
                    }),
                };
                rom.push(Instruction::Address(value));
                continue;
            }

            let (dest, rest) = match line.split_once('=') {
                Some((dest, rest)) => (dest, rest),
                None => ("", line),
            };
            let (comp, jump) = match rest.split_once(';') {
                Some((comp, jump)) => (comp, jump),
                None => (rest, ""),
            };
            rom.push(Instruction::Compute {
                dest_a: dest.contains('A'),
                dest_d: dest.contains('D'),
                dest_m: dest.contains('M'),
                comp: comp.to_string(),
                jump: jump.to_string(),
            });
        }

        Self {
            rom,
            labels,
            symbols,
            ram: vec![0; 65536],
            a: 0,
            d: 0,
            pc: 0,
            steps: 0,
        }
    }

    /// Run until the program counter leaves the ROM.
    pub fn run(&mut self) {
        self.run_while(|cpu| cpu.pc < cpu.rom.len());
    }

    /// Run until execution reaches `(label)`.
    pub fn run_to_label(&mut self, label: &str) {
        let target = *self
            .labels
            .get(label)
            .unwrap_or_else(|| panic!("no label ({})", label));
        self.run_while(|cpu| cpu.pc != target && cpu.pc < cpu.rom.len());
        assert_eq!(self.pc, target, "program ended before reaching ({})", label);
    }

    pub fn stack_top(&self) -> i16 {
        self.ram[self.ram[SP] as usize - 1]
    }

    /// RAM word the assembler gave to a variable such as `Main.0`.
    pub fn variable(&self, name: &str) -> i16 {
        let address = *self
            .symbols
            .get(name)
            .unwrap_or_else(|| panic!("no symbol {}", name));
        self.ram[address as usize]
    }

    fn run_while(&mut self, mut running: impl FnMut(&Self) -> bool) {
        const STEP_LIMIT: usize = 1_000_000;
        while running(self) {
            self.step();
            assert!(self.steps < STEP_LIMIT, "step limit exceeded at pc {}", self.pc);
        }
    }

    fn step(&mut self) {
        self.steps += 1;
        match self.rom[self.pc].clone() {
            Instruction::Address(value) => {
                self.a = value;
                self.pc += 1;
            }
            Instruction::Compute {
                dest_a,
                dest_d,
                dest_m,
                comp,
                jump,
            } => {
                let address = self.a as u16 as usize;
                let value = self.compute(&comp, self.ram[address]);
                if dest_m {
                    self.ram[address] = value;
                }
                if dest_a {
                    self.a = value;
                }
                if dest_d {
                    self.d = value;
                }
                let taken = match jump.as_str() {
                    "" => false,
                    "JGT" => value > 0,
                    "JEQ" => value == 0,
                    "JGE" => value >= 0,
                    "JLT" => value < 0,
                    "JNE" => value != 0,
                    "JLE" => value <= 0,
                    "JMP" => true,
                    other => panic!("unknown jump {}", other),
                };
                // the jump target is the A value from before this instruction
                self.pc = if taken { address } else { self.pc + 1 };
            }
        }
    }

    fn compute(&self, comp: &str, m: i16) -> i16 {
        let (a, d) = (self.a, self.d);
        match comp {
            "0" => 0,
            "1" => 1,
            "-1" => -1,
            "D" => d,
            "A" => a,
            "M" => m,
            "!D" => !d,
            "!A" => !a,
            "!M" => !m,
            "-D" => d.wrapping_neg(),
            "-A" => a.wrapping_neg(),
            "-M" => m.wrapping_neg(),
            "D+1" => d.wrapping_add(1),
            "A+1" => a.wrapping_add(1),
            "M+1" => m.wrapping_add(1),
            "D-1" => d.wrapping_sub(1),
            "A-1" => a.wrapping_sub(1),
            "M-1" => m.wrapping_sub(1),
            "D+A" | "A+D" => d.wrapping_add(a),
            "D+M" | "M+D" => d.wrapping_add(m),
            "D-A" => d.wrapping_sub(a),
            "D-M" => d.wrapping_sub(m),
            "A-D" => a.wrapping_sub(d),
            "M-D" => m.wrapping_sub(d),
            "D&A" | "A&D" => d & a,
            "D&M" | "M&D" => d & m,
            "D|A" | "A|D" => d | a,
            "D|M" | "M|D" => d | m,
            other => panic!("not a Hack computation: {}", other),
        }
    }
}
