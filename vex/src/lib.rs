//! Simulator for the [vcpu](../vcpu/index.html) MIPS-I instruction subset.
//!
//! A [`Simulator`] owns a decoded instruction list, a register file, a memory, and a program
//! counter for the lifetime of one run. `run` is meant to execute on a worker thread while the
//! owning thread polls and may request cancellation through a shared [`AtomicBool`]; see
//! [`Simulator::run`] for the exact cancellation contract.

use std::sync::atomic::{AtomicBool, Ordering};

use vcpu::error::Error;
use vcpu::instruction::Instruction;
use vcpu::memory::Memory;
use vcpu::registers::RegisterFile;

/// Drives a decoded instruction list against a register file and memory until the program
/// counter runs off the end of the list, a fault is raised, or the run is killed.
pub struct Simulator {
    instructions: Vec<Instruction>,
    regs: RegisterFile,
    memory: Memory,
    pc: i32,
}

impl Simulator {
    /// Decodes `image` (as produced by [`vasm::encode`]) and prepares a fresh run starting at
    /// PC 0 with a zeroed register file and memory.
    pub fn decode(image: &str) -> Result<Simulator, Error> {
        let instructions = vasm::decode(image)?;
        Ok(Simulator {
            instructions,
            regs: RegisterFile::new(),
            memory: Memory::new(),
            pc: 0,
        })
    }

    pub fn set_memory(&mut self, address: i32, value: i32) -> i32 {
        self.memory.write(address, value)
    }

    pub fn get_memory(&self, address: i32) -> i32 {
        self.memory.read(address)
    }

    pub fn get_regfile(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn get_pc(&self) -> i32 {
        self.pc
    }

    /// Runs until the instruction list is exhausted, a fault occurs, or `kill` is observed set.
    ///
    /// `kill` is checked once per instruction boundary, never mid-instruction: an in-progress
    /// instruction always completes. A supervisor on another thread can set it to request
    /// cooperative cancellation; this loop does not attempt to terminate a worker thread itself.
    pub fn run(&mut self, kill: &AtomicBool) -> Result<(), Error> {
        loop {
            if kill.load(Ordering::SeqCst) {
                log::debug!("kill observed at pc={}", self.pc);
                return Ok(());
            }

            let pc = self.pc;
            let len = self.instructions.len() as i32;

            if pc == len {
                return Ok(());
            }
            if pc < 0 || pc > len {
                return Err(Error::Simulation {
                    msg: "No instructions here".to_string(),
                    pc,
                });
            }

            let next_pc = self.instructions[pc as usize].execute(pc, &mut self.regs, &mut self.memory)?;
            self.pc = next_pc;

            std::thread::yield_now();
        }
    }

    /// Runs to completion with no cancellation, for callers that don't need a supervisor.
    pub fn run_to_completion(&mut self) -> Result<(), Error> {
        self.run(&AtomicBool::new(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    const MULTIPLICATION: &str = include_str!("../../demos/multiplication.s");

    #[test]
    fn s1_multiplication() {
        let image = vasm::assemble(MULTIPLICATION).unwrap();
        let mut sim = Simulator::decode(&image).unwrap();
        sim.set_memory(0, 5);
        sim.set_memory(4, 7);
        sim.run_to_completion().unwrap();

        assert_eq!(sim.get_regfile().get(3), 35);
        assert_eq!(sim.get_memory(8), 35);
    }

    #[test]
    fn s2_halt_loop_kill() {
        let (instructions, labels) = vasm::parse("start:\tj start\n").unwrap();
        let image = vasm::encode(&instructions, &labels).unwrap();
        let mut sim = Simulator::decode(&image).unwrap();

        let kill = Arc::new(AtomicBool::new(false));
        let kill_writer = Arc::clone(&kill);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            kill_writer.store(true, Ordering::SeqCst);
        });

        sim.run(&kill).unwrap();
        assert_eq!(sim.get_pc(), 0);
    }

    #[test]
    fn pc_termination_on_fallthrough() {
        let image = vasm::assemble("\taddi $1, $0, 1\n").unwrap();
        let mut sim = Simulator::decode(&image).unwrap();
        sim.run_to_completion().unwrap();
        assert_eq!(sim.get_pc(), 1);
    }

    #[test]
    fn s6_jal_sets_link_register_and_jumps() {
        let source = "\tadd $0, $0, $0\n\tadd $0, $0, $0\n\tadd $0, $0, $0\n\tjal target\n\tadd $0, $0, $0\n\tadd $0, $0, $0\n\tadd $0, $0, $0\ntarget:\tj target\n";
        let (instructions, labels) = vasm::parse(source).unwrap();
        assert_eq!(*labels.get("target").unwrap(), 7);

        let image = vasm::encode(&instructions, &labels).unwrap();
        let mut sim = Simulator::decode(&image).unwrap();

        let kill = Arc::new(AtomicBool::new(false));
        let kill_writer = Arc::clone(&kill);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            kill_writer.store(true, Ordering::SeqCst);
        });

        sim.run(&kill).unwrap();

        assert_eq!(sim.get_regfile().get(31), 4);
        assert_eq!(sim.get_pc(), 7);
    }
}
