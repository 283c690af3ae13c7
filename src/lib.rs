//! Core types for a MIPS-I integer instruction subset: bit-level codecs, the register and
//! memory models, and the `Instruction` entity shared by the assembler, disassembler and
//! simulator binaries.

pub mod bitcodec;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod registers;

pub use error::{Error, Result};
pub use instruction::{Instruction, InstructionKind, LabelTable};
pub use memory::Memory;
pub use registers::{RegisterFile, RegisterId};
