//! Error kinds shared by the assembler, disassembler and simulator.

use thiserror::Error;

/// All failures that can be raised while assembling, disassembling or running a program.
///
/// Every variant carries enough source-location information to let a caller point back at the
/// offending line without needing to re-scan the input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// Ill-formed assembly text: bad tokenization, a label that looks like an integer, an
    /// unknown mnemonic, and so on.
    #[error("{msg} (line {line:?})")]
    Syntax { msg: String, line: Option<u32> },

    /// The mnemonic was recognized but its operands are missing, unparsable, or out of range.
    /// A refinement of [`Error::Syntax`] raised once a specific instruction form is known.
    #[error("invalid argument on line {line}: {msg}")]
    InvalidArgument { msg: String, line: u32 },

    /// A hex image word that is malformed or does not decode to any known instruction kind.
    #[error("invalid instruction {hex:?}")]
    InvalidInstruction { hex: String, line: Option<u32> },

    /// The encode stage referenced a label that was never defined.
    #[error("label {label:?} not found (line {line})")]
    LabelNotFound { label: String, line: u32 },

    /// A runtime fault raised from within the simulator, such as the program counter running
    /// off the end of the instruction list.
    #[error("simulation fault at pc={pc}: {msg}")]
    Simulation { msg: String, pc: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;
