//! The central instruction entity: a closed set of 20 mnemonics, each encodable from parsed
//! operands, decodable from a hex word, renderable back to text, and executable against
//! architectural state.
//!
//! Instruction Formats:
//!
//! | Format   | Bits 31-26 | Bits 25-21 | Bits 20-16 | Bits 15-11 | Bits 10-6 | Bits 5-0 |
//! |----------|------------|------------|------------|------------|-----------|----------|
//! | R-Format | opcode     | rs         | rt         | rd         | sa        | funct    |
//! | I-Format | opcode     | rs         | rt         | immediate  | immediate | imm.     |
//! | J-Format | opcode     | address    | address    | address    | address   | address  |

use std::collections::HashMap;
use std::num::Wrapping;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use regex::Regex;
use util::EnumFromStr;
use util_derive::EnumFromStr;

use crate::bitcodec::{self, sign_extend, zero_extend};
use crate::constants::*;
use crate::error::Error;
use crate::memory::Memory;
use crate::registers::{self, RegisterId, RegisterFile};

/// Maps a label name to the `step_no` of the instruction it precedes.
pub type LabelTable = HashMap<String, u32>;

/// Minimal "lazily-initialized static regex" helper, avoiding a `lazy_static`/`once_cell`
/// dependency for the handful of patterns this module needs.
macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {{
        use std::sync::OnceLock;
        static $name: OnceLock<Regex> = OnceLock::new();
        $name.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}

/// The 20 mnemonics supported by this instruction set.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr)]
pub enum InstructionKind {
    ADD,
    SUB,
    AND,
    OR,
    XOR,
    SLL,
    SRL,
    SRA,
    JR,
    ADDI,
    ANDI,
    ORI,
    XORI,
    LW,
    SW,
    BEQ,
    BNE,
    LUI,
    J,
    JAL,
}

/// Fixed order in which kinds are tried during decode. The order matters: opcode 0 is shared by
/// every R-type kind, and an unrecognized `funct` falls back to the *last* opcode-0 entry here
/// (`JR`), matching the reference decoder's behavior.
const ALL_KINDS: [InstructionKind; 20] = [
    InstructionKind::ADD,
    InstructionKind::SUB,
    InstructionKind::AND,
    InstructionKind::OR,
    InstructionKind::XOR,
    InstructionKind::SLL,
    InstructionKind::SRL,
    InstructionKind::SRA,
    InstructionKind::JR,
    InstructionKind::ADDI,
    InstructionKind::ANDI,
    InstructionKind::ORI,
    InstructionKind::XORI,
    InstructionKind::LW,
    InstructionKind::SW,
    InstructionKind::BEQ,
    InstructionKind::BNE,
    InstructionKind::LUI,
    InstructionKind::J,
    InstructionKind::JAL,
];

impl std::fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl InstructionKind {
    fn opcode(self) -> u32 {
        use InstructionKind::*;
        match self {
            ADD | SUB | AND | OR | XOR | SLL | SRL | SRA | JR => 0,
            BEQ => 4,
            BNE => 5,
            ADDI => 8,
            ANDI => 12,
            ORI => 13,
            XORI => 14,
            LUI => 15,
            LW => 35,
            SW => 43,
            J => 2,
            JAL => 3,
        }
    }

    fn funct(self) -> Option<u32> {
        use InstructionKind::*;
        match self {
            SLL => Some(0),
            SRL => Some(2),
            SRA => Some(3),
            ADD => Some(32),
            SUB => Some(34),
            AND => Some(36),
            OR => Some(37),
            XOR => Some(38),
            JR => Some(8),
            _ => None,
        }
    }

    fn mnemonic(self) -> String {
        self.to_string().to_ascii_lowercase()
    }

    /// Number of comma-separated operand tokens this mnemonic's syntax requires.
    fn operand_count(self) -> usize {
        use InstructionKind::*;
        match self {
            ADD | SUB | AND | OR | XOR | SLL | SRL | SRA | ADDI | ANDI | ORI | XORI | BEQ
            | BNE => 3,
            LW | SW | LUI => 2,
            JR | J | JAL => 1,
        }
    }

    /// Resolves a decoded `(opcode, funct)` pair to the kind that reference hardware would
    /// have selected, including the opcode-0/unknown-`funct` fallback quirk (see module docs).
    fn decode(opcode: u32, funct: u32) -> Option<InstructionKind> {
        let mut last_same_opcode = None;
        let mut exact = None;

        for kind in ALL_KINDS.iter().copied() {
            if kind.opcode() != opcode {
                continue;
            }
            last_same_opcode = Some(kind);
            match kind.funct() {
                None => exact = Some(kind),
                Some(f) if f == funct => exact = Some(kind),
                Some(_) => {}
            }
        }

        exact.or(last_same_opcode)
    }
}

/// A single instruction: its kind, source-location metadata, and the (form-dependent) operand
/// slots. Only the slots relevant to `kind`'s form are meaningful; the rest are left at zero.
#[derive(Clone, Debug)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub line_no: u32,
    pub step_no: u32,
    pub rs: i32,
    pub rt: i32,
    pub rd: i32,
    pub sa: i32,
    pub immediate: i32,
    pub address: i32,
    /// An unresolved symbolic branch/jump target. When present it shadows `immediate`/`address`
    /// until `encode` resolves it against a label table.
    pub jumpto: Option<String>,
}

impl Instruction {
    fn bare(kind: InstructionKind, line_no: u32, step_no: u32) -> Instruction {
        Instruction {
            kind,
            line_no,
            step_no,
            rs: 0,
            rt: 0,
            rd: 0,
            sa: 0,
            immediate: 0,
            address: 0,
            jumpto: None,
        }
    }

    // ---- encode -----------------------------------------------------------------------------

    /// Encodes this instruction to its 32-bit binary form, resolving any symbolic `jumpto`
    /// against `labels`.
    pub fn encode(&self, labels: &LabelTable) -> Result<u32, Error> {
        use InstructionKind::*;

        let word = match self.kind {
            ADD | SUB | AND | OR | XOR => r_instr(
                self.kind,
                self.rd as u32,
                self.rs as u32,
                self.rt as u32,
                0,
            ),
            SLL | SRL | SRA => r_instr(self.kind, self.rd as u32, 0, self.rt as u32, self.sa as u32),
            JR => r_instr(self.kind, 0, self.rs as u32, 0, 0),
            ADDI | ANDI | ORI | XORI | LW | SW | LUI => {
                i_instr(self.kind, self.rs as u32, self.rt as u32, self.immediate)
            }
            BEQ | BNE => {
                let imm = self.branch_displacement(labels)?;
                i_instr(self.kind, self.rs as u32, self.rt as u32, imm)
            }
            J | JAL => {
                let addr = self.jump_address(labels)?;
                j_instr(self.kind, addr)
            }
        };

        Ok(word)
    }

    fn branch_displacement(&self, labels: &LabelTable) -> Result<i32, Error> {
        match &self.jumpto {
            Some(label) => {
                let target = labels.get(label).ok_or_else(|| Error::LabelNotFound {
                    label: label.clone(),
                    line: self.line_no,
                })?;
                let displacement = *target as i64 - 1 - self.step_no as i64;
                bitcodec::fit_signed(displacement, IMMEDIATE_WIDTH)
            }
            None => Ok(self.immediate),
        }
    }

    fn jump_address(&self, labels: &LabelTable) -> Result<i32, Error> {
        match &self.jumpto {
            Some(label) => {
                let target = labels.get(label).ok_or_else(|| Error::LabelNotFound {
                    label: label.clone(),
                    line: self.line_no,
                })?;
                Ok(*target as i32)
            }
            None => Ok(self.address),
        }
    }

    // ---- decode -------------------------------------------------------------------------------

    /// Decodes a single 8-hex-digit instruction word.
    pub fn decode(hex: &str, line_no: Option<u32>, step_no: u32) -> Result<Instruction, Error> {
        let word = bitcodec::hex_to_word(hex)?;

        let opcode = (word & OPCODE_MASK) >> OPCODE_OFFSET;
        let rs = (word & RS_MASK) >> RS_OFFSET;
        let rt = (word & RT_MASK) >> RT_OFFSET;
        let rd = (word & RD_MASK) >> RD_OFFSET;
        let sa = (word & SA_MASK) >> SA_OFFSET;
        let funct = (word & FUNCT_MASK) >> FUNCT_OFFSET;
        let imm = sign_extend((word & IMMEDIATE_MASK) >> IMMEDIATE_OFFSET, IMMEDIATE_WIDTH);
        let addr = sign_extend((word & ADDRESS_MASK) >> ADDRESS_OFFSET, ADDRESS_WIDTH);

        let kind = InstructionKind::decode(opcode, funct).ok_or_else(|| Error::InvalidInstruction {
            hex: hex.to_string(),
            line: line_no,
        })?;

        let mut instr = Instruction::bare(kind, line_no.unwrap_or(0), step_no);

        use InstructionKind::*;
        match kind {
            ADD | SUB | AND | OR | XOR => {
                instr.rd = rd as i32;
                instr.rs = rs as i32;
                instr.rt = rt as i32;
            }
            SLL | SRL | SRA => {
                instr.rd = rd as i32;
                instr.rt = rt as i32;
                instr.sa = sa as i32;
            }
            JR => instr.rs = rs as i32,
            ADDI | ANDI | ORI | XORI | LW | SW | LUI => {
                instr.rt = rt as i32;
                instr.rs = rs as i32;
                instr.immediate = imm;
            }
            BEQ | BNE => {
                instr.rs = rs as i32;
                instr.rt = rt as i32;
                instr.immediate = imm;
            }
            J | JAL => instr.address = addr,
        }

        Ok(instr)
    }

    // ---- render (disassembly) ------------------------------------------------------------------

    /// Renders the tab-indented, comma-separated disassembly text for this instruction.
    pub fn render(&self) -> String {
        use InstructionKind::*;

        let operands = match self.kind {
            ADD | SUB | AND | OR | XOR => {
                format!("${}, ${}, ${}", self.rd, self.rs, self.rt)
            }
            SLL | SRL | SRA => format!("${}, ${}, {}", self.rd, self.rt, self.sa),
            JR => format!("${}", self.rs),
            ADDI => format!(
                "${}, ${}, {}",
                self.rt,
                self.rs,
                sign_extend(self.immediate as u32, IMMEDIATE_WIDTH)
            ),
            ANDI | ORI | XORI => format!(
                "${}, ${}, {}",
                self.rt,
                self.rs,
                zero_extend(self.immediate as u32, IMMEDIATE_WIDTH)
            ),
            LW | SW => format!(
                "${}, {}(${})",
                self.rt,
                sign_extend(self.immediate as u32, IMMEDIATE_WIDTH),
                self.rs
            ),
            BEQ | BNE => format!("${}, ${}, {}", self.rs, self.rt, self.immediate),
            LUI => format!("${}, {}", self.rt, self.immediate),
            J | JAL => format!("{}", self.address),
        };

        format!("\t{}\t{}", self.kind.mnemonic(), operands)
    }

    // ---- argument parsing (from assembly text) -------------------------------------------------

    /// Parses `tokens` (already split by comma) as the operands of `kind`, producing a fully
    /// populated instruction for `line_no`/`step_no`.
    pub fn parse_args(
        kind: InstructionKind,
        line_no: u32,
        step_no: u32,
        tokens: &[&str],
    ) -> Result<Instruction, Error> {
        if tokens.len() != kind.operand_count() {
            return Err(Error::InvalidArgument {
                msg: format!(
                    "{} expects {} operand(s), got {}",
                    kind,
                    kind.operand_count(),
                    tokens.len()
                ),
                line: line_no,
            });
        }

        let mut instr = Instruction::bare(kind, line_no, step_no);

        use InstructionKind::*;
        match kind {
            ADD | SUB | AND | OR | XOR => {
                instr.rd = parse_register(tokens[0], line_no)?;
                instr.rs = parse_register(tokens[1], line_no)?;
                instr.rt = parse_register(tokens[2], line_no)?;
            }
            SLL | SRL | SRA => {
                instr.rd = parse_register(tokens[0], line_no)?;
                instr.rt = parse_register(tokens[1], line_no)?;
                instr.sa = parse_fitting_int(tokens[2], SHIFT_AMOUNT_WIDTH, line_no)?;
            }
            JR => {
                instr.rs = parse_register(tokens[0], line_no)?;
            }
            ADDI | ANDI | ORI | XORI => {
                instr.rt = parse_register(tokens[0], line_no)?;
                instr.rs = parse_register(tokens[1], line_no)?;
                instr.immediate = parse_fitting_int(tokens[2], IMMEDIATE_WIDTH, line_no)?;
            }
            LW | SW => {
                instr.rt = parse_register(tokens[0], line_no)?;
                let (imm, reg) = parse_offset_register(tokens[1], line_no)?;
                instr.immediate = bitcodec::fit_signed(imm as i64, IMMEDIATE_WIDTH).map_err(
                    |_| Error::InvalidArgument {
                        msg: format!("offset {} out of range", imm),
                        line: line_no,
                    },
                )?;
                instr.rs = reg;
            }
            LUI => {
                instr.rt = parse_register(tokens[0], line_no)?;
                instr.immediate = parse_fitting_int(tokens[1], IMMEDIATE_WIDTH, line_no)?;
            }
            BEQ | BNE => {
                instr.rs = parse_register(tokens[0], line_no)?;
                instr.rt = parse_register(tokens[1], line_no)?;
                parse_branch_target(tokens[2], line_no, &mut instr)?;
            }
            J | JAL => {
                parse_jump_target(tokens[0], line_no, &mut instr)?;
            }
        }

        Ok(instr)
    }

    // ---- execute --------------------------------------------------------------------------------

    /// Executes this instruction against `regs`/`memory`, returning the next program counter
    /// (an instruction index, not a byte address).
    pub fn execute(&self, pc: i32, regs: &mut RegisterFile, memory: &mut Memory) -> Result<i32, Error> {
        use InstructionKind::*;

        let rs = Wrapping(regs.get(self.rs as usize));
        let rt = Wrapping(regs.get(self.rt as usize));
        let imm = Wrapping(self.immediate);

        match self.kind {
            ADD => {
                regs.set(self.rd as usize, (rs + rt).0);
                Ok(pc + 1)
            }
            SUB => {
                regs.set(self.rd as usize, (rs - rt).0);
                Ok(pc + 1)
            }
            AND => {
                regs.set(self.rd as usize, rs.0 & rt.0);
                Ok(pc + 1)
            }
            OR => {
                regs.set(self.rd as usize, rs.0 | rt.0);
                Ok(pc + 1)
            }
            XOR => {
                regs.set(self.rd as usize, rs.0 ^ rt.0);
                Ok(pc + 1)
            }
            SLL => {
                regs.set(self.rd as usize, rt.0 << (self.sa as u32));
                Ok(pc + 1)
            }
            // Quirk: SRL is mapped to arithmetic (sign-preserving) right shift, the opposite of
            // canonical MIPS. Preserved intentionally for round-trip fidelity with the reference.
            SRL => {
                regs.set(self.rd as usize, rt.0 >> (self.sa as u32));
                Ok(pc + 1)
            }
            // Quirk: SRA is mapped to logical (zero-filling) right shift; see SRL above.
            SRA => {
                regs.set(self.rd as usize, ((rt.0 as u32) >> (self.sa as u32)) as i32);
                Ok(pc + 1)
            }
            JR => Ok(regs.get(self.rs as usize)),
            ADDI => {
                regs.set(self.rt as usize, (rs + imm).0);
                Ok(pc + 1)
            }
            ANDI => {
                regs.set(self.rt as usize, rs.0 & zero_extend(imm.0 as u32, IMMEDIATE_WIDTH) as i32);
                Ok(pc + 1)
            }
            ORI => {
                regs.set(self.rt as usize, rs.0 | zero_extend(imm.0 as u32, IMMEDIATE_WIDTH) as i32);
                Ok(pc + 1)
            }
            XORI => {
                regs.set(self.rt as usize, rs.0 ^ zero_extend(imm.0 as u32, IMMEDIATE_WIDTH) as i32);
                Ok(pc + 1)
            }
            LW => {
                let address = (rs + imm).0;
                regs.set(self.rt as usize, memory.read(address));
                Ok(pc + 1)
            }
            SW => {
                let address = (rs + imm).0;
                memory.write(address, rt.0);
                Ok(pc + 1)
            }
            BEQ => Ok(if rs.0 == rt.0 { pc + 1 + self.immediate } else { pc + 1 }),
            BNE => Ok(if rs.0 != rt.0 { pc + 1 + self.immediate } else { pc + 1 }),
            LUI => {
                regs.set(self.rt as usize, self.immediate << 16);
                Ok(pc + 1)
            }
            JAL => {
                regs.set(registers::register_index(RegisterId::RA), pc + 1);
                Ok(jump_target(pc, self.address))
            }
            J => Ok(jump_target(pc, self.address)),
        }
    }
}

fn jump_target(pc: i32, address: i32) -> i32 {
    let next = Wrapping((pc as u32).wrapping_add(1)) & Wrapping(0xF000_0000u32);
    let addr = Wrapping((address as u32).wrapping_shl(2)) / Wrapping(4u32);
    (next | addr).0 as i32
}

fn r_instr(kind: InstructionKind, rd: u32, rs: u32, rt: u32, sa: u32) -> u32 {
    ((kind.opcode() << OPCODE_OFFSET) & OPCODE_MASK)
        | ((rs << RS_OFFSET) & RS_MASK)
        | ((rt << RT_OFFSET) & RT_MASK)
        | ((rd << RD_OFFSET) & RD_MASK)
        | ((sa << SA_OFFSET) & SA_MASK)
        | ((kind.funct().unwrap_or(0) << FUNCT_OFFSET) & FUNCT_MASK)
}

fn i_instr(kind: InstructionKind, rs: u32, rt: u32, immediate: i32) -> u32 {
    ((kind.opcode() << OPCODE_OFFSET) & OPCODE_MASK)
        | ((rs << RS_OFFSET) & RS_MASK)
        | ((rt << RT_OFFSET) & RT_MASK)
        | (((immediate as u32) << IMMEDIATE_OFFSET) & IMMEDIATE_MASK)
}

fn j_instr(kind: InstructionKind, address: i32) -> u32 {
    ((kind.opcode() << OPCODE_OFFSET) & OPCODE_MASK) | (((address as u32) << ADDRESS_OFFSET) & ADDRESS_MASK)
}

fn parse_register(token: &str, line_no: u32) -> Result<i32, Error> {
    registers::resolve(token)
        .map(|id| registers::register_index(id) as i32)
        .ok_or_else(|| Error::InvalidArgument {
            msg: format!("not a register: {:?}", token),
            line: line_no,
        })
}

/// Accepts decimal with optional leading `-`, or a `0x`/`0`-prefixed hex/octal literal.
fn parse_integer_literal(token: &str, line_no: u32) -> Result<i64, Error> {
    let token = token.trim();
    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if rest.len() > 1 && rest.starts_with('0') {
        i64::from_str_radix(&rest[1..], 8)
    } else {
        rest.parse::<i64>()
    }
    .map_err(|_| Error::InvalidArgument {
        msg: format!("not an integer literal: {:?}", token),
        line: line_no,
    })?;

    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_fitting_int(token: &str, width: u32, line_no: u32) -> Result<i32, Error> {
    let value = parse_integer_literal(token, line_no)?;
    bitcodec::fit_signed(value, width).map_err(|_| Error::InvalidArgument {
        msg: format!("{} does not fit in {} bits", value, width),
        line: line_no,
    })
}

fn offset_register_pattern() -> &'static Regex {
    lazy_regex!(OFFSET_REGISTER, r"^(.+)\(\s*(\$[0-9A-Za-z]+)\s*\)$")
}

fn parse_offset_register(token: &str, line_no: u32) -> Result<(i32, i32), Error> {
    let token = token.trim();
    let caps = offset_register_pattern()
        .captures(token)
        .ok_or_else(|| Error::InvalidArgument {
            msg: format!("expected '<imm>($reg)', got {:?}", token),
            line: line_no,
        })?;

    let imm = parse_integer_literal(caps.get(1).unwrap().as_str().trim(), line_no)?;
    let reg = parse_register(caps.get(2).unwrap().as_str(), line_no)?;
    Ok((imm as i32, reg))
}

fn looks_like_integer(token: &str) -> bool {
    integer_token_pattern().is_match(token)
}

fn integer_token_pattern() -> &'static Regex {
    lazy_regex!(INTEGER_TOKEN, r"^-?\d+$")
}

fn parse_branch_target(token: &str, line_no: u32, instr: &mut Instruction) -> Result<(), Error> {
    if looks_like_integer(token) {
        instr.immediate = parse_fitting_int(token, IMMEDIATE_WIDTH, line_no)?;
    } else {
        instr.jumpto = Some(token.to_string());
    }
    Ok(())
}

fn parse_jump_target(token: &str, line_no: u32, instr: &mut Instruction) -> Result<(), Error> {
    if looks_like_integer(token) {
        instr.address = parse_fitting_int(token, ADDRESS_WIDTH, line_no)?;
    } else {
        instr.jumpto = Some(token.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, u32)]) -> LabelTable {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn decode_encode_round_trip_add() {
        let instr = Instruction::parse_args(InstructionKind::ADD, 1, 0, &["$3", "$1", "$2"]).unwrap();
        let hex = bitcodec::word_to_hex(instr.encode(&labels(&[])).unwrap());
        let back = Instruction::decode(&hex, None, 0).unwrap();
        assert_eq!(back.kind, InstructionKind::ADD);
        assert_eq!((back.rd, back.rs, back.rt), (3, 1, 2));
    }

    #[test]
    fn addi_round_trip_s3() {
        let instr = Instruction::parse_args(InstructionKind::ADDI, 1, 0, &["$2", "$0", "-1"]).unwrap();
        let word = instr.encode(&labels(&[])).unwrap();
        assert_eq!(bitcodec::word_to_hex(word), "2002ffff");

        let decoded = Instruction::decode("2002ffff", None, 0).unwrap();
        assert_eq!(decoded.render(), "\taddi\t$2, $0, -1");
    }

    #[test]
    fn lw_sw_offset_round_trip_s5() {
        let instr = Instruction::parse_args(InstructionKind::LW, 1, 0, &["$4", "-4($1)"]).unwrap();
        let word = instr.encode(&labels(&[])).unwrap();
        let decoded = Instruction::decode(&bitcodec::word_to_hex(word), None, 0).unwrap();
        assert_eq!(decoded.render(), "\tlw\t$4, -4($1)");
    }

    #[test]
    fn branch_offset_law_s4() {
        // l: addi $1,$1,1 \n bne $1,$0,l
        let mut bne = Instruction::parse_args(InstructionKind::BNE, 2, 1, &["$1", "$0", "l"]).unwrap();
        bne.jumpto = Some("l".to_string());
        let word = bne.encode(&labels(&[("l", 0)])).unwrap();
        let decoded = Instruction::decode(&bitcodec::word_to_hex(word), None, 1).unwrap();
        assert_eq!(decoded.immediate, -2);
    }

    #[test]
    fn jump_absolute_law_s6() {
        let mut jal = Instruction::parse_args(InstructionKind::JAL, 4, 3, &["target"]).unwrap();
        jal.jumpto = Some("target".to_string());
        let word = jal.encode(&labels(&[("target", 7)])).unwrap();
        let decoded = Instruction::decode(&bitcodec::word_to_hex(word), None, 3).unwrap();
        assert_eq!(decoded.address, 7);
    }

    #[test]
    fn srl_sra_swap_is_preserved() {
        let mut regs = RegisterFile::new();
        regs.set(1, -8);
        let mut mem = Memory::new();

        let srl = Instruction::parse_args(InstructionKind::SRL, 1, 0, &["$2", "$1", "1"]).unwrap();
        srl.execute(0, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.get(2), -4); // arithmetic: sign preserved

        let sra = Instruction::parse_args(InstructionKind::SRA, 1, 0, &["$3", "$1", "1"]).unwrap();
        sra.execute(0, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.get(3), 2_147_483_644); // logical: zero filled, top bit cleared
    }

    #[test]
    fn opcode_zero_unknown_funct_falls_back_to_jr() {
        // opcode 0, funct 63 (unused) -> should resolve to the last opcode-0 kind, JR.
        let word = 0b000000_00000_00000_00000_00000_111111u32;
        let decoded = Instruction::decode(&bitcodec::word_to_hex(word), None, 0).unwrap();
        assert_eq!(decoded.kind, InstructionKind::JR);
    }

    #[test]
    fn jr_targets_raw_register_value() {
        let mut regs = RegisterFile::new();
        regs.set(1, 5);
        let mut mem = Memory::new();
        let jr = Instruction::parse_args(InstructionKind::JR, 1, 0, &["$1"]).unwrap();
        let next = jr.execute(0, &mut regs, &mut mem).unwrap();
        assert_eq!(next, 5);
    }

    #[test]
    fn jal_link_law_s9() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        let mut jal = Instruction { address: 7, ..Instruction::bare(InstructionKind::JAL, 4, 3) };
        jal.jumpto = None;
        let next = jal.execute(3, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.get(registers::register_index(RegisterId::RA)), 4);
        assert_eq!(next, 7);
    }
}
