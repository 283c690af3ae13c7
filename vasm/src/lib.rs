//! Assembler and disassembler for the [vcpu](../vcpu/index.html) MIPS-I instruction subset.
//!
//! # Assembly Syntax
//!
//! One statement per line: an optional label terminated by `:`, then a mnemonic, then
//! comma-separated operands. `;` starts a line comment; blank lines (after stripping the
//! comment) are skipped without consuming an instruction slot.
//!
//! Every non-label instruction line must begin with at least one space or tab — tokenization
//! splits each line on runs of whitespace into at most three fields (label, mnemonic,
//! operands), and a bare mnemonic with no leading whitespace collapses to two fields, which is
//! rejected. `disassemble` always emits a leading tab for exactly this reason, so its output
//! reassembles without modification.
//!
//! Registers are written `$<0..31>` or `$<name>` (e.g. `$t0`, `$ra`), case-insensitive.
//! Integer literals are decimal, `0x`-prefixed hex, or `0`-prefixed octal, with an optional
//! leading `-`. `lw`/`sw` take the offset form `<imm>($<reg>)`.
//!
//! # Hex Image Format
//!
//! An Altera-MIF-like line per instruction: `<step_hex> :     <word_hex>; % (<byte_hex>) %`,
//! where `step_hex` is the instruction index in uppercase hex (space-padded to width 2),
//! `word_hex` is the 8-digit lowercase hex encoding, and `byte_hex` is `step*4` in
//! zero-padded uppercase hex.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use vcpu::error::Error;
use vcpu::instruction::{Instruction, InstructionKind, LabelTable};

/// Parses `source` into an ordered instruction list and the label table built while scanning
/// it. Implements the tokenization and label rules described in the module docs.
pub fn parse(source: &str) -> Result<(Vec<Instruction>, LabelTable), Error> {
    let mut instructions = Vec::new();
    let mut labels = LabelTable::new();
    let mut step_no: u32 = 0;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let before_comment = raw_line.splitn(2, ';').next().unwrap_or("");

        if before_comment.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = whitespace_run().splitn(before_comment, 3).collect();

        if tokens.len() != 1 && tokens.len() != 3 {
            return Err(Error::Syntax {
                msg: "No arguments given (maybe you're missing head tab/space?)".to_string(),
                line: Some(line_no),
            });
        }

        let head = tokens[0];
        if let Some(label) = head.strip_suffix(':') {
            if label.parse::<i64>().is_ok() {
                return Err(Error::Syntax {
                    msg: "Label cannot be an integer".to_string(),
                    line: Some(line_no),
                });
            }
            labels.insert(label.to_string(), step_no);
        } else if !head.is_empty() {
            return Err(Error::Syntax {
                msg: "Label must be followed by ':'".to_string(),
                line: Some(line_no),
            });
        }

        if tokens.len() == 3 {
            let mnemonic = tokens[1].to_ascii_uppercase();
            let kind: InstructionKind = util::EnumFromStr::from_str(&mnemonic).map_err(|_| Error::Syntax {
                msg: "Invalid mnemonic".to_string(),
                line: Some(line_no),
            })?;

            let operands: Vec<&str> = tokens[2].split(',').map(str::trim).collect();
            let instr = Instruction::parse_args(kind, line_no, step_no, &operands)?;
            instructions.push(instr);
            step_no += 1;
        }
    }

    Ok((instructions, labels))
}

/// Encodes `instructions` to the hex image text format, resolving symbolic targets against
/// `labels`.
pub fn encode(instructions: &[Instruction], labels: &LabelTable) -> Result<String, Error> {
    let mut image = String::new();
    for instr in instructions {
        let word = instr.encode(labels)?;
        let word_hex = vcpu::bitcodec::word_to_hex(word);
        image.push_str(&format!(
            "{:2X} :     {}; % ({:02X}) %\n",
            instr.step_no,
            word_hex,
            instr.step_no * 4
        ));
    }
    Ok(image)
}

/// Convenience wrapper: parses and encodes `source` in one step.
pub fn assemble(source: &str) -> Result<String, Error> {
    let (instructions, labels) = parse(source)?;
    encode(&instructions, &labels)
}

/// Decodes a hex image (as produced by [`encode`]) back into an instruction list, per the
/// loose line format accepted on input: address, colon, 8 hex chars, trailing `;`.
pub fn decode(image: &str) -> Result<Vec<Instruction>, Error> {
    let mut instructions = Vec::new();

    for (idx, line) in image.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let line_no = idx as u32 + 1;
        let caps = image_line_pattern().captures(line).ok_or_else(|| Error::Syntax {
            msg: "Invalid format".to_string(),
            line: Some(line_no),
        })?;

        let byte_addr = u32::from_str_radix(&caps[1], 16).map_err(|_| Error::Syntax {
            msg: "Invalid format".to_string(),
            line: Some(line_no),
        })?;
        let step_no = byte_addr / 4;

        instructions.push(Instruction::decode(&caps[2], Some(line_no), step_no)?);
    }

    Ok(instructions)
}

/// Renders `instructions` back to assembly text, one line per instruction.
pub fn disassemble(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(Instruction::render)
        .collect::<Vec<_>>()
        .join("\n")
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn image_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([a-zA-Z0-9]+)\s*:\s*([a-zA-Z0-9]{8});.*$").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addi_source_assembles_to_s3_word() {
        let image = assemble("\taddi $2, $0, -1\n").unwrap();
        assert!(image.contains("2002ffff"));
    }

    #[test]
    fn disassemble_assemble_round_trip_no_labels() {
        let source = "\taddi $2, $0, -1\n\tadd $3, $1, $2\n";
        let (instructions, labels) = parse(source).unwrap();
        let text = disassemble(&instructions);
        let (reparsed, relabels) = parse(&text).unwrap();
        assert_eq!(
            encode(&instructions, &labels).unwrap(),
            encode(&reparsed, &relabels).unwrap()
        );
    }

    #[test]
    fn label_integer_guard() {
        let err = parse("123: add $1,$2,$3\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn missing_leading_whitespace_is_rejected() {
        let err = parse("add $1,$2,$3\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn branch_back_label_s4() {
        let source = "l:\taddi $1, $1, 1\n\tbne $1, $0, l\n";
        let (instructions, labels) = parse(source).unwrap();
        let image = encode(&instructions, &labels).unwrap();
        assert!(image.lines().nth(1).unwrap().contains("fffe"));
    }

    #[test]
    fn decode_rejects_malformed_line() {
        assert!(decode("not a valid line at all\n").is_err());
    }

    #[test]
    fn decode_accepts_loose_format() {
        let instructions = decode("0:2002ffff;\n").unwrap();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].kind, InstructionKind::ADDI);
    }
}
