/**
 * Copyright 2022 - Jahred Love
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1. Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2. Redistributions in binary form must reproduce the above copyright notice, this
 * list of conditions and the following disclaimer in the documentation and/or other
 * materials provided with the distribution.
 *
 * 3. Neither the name of the copyright holder nor the names of its contributors may
 * be used to endorse or promote products derived from this software without specific
 * prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS “AS IS” AND
 * ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED.
 * IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT,
 * INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT
 * NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
 * PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
 * WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
 * ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
 * POSSIBILITY OF SUCH DAMAGE.
 */

// Target instruction definitions and their textual (Jasmin) spelling.
// Kept separate from lowering so the assembly syntax lives in one place.

use std::fmt;

/// A branch target name, unique across one whole unit lowering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label(pub String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One target instruction. Stack effects are as documented by the target's
/// instruction set; lowering relies on them to keep every expression's net
/// effect at exactly one pushed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Insn {
    /// `ldc <int>`
    Ldc(i64),
    /// `ldc "<text>"`
    LdcStr(String),
    IConst0,

    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,

    Dup,
    Pop,

    ALoad(u32),
    AStore(u32),
    ILoad(u32),
    IStore(u32),
    IInc(u32, i32),

    IfEq(Label),
    IfNe(Label),
    IfIcmpGe(Label),
    IfIcmpLe(Label),
    IfIcmpEq(Label),
    IfAcmpEq(Label),
    IfAcmpNe(Label),
    Goto(Label),

    New(&'static str),
    CheckCast(&'static str),
    InvokeVirtual(&'static str),
    InvokeSpecial(&'static str),
    InvokeStatic(&'static str),
    GetStatic(&'static str, &'static str),

    AReturn,
    Return,
}

/// Slots 0..=3 use the compact one-byte spelling; higher slots take the
/// operand form. Applied here so every load/store site agrees.
fn write_slot(f: &mut fmt::Formatter<'_>, op: &str, slot: u32) -> fmt::Result {
    if slot <= 3 {
        write!(f, "{}_{}", op, slot)
    } else {
        write!(f, "{} {}", op, slot)
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insn::Ldc(n) => write!(f, "ldc {}", n),
            Insn::LdcStr(s) => write!(f, "ldc \"{}\"", s),
            Insn::IConst0 => f.write_str("iconst_0"),

            Insn::IAdd => f.write_str("iadd"),
            Insn::ISub => f.write_str("isub"),
            Insn::IMul => f.write_str("imul"),
            Insn::IDiv => f.write_str("idiv"),
            Insn::INeg => f.write_str("ineg"),

            Insn::Dup => f.write_str("dup"),
            Insn::Pop => f.write_str("pop"),

            Insn::ALoad(s) => write_slot(f, "aload", *s),
            Insn::AStore(s) => write_slot(f, "astore", *s),
            Insn::ILoad(s) => write_slot(f, "iload", *s),
            Insn::IStore(s) => write_slot(f, "istore", *s),
            Insn::IInc(s, by) => write!(f, "iinc {} {}", s, by),

            Insn::IfEq(l) => write!(f, "ifeq {}", l),
            Insn::IfNe(l) => write!(f, "ifne {}", l),
            Insn::IfIcmpGe(l) => write!(f, "if_icmpge {}", l),
            Insn::IfIcmpLe(l) => write!(f, "if_icmple {}", l),
            Insn::IfIcmpEq(l) => write!(f, "if_icmpeq {}", l),
            Insn::IfAcmpEq(l) => write!(f, "if_acmpeq {}", l),
            Insn::IfAcmpNe(l) => write!(f, "if_acmpne {}", l),
            Insn::Goto(l) => write!(f, "goto {}", l),

            Insn::New(class) => write!(f, "new {}", class),
            Insn::CheckCast(class) => write!(f, "checkcast {}", class),
            Insn::InvokeVirtual(sig) => write!(f, "invokevirtual {}", sig),
            Insn::InvokeSpecial(sig) => write!(f, "invokespecial {}", sig),
            Insn::InvokeStatic(sig) => write!(f, "invokestatic {}", sig),
            Insn::GetStatic(field, desc) => write!(f, "getstatic {} {}", field, desc),

            Insn::AReturn => f.write_str("areturn"),
            Insn::Return => f.write_str("return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_slots_use_compact_spelling() {
        assert_eq!(Insn::ALoad(0).to_string(), "aload_0");
        assert_eq!(Insn::AStore(3).to_string(), "astore_3");
        assert_eq!(Insn::ILoad(2).to_string(), "iload_2");
    }

    #[test]
    fn high_slots_use_operand_spelling() {
        assert_eq!(Insn::ALoad(4).to_string(), "aload 4");
        assert_eq!(Insn::IStore(11).to_string(), "istore 11");
    }

    #[test]
    fn string_constants_are_quoted() {
        assert_eq!(Insn::LdcStr("[".into()).to_string(), "ldc \"[\"");
    }

    #[test]
    fn branches_carry_their_target() {
        let l = Label("Label_endif4".into());
        assert_eq!(Insn::IfEq(l.clone()).to_string(), "ifeq Label_endif4");
        assert_eq!(Insn::Goto(l).to_string(), "goto Label_endif4");
    }
}
