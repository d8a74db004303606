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

// Value model: how each static type is represented on the target's operand
// stack. Primitives travel boxed except as immediate operands of primitive
// instructions, which rebox their result right away. Pure mapping; a type
// outside the known set means the checker and backend disagree, which is
// fatal.

use crate::ast::Span;
use crate::error::{CodegenError, ErrorKind};
use crate::insn::Insn;
use crate::typectx::TypeRepr;

/// Signature-encoding token for method headers. Total: the type set is a
/// closed sum, so exhaustive matching stands in for an unsupported-type
/// check here.
pub fn descriptor(ty: &TypeRepr) -> &'static str {
    match ty {
        TypeRepr::Int => "Ljava/lang/Integer;",
        TypeRepr::Bool => "Ljava/lang/Boolean;",
        TypeRepr::Str => "Ljava/lang/String;",
        TypeRepr::List(_) => "LList;",
        TypeRepr::Fptr(_) => "LFptr;",
        TypeRepr::Void => "V",
    }
}

/// Boxed class name, as taken by `checkcast`. Void has no boxed form.
pub fn boxed_class(ty: &TypeRepr, span: Span) -> Result<&'static str, CodegenError> {
    match ty {
        TypeRepr::Int => Ok("java/lang/Integer"),
        TypeRepr::Bool => Ok("java/lang/Boolean"),
        TypeRepr::Str => Ok("java/lang/String"),
        TypeRepr::List(_) => Ok("List"),
        TypeRepr::Fptr(_) => Ok("Fptr"),
        TypeRepr::Void => Err(CodegenError::new(
            ErrorKind::Type,
            span,
            "void has no stack representation",
        )),
    }
}

pub fn box_int() -> Insn {
    Insn::InvokeStatic("java/lang/Integer/valueOf(I)Ljava/lang/Integer;")
}

pub fn unbox_int() -> Insn {
    Insn::InvokeVirtual("java/lang/Integer/intValue()I")
}

pub fn box_bool() -> Insn {
    Insn::InvokeStatic("java/lang/Boolean/valueOf(Z)Ljava/lang/Boolean;")
}

pub fn unbox_bool() -> Insn {
    Insn::InvokeVirtual("java/lang/Boolean/booleanValue()Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_cover_the_whole_type_set() {
        assert_eq!(descriptor(&TypeRepr::Int), "Ljava/lang/Integer;");
        assert_eq!(descriptor(&TypeRepr::Bool), "Ljava/lang/Boolean;");
        assert_eq!(descriptor(&TypeRepr::Str), "Ljava/lang/String;");
        assert_eq!(descriptor(&TypeRepr::list_of_int()), "LList;");
        assert_eq!(descriptor(&TypeRepr::Fptr("f".into())), "LFptr;");
        assert_eq!(descriptor(&TypeRepr::Void), "V");
    }

    #[test]
    fn void_has_no_boxed_class() {
        let err = boxed_class(&TypeRepr::Void, Span::point(3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn box_unbox_pairs_match() {
        assert_eq!(
            box_int().to_string(),
            "invokestatic java/lang/Integer/valueOf(I)Ljava/lang/Integer;"
        );
        assert_eq!(
            unbox_bool().to_string(),
            "invokevirtual java/lang/Boolean/booleanValue()Z"
        );
    }
}
