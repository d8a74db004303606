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

// Statement lowering. Every arm has zero net stack effect.

use std::io::Write;

use crate::ast::{Expr, Stmt, StmtKind};
use crate::error::{CodegenError, ErrorKind};
use crate::insn::Insn;
use crate::typectx::TypeRepr;
use crate::value;

use super::{lower_expr, LowerCtx};

fn system_out() -> Insn {
    Insn::GetStatic("java/lang/System/out", "Ljava/io/PrintStream;")
}

pub(crate) fn lower_stmt<W: Write>(s: &Stmt, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    match &s.node {
        StmtKind::Block(stmts) => {
            for st in stmts {
                lower_stmt(st, ctx)?;
            }
            Ok(())
        }

        StmtKind::If { cond, then_body, else_body } => {
            lower_expr(cond, ctx)?;
            ctx.out.insn(&value::unbox_bool())?;
            match else_body {
                Some(else_body) => {
                    let l_else = ctx.labels.fresh("else");
                    ctx.out.insn(&Insn::IfEq(l_else.clone()))?;
                    lower_stmt(then_body, ctx)?;
                    let l_end = ctx.labels.fresh("endif");
                    ctx.out.insn(&Insn::Goto(l_end.clone()))?;
                    ctx.out.label(&l_else)?;
                    lower_stmt(else_body, ctx)?;
                    ctx.out.label(&l_end)
                }
                // No else branch: the false target is the end label itself.
                None => {
                    let l_end = ctx.labels.fresh("endif");
                    ctx.out.insn(&Insn::IfEq(l_end.clone()))?;
                    lower_stmt(then_body, ctx)?;
                    ctx.out.label(&l_end)
                }
            }
        }

        // A bare call still pushes its value; the statement form drops it.
        StmtKind::Call(call) => {
            lower_expr(call, ctx)?;
            ctx.out.insn(&Insn::Pop)
        }

        StmtKind::Print(arg) => lower_print(arg, ctx),

        StmtKind::Return(e) => {
            lower_expr(e, ctx)?;
            if ctx.ret_ty.is_void() {
                ctx.out.insn(&Insn::Return)
            } else {
                ctx.out.insn(&Insn::AReturn)
            }
        }
    }
}

fn lower_print<W: Write>(arg: &Expr, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    let arg_ty = ctx.types.type_of(arg)?.clone();
    match arg_ty {
        TypeRepr::Int => {
            ctx.out.insn(&system_out())?;
            lower_expr(arg, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            ctx.out
                .insn(&Insn::InvokeVirtual("java/io/PrintStream/println(I)V"))
        }
        TypeRepr::Bool => {
            ctx.out.insn(&system_out())?;
            lower_expr(arg, ctx)?;
            ctx.out.insn(&Insn::InvokeVirtual(
                "java/io/PrintStream/println(Ljava/lang/Object;)V",
            ))
        }
        TypeRepr::Str => {
            ctx.out.insn(&system_out())?;
            lower_expr(arg, ctx)?;
            ctx.out.insn(&Insn::InvokeVirtual(
                "java/io/PrintStream/println(Ljava/lang/String;)V",
            ))
        }
        TypeRepr::List(_) => lower_print_list(arg, ctx),
        TypeRepr::Fptr(_) | TypeRepr::Void => Err(CodegenError::new(
            ErrorKind::Type,
            arg.span,
            "print has no formatting for this type",
        )),
    }
}

/// Lists are not handed to a generic formatter; the backend emits a
/// printing loop that runs at target runtime: "[", then every element with
/// a "," before all but the first, then "]" with a trailing newline. Uses
/// two temps (element index and element holder) and three fresh labels.
fn lower_print_list<W: Write>(arg: &Expr, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    lower_expr(arg, ctx)?;

    ctx.out.insn(&system_out())?;
    ctx.out.insn(&Insn::LdcStr("[".into()))?;
    ctx.out.insn(&Insn::InvokeVirtual(
        "java/io/PrintStream/print(Ljava/lang/String;)V",
    ))?;

    let l_end = ctx.labels.fresh("whileend");
    let l_start = ctx.labels.fresh("whilestart");
    let l_comma = ctx.labels.fresh("aftercomma");

    ctx.out.insn(&Insn::IConst0)?;
    let idx = ctx.frame.fresh_temp();
    ctx.out.insn(&Insn::IStore(idx))?;
    let elem = ctx.frame.fresh_temp();

    ctx.out.label(&l_start)?;
    ctx.out.insn(&Insn::Dup)?;
    ctx.out.insn(&Insn::InvokeVirtual("List/getSize()I"))?;
    ctx.out.insn(&Insn::ILoad(idx))?;
    ctx.out.insn(&Insn::IfIcmpLe(l_end.clone()))?;

    // "," before every element except index 0.
    ctx.out.insn(&Insn::ILoad(idx))?;
    ctx.out.insn(&Insn::IConst0)?;
    ctx.out.insn(&Insn::IfIcmpEq(l_comma.clone()))?;
    ctx.out.insn(&system_out())?;
    ctx.out.insn(&Insn::LdcStr(",".into()))?;
    ctx.out.insn(&Insn::InvokeVirtual(
        "java/io/PrintStream/print(Ljava/lang/String;)V",
    ))?;

    ctx.out.label(&l_comma)?;
    ctx.out.insn(&Insn::Dup)?;
    ctx.out.insn(&Insn::ILoad(idx))?;
    ctx.out
        .insn(&Insn::InvokeVirtual("List/getElement(I)Ljava/lang/Object;"))?;
    ctx.out.insn(&Insn::CheckCast("java/lang/Integer"))?;
    ctx.out.insn(&value::unbox_int())?;
    ctx.out.insn(&Insn::IStore(elem))?;
    ctx.out.insn(&system_out())?;
    ctx.out.insn(&Insn::ILoad(elem))?;
    ctx.out
        .insn(&Insn::InvokeVirtual("java/io/PrintStream/print(I)V"))?;
    ctx.out.insn(&Insn::IInc(idx, 1))?;
    ctx.out.insn(&Insn::Goto(l_start))?;

    ctx.out.label(&l_end)?;
    ctx.out.insn(&system_out())?;
    ctx.out.insn(&Insn::LdcStr("]".into()))?;
    ctx.out.insn(&Insn::InvokeVirtual(
        "java/io/PrintStream/println(Ljava/lang/String;)V",
    ))?;
    ctx.out.insn(&Insn::Pop)
}
