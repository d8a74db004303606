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

// Expression lowering. Every arm leaves exactly one value on the operand
// stack, boxed per the value model for the expression's static type.

use std::io::Write;

use crate::ast::{BinOp, Expr, ExprKind, UnOp};
use crate::error::{CodegenError, ErrorKind};
use crate::frame::RECEIVER_SLOT;
use crate::insn::Insn;
use crate::typectx::{FnSignature, TypeRepr};
use crate::value;

use super::LowerCtx;

pub(crate) fn lower_expr<W: Write>(e: &Expr, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    match &e.node {
        ExprKind::IntLit(n) => {
            ctx.out.insn(&Insn::Ldc(*n))?;
            ctx.out.insn(&value::box_int())
        }
        ExprKind::BoolLit(b) => {
            ctx.out.insn(&Insn::Ldc(if *b { 1 } else { 0 }))?;
            ctx.out.insn(&value::box_bool())
        }
        ExprKind::StrLit(s) => ctx.out.insn(&Insn::LdcStr(s.clone())),
        // Operand of a bare `return`; contributes no instructions.
        ExprKind::VoidLit => Ok(()),

        ExprKind::ListLit(elems) => lower_list_lit(elems, ctx),
        ExprKind::Var(name) => lower_var(name, e, ctx),
        ExprKind::Binary(op, lhs, rhs) => lower_binary(*op, lhs, rhs, ctx),
        ExprKind::Unary(op, operand) => lower_unary(*op, operand, ctx),
        ExprKind::Index { list, index } => lower_index(list, index, ctx),
        ExprKind::Size(list) => {
            lower_expr(list, ctx)?;
            ctx.out.insn(&Insn::InvokeVirtual("List/getSize()I"))?;
            ctx.out.insn(&value::box_int())
        }
        ExprKind::Call { callee, args, kwargs } => lower_call(e, callee, args, kwargs, ctx),
    }
}

/// An identifier is probed as a function name first: function names shadow
/// same-named locals, and a hit produces a function-pointer value capturing
/// the current receiver.
fn lower_var<W: Write>(name: &str, e: &Expr, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    match ctx.symtab.lookup(name) {
        Some(_) => {
            ctx.out.insn(&Insn::New("Fptr"))?;
            ctx.out.insn(&Insn::Dup)?;
            ctx.out.insn(&Insn::ALoad(RECEIVER_SLOT))?;
            ctx.out.insn(&Insn::LdcStr(name.to_string()))?;
            ctx.out.insn(&Insn::InvokeSpecial(
                "Fptr/<init>(Ljava/lang/Object;Ljava/lang/String;)V",
            ))
        }
        None => {
            let slot = ctx.frame.slot_of(name, e.span)?;
            ctx.out.insn(&Insn::ALoad(slot))
        }
    }
}

fn lower_binary<W: Write>(
    op: BinOp,
    lhs: &Expr,
    rhs: &Expr,
    ctx: &mut LowerCtx<'_, W>,
) -> Result<(), CodegenError> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
            lower_expr(lhs, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            lower_expr(rhs, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            let prim = match op {
                BinOp::Add => Insn::IAdd,
                BinOp::Sub => Insn::ISub,
                BinOp::Mul => Insn::IMul,
                _ => Insn::IDiv,
            };
            ctx.out.insn(&prim)?;
            ctx.out.insn(&value::box_int())
        }

        // Reference identity; structured values (lists, fptrs) are not
        // compared by content.
        BinOp::Eq | BinOp::Ne => {
            lower_expr(lhs, ctx)?;
            lower_expr(rhs, ctx)?;
            let l_false = ctx.labels.fresh("false");
            let branch = if op == BinOp::Eq {
                Insn::IfAcmpNe(l_false.clone())
            } else {
                Insn::IfAcmpEq(l_false.clone())
            };
            ctx.out.insn(&branch)?;
            ctx.out.insn(&Insn::Ldc(1))?;
            let l_after = ctx.labels.fresh("after");
            ctx.out.insn(&Insn::Goto(l_after.clone()))?;
            ctx.out.label(&l_false)?;
            ctx.out.insn(&Insn::Ldc(0))?;
            ctx.out.label(&l_after)?;
            ctx.out.insn(&value::box_bool())
        }

        BinOp::Lt | BinOp::Gt => {
            lower_expr(lhs, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            lower_expr(rhs, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            let l_false = ctx.labels.fresh("false");
            let branch = if op == BinOp::Lt {
                Insn::IfIcmpGe(l_false.clone())
            } else {
                Insn::IfIcmpLe(l_false.clone())
            };
            ctx.out.insn(&branch)?;
            ctx.out.insn(&Insn::Ldc(1))?;
            let l_end = ctx.labels.fresh("endif");
            ctx.out.insn(&Insn::Goto(l_end.clone()))?;
            ctx.out.label(&l_false)?;
            ctx.out.insn(&Insn::Ldc(0))?;
            ctx.out.label(&l_end)?;
            ctx.out.insn(&value::box_bool())
        }

        // Short-circuit: the right operand's instructions sit on the
        // non-taken path only.
        BinOp::And => {
            lower_expr(lhs, ctx)?;
            ctx.out.insn(&value::unbox_bool())?;
            let l_false = ctx.labels.fresh("false");
            ctx.out.insn(&Insn::IfEq(l_false.clone()))?;
            lower_expr(rhs, ctx)?;
            let l_end = ctx.labels.fresh("endif");
            ctx.out.insn(&Insn::Goto(l_end.clone()))?;
            ctx.out.label(&l_false)?;
            ctx.out.insn(&Insn::Ldc(0))?;
            ctx.out.insn(&value::box_bool())?;
            ctx.out.label(&l_end)
        }
        BinOp::Or => {
            lower_expr(lhs, ctx)?;
            ctx.out.insn(&value::unbox_bool())?;
            let l_true = ctx.labels.fresh("true");
            ctx.out.insn(&Insn::IfNe(l_true.clone()))?;
            lower_expr(rhs, ctx)?;
            let l_end = ctx.labels.fresh("endif");
            ctx.out.insn(&Insn::Goto(l_end.clone()))?;
            ctx.out.label(&l_true)?;
            ctx.out.insn(&Insn::Ldc(1))?;
            ctx.out.insn(&value::box_bool())?;
            ctx.out.label(&l_end)
        }

        // Append mutates and yields the list reference itself; usable both
        // as a statement and inside a larger expression.
        BinOp::Append => {
            lower_expr(lhs, ctx)?;
            ctx.out.insn(&Insn::Dup)?;
            lower_expr(rhs, ctx)?;
            ctx.out
                .insn(&Insn::InvokeVirtual("List/addElement(Ljava/lang/Object;)V"))
        }
    }
}

fn lower_unary<W: Write>(
    op: UnOp,
    operand: &Expr,
    ctx: &mut LowerCtx<'_, W>,
) -> Result<(), CodegenError> {
    match op {
        UnOp::Not => {
            lower_expr(operand, ctx)?;
            ctx.out.insn(&value::unbox_bool())?;
            let l_false = ctx.labels.fresh("false");
            ctx.out.insn(&Insn::IfEq(l_false.clone()))?;
            ctx.out.insn(&Insn::Ldc(0))?;
            let l_after = ctx.labels.fresh("after");
            ctx.out.insn(&Insn::Goto(l_after.clone()))?;
            ctx.out.label(&l_false)?;
            ctx.out.insn(&Insn::Ldc(1))?;
            ctx.out.label(&l_after)?;
            ctx.out.insn(&value::box_bool())
        }
        UnOp::Neg => {
            lower_expr(operand, ctx)?;
            ctx.out.insn(&value::unbox_int())?;
            ctx.out.insn(&Insn::INeg)?;
            ctx.out.insn(&value::box_int())
        }
    }
}

/// Accumulate elements into a transient buffer held in a fresh temp, then
/// wrap the buffer into a list reference.
fn lower_list_lit<W: Write>(elems: &[Expr], ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    let buf = new_transient_buffer(ctx)?;
    for elem in elems {
        ctx.out.insn(&Insn::ALoad(buf))?;
        lower_expr(elem, ctx)?;
        ctx.out.insn(&Insn::InvokeVirtual(
            "java/util/ArrayList/add(Ljava/lang/Object;)Z",
        ))?;
        ctx.out.insn(&Insn::Pop)?;
    }
    ctx.out.insn(&Insn::New("List"))?;
    ctx.out.insn(&Insn::Dup)?;
    ctx.out.insn(&Insn::ALoad(buf))?;
    ctx.out
        .insn(&Insn::InvokeSpecial("List/<init>(Ljava/util/ArrayList;)V"))
}

fn lower_index<W: Write>(
    list: &Expr,
    index: &Expr,
    ctx: &mut LowerCtx<'_, W>,
) -> Result<(), CodegenError> {
    let elem_ty = match ctx.types.type_of(list)? {
        TypeRepr::List(elem) => (**elem).clone(),
        _ => {
            return Err(CodegenError::new(
                ErrorKind::Type,
                list.span,
                "indexing a non-list value",
            ))
        }
    };
    lower_expr(list, ctx)?;
    lower_expr(index, ctx)?;
    ctx.out.insn(&value::unbox_int())?;
    ctx.out
        .insn(&Insn::InvokeVirtual("List/getElement(I)Ljava/lang/Object;"))?;
    let class = value::boxed_class(&elem_ty, list.span)?;
    ctx.out.insn(&Insn::CheckCast(class))
}

/// Calls evaluate the callee to a function-pointer value, marshal the
/// arguments into a transient dynamic list, dispatch through the pointer,
/// and narrow the result to the declared return representation.
fn lower_call<W: Write>(
    e: &Expr,
    callee: &Expr,
    args: &[Expr],
    kwargs: &[(String, Expr)],
    ctx: &mut LowerCtx<'_, W>,
) -> Result<(), CodegenError> {
    lower_expr(callee, ctx)?;

    let fname = match ctx.types.type_of(callee)? {
        TypeRepr::Fptr(name) => name.clone(),
        _ => {
            return Err(CodegenError::new(
                ErrorKind::Type,
                callee.span,
                "call target is not a function pointer",
            ))
        }
    };
    let sig = ctx.symtab.signature_of(&fname, e.span)?;

    let buf = new_transient_buffer(ctx)?;
    if !args.is_empty() {
        for arg in args {
            push_arg(buf, arg, ctx)?;
        }
    } else if !kwargs.is_empty() {
        // Keyword calls marshal in the callee's declared parameter order.
        // Key sets that do not exactly match the signature were supposed to
        // be rejected upstream; treat them like unresolved names.
        check_kwarg_keys(e, sig, kwargs)?;
        for (pname, _) in &sig.params {
            let (_, arg) = kwargs
                .iter()
                .find(|(k, _)| k == pname)
                .expect("key checked above");
            push_arg(buf, arg, ctx)?;
        }
    }

    ctx.out.insn(&Insn::ALoad(buf))?;
    ctx.out.insn(&Insn::InvokeVirtual(
        "Fptr/invoke(Ljava/util/ArrayList;)Ljava/lang/Object;",
    ))?;

    match &sig.ret {
        TypeRepr::Void => Ok(()),
        ret => {
            let class = value::boxed_class(ret, e.span)?;
            ctx.out.insn(&Insn::CheckCast(class))
        }
    }
}

fn check_kwarg_keys(e: &Expr, sig: &FnSignature, kwargs: &[(String, Expr)]) -> Result<(), CodegenError> {
    for (pname, _) in &sig.params {
        let n = kwargs.iter().filter(|(k, _)| k == pname).count();
        if n == 0 {
            return Err(CodegenError::new(
                ErrorKind::Name,
                e.span,
                format!("call is missing keyword argument '{}'", pname),
            ));
        }
        if n > 1 {
            return Err(CodegenError::new(
                ErrorKind::Name,
                e.span,
                format!("duplicate keyword argument '{}'", pname),
            ));
        }
    }
    for (k, _) in kwargs {
        if !sig.params.iter().any(|(pname, _)| pname == k) {
            return Err(CodegenError::new(
                ErrorKind::Name,
                e.span,
                format!("unknown keyword argument '{}'", k),
            ));
        }
    }
    Ok(())
}

fn push_arg<W: Write>(buf: u32, arg: &Expr, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    ctx.out.insn(&Insn::ALoad(buf))?;
    lower_expr(arg, ctx)?;
    ctx.out.insn(&Insn::InvokeVirtual(
        "java/util/ArrayList/add(Ljava/lang/Object;)Z",
    ))?;
    ctx.out.insn(&Insn::Pop)
}

/// Allocate a fresh transient ArrayList and park it in a new temp slot.
fn new_transient_buffer<W: Write>(ctx: &mut LowerCtx<'_, W>) -> Result<u32, CodegenError> {
    ctx.out.insn(&Insn::New("java/util/ArrayList"))?;
    ctx.out.insn(&Insn::Dup)?;
    ctx.out
        .insn(&Insn::InvokeSpecial("java/util/ArrayList/<init>()V"))?;
    let buf = ctx.frame.fresh_temp();
    ctx.out.insn(&Insn::AStore(buf))?;
    Ok(buf)
}
