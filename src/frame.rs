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

use crate::ast::Span;
use crate::error::{CodegenError, ErrorKind};

/// Slot 0 always holds the implicit receiver instance.
pub const RECEIVER_SLOT: u32 = 0;

/// Local-variable slot allocator for one function activation.
/// Formals occupy slots 1..=N in declaration order; temporaries follow,
/// strictly increasing and never reclaimed while the function is lowered.
/// A fresh `FrameCtx` is built for each function, which is what lets two
/// functions reuse the same numeric temp slots.
#[derive(Debug)]
pub struct FrameCtx {
    params: Vec<String>,
    temps_used: u32,
}

impl FrameCtx {
    pub fn for_fn(params: &[String]) -> Self {
        Self {
            params: params.to_vec(),
            temps_used: 0,
        }
    }

    /// Frame for the unit initializer (no formals).
    pub fn entry() -> Self {
        Self::for_fn(&[])
    }

    /// Fixed slot of a formal parameter. A name that is not a formal is an
    /// upstream invariant violation (the checker should have rejected it).
    pub fn slot_of(&self, name: &str, span: Span) -> Result<u32, CodegenError> {
        match self.params.iter().position(|p| p == name) {
            Some(i) => Ok(i as u32 + 1),
            None => Err(CodegenError::new(
                ErrorKind::Name,
                span,
                format!("unresolved variable '{}'", name),
            )),
        }
    }

    /// Permanently claim the next temporary slot.
    pub fn fresh_temp(&mut self) -> u32 {
        self.temps_used += 1;
        self.params.len() as u32 + self.temps_used
    }

    pub fn temps_used(&self) -> u32 {
        self.temps_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(params: &[&str]) -> FrameCtx {
        FrameCtx::for_fn(&params.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn formals_occupy_slots_after_the_receiver() {
        let f = frame(&["a", "b", "c"]);
        assert_eq!(f.slot_of("a", Span::point(0)).unwrap(), 1);
        assert_eq!(f.slot_of("c", Span::point(0)).unwrap(), 3);
    }

    #[test]
    fn temps_start_after_formals_and_strictly_increase() {
        let mut f = frame(&["a", "b"]);
        assert_eq!(f.fresh_temp(), 3);
        assert_eq!(f.fresh_temp(), 4);
        assert_eq!(f.fresh_temp(), 5);
        assert_eq!(f.temps_used(), 3);
    }

    #[test]
    fn a_fresh_frame_reuses_temp_numbers() {
        let mut f = frame(&["x"]);
        assert_eq!(f.fresh_temp(), 2);
        let mut g = frame(&["x"]);
        assert_eq!(g.fresh_temp(), 2);
    }

    #[test]
    fn unknown_name_is_an_unresolved_variable_error() {
        let f = frame(&["a"]);
        let err = f.slot_of("zz", Span::point(9)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Name);
        assert!(err.message.contains("zz"));
    }
}
