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

// Append-only instruction stream writer. Instructions are flushed as they
// are appended and never rewritten; branch targets are textual labels, so
// no back-patching pass exists.

use std::io::{self, Write};

use crate::error::{CodegenError, ErrorKind};
use crate::insn::{Insn, Label};

// Stream layout: directives flush-left, labels one tab, instructions two.
const LABEL_INDENT: &str = "\t";
const INSN_INDENT: &str = "\t\t";

pub struct Emitter<W: Write> {
    w: W,
}

fn io_err(e: io::Error) -> CodegenError {
    CodegenError::at(ErrorKind::Io, 0, format!("write failed: {}", e))
}

impl<W: Write> Emitter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn insn(&mut self, i: &Insn) -> Result<(), CodegenError> {
        writeln!(self.w, "{}{}", INSN_INDENT, i).map_err(io_err)?;
        self.w.flush().map_err(io_err)
    }

    /// Attach a branch target to the current position.
    pub fn label(&mut self, l: &Label) -> Result<(), CodegenError> {
        writeln!(self.w, "{}{}:", LABEL_INDENT, l).map_err(io_err)?;
        self.w.flush().map_err(io_err)
    }

    pub fn directive(&mut self, d: &str) -> Result<(), CodegenError> {
        writeln!(self.w, "{}", d).map_err(io_err)?;
        self.w.flush().map_err(io_err)
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_distinguishes_directives_labels_and_insns() {
        let mut e = Emitter::new(Vec::new());
        e.directive(".method public f()V").unwrap();
        e.insn(&Insn::Dup).unwrap();
        e.label(&Label("Label_endif0".into())).unwrap();
        e.directive(".end method").unwrap();
        let text = String::from_utf8(e.into_inner()).unwrap();
        assert_eq!(
            text,
            ".method public f()V\n\t\tdup\n\tLabel_endif0:\n.end method\n"
        );
    }

    #[test]
    fn write_failure_surfaces_as_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut e = Emitter::new(Broken);
        let err = e.insn(&Insn::Pop).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }
}
