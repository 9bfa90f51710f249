// MIT License
//
// Copyright (c) 2021 Hajime Nakagami<nakagami@gmail.com>
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::io;

use thiserror::Error;

use super::relation::Oid;

/// Errors raised while turning catalog rows into DDL.
#[derive(Error, Debug)]
pub enum Error {
    /// Writing to the output sink failed. The run must stop; whatever was
    /// already written stays written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A dependency sort finished with edges left over.
    #[error("dependency cycle detected: {remaining} edge(s) could not be ordered")]
    DependencyCycle { remaining: usize },

    /// A language or protocol references a function id missing from the
    /// function info map.
    #[error("function with oid {0} not found in function info map")]
    UnknownFunction(Oid),

    #[error("unknown constraint type code '{0}'")]
    UnknownConstraintKind(char),
}

pub type Result<T> = std::result::Result<T, Error>;
