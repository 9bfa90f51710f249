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

//! Options controlling DDL generation
//!
//! # Example
//!
//! ```
//! use pgmetadump::DumpOptions;
//!
//! let options = DumpOptions::new()
//!     .rule_comments(true)
//!     .trigger_comments(true);
//! assert!(options.rule_comments);
//! assert_eq!(options.public_schema, "public");
//! ```

/// Options for configuring a dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Emit `COMMENT ON RULE` after each rule definition (default: false)
    pub rule_comments: bool,
    /// Emit `COMMENT ON TRIGGER` after each trigger definition (default: false)
    pub trigger_comments: bool,
    /// Schema that always exists in the target database, so no
    /// `CREATE SCHEMA` is written for it (default: "public")
    pub public_schema: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            rule_comments: false,
            trigger_comments: false,
            public_schema: "public".to_string(),
        }
    }
}

impl DumpOptions {
    /// Create new dump options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable rule comments
    pub fn rule_comments(mut self, enabled: bool) -> Self {
        self.rule_comments = enabled;
        self
    }

    /// Enable or disable trigger comments
    pub fn trigger_comments(mut self, enabled: bool) -> Self {
        self.trigger_comments = enabled;
        self
    }

    /// Set the schema whose CREATE statement is suppressed
    pub fn public_schema(mut self, name: &str) -> Self {
        self.public_schema = name.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_elide_rule_and_trigger_comments() {
        let options = DumpOptions::default();
        assert!(!options.rule_comments);
        assert!(!options.trigger_comments);
        assert_eq!(options.public_schema, "public");
    }

    #[test]
    fn test_builder_setters() {
        let options = DumpOptions::new()
            .trigger_comments(true)
            .public_schema("main");
        assert!(!options.rule_comments);
        assert!(options.trigger_comments);
        assert_eq!(options.public_schema, "main");
    }
}
