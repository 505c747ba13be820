//! Text list format
//!
//! ```text
//! list    := ['#' mark] '(' [descr] item* ')'
//! descr   := '<' (datum item)* '>'
//! item    := list | datum
//! datum   := true | false | 'c' | 12uc | -12 | 12u | 1.5 | "str" | word | @0x1f
//! ```
//!
//! A `;` starts a comment running to the end of the line. Bare words read
//! back as strings; the writer always quotes strings. A mark of 0 is not
//! written.
//!
//! Both directions walk nested lists with an explicit stack, so deep
//! nesting costs heap, not call stack.

mod parser;
mod writer;
