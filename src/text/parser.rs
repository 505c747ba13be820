//! List reader

use tracing::{debug, warn};

use crate::cell::{CellId, Datum, Value};
use crate::list::{DeletePolicy, Slip};
use crate::SlipError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    DescrOpen,
    DescrClose,
    Mark(u64),
    Datum(Datum),
    End,
}

/// Token with the position of its first character
#[derive(Debug)]
struct Spanned {
    token: Token,
    line: usize,
    column: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

fn parse_error(line: usize, column: usize, message: impl Into<String>) -> SlipError {
    SlipError::Parse {
        line,
        column,
        message: message.into(),
    }
}

/// Characters that end a bare word
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>' | '"' | '\'' | ';')
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while matches!(self.peek(), Some(c) if c != '\n') {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Spanned, SlipError> {
        self.skip_trivia();
        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return Ok(Spanned {
                token: Token::End,
                line,
                column,
            });
        };

        let token = match c {
            '(' | ')' | '<' | '>' => {
                self.bump();
                match c {
                    '(' => Token::Open,
                    ')' => Token::Close,
                    '<' => Token::DescrOpen,
                    _ => Token::DescrClose,
                }
            }
            '#' => {
                self.bump();
                let digits = self.take_word();
                let mark = digits
                    .parse::<u64>()
                    .map_err(|_| parse_error(line, column, format!("invalid mark '#{}'", digits)))?;
                Token::Mark(mark)
            }
            '\'' => {
                self.bump();
                let ch = self.escaped(line, column, '\'')?;
                if self.bump() != Some('\'') {
                    return Err(parse_error(line, column, "unterminated character literal"));
                }
                Token::Datum(Datum::Char(ch))
            }
            '"' => {
                self.bump();
                let mut s = String::new();
                loop {
                    match self.peek() {
                        Some('"') => {
                            self.bump();
                            break;
                        }
                        Some(_) => s.push(self.escaped(line, column, '"')?),
                        None => return Err(parse_error(line, column, "unterminated string")),
                    }
                }
                Token::Datum(Datum::Str(s))
            }
            '@' => {
                self.bump();
                let word = self.take_word();
                let hex = word
                    .strip_prefix("0x")
                    .or_else(|| word.strip_prefix("0X"))
                    .ok_or_else(|| parse_error(line, column, "pointer must be written @0x<hex>"))?;
                let p = usize::from_str_radix(hex, 16)
                    .map_err(|_| parse_error(line, column, format!("invalid pointer '@{}'", word)))?;
                Token::Datum(Datum::Ptr(p))
            }
            _ => {
                let word = self.take_word();
                Token::Datum(classify_word(&word).map_err(|m| parse_error(line, column, m))?)
            }
        };
        Ok(Spanned { token, line, column })
    }

    fn take_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }

    /// One possibly escaped character inside a quoted literal
    fn escaped(&mut self, line: usize, column: usize, quote: char) -> Result<char, SlipError> {
        match self.bump() {
            Some('\\') => match self.bump() {
                Some('n') => Ok('\n'),
                Some('t') => Ok('\t'),
                Some('0') => Ok('\0'),
                Some(c @ ('\\' | '\'' | '"')) => Ok(c),
                Some(c) => Err(parse_error(line, column, format!("unknown escape '\\{}'", c))),
                None => Err(parse_error(line, column, "unterminated escape")),
            },
            Some(c) if c == quote && quote == '\'' => Err(parse_error(line, column, "empty character literal")),
            Some(c) => Ok(c),
            None => Err(parse_error(line, column, "unterminated literal")),
        }
    }
}

/// Datum spelled by a bare word: boolean, non-finite double, number with
/// optional suffix, or string
fn classify_word(word: &str) -> Result<Datum, String> {
    match word {
        "true" => return Ok(Datum::Bool(true)),
        "false" => return Ok(Datum::Bool(false)),
        "+inf.0" => return Ok(Datum::Double(f64::INFINITY)),
        "-inf.0" => return Ok(Datum::Double(f64::NEG_INFINITY)),
        "+nan.0" | "-nan.0" => return Ok(Datum::Double(f64::NAN)),
        _ => {}
    }

    let unsigned = word.strip_prefix(&['-', '+'][..]).unwrap_or(word);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Datum::Str(word.to_string()));
    }

    let malformed = || format!("malformed number '{}'", word);
    if let Some(digits) = word.strip_suffix("uc") {
        return digits.parse::<u8>().map(Datum::UChar).map_err(|_| malformed());
    }
    if let Some(digits) = word.strip_suffix('u') {
        return digits.parse::<u64>().map(Datum::ULong).map_err(|_| malformed());
    }
    if word.contains(&['.', 'e', 'E'][..]) {
        return word.parse::<f64>().map(Datum::Double).map_err(|_| malformed());
    }
    word.parse::<i64>().map(Datum::Long).map_err(|_| malformed())
}

/// One list still waiting for its closing paren
struct Frame {
    list: CellId,
    /// Inside `< ... >`
    in_descr: bool,
    /// Descriptor key read, value pending
    key: Option<Datum>,
    /// Something followed the opening paren
    started: bool,
}

impl Slip {
    /// Read one list from `text`, returning its Header
    ///
    /// On error nothing read so far is left allocated.
    pub fn parse(&mut self, text: &str) -> Result<CellId, SlipError> {
        let mut root = None;
        let result = self.parse_into(text, &mut root);
        if result.is_err() {
            if let Some(list) = root {
                if let Err(e) = self.delete_list(list, DeletePolicy::Cascade) {
                    warn!(list = list.0, error = %e, "could not release partially read list");
                }
            }
        }
        result
    }

    fn parse_into(&mut self, text: &str, root: &mut Option<CellId>) -> Result<CellId, SlipError> {
        let mut lexer = Lexer::new(text);
        let mut stack: Vec<Frame> = Vec::new();
        let mut pending_mark: Option<u64> = None;

        loop {
            let Spanned { token, line, column } = lexer.next_token()?;
            if pending_mark.is_some() && token != Token::Open {
                return Err(parse_error(line, column, "a mark must be followed by '('"));
            }

            match token {
                Token::Mark(mark) => pending_mark = Some(mark),
                Token::Open => {
                    let list = self.new_list()?;
                    if let Some(mark) = pending_mark.take() {
                        self.put_mark(list, mark)?;
                    }
                    match stack.last_mut() {
                        None if root.is_some() => {
                            self.delete_list(list, DeletePolicy::Strict)?;
                            return Err(parse_error(line, column, "content after the top list"));
                        }
                        None => *root = Some(list),
                        Some(parent) if parent.in_descr => match parent.key.take() {
                            Some(key) => self.put(parent.list, key, Value::List(list))?,
                            None => {
                                self.delete_list(list, DeletePolicy::Strict)?;
                                return Err(parse_error(line, column, "descriptor keys must be datums"));
                            }
                        },
                        Some(parent) => {
                            parent.started = true;
                            self.ins_left(parent.list, Value::List(list))?;
                        }
                    }
                    stack.push(Frame {
                        list,
                        in_descr: false,
                        key: None,
                        started: false,
                    });
                }
                Token::Close => match stack.pop() {
                    None => return Err(parse_error(line, column, "unbalanced ')'")),
                    Some(frame) if frame.in_descr => {
                        return Err(parse_error(line, column, "descriptor not closed with '>'"))
                    }
                    Some(_) => {}
                },
                Token::DescrOpen => match stack.last_mut() {
                    Some(frame) if !frame.started => {
                        frame.in_descr = true;
                        frame.started = true;
                    }
                    _ => return Err(parse_error(line, column, "'<' must directly follow '('")),
                },
                Token::DescrClose => match stack.last_mut() {
                    Some(frame) if frame.in_descr && frame.key.is_none() => frame.in_descr = false,
                    Some(frame) if frame.in_descr => {
                        return Err(parse_error(line, column, "descriptor key without a value"))
                    }
                    _ => return Err(parse_error(line, column, "unexpected '>'")),
                },
                Token::Datum(datum) => {
                    let Some(frame) = stack.last_mut() else {
                        return Err(parse_error(line, column, "datum outside of a list"));
                    };
                    if frame.in_descr {
                        match frame.key.take() {
                            Some(key) => self.put(frame.list, key, datum)?,
                            None => frame.key = Some(datum),
                        }
                    } else {
                        frame.started = true;
                        self.ins_left(frame.list, datum)?;
                    }
                }
                Token::End => {
                    if !stack.is_empty() {
                        return Err(parse_error(line, column, "unclosed list"));
                    }
                    let list = root.ok_or_else(|| parse_error(line, column, "no list found"))?;
                    debug!(list = list.0, live = self.stats().live, "parsed list");
                    return Ok(list);
                }
            }
        }
    }
}
