//! Calculator sub-processor: evaluates the text after `=` and reports the
//! result as status text. A failed evaluation reports an empty result
//! rather than an error.

use crate::processor::{
    remove_prefix, Processor, ProcessorInput, ProcessorOutput, SubProcessor,
};

pub const MATH_PREFIX: char = '=';

pub struct MathProcessor;

impl MathProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MathProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for MathProcessor {
    fn help_text(&self) -> String {
        format!("Math processor prefix: {MATH_PREFIX}\n")
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        let expr = remove_prefix(MATH_PREFIX, &input.cmd);
        let mut out = ProcessorOutput::default();
        out.hide_rows();
        match eval_expr(expr) {
            Some(value) => out.set_txt(format!("Math result: {}", format_value(value))),
            None => out.set_txt("Math result:"),
        }
        Some(out)
    }
}

impl SubProcessor for MathProcessor {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        input.cmd.starts_with(MATH_PREFIX)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Evaluates an arithmetic expression (`+ - * / % ^`, parentheses, unary
/// minus). `None` on any syntax error or non-finite result.
pub fn eval_expr(input: &str) -> Option<f64> {
    let mut parser = ExprParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

struct ExprParser {
    chars: Vec<char>,
    pos: usize,
}

impl ExprParser {
    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek_op() {
                Some('+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            match self.peek_op() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                Some('%') => {
                    self.pos += 1;
                    value %= self.factor()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        let base = self.unary()?;
        if self.peek_op() == Some('^') {
            self.pos += 1;
            // Right associative.
            let exponent = self.factor()?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn unary(&mut self) -> Option<f64> {
        if self.peek_op() == Some('-') {
            self.pos += 1;
            return Some(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<f64> {
        self.skip_ws();
        if self.peek() == Some('(') {
            self.pos += 1;
            let value = self.expr()?;
            self.skip_ws();
            if self.peek() != Some(')') {
                return None;
            }
            self.pos += 1;
            return Some(value);
        }
        self.number()
    }

    fn number(&mut self) -> Option<f64> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().ok()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_op(&mut self) -> Option<char> {
        self.skip_ws();
        self.peek()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{eval_expr, format_value};

    #[test]
    fn evaluates_basic_arithmetic() {
        assert_eq!(eval_expr("1 + 2 * 3"), Some(7.0));
        assert_eq!(eval_expr("(1 + 2) * 3"), Some(9.0));
        assert_eq!(eval_expr("10 / 4"), Some(2.5));
        assert_eq!(eval_expr("7 % 4"), Some(3.0));
        assert_eq!(eval_expr("2 ^ 10"), Some(1024.0));
        assert_eq!(eval_expr("-3 + 5"), Some(2.0));
    }

    #[test]
    fn rejects_bad_expressions() {
        assert_eq!(eval_expr("1 +"), None);
        assert_eq!(eval_expr("(1 + 2"), None);
        assert_eq!(eval_expr("abc"), None);
        assert_eq!(eval_expr("1 / 0"), None);
        assert_eq!(eval_expr(""), None);
    }

    #[test]
    fn formats_whole_numbers_without_fraction() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(2.5), "2.5");
    }
}
