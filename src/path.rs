//! SVG path data tokenizing and measurement.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html
//!
//! Only straight segments are measured. Curves and arcs are tokenized so the
//! list of skipped commands stays explicit, but they do not move the cursor
//! and add nothing to the bounds.

use crate::bbox::Bounds;

/// A path command letter, without its relative/absolute flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    /// M/m - Move to
    MoveTo,
    /// L/l - Line to
    LineTo,
    /// H/h - Horizontal line to
    HorizontalTo,
    /// V/v - Vertical line to
    VerticalTo,
    /// Z/z - Close path
    ClosePath,
    /// C/c - Cubic bezier
    CurveTo,
    /// S/s - Smooth cubic bezier
    SmoothCurveTo,
    /// Q/q - Quadratic bezier
    QuadTo,
    /// T/t - Smooth quadratic bezier
    SmoothQuadTo,
    /// A/a - Arc
    Arc,
    /// Any other letter
    Unknown(char),
}

impl PathCommand {
    pub fn from_letter(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'm' => PathCommand::MoveTo,
            'l' => PathCommand::LineTo,
            'h' => PathCommand::HorizontalTo,
            'v' => PathCommand::VerticalTo,
            'z' => PathCommand::ClosePath,
            'c' => PathCommand::CurveTo,
            's' => PathCommand::SmoothCurveTo,
            'q' => PathCommand::QuadTo,
            't' => PathCommand::SmoothQuadTo,
            'a' => PathCommand::Arc,
            _ => PathCommand::Unknown(c),
        }
    }
}

/// One command letter and every number that follows it up to the next letter.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub command: PathCommand,
    pub rel: bool,
    pub args: Vec<f64>,
}

/// Split path data into segments. Never fails: numbers before the first
/// command are dropped and unreadable characters are skipped.
pub fn tokenize_path(d: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut parser = PathParser::new(d);

    loop {
        parser.skip_whitespace_and_comma();
        let Some(c) = parser.peek() else {
            break;
        };

        if c.is_ascii_alphabetic() {
            parser.next();
            segments.push(Segment {
                command: PathCommand::from_letter(c),
                rel: c.is_ascii_lowercase(),
                args: Vec::new(),
            });
        } else {
            let before = parser.pos;
            match parser.parse_number() {
                Some(n) => {
                    if let Some(segment) = segments.last_mut() {
                        segment.args.push(n);
                    }
                }
                // An out-of-range number was consumed whole and is dropped
                None if parser.pos > before => {}
                None => {
                    parser.next();
                }
            }
        }
    }

    segments
}

/// Fold the measurable points of path data into `bounds`.
pub fn measure_path(d: &str, bounds: &mut Bounds) {
    let mut cursor = Cursor::default();

    for segment in tokenize_path(d) {
        cursor.apply(&segment, bounds);
    }
}

/// Current point and start of the current subpath.
#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
}

impl Cursor {
    fn apply(&mut self, segment: &Segment, bounds: &mut Bounds) {
        let rel = segment.rel;
        let args = &segment.args;

        match segment.command {
            PathCommand::MoveTo | PathCommand::LineTo => {
                let is_move = segment.command == PathCommand::MoveTo;
                // A dangling odd coordinate is ignored
                for (i, pair) in args.chunks_exact(2).enumerate() {
                    self.move_to(pair[0], pair[1], rel);
                    bounds.include_point(self.x, self.y);
                    if is_move && i == 0 {
                        self.start_x = self.x;
                        self.start_y = self.y;
                    }
                }
            }
            PathCommand::HorizontalTo => {
                for &x in args {
                    self.x = if rel { self.x + x } else { x };
                    bounds.include_point(self.x, self.y);
                }
            }
            PathCommand::VerticalTo => {
                for &y in args {
                    self.y = if rel { self.y + y } else { y };
                    bounds.include_point(self.x, self.y);
                }
            }
            PathCommand::ClosePath => {
                self.x = self.start_x;
                self.y = self.start_y;
                bounds.include_point(self.x, self.y);
            }
            PathCommand::CurveTo
            | PathCommand::SmoothCurveTo
            | PathCommand::QuadTo
            | PathCommand::SmoothQuadTo
            | PathCommand::Arc
            | PathCommand::Unknown(_) => {}
        }
    }

    fn move_to(&mut self, x: f64, y: f64, rel: bool) {
        if rel {
            self.x += x;
            self.y += y;
        } else {
            self.x = x;
            self.y = y;
        }
    }
}

/// Read the leading number of a length like `parseFloat` does: `"10px"` is
/// 10, `"abc"` is `None`.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let mut parser = PathParser::new(s.trim_start());
    parser.parse_number()
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse a number at the current position. When no number starts here
    /// nothing is consumed. A number that does not fit an `f64` is consumed
    /// and still gives `None`.
    fn parse_number(&mut self) -> Option<f64> {
        let start = self.pos;

        // Optional sign
        if matches!(self.peek(), Some('-' | '+')) {
            self.next();
        }

        // Integer part
        let int_digits = self.skip_digits();

        // Decimal part
        let mut frac_digits = 0;
        if self.peek() == Some('.') {
            self.next();
            frac_digits = self.skip_digits();
        }

        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return None;
        }

        // Exponent, only if digits follow
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.next();
            if matches!(self.peek(), Some('-' | '+')) {
                self.next();
            }
            if self.skip_digits() == 0 {
                self.pos = mark;
            }
        }

        self.input[start..self.pos]
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    fn skip_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next();
            count += 1;
        }
        count
    }

    fn skip_whitespace_and_comma(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_whitespace() || c == ',')
        {
            self.next();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}
