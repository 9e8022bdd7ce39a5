//! JSON syntax highlighting for the payload preview and solver results.

use eframe::egui::{self, Color32};
use eframe::epaint::text::{LayoutJob, TextFormat};

/// Token classes the highlighter colours differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Key,
    String,
    Number,
    Literal,
    Plain,
}

struct Palette {
    key: Color32,
    string: Color32,
    number: Color32,
    literal: Color32,
    plain: Color32,
}

impl Palette {
    fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                key: Color32::from_rgb(156, 220, 254),
                string: Color32::from_rgb(206, 145, 120),
                number: Color32::from_rgb(181, 206, 168),
                literal: Color32::from_rgb(86, 156, 214),
                plain: Color32::from_rgb(212, 212, 212),
            }
        } else {
            Self {
                key: Color32::from_rgb(0, 102, 204),
                string: Color32::from_rgb(163, 21, 21),
                number: Color32::from_rgb(100, 0, 150),
                literal: Color32::from_rgb(0, 0, 170),
                plain: Color32::BLACK,
            }
        }
    }

    fn color(&self, token: Token) -> Color32 {
        match token {
            Token::Key => self.key,
            Token::String => self.string,
            Token::Number => self.number,
            Token::Literal => self.literal,
            Token::Plain => self.plain,
        }
    }
}

/// Splits JSON text into classified spans covering the whole input.
///
/// Malformed input is still covered; anything unrecognised is plain.
fn tokenize(text: &str) -> Vec<(Token, &str)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let token = match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                i = i.min(bytes.len());
                let rest = text[i..].trim_start();
                if rest.starts_with(':') {
                    Token::Key
                } else {
                    Token::String
                }
            }
            b'-' | b'0'..=b'9' => {
                i += 1;
                while i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
                    i += 1;
                }
                Token::Number
            }
            b'a'..=b'z' => {
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                match &text[start..i] {
                    "true" | "false" | "null" => Token::Literal,
                    _ => Token::Plain,
                }
            }
            _ => {
                // Everything up to the next token start, keeping UTF-8 boundaries
                i += 1;
                while i < bytes.len() && !matches!(bytes[i], b'"' | b'-' | b'0'..=b'9' | b'a'..=b'z') {
                    i += 1;
                }
                while !text.is_char_boundary(i) {
                    i += 1;
                }
                Token::Plain
            }
        };
        spans.push((token, &text[start..i]));
    }
    spans
}

/// Highlights JSON text with syntax colouring.
pub fn highlight_json(text: &str, font_id: egui::FontId, dark_mode: bool) -> LayoutJob {
    let palette = Palette::new(dark_mode);
    let mut job = LayoutJob::default();
    for (token, span) in tokenize(text) {
        job.append(span, 0.0, TextFormat::simple(font_id.clone(), palette.color(token)));
    }
    job
}
