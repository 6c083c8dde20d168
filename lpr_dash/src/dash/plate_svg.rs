use std::fmt::Write;

use log::warn;

pub const PLATE_TEMPLATE: &str = "/assets/plates/plate_template.svg";
pub const LETTERS_PATH: &str = "/assets/plates/letters";
pub const NUMBERS_PATH: &str = "/assets/plates/numbers";

pub const PLATE_WIDTH: f64 = 260.0;
pub const PLATE_HEIGHT: f64 = 55.0;
pub const CHAR_WIDTH: f64 = 18.0;
pub const CHAR_HEIGHT: f64 = 27.0;
pub const CHAR_SPACING: f64 = 2.0;
/// 字符相对垂直居中再往下的偏移
const CHAR_Y_OFFSET: f64 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub href: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlateLayout {
    pub start_x: f64,
    pub glyphs: Vec<Glyph>,
    /// 不在 [A-Z0-9] 内, 没有对应字符图片
    pub skipped: Vec<char>,
}

/// 字符按位置排布, 跳过的字符仍占一个位置
pub fn plate_glyphs(plate: &str) -> PlateLayout {
    let chars: Vec<char> = plate.to_uppercase().chars().collect();
    let total = chars.len() as f64;

    let content_width = CHAR_WIDTH * total + CHAR_SPACING * (total - 1.0);
    let start_x = (PLATE_WIDTH - content_width) / 2.0;
    let y = (PLATE_HEIGHT - CHAR_HEIGHT) / 2.0 + CHAR_Y_OFFSET;

    let mut glyphs = Vec::with_capacity(chars.len());
    let mut skipped = Vec::new();

    for (i, ch) in chars.into_iter().enumerate() {
        let href = if ch.is_ascii_uppercase() {
            format!("{}/{}.svg", LETTERS_PATH, ch)
        } else if ch.is_ascii_digit() {
            format!("{}/{}.svg", NUMBERS_PATH, ch)
        } else {
            warn!("plate_svg, invalid plate char: {:?}, plate: {}", ch, plate);
            skipped.push(ch);
            continue;
        };

        glyphs.push(Glyph {
            ch,
            href,
            x: start_x + i as f64 * (CHAR_WIDTH + CHAR_SPACING),
            y,
        });
    }

    PlateLayout {
        start_x,
        glyphs,
        skipped,
    }
}

pub fn render_plate_svg(plate: &str) -> String {
    let layout = plate_glyphs(plate);

    let mut svg = String::with_capacity(256 + layout.glyphs.len() * 128);
    let _ = write!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#, PLATE_WIDTH, PLATE_HEIGHT);
    let _ = write!(svg, r#"<image href="{}" x="0" y="0" width="{}" height="{}" />"#, PLATE_TEMPLATE, PLATE_WIDTH, PLATE_HEIGHT);

    for g in layout.glyphs.iter() {
        let _ = write!(svg, r#"<image class="letters" href="{}" x="{}" y="{}" width="{}" height="{}" />"#,
                       g.href, g.x, g.y, CHAR_WIDTH, CHAR_HEIGHT);
    }

    svg.push_str("</svg>");
    svg
}
