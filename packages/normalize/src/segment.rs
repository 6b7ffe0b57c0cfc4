//! Line classification into heading, paragraph and list-item blocks.
//!
//! Each trimmed line is classified exactly once, in this order:
//! vocabulary heading, keyword heading, bullet, paragraph text. Blank
//! lines only terminate the current paragraph.

use vaill_normalize_models::{Block, NormalizerConfig};

/// Line classifier built from a [`NormalizerConfig`].
///
/// Vocabulary terms are lowercased once up front.
#[derive(Debug, Clone)]
pub struct Segmenter {
    section_headings: Vec<String>,
    heading_keyword: Option<String>,
    vocabulary_heading_max_chars: usize,
    keyword_heading_max_chars: usize,
    bullet_glyphs: Vec<char>,
}

impl Segmenter {
    #[must_use]
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            section_headings: config
                .section_headings
                .iter()
                .filter(|h| !h.is_empty())
                .map(|h| h.to_lowercase())
                .collect(),
            heading_keyword: config
                .heading_keyword
                .clone()
                .filter(|k| !k.is_empty()),
            vocabulary_heading_max_chars: config.vocabulary_heading_max_chars,
            keyword_heading_max_chars: config.keyword_heading_max_chars,
            bullet_glyphs: config.bullet_glyphs.clone(),
        }
    }

    /// Splits cleaned text into blocks.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();

            if line.is_empty() {
                flush(&mut paragraph, &mut blocks);
                continue;
            }

            if self.is_heading(line) {
                flush(&mut paragraph, &mut blocks);
                push(&mut blocks, Block::Heading(line.to_owned()));
            } else if let Some(item) = self.strip_bullet(line) {
                flush(&mut paragraph, &mut blocks);
                push(&mut blocks, Block::ListItem(item.to_owned()));
            } else {
                paragraph.push(line);
            }
        }

        flush(&mut paragraph, &mut blocks);

        log::debug!("Segmented text into {} blocks", blocks.len());
        blocks
    }

    /// A trimmed, non-blank line is a heading when it starts with a
    /// vocabulary term or with the heading keyword and is short enough.
    #[must_use]
    pub fn is_heading(&self, line: &str) -> bool {
        let chars = line.chars().count();

        if chars < self.vocabulary_heading_max_chars {
            let lower = line.to_lowercase();
            if self
                .section_headings
                .iter()
                .any(|h| lower.starts_with(h.as_str()))
            {
                return true;
            }
        }

        self.heading_keyword
            .as_deref()
            .is_some_and(|k| line.starts_with(k) && chars < self.keyword_heading_max_chars)
    }

    /// Returns the item text if `line` opens with a bullet glyph. Every
    /// leading glyph and space is removed, so `"• - item"` yields `"item"`.
    #[must_use]
    pub fn strip_bullet<'a>(&self, line: &'a str) -> Option<&'a str> {
        let first = line.chars().next()?;
        if !self.bullet_glyphs.contains(&first) {
            return None;
        }

        Some(line.trim_start_matches(|c: char| c.is_whitespace() || self.bullet_glyphs.contains(&c)))
    }
}

fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        push(blocks, Block::Paragraph(paragraph.join(" ")));
        paragraph.clear();
    }
}

fn push(blocks: &mut Vec<Block>, block: Block) {
    log::trace!("Block {}: {}", blocks.len(), AsRef::<str>::as_ref(&block));
    blocks.push(block);
}
