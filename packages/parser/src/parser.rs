use crate::ast::{AttributeMap, BlockRecord};
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IDGenerator;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const BLOCK_PREFIX: &str = "blk:";
const CLOSE_PREFIX: &str = "/blk:";

/// Parse block markup into records, assigning identities from `ids`.
///
/// The generator is owned by the caller so identities stay unique across
/// every parse performed for the same editing session.
pub fn parse(source: &str, ids: &mut IDGenerator) -> ParseResult<Vec<BlockRecord>> {
    Parser::new(source, ids).parse_document()
}

/// Parser for comment-delimited block markup.
///
/// Grammar:
///
/// ```text
/// <!-- blk:ns/kind {"attr":1} -->own markup ...children...<!-- /blk:ns/kind -->
/// <!-- blk:ns/kind {"attr":1} /-->
/// ```
///
/// A block's own markup is the concatenation of the text directly inside
/// its body; nested delimiter pairs parse into `children`. HTML comments
/// that are not block delimiters stay part of the markup verbatim. Text
/// between top-level blocks carries no block data and is skipped.
pub struct Parser<'src, 'ids> {
    source: &'src str,
    pos: usize,
    ids: &'ids mut IDGenerator,
}

struct Comment<'src> {
    start: usize,
    end: usize,
    inner: &'src str,
}

enum Delimiter {
    Open {
        type_name: String,
        attributes: AttributeMap,
        self_closing: bool,
    },
    Close {
        type_name: String,
    },
    /// An ordinary HTML comment, not a block delimiter.
    Plain,
}

impl<'src, 'ids> Parser<'src, 'ids> {
    pub fn new(source: &'src str, ids: &'ids mut IDGenerator) -> Self {
        Self {
            source,
            pos: 0,
            ids,
        }
    }

    /// Parse the top-level block sequence.
    pub fn parse_document(&mut self) -> ParseResult<Vec<BlockRecord>> {
        let mut roots = Vec::new();

        while let Some(comment) = self.next_comment()? {
            match self.classify(&comment)? {
                Delimiter::Plain => {
                    self.pos = comment.end;
                }
                Delimiter::Close { type_name } => {
                    return Err(ParseError::unexpected_close(comment.start, type_name));
                }
                Delimiter::Open {
                    type_name,
                    attributes,
                    self_closing,
                } => {
                    self.pos = comment.end;
                    roots.push(self.finish_block(
                        comment.start,
                        type_name,
                        attributes,
                        self_closing,
                    )?);
                }
            }
        }

        Ok(roots)
    }

    fn finish_block(
        &mut self,
        open_pos: usize,
        type_name: String,
        attributes: AttributeMap,
        self_closing: bool,
    ) -> ParseResult<BlockRecord> {
        let identity = self.ids.new_id();

        if self_closing {
            return Ok(BlockRecord::new(type_name, identity, attributes, ""));
        }

        let (markup, children) = self.parse_body(open_pos, &type_name)?;
        Ok(BlockRecord::new(type_name, identity, attributes, markup).with_children(children))
    }

    /// Consume a block body up to and including its closing delimiter.
    fn parse_body(
        &mut self,
        open_pos: usize,
        open_name: &str,
    ) -> ParseResult<(String, Vec<BlockRecord>)> {
        let mut markup = String::new();
        let mut children = Vec::new();

        loop {
            let Some(comment) = self.next_comment()? else {
                return Err(ParseError::unclosed_block(open_pos, open_name));
            };
            let text = &self.source[self.pos..comment.start];

            match self.classify(&comment)? {
                Delimiter::Plain => {
                    markup.push_str(text);
                    markup.push_str(&self.source[comment.start..comment.end]);
                    self.pos = comment.end;
                }
                Delimiter::Close { type_name } => {
                    if type_name != open_name {
                        return Err(ParseError::mismatched_close(
                            comment.start,
                            open_name,
                            type_name,
                        ));
                    }
                    markup.push_str(text);
                    self.pos = comment.end;
                    return Ok((markup, children));
                }
                Delimiter::Open {
                    type_name,
                    attributes,
                    self_closing,
                } => {
                    markup.push_str(text);
                    self.pos = comment.end;
                    children.push(self.finish_block(
                        comment.start,
                        type_name,
                        attributes,
                        self_closing,
                    )?);
                }
            }
        }
    }

    fn next_comment(&self) -> ParseResult<Option<Comment<'src>>> {
        let Some(offset) = self.source[self.pos..].find(COMMENT_OPEN) else {
            return Ok(None);
        };
        let start = self.pos + offset;
        let inner_start = start + COMMENT_OPEN.len();

        let Some(close_offset) = self.source[inner_start..].find(COMMENT_CLOSE) else {
            return Err(ParseError::unterminated_delimiter(start));
        };
        let inner_end = inner_start + close_offset;

        Ok(Some(Comment {
            start,
            end: inner_end + COMMENT_CLOSE.len(),
            inner: &self.source[inner_start..inner_end],
        }))
    }

    fn classify(&self, comment: &Comment<'src>) -> ParseResult<Delimiter> {
        let inner = comment.inner.trim();

        if let Some(rest) = inner.strip_prefix(CLOSE_PREFIX) {
            let type_name = rest.trim();
            if type_name.is_empty() {
                return Err(ParseError::missing_type_name(comment.start));
            }
            return Ok(Delimiter::Close {
                type_name: type_name.to_string(),
            });
        }

        let Some(rest) = inner.strip_prefix(BLOCK_PREFIX) else {
            return Ok(Delimiter::Plain);
        };

        let (rest, self_closing) = match rest.strip_suffix('/') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (rest, false),
        };
        let rest = rest.trim();

        // Type name runs to the first whitespace; the remainder is the
        // attribute object.
        let (type_name, attr_src) = match rest.find(char::is_whitespace) {
            Some(split) => (&rest[..split], rest[split..].trim()),
            None => (rest, ""),
        };
        if type_name.is_empty() {
            return Err(ParseError::missing_type_name(comment.start));
        }

        let attributes = if attr_src.is_empty() {
            AttributeMap::new()
        } else {
            serde_json::from_str(attr_src)
                .map_err(|e| ParseError::invalid_attributes(comment.start, e.to_string()))?
        };

        Ok(Delimiter::Open {
            type_name: type_name.to_string(),
            attributes,
            self_closing,
        })
    }
}
