//! Incremental block cache
//!
//! Remembers the events of every top-level style rule block, keyed by the
//! text from the start of the rule through its `{`. When the same text
//! shows up again in a later parse (typically after an edit elsewhere in
//! the sheet) the parser replays the recorded events, shifted to the new
//! position, instead of parsing the block again.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::SourceLocation;
use crate::event::{Block, Declaration, Event, EventKind, MediaQuery};
use crate::selector::{Modifier, ModifierKind, PseudoArgs, Selector, SelectorPart};
use crate::token::{Token, TokenValue};

/// Blocks unused for this long are dropped
pub const MAX_DURATION: Duration = Duration::from_secs(10 * 60);
/// Minimum time between two trims
pub const TRIM_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct CachedBlock {
    /// Source text from the first selector through the closing `}`
    text: String,
    events: Vec<Event>,
    generation: u64,
    used: Instant,
    start: SourceLocation,
    /// Just past the closing `}`
    end: SourceLocation,
    /// No lint message pointed inside the block during its last run
    clean: bool,
}

/// A block being recorded
#[derive(Debug)]
struct Open {
    start: SourceLocation,
    events: Vec<Event>,
}

/// Events of a reused block, already moved to the new position
#[derive(Debug)]
pub struct Replay {
    pub events: Vec<Event>,
    /// Where parsing continues
    pub end: SourceLocation,
}

/// Cache of parsed blocks shared by successive parses of the same sheet
#[derive(Debug, Default)]
pub struct BlockCache {
    data: FxHashMap<String, Vec<CachedBlock>>,
    stack: Vec<Open>,
    generation: u64,
    last_parse: Option<Instant>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.stack.clear();
    }

    /// Number of cached blocks
    pub fn len(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of the current parse
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new parse
    pub fn begin(&mut self) {
        let now = Instant::now();
        if self.last_parse.is_some_and(|t| now.duration_since(t) >= TRIM_DELAY) {
            self.trim_at(now);
        }
        self.last_parse = Some(now);
        self.generation += 1;
        self.stack.clear();
    }

    /// Drop stale blocks and half of the blocks left over from earlier parses
    pub fn trim(&mut self) {
        self.trim_at(Instant::now());
    }

    fn trim_at(&mut self, now: Instant) {
        let generation = self.generation;
        self.data.retain(|_, blocks| {
            blocks.retain(|b| now.saturating_duration_since(b.used) <= MAX_DURATION);
            let (mut old, current): (Vec<_>, Vec<_>) =
                blocks.drain(..).partition(|b| b.generation != generation);
            old.sort_by_key(|b| (!b.clean, Reverse(b.used)));
            old.truncate(old.len() / 2);
            blocks.extend(current);
            blocks.extend(old);
            !blocks.is_empty()
        });
        debug!("block cache trimmed to {} blocks", self.len());
    }

    /// Record `event` in the innermost open block containing it
    pub fn add_event(&mut self, event: &Event) {
        if let Some(open) = self
            .stack
            .iter_mut()
            .rev()
            .find(|o| o.start.offset <= event.loc.offset)
        {
            open.events.push(event.clone());
        }
    }

    /// Start recording a block at `start`; returns its handle
    pub fn start(&mut self, start: SourceLocation) -> usize {
        self.stack.push(Open { start, events: Vec::new() });
        self.stack.len()
    }

    /// Finish the block of `handle`, closed by the `}` token `close`
    pub fn end(&mut self, handle: usize, close: &Token, input: &str) {
        if handle != self.stack.len() {
            return;
        }
        let Some(open) = self.stack.pop() else {
            return;
        };
        let Some(text) = input.get(open.start.offset..close.end) else {
            return;
        };
        let Some(brace) = text.find('{') else {
            return;
        };
        self.data.entry(text[..=brace].to_string()).or_default().push(CachedBlock {
            text: text.to_string(),
            events: open.events,
            generation: self.generation,
            used: Instant::now(),
            start: open.start,
            end: SourceLocation::new(close.line(), close.col() + 1, close.end),
            clean: true,
        });
    }

    /// Forget the block of `handle` without storing it
    pub fn cancel(&mut self, handle: usize) {
        if handle == self.stack.len() {
            self.stack.pop();
        }
    }

    /// Find a block whose text is repeated in `input` at `start`
    pub fn find(&mut self, input: &str, start: SourceLocation) -> Option<Replay> {
        let rest = input.get(start.offset..)?;
        let key = &rest[..=rest.find('{')?];
        let generation = self.generation;
        let blocks = self.data.get_mut(key)?;

        let mut found: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                rest.as_bytes().get(b.text.len().wrapping_sub(1)) == b.text.as_bytes().last()
                    && rest.starts_with(b.text.as_str())
            })
            .map(|(i, _)| i)
            .collect();
        found.sort_by_key(|&i| {
            let b = &blocks[i];
            (Reverse(b.generation), b.start.offset.abs_diff(start.offset))
        });
        let first = *found.first()?;
        // a block can be replayed only once per parse, so take an older one or copy
        let index = match found.iter().copied().find(|&i| blocks[i].generation != generation) {
            Some(i) => i,
            None => {
                let copy = blocks[first].clone();
                blocks.push(copy);
                blocks.len() - 1
            }
        };

        let block = &mut blocks[index];
        block.relocate(start);
        block.generation = generation;
        block.used = Instant::now();
        Some(Replay { events: block.events.clone(), end: block.end })
    }

    /// Mark blocks of the current parse holding any of the `(line, column)`
    /// positions as dirty, the others as clean
    pub fn feedback<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut left: Vec<(usize, usize)> = positions.into_iter().collect();
        let generation = self.generation;
        for block in self.data.values_mut().flatten() {
            if block.generation != generation {
                continue;
            }
            let from = (block.start.line, block.start.column);
            let to = (block.end.line, block.end.column);
            let before = left.len();
            left.retain(|p| !(from <= *p && *p <= to));
            block.clean = left.len() == before;
        }
    }
}

impl CachedBlock {
    fn relocate(&mut self, start: SourceLocation) {
        let d = Delta {
            line: self.start.line,
            lines: start.line as isize - self.start.line as isize,
            cols: start.column as isize - self.start.column as isize,
            offs: start.offset as isize - self.start.offset as isize,
        };
        if d.lines == 0 && d.cols == 0 && d.offs == 0 {
            return;
        }
        self.events.shift(&d);
        self.end.shift(&d);
        self.start = start;
    }
}

/// Position change of a moved block. Columns change only on the line the
/// block starts on.
#[derive(Debug, Clone, Copy)]
struct Delta {
    line: usize,
    lines: isize,
    cols: isize,
    offs: isize,
}

impl Delta {
    fn offset(&self, offset: usize) -> usize {
        offset.saturating_add_signed(self.offs)
    }
}

trait Shift {
    fn shift(&mut self, d: &Delta);
}

impl<T: Shift> Shift for Vec<T> {
    fn shift(&mut self, d: &Delta) {
        for item in self {
            item.shift(d);
        }
    }
}

impl<T: Shift> Shift for Option<T> {
    fn shift(&mut self, d: &Delta) {
        if let Some(item) = self {
            item.shift(d);
        }
    }
}

impl<T: Shift> Shift for Box<T> {
    fn shift(&mut self, d: &Delta) {
        (**self).shift(d);
    }
}

impl Shift for SourceLocation {
    fn shift(&mut self, d: &Delta) {
        if self.line == d.line {
            self.column = self.column.saturating_add_signed(d.cols);
        }
        self.line = self.line.saturating_add_signed(d.lines);
        self.offset = d.offset(self.offset);
    }
}

impl Shift for Token {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        self.end = d.offset(self.end);
        self.expr.shift(d);
    }
}

impl Shift for TokenValue {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        self.end = d.offset(self.end);
        self.parts.shift(d);
    }
}

impl Shift for Selector {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        self.end = d.offset(self.end);
        for part in &mut self.parts {
            match part {
                SelectorPart::Compound(c) => {
                    c.loc.shift(d);
                    c.end = d.offset(c.end);
                    c.modifiers.shift(d);
                }
                SelectorPart::Combinator(c) => c.loc.shift(d),
            }
        }
    }
}

impl Shift for Modifier {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        self.end = d.offset(self.end);
        if let ModifierKind::Pseudo(pseudo) = &mut self.kind {
            match &mut pseudo.args {
                Some(PseudoArgs::Nth { of, .. }) => of.shift(d),
                Some(PseudoArgs::Selectors(sels)) => sels.shift(d),
                Some(PseudoArgs::Value(value)) => value.shift(d),
                None => {}
            }
        }
    }
}

impl Shift for MediaQuery {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        self.features.shift(d);
    }
}

impl Shift for Block {
    fn shift(&mut self, d: &Delta) {
        match self {
            Block::Rule { selectors } => selectors.shift(d),
            Block::Media { media } => media.shift(d),
            Block::Document { functions } => functions.shift(d),
            Block::KeyframeRule { keys } => keys.shift(d),
            Block::Scope { start, end } => {
                start.shift(d);
                end.shift(d);
            }
            _ => {}
        }
    }
}

impl Shift for Declaration {
    fn shift(&mut self, d: &Delta) {
        self.property.shift(d);
        self.value.shift(d);
        if let Some(invalid) = &mut self.invalid {
            invalid.loc.shift(d);
        }
    }
}

impl Shift for Event {
    fn shift(&mut self, d: &Delta) {
        self.loc.shift(d);
        match &mut self.kind {
            EventKind::Start(block) | EventKind::End { block, .. } => block.shift(d),
            EventKind::Property(decl) => decl.shift(d),
            EventKind::Import { media, .. } => media.shift(d),
            EventKind::SupportsSelector { selector } => selector.shift(d),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::parser::{ParseStats, Parser, ParserOptions};

    fn run(cache: &mut BlockCache, css: &str) -> (Vec<Event>, ParseStats) {
        let grammar = Grammar::new();
        let mut events: Vec<Event> = Vec::new();
        let stats = Parser::new(&grammar, ParserOptions::default(), &mut events)
            .with_cache(cache)
            .parse(css)
            .unwrap();
        (events, stats)
    }

    fn positions(events: &[Event]) -> Vec<(usize, usize, usize)> {
        events.iter().map(|e| (e.loc.line, e.loc.column, e.loc.offset)).collect()
    }

    #[test]
    fn test_replays_moved_blocks() {
        let mut cache = BlockCache::new();
        let (_, stats) = run(&mut cache, "a{color:red}\nb{color:blue}");
        assert_eq!(stats.blocks_reused, 0);
        assert_eq!(cache.len(), 2);

        let css = "\n\n\n\na{color:red}\nb{color:blue}";
        let (events, stats) = run(&mut cache, css);
        assert_eq!(stats.blocks_reused, 2);
        assert_eq!(stats.events_replayed, 6);
        let (fresh, _) = run(&mut BlockCache::new(), css);
        assert_eq!(positions(&events), positions(&fresh));
        let decl = events.iter().find_map(Event::declaration).unwrap();
        assert_eq!((decl.property.line(), decl.property.col()), (5, 3));
        assert_eq!(decl.value.loc.offset, 12);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_columns_shift_on_first_line_only() {
        let mut cache = BlockCache::new();
        run(&mut cache, "a{\ncolor:red}");
        let (events, stats) = run(&mut cache, "  a{\ncolor:red}");
        assert_eq!(stats.blocks_reused, 1);
        assert_eq!((events[1].line(), events[1].col()), (1, 3));
        assert_eq!((events[2].line(), events[2].col()), (2, 1));
    }

    #[test]
    fn test_changed_block_is_parsed_again() {
        let mut cache = BlockCache::new();
        run(&mut cache, "a{color:red}");
        let (events, stats) = run(&mut cache, "a{color:blue}");
        assert_eq!(stats.blocks_reused, 0);
        assert_eq!(events.iter().find_map(Event::declaration).unwrap().value.text, "blue");
    }

    #[test]
    fn test_identical_blocks() {
        let mut cache = BlockCache::new();
        let css = "a{color:red} a{color:red}";
        run(&mut cache, css);
        assert_eq!(cache.len(), 2);
        let (events, stats) = run(&mut cache, css);
        assert_eq!(stats.blocks_reused, 2);
        assert_eq!(cache.len(), 2);
        let cols: Vec<usize> = events.iter().filter_map(Event::declaration).map(|d| d.property.col()).collect();
        assert_eq!(cols, [3, 16]);
    }

    #[test]
    fn test_nested_rules_belong_to_outer_block() {
        let mut cache = BlockCache::new();
        let (first, _) = run(&mut cache, "a{color:red; b{color:blue}}");
        assert_eq!(cache.len(), 1);
        let (second, stats) = run(&mut cache, "a{color:red; b{color:blue}}");
        assert_eq!(stats.events_replayed, first.len() - 2);
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn test_empty_and_broken_blocks_are_not_cached() {
        let mut cache = BlockCache::new();
        run(&mut cache, "a{} b{color:red");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_trim() {
        let mut cache = BlockCache::new();
        run(&mut cache, "a{color:red}a{color:red}a{color:red}");
        assert_eq!(cache.len(), 3);
        cache.trim();
        assert_eq!(cache.len(), 3);
        cache.generation += 1;
        cache.trim();
        assert_eq!(cache.len(), 1);
        cache.trim();
        assert!(cache.is_empty());
        run(&mut cache, "a{color:red}");
        assert_eq!(cache.len(), 1);
        cache.trim_at(Instant::now() + MAX_DURATION + Duration::from_secs(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_feedback() {
        let mut cache = BlockCache::new();
        run(&mut cache, "a{color:red}\nb{color:red}");
        cache.feedback([(2, 3)]);
        let clean: Vec<(String, bool)> = cache
            .data
            .values()
            .flatten()
            .map(|b| (b.text.clone(), b.clean))
            .collect();
        assert!(clean.contains(&("a{color:red}".to_string(), true)));
        assert!(clean.contains(&("b{color:red}".to_string(), false)));
    }
}
