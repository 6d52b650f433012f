//! Clause segmentation.
//!
//! The segmenter walks the extracted text once, line by line, and rebuilds a
//! two-level clause hierarchy (main clause, optional sub-clause) from text
//! that has been wrapped across many physical lines.
//!
//! It is a finite-state machine over three states:
//!
//! | state            | main line                 | sub line              | other line           |
//! |------------------|---------------------------|-----------------------|----------------------|
//! | `NoContext`      | open main                 | ignored               | ignored              |
//! | `InMain`         | flush main, open main     | open sub              | append to main       |
//! | `InMainAndSub`   | flush main, open main (*) | flush sub, open sub   | append to sub        |
//!
//! (*) the open sub-clause is dropped unless
//! [`SegmentOptions::flush_dangling_subclauses`] is set.
//!
//! At the end of input the open main clause is flushed, then the open
//! sub-clause. Clauses with an empty body are never emitted.

use tracing::{debug, instrument, trace};

use crate::domain::{
    clause::{ClauseId, LineKind, StripMode},
    record::CandidateRecord,
};

/// Options controlling segmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentOptions {
    /// How main clause markers are removed from their line.
    pub strip_mode: StripMode,

    /// Emit an open sub-clause when the next main clause starts, instead of
    /// discarding it.
    pub flush_dangling_subclauses: bool,
}

/// Splits plain text into candidate clause records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    options: SegmentOptions,
}

impl Segmenter {
    /// Creates a segmenter with the given options.
    #[must_use]
    pub const fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// Segments `text` into candidate records, in emission order.
    ///
    /// Unrecognised lines are never an error; they are accumulated into the
    /// open clause or ignored if no clause is open.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn segment(&self, text: &str) -> Vec<CandidateRecord> {
        let mut scan = Scan::new(self.options);
        let mut previous = "";

        for raw in text.split('\n') {
            let line = raw.trim();
            scan.step(line, previous);
            previous = line;
        }

        let records = scan.finish();
        debug!(candidates = records.len(), "segmentation complete");
        records
    }
}

/// Whitespace-normalised text accumulated across wrapped lines.
#[derive(Debug, Default)]
struct Body(String);

impl Body {
    fn starting_with(text: &str) -> Self {
        let mut body = Self::default();
        body.push(text);
        body
    }

    fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(line);
    }
}

#[derive(Debug)]
struct OpenMain {
    id: ClauseId,
    context: String,
    body: Body,
}

#[derive(Debug)]
struct OpenSub {
    id: ClauseId,
    body: Body,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    NoContext,
    InMain(OpenMain),
    InMainAndSub(OpenMain, OpenSub),
}

/// A single pass over the input: the current state plus everything emitted
/// so far.
#[derive(Debug)]
struct Scan {
    options: SegmentOptions,
    state: State,
    records: Vec<CandidateRecord>,
}

impl Scan {
    const fn new(options: SegmentOptions) -> Self {
        Self {
            options,
            state: State::NoContext,
            records: Vec::new(),
        }
    }

    fn step(&mut self, line: &str, previous: &str) {
        let kind = LineKind::classify(line, self.options.strip_mode);
        let state = std::mem::take(&mut self.state);

        self.state = match (state, kind) {
            (State::NoContext, LineKind::Main { id, rest }) => {
                State::InMain(open_main(id, &rest, previous))
            }
            (State::NoContext, LineKind::Sub { .. } | LineKind::Other) => State::NoContext,

            (State::InMain(main), LineKind::Main { id, rest }) => {
                self.emit_main(main);
                State::InMain(open_main(id, &rest, previous))
            }
            (State::InMain(main), LineKind::Sub { id, rest }) => {
                let sub = open_sub(&main, &id, rest);
                State::InMainAndSub(main, sub)
            }
            (State::InMain(mut main), LineKind::Other) => {
                main.body.push(line);
                State::InMain(main)
            }

            (State::InMainAndSub(main, sub), LineKind::Main { id, rest }) => {
                let context = main.context.clone();
                self.emit_main(main);
                if self.options.flush_dangling_subclauses {
                    self.emit_sub(sub, context);
                } else {
                    trace!(id = %sub.id, "discarding open sub-clause");
                }
                State::InMain(open_main(id, &rest, previous))
            }
            (State::InMainAndSub(main, sub), LineKind::Sub { id, rest }) => {
                self.emit_sub(sub, main.context.clone());
                let sub = open_sub(&main, &id, rest);
                State::InMainAndSub(main, sub)
            }
            (State::InMainAndSub(main, mut sub), LineKind::Other) => {
                sub.body.push(line);
                State::InMainAndSub(main, sub)
            }
        };
    }

    fn finish(mut self) -> Vec<CandidateRecord> {
        match std::mem::take(&mut self.state) {
            State::NoContext => {}
            State::InMain(main) => self.emit_main(main),
            State::InMainAndSub(main, sub) => {
                let context = main.context.clone();
                self.emit_main(main);
                self.emit_sub(sub, context);
            }
        }
        self.records
    }

    fn emit_main(&mut self, main: OpenMain) {
        self.emit(main.context, main.id, main.body);
    }

    fn emit_sub(&mut self, sub: OpenSub, context: String) {
        self.emit(context, sub.id, sub.body);
    }

    fn emit(&mut self, context_line: String, identifier: ClauseId, body: Body) {
        if body.0.is_empty() {
            trace!(id = %identifier, "skipping clause with empty body");
            return;
        }
        self.records.push(CandidateRecord {
            context_line,
            identifier,
            body_text: body.0,
        });
    }
}

fn open_main(id: ClauseId, rest: &str, previous: &str) -> OpenMain {
    trace!(%id, "opening main clause");
    OpenMain {
        id,
        context: previous.to_string(),
        body: Body::starting_with(rest),
    }
}

fn open_sub(main: &OpenMain, sub_id: &str, rest: &str) -> OpenSub {
    let id = main.id.with_sub(sub_id);
    trace!(%id, "opening sub-clause");
    OpenSub {
        id,
        body: Body::starting_with(rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<CandidateRecord> {
        Segmenter::default().segment(text)
    }

    fn ids(records: &[CandidateRecord]) -> Vec<String> {
        records.iter().map(|r| r.identifier.to_string()).collect()
    }

    #[test]
    fn single_main_clause_takes_previous_line_as_context() {
        let records = segment("Intro line\n40. The operator must comply.\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier.to_string(), "40.");
        assert_eq!(records[0].body_text, "The operator must comply.");
        assert_eq!(records[0].context_line, "Intro line");
    }

    #[test]
    fn clause_on_first_line_has_empty_context() {
        let records = segment("40. The operator must comply.");
        assert_eq!(records[0].context_line, "");
    }

    #[test]
    fn sub_clause_gets_composite_identifier() {
        let records =
            segment("Heading\n41.—(1) General rule.\n(2) The applicant should apply within 30 days.\n");
        assert_eq!(ids(&records), ["41.—(1)", "41.—(1) (2)"]);
        assert_eq!(records[0].body_text, "General rule.");
        assert_eq!(records[1].body_text, "The applicant should apply within 30 days.");
        assert_eq!(records[1].context_line, "Heading");
    }

    #[test]
    fn text_without_markers_yields_nothing() {
        assert!(segment("Just prose.\nMore prose.\n(2) orphan sub-clause\n").is_empty());
    }

    #[test]
    fn wrapped_lines_are_joined_with_single_spaces() {
        let records = segment("40. The first line\n   wraps onto a second  \nand a third.");
        assert_eq!(records[0].body_text, "The first line wraps onto a second and a third.");
    }

    #[test]
    fn blank_lines_do_not_add_spaces() {
        let records = segment("40. First\n\n\nSecond");
        assert_eq!(records[0].body_text, "First Second");
    }

    #[test]
    fn sub_clause_accumulates_until_next_marker() {
        let text = "1. Opening text.\n(1) First sub\ncontinues here.\n(2) Second sub\n2. Next main.";
        let options = SegmentOptions {
            flush_dangling_subclauses: true,
            ..SegmentOptions::default()
        };
        let records = Segmenter::new(options).segment(text);
        assert_eq!(ids(&records), ["1. (1)", "1.", "1. (2)", "2."]);
        assert_eq!(records[0].body_text, "First sub continues here.");
        assert_eq!(records[1].body_text, "Opening text.");
    }

    #[test]
    fn lines_after_a_sub_clause_do_not_reach_the_main_body() {
        let records = segment("1. Opening.\n(1) Sub text\ntrailing words");
        assert_eq!(records[0].body_text, "Opening.");
        assert_eq!(records[1].body_text, "Sub text trailing words");
    }

    #[test]
    fn dangling_sub_clause_is_dropped_by_default() {
        let records = segment("1. Opening.\n(1) Lost sub.\n2. Next.");
        assert_eq!(ids(&records), ["1.", "2."]);
    }

    #[test]
    fn dangling_sub_clause_can_be_flushed() {
        let options = SegmentOptions {
            flush_dangling_subclauses: true,
            ..SegmentOptions::default()
        };
        let records = Segmenter::new(options).segment("Part A\n1. Opening.\n(1) Kept sub.\n2. Next.");
        assert_eq!(ids(&records), ["1.", "1. (1)", "2."]);
        assert_eq!(records[1].context_line, "Part A");
        assert_eq!(records[2].context_line, "(1) Kept sub.");
    }

    #[test]
    fn header_only_clauses_are_not_emitted() {
        let records = segment("1.\n2. Body.\n(3)\n");
        assert_eq!(ids(&records), ["2."]);
    }

    #[test]
    fn context_is_the_raw_previous_line_even_if_blank() {
        let records = segment("Heading\n\n5. Text.");
        assert_eq!(records[0].context_line, "");
    }

    #[test]
    fn identifiers_are_not_renumbered() {
        let records = segment("9. Nine.\n3. Three.\n3. Three again.");
        assert_eq!(ids(&records), ["9.", "3.", "3."]);
    }

    #[test]
    fn segmentation_is_idempotent() {
        let text = "Heading\n1. A must.\n(1) B should.\n(2) C.\nPart\n2. D shall.\nwrapped";
        assert_eq!(segment(text), segment(text));
    }

    #[test]
    fn composite_identifiers_follow_their_main_clause() {
        let text = "(1) stray\n4. Four.\n(1) a\n(2) b\n5. Five.\n(7) c\nx\n(8) d";
        let options = SegmentOptions {
            flush_dangling_subclauses: true,
            ..SegmentOptions::default()
        };
        let records = Segmenter::new(options).segment(text);
        for record in records.iter().filter(|r| r.identifier.is_composite()) {
            assert!(
                text.lines()
                    .any(|line| line.starts_with(record.identifier.main_part()))
            );
        }
        assert_eq!(ids(&records), ["4. (1)", "4.", "4. (2)", "5. (7)", "5.", "5. (8)"]);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let records = segment("Heading\r\n40. Text must\r\ncontinue.\r\n");
        assert_eq!(records[0].context_line, "Heading");
        assert_eq!(records[0].body_text, "Text must continue.");
    }
}
