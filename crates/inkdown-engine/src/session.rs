//! The editor session: owns the document, drives the render loop, and
//! mediates between the surface and the host document owner.
//!
//! External updates are wrapped in an explicit two-mode state machine
//! instead of an ambient "updating" flag: while the session is in
//! [`Mode::ApplyingExternalUpdate`], surface-edit events are ignored so the
//! engine's own output is never misread as a fresh user edit. The host
//! signals the end of an application with [`EditorSession::external_applied`].
//!
//! Outbound `edit` notifications are debounced on a quiet period; the
//! visual re-render is synchronous and never debounced.

use std::ops::Range;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::document::Document;
use crate::extract::extract;
use crate::links::{LinkTarget, resolve_link};
use crate::position::{CursorPosition, SurfacePoint, from_position, to_position};
use crate::render::render;
use crate::surface::Surface;
use crate::toc::{Heading, extract_headings, heading_line};
use crate::transform::{InlineFormat, LineType, apply_line_type, toggle_inline_format};

/// Default quiet period before a locally-authored change is pushed out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outbound interface to the host document owner.
pub trait Host {
    /// Debounced notification that the user changed the document.
    fn edit(&mut self, content: &str);
    /// Request to open an activated link or image target.
    fn open_link(&mut self, target: LinkTarget);
}

/// Re-entrancy state for external update application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    ApplyingExternalUpdate,
}

pub struct EditorSession<H: Host> {
    document: Document,
    mode: Mode,
    /// Last content this engine itself reported to the host; used to skip
    /// echoed external updates (loop prevention).
    last_emitted: Option<String>,
    last_markup: Option<String>,
    debouncer: Debouncer<String>,
    document_dir: PathBuf,
    host: H,
}

impl<H: Host> EditorSession<H> {
    pub fn new(host: H, document_dir: PathBuf) -> Self {
        Self::with_debounce(host, document_dir, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(host: H, document_dir: PathBuf, quiet: Duration) -> Self {
        Self {
            document: Document::default(),
            mode: Mode::Idle,
            last_emitted: None,
            last_markup: None,
            debouncer: Debouncer::new(quiet),
            document_dir,
            host,
        }
    }

    /// First full render of host-provided content.
    pub fn init(&mut self, content: &str) -> String {
        tracing::debug!(bytes = content.len(), "init");
        self.document = Document::from_text(content);
        self.last_emitted = None;
        self.render_current()
    }

    /// Re-render due to an external change. Returns `None` (skip) when the
    /// content is identical to the last content this engine produced.
    ///
    /// Enters [`Mode::ApplyingExternalUpdate`]; the host must call
    /// [`Self::external_applied`] once the returned markup is in place.
    pub fn apply_external(&mut self, content: &str) -> Option<String> {
        if self.last_emitted.as_deref() == Some(content) {
            tracing::debug!("external update matches own output, skipping");
            return None;
        }
        tracing::debug!(bytes = content.len(), "applying external update");
        self.mode = Mode::ApplyingExternalUpdate;
        // A pending local edit is stale once the outside world moved on.
        self.debouncer.cancel();
        self.document = Document::from_text(content);
        Some(self.render_current())
    }

    /// Exit the external-update mode; surface edits are live again.
    pub fn external_applied(&mut self) {
        self.mode = Mode::Idle;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The user edited the surface: extract raw text, replace the whole
    /// line array, re-render synchronously, and schedule the debounced
    /// `edit` notification. Ignored while an external update is applying.
    pub fn surface_edited(&mut self, markup: &str, now: Instant) -> Option<String> {
        if self.mode == Mode::ApplyingExternalUpdate {
            tracing::trace!("surface edit ignored during external update");
            return None;
        }
        let text = extract(markup);
        self.document = Document::from_text(&text);
        self.last_emitted = Some(text.clone());
        self.debouncer.schedule(text, now);
        Some(self.render_current())
    }

    /// Fire the pending edit notification if its quiet period elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(content) = self.debouncer.poll(now) {
            tracing::debug!(bytes = content.len(), "debounced edit notification");
            self.host.edit(&content);
        }
    }

    /// Push any pending edit notification out immediately (e.g. on close).
    pub fn flush(&mut self) {
        if let Some(content) = self.debouncer.flush() {
            self.host.edit(&content);
        }
    }

    /// Convert a line's type, then re-enter the renderer.
    pub fn convert_line(&mut self, index: usize, line_type: LineType, now: Instant) -> String {
        apply_line_type(&mut self.document, index, line_type);
        self.after_local_change(now)
    }

    /// Toggle an inline format across a single-line selection, then
    /// re-enter the renderer. Returns the markup and the new selection.
    pub fn toggle_format(
        &mut self,
        index: usize,
        selection: Range<usize>,
        format: InlineFormat,
        now: Instant,
    ) -> (String, Range<usize>) {
        let new_selection = toggle_inline_format(&mut self.document, index, selection, format);
        (self.after_local_change(now), new_selection)
    }

    /// A link or image was activated. Only acts when the modifier key was
    /// held; unresolvable targets are a logged no-op.
    pub fn activate_link(&mut self, url: &str, modifier_held: bool) {
        if !modifier_held {
            return;
        }
        match resolve_link(url, &self.document_dir) {
            Ok(target) => {
                tracing::debug!(?target, "opening link");
                self.host.open_link(target);
            }
            Err(err) => tracing::debug!(%err, "link target not resolvable"),
        }
    }

    /// Heading outline for the TOC collaborator.
    pub fn headings(&self) -> Vec<Heading> {
        extract_headings(&self.document)
    }

    /// Line index of the n-th heading (TOC activation by position).
    pub fn heading_line(&self, heading_index: usize) -> Option<usize> {
        heading_line(&self.document, heading_index)
    }

    /// Map a surface caret to a structural cursor position.
    pub fn cursor_position(&self, at: SurfacePoint) -> Option<CursorPosition> {
        let surface = Surface::parse(self.last_markup.as_deref()?);
        Some(to_position(&surface, at))
    }

    /// Map a structural cursor position back onto the current surface.
    /// `None` when the line no longer exists; callers treat that as a no-op.
    pub fn cursor_point(&self, pos: CursorPosition) -> Option<SurfacePoint> {
        let surface = Surface::parse(self.last_markup.as_deref()?);
        from_position(&surface, pos)
    }

    pub fn text(&self) -> String {
        self.document.to_text()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn after_local_change(&mut self, now: Instant) -> String {
        let text = self.document.to_text();
        self.last_emitted = Some(text.clone());
        self.debouncer.schedule(text, now);
        self.render_current()
    }

    fn render_current(&mut self) -> String {
        let markup = render(&self.document);
        self.last_markup = Some(markup.clone());
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingHost {
        edits: Vec<String>,
        opened: Vec<LinkTarget>,
    }

    impl Host for RecordingHost {
        fn edit(&mut self, content: &str) {
            self.edits.push(content.to_string());
        }

        fn open_link(&mut self, target: LinkTarget) {
            self.opened.push(target);
        }
    }

    fn session() -> EditorSession<RecordingHost> {
        EditorSession::new(RecordingHost::default(), PathBuf::from("/notes"))
    }

    #[test]
    fn init_renders_the_content() {
        let mut session = session();
        let markup = session.init("# Hello");
        assert!(markup.contains("md-h1"));
        assert_eq!(session.text(), "# Hello");
    }

    #[test]
    fn surface_edit_round_trips_and_debounces() {
        let mut session = session();
        let start = Instant::now();
        let markup = session.init("one");

        let markup = session.surface_edited(&markup, start).unwrap();
        assert!(markup.contains("one"));
        // Nothing fires before the quiet period.
        session.tick(start + Duration::from_millis(100));
        assert!(session.host.edits.is_empty());
        // One notification after it.
        session.tick(start + DEFAULT_DEBOUNCE);
        assert_eq!(session.host.edits, vec!["one".to_string()]);
    }

    #[test]
    fn rapid_edits_coalesce_into_one_notification() {
        let mut session = session();
        let start = Instant::now();
        let markup = session.init("a");
        session.surface_edited(&markup, start);
        let markup = crate::render::render_text("ab");
        session.surface_edited(&markup, start + Duration::from_millis(50));
        let markup = crate::render::render_text("abc");
        session.surface_edited(&markup, start + Duration::from_millis(100));

        session.tick(start + Duration::from_millis(100) + DEFAULT_DEBOUNCE);
        assert_eq!(session.host.edits, vec!["abc".to_string()]);
    }

    #[test]
    fn external_update_matching_own_output_is_skipped() {
        let mut session = session();
        let start = Instant::now();
        let markup = session.init("draft");
        session.surface_edited(&markup, start);
        session.tick(start + DEFAULT_DEBOUNCE);

        // The host echoes the engine's own write back.
        assert_eq!(session.apply_external("draft"), None);
        // Genuinely new content still applies.
        assert!(session.apply_external("revised").is_some());
        session.external_applied();
        assert_eq!(session.text(), "revised");
    }

    #[test]
    fn surface_edits_are_ignored_while_applying_external_update() {
        let mut session = session();
        let start = Instant::now();
        session.init("original");
        let markup = session.apply_external("from outside").unwrap();

        // The surface reacting to the applied markup must not count as an
        // edit.
        assert_eq!(session.surface_edited(&markup, start), None);
        assert_eq!(session.mode(), Mode::ApplyingExternalUpdate);

        session.external_applied();
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.surface_edited(&markup, start).is_some());
    }

    #[test]
    fn external_update_cancels_pending_local_edit() {
        let mut session = session();
        let start = Instant::now();
        let markup = session.init("local");
        session.surface_edited(&markup, start);
        session.apply_external("remote wins");
        session.external_applied();

        session.tick(start + DEFAULT_DEBOUNCE * 2);
        assert!(session.host.edits.is_empty());
    }

    #[test]
    fn convert_line_rerenders_and_schedules_edit() {
        let mut session = session();
        let start = Instant::now();
        session.init("- item");
        let markup = session.convert_line(0, LineType::Code, start);
        assert!(markup.contains("md-fence"));
        assert_eq!(session.text(), "```\nitem\n```");

        session.tick(start + DEFAULT_DEBOUNCE);
        assert_eq!(session.host.edits, vec!["```\nitem\n```".to_string()]);
    }

    #[test]
    fn toggle_format_returns_markup_and_selection() {
        let mut session = session();
        session.init("word");
        let (markup, selection) =
            session.toggle_format(0, 0..4, InlineFormat::Bold, Instant::now());
        assert!(markup.contains("md-bold"));
        assert_eq!(session.text(), "**word**");
        assert_eq!(selection, 2..6);
    }

    #[test]
    fn link_activation_requires_the_modifier() {
        let mut session = session();
        session.init("[t](https://example.com)");
        session.activate_link("https://example.com", false);
        assert!(session.host.opened.is_empty());

        session.activate_link("https://example.com", true);
        assert_eq!(
            session.host.opened,
            vec![LinkTarget::Remote("https://example.com".to_string())]
        );
    }

    #[test]
    fn local_links_resolve_against_the_document_dir() {
        let mut session = session();
        session.init("[t](sub/page.md)");
        session.activate_link("sub/page.md", true);
        assert_eq!(
            session.host.opened,
            vec![LinkTarget::Local(PathBuf::from("/notes/sub/page.md"))]
        );
    }

    #[test]
    fn unresolvable_link_is_a_noop() {
        let mut session = session();
        session.init("x");
        session.activate_link("", true);
        assert!(session.host.opened.is_empty());
    }

    #[test]
    fn cursor_round_trip_through_the_session() {
        let mut session = session();
        session.init("# Title\nbody");
        let pos = CursorPosition { line: 1, offset: 2 };
        let point = session.cursor_point(pos).unwrap();
        assert_eq!(session.cursor_position(point), Some(pos));
    }

    #[test]
    fn cursor_restore_after_shrink_is_a_noop() {
        let mut session = session();
        session.init("a\nb\nc");
        session.apply_external("a");
        session.external_applied();
        assert_eq!(session.cursor_point(CursorPosition { line: 2, offset: 0 }), None);
    }

    #[test]
    fn headings_surface_through_the_session() {
        let mut session = session();
        session.init("# A\ntext\n## B");
        let headings = session.headings();
        assert_eq!(headings.len(), 2);
        assert_eq!(session.heading_line(1), Some(2));
    }

    #[test]
    fn flush_pushes_the_pending_edit_immediately() {
        let mut session = session();
        let markup = session.init("x");
        session.surface_edited(&markup, Instant::now());
        session.flush();
        assert_eq!(session.host.edits, vec!["x".to_string()]);
    }
}
