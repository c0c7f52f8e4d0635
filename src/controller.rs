//! Per-widget interaction state.
//!
//! A widget moves `Ready → Spinning → Revealed`. Reroll-enabled widgets may go
//! `Revealed → Spinning` again through their secondary control; the others stay
//! revealed until the page reloads. A widget with bad configuration sits in
//! `Unavailable` with every control disabled.
//!
//! The state lives in an explicit struct per widget instead of closure flags,
//! so several widgets can share a page. Presentation goes through [`Surface`].

use crate::error::{ConfigError, ControlError, ShareError};
use crate::grid::GridDims;
use crate::rng::LuckRng;
use crate::scoring::ScoredBoard;
use crate::spin::{SpinSession, Timer};
use crate::tiers::{Slope, Tier, TierTable};
use crate::variants::{Candidate, GridVariant, Selection, SpinVariant};
use serde::Serialize;
use std::future::Future;
use std::rc::Rc;

pub const SHARE_COPIED: &str = "Copied. Share the luck.";
pub const SHARE_FALLBACK: &str = "Couldn't copy. Select the text and copy it by hand.";
const UNAVAILABLE_TEXT: &str = "Out of luck: nothing to pick from.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    Ready,
    Spinning,
    Revealed,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Primary,
    Reroll,
}

/// Display regions and controls of one widget.
pub trait Surface {
    fn show_result(&mut self, text: &str);
    fn show_detail(&mut self, text: &str);
    fn show_status(&mut self, text: &str);
    /// Swatch colour and matching text colour; `None` clears both.
    fn set_accent(&mut self, accent: Option<(&str, &str)>);
    fn set_primary(&mut self, enabled: bool, label: &str);
    fn set_reroll_enabled(&mut self, enabled: bool);
}

/// Writes plain text to the system clipboard.
pub trait Clipboard {
    type Write: Future<Output = Result<(), ShareError>>;

    fn write_text(&self, text: &str) -> Self::Write;
}

/// The committed result of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub headline: String,
    pub detail: Option<String>,
    pub message: String,
    pub score: Option<i32>,
    pub accent: Option<String>,
    /// Board cell, for grid games.
    pub cell: Option<usize>,
}

/// `title\nmessage\nurl`, skipping an empty message.
pub fn share_text(outcome: &Outcome, url: &str) -> String {
    let mut lines = vec![outcome.headline.as_str()];
    if !outcome.message.is_empty() {
        lines.push(&outcome.message);
    }
    lines.push(url);
    lines.join("\n")
}

fn share_status(surface: &mut impl Surface, result: Result<(), ShareError>) -> bool {
    match result {
        Ok(()) => {
            surface.show_status(SHARE_COPIED);
            true
        }
        Err(err) => {
            log::warn!("share failed: {err}");
            surface.show_status(SHARE_FALLBACK);
            false
        }
    }
}

// ─── Slot-style widgets ─────────────────────────────────────────────────────

pub struct Controller<S: Surface> {
    variant: SpinVariant,
    candidates: Vec<Candidate>,
    state: WidgetState,
    problem: Option<ConfigError>,
    surface: S,
    rng: LuckRng,
    outcome: Option<Outcome>,
}

impl<S: Surface> Controller<S> {
    /// Build the widget. Configuration problems leave it `Unavailable` rather
    /// than failing later on a click.
    pub fn new(variant: SpinVariant, surface: S, rng: LuckRng) -> Self {
        let problem = if variant.candidates.is_empty() {
            Some(ConfigError::EmptyCandidates)
        } else {
            variant.spin.validate().err().map(ConfigError::from)
        };
        Self::build(variant, surface, rng, problem)
    }

    /// Build the widget already disabled, for problems found before it
    /// existed (an unreadable page list, say).
    pub fn unavailable(variant: SpinVariant, surface: S, rng: LuckRng, problem: ConfigError) -> Self {
        Self::build(variant, surface, rng, Some(problem))
    }

    fn build(variant: SpinVariant, mut surface: S, rng: LuckRng, problem: Option<ConfigError>) -> Self {
        let state = match &problem {
            Some(err) => {
                log::warn!("widget '{}' unavailable: {err}", variant.name);
                surface.show_result(UNAVAILABLE_TEXT);
                surface.show_status(&err.to_string());
                surface.set_primary(false, "Unavailable");
                surface.set_reroll_enabled(false);
                WidgetState::Unavailable
            }
            None => {
                surface.set_primary(true, "Spin");
                surface.set_reroll_enabled(false);
                WidgetState::Ready
            }
        };

        Self {
            candidates: variant.candidates.clone(),
            variant,
            state,
            problem,
            surface,
            rng,
            outcome: None,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Last committed outcome. Stays in place while a reroll spins.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn variant(&self) -> &SpinVariant {
        &self.variant
    }

    /// Synchronously lock the widget and start a session with its final item
    /// already drawn. The caller plays the session and hands the item to
    /// [`Controller::finish`].
    pub fn begin(&mut self, action: Action) -> Result<SpinSession<Candidate>, ControlError> {
        match (self.state, action) {
            (WidgetState::Ready, Action::Primary) => {}
            (WidgetState::Revealed, Action::Reroll) if self.variant.reroll => {}
            (WidgetState::Spinning, _) => return Err(self.reject(ControlError::Busy)),
            (WidgetState::Ready, Action::Reroll) => return Err(self.reject(ControlError::NothingToReroll)),
            (WidgetState::Revealed, Action::Reroll) => return Err(self.reject(ControlError::RerollDisabled)),
            (WidgetState::Revealed, Action::Primary) => return Err(self.reject(ControlError::Locked)),
            (WidgetState::Unavailable, _) => {
                let problem = self.problem.clone().unwrap_or(ConfigError::EmptyCandidates);
                return Err(ControlError::Unavailable(problem));
            }
        }

        // ticks walk a fresh shuffle; the final is drawn from the list as given
        let order: Rc<[Candidate]> = self.rng.shuffled(&self.candidates).into();
        let selection = &self.variant.selection;
        let candidates = &self.candidates;
        let session = SpinSession::new(order, &self.variant.spin, &mut self.rng, |rng| {
            match selection {
                Selection::Weighted(table) => table.pick(rng).clone(),
                Selection::Uniform => candidates[rng.gen_range(candidates.len())].clone(),
            }
        })?;

        self.state = WidgetState::Spinning;
        self.surface.set_primary(false, "Spinning…");
        self.surface.set_reroll_enabled(false);
        if action == Action::Primary {
            self.surface.show_detail("");
        }
        self.surface.show_status(self.variant.pending.unwrap_or(""));
        log::debug!("widget '{}' spinning ({} ticks)", self.variant.name, session.total_steps());
        Ok(session)
    }

    fn reject(&self, err: ControlError) -> ControlError {
        log::warn!("widget '{}' ignored press in {:?}: {err}", self.variant.name, self.state);
        err
    }

    /// Paint one animation frame.
    pub fn render_tick(&mut self, item: &Candidate) {
        self.surface.show_result(&item.label);
        if let Some(detail) = &item.detail {
            self.surface.show_detail(detail);
        }
        match (&item.accent, item.accent_text()) {
            (Some(bg), Some(fg)) => self.surface.set_accent(Some((bg.as_str(), fg))),
            _ => self.surface.set_accent(None),
        }
    }

    /// Commit the final item and reveal it.
    pub fn finish(&mut self, item: Candidate) -> &Outcome {
        let headline = match (item.score, self.variant.score_max) {
            (Some(score), Some(max)) => format!("{} ({score}/{max})", item.label),
            _ => item.label.clone(),
        };
        let outcome = Outcome {
            headline,
            message: self.variant.flavor.message_for(&item),
            detail: item.detail.clone(),
            score: item.score,
            accent: item.accent.clone(),
            cell: None,
        };

        self.render_tick(&item);
        self.surface.show_result(&outcome.headline);
        self.surface.show_detail(outcome.detail.as_deref().unwrap_or(""));
        self.surface.show_status(&outcome.message);
        self.surface.set_primary(false, "Spun");
        self.surface.set_reroll_enabled(self.variant.reroll);
        self.state = WidgetState::Revealed;
        log::debug!("widget '{}' revealed '{}'", self.variant.name, outcome.headline);

        self.outcome.insert(outcome)
    }

    /// `begin`, play the animation, `finish`.
    pub async fn press<M: Timer>(&mut self, action: Action, timer: &M) -> Result<&Outcome, ControlError> {
        let session = self.begin(action)?;
        let item = session.run(timer, |tick| self.render_tick(tick)).await;
        Ok(self.finish(item))
    }

    pub fn share_text(&self, url: &str) -> Result<String, ShareError> {
        self.outcome
            .as_ref()
            .map(|o| share_text(o, url))
            .ok_or(ShareError::NoOutcome)
    }

    /// Show the result of a clipboard write. Returns whether it succeeded.
    pub fn report_share(&mut self, result: Result<(), ShareError>) -> bool {
        share_status(&mut self.surface, result)
    }

    /// Copy the share text; failures end in a fallback message, never an error.
    pub async fn share<C: Clipboard>(&mut self, clipboard: &C, url: &str) -> bool {
        let result = match self.share_text(url) {
            Ok(text) => clipboard.write_text(&text).await,
            Err(err) => Err(err),
        };
        self.report_share(result)
    }
}

// ─── Lucky-tile games ───────────────────────────────────────────────────────

pub struct GridGame<S: Surface> {
    name: &'static str,
    board: Result<ScoredBoard, ConfigError>,
    tiers: TierTable,
    unlucky: Option<TierTable>,
    tiles: Vec<Candidate>,
    state: WidgetState,
    surface: S,
    outcome: Option<Outcome>,
}

impl<S: Surface> GridGame<S> {
    /// Draw the lucky (and unlucky) cells and score the board.
    pub fn new(variant: GridVariant, mut surface: S, rng: &mut LuckRng) -> Self {
        let board = variant
            .tiers
            .check_slope(Slope::Falling)
            .and_then(|()| match &variant.unlucky {
                Some(unlucky) => unlucky.check_slope(Slope::Rising),
                None => Ok(()),
            })
            .and_then(|()| {
                GridDims::new(variant.cols, variant.rows)
                    .and_then(|dims| {
                        ScoredBoard::draw(dims, variant.metric, &variant.tiers, variant.unlucky.as_ref(), rng)
                    })
                    .map_err(ConfigError::from)
            });

        let state = match &board {
            Ok(_) => {
                surface.show_status("Pick a tile.");
                surface.set_primary(true, "Pick");
                WidgetState::Ready
            }
            Err(err) => {
                log::warn!("board '{}' unavailable: {err}", variant.name);
                surface.show_result(UNAVAILABLE_TEXT);
                surface.show_status(&err.to_string());
                surface.set_primary(false, "Unavailable");
                WidgetState::Unavailable
            }
        };
        surface.set_reroll_enabled(false);

        Self {
            name: variant.name,
            board,
            tiers: variant.tiers,
            unlucky: variant.unlucky,
            tiles: variant.tiles,
            state,
            surface,
            outcome: None,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn board(&self) -> Option<&ScoredBoard> {
        self.board.as_ref().ok()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Face shown on `cell`; short tile lists repeat.
    pub fn tile(&self, cell: usize) -> String {
        match self.tiles.len() {
            0 => format!("#{}", cell + 1),
            n => self.tiles[cell % n].label.clone(),
        }
    }

    /// Tier that produced a cell's score and overlay.
    fn tier_at(&self, score: i32, overlay: &str) -> &Tier {
        self.tiers
            .tiers()
            .chain(self.unlucky.iter().flat_map(|t| t.tiers()))
            .find(|t| t.score == score && t.overlay == overlay)
            .unwrap_or_else(|| self.tiers.tier_for_score(score))
    }

    /// Reveal the tier of `cell` and lock the board.
    pub fn select(&mut self, cell: usize) -> Result<&Outcome, ControlError> {
        let board = match &self.board {
            Ok(board) => board,
            Err(problem) => return Err(ControlError::Unavailable(problem.clone())),
        };
        if self.state != WidgetState::Ready {
            log::warn!("board '{}' ignored pick of {cell}: already revealed", self.name);
            return Err(ControlError::Locked);
        }
        let cell = board.dims.check(cell)?;
        let score = board.map.score[cell];
        let tier = self.tier_at(score, &board.map.overlay[cell]);

        let outcome = Outcome {
            headline: tier.label.clone(),
            detail: Some(format!("{} • {score} pts", self.tile(cell))),
            message: tier.message.clone(),
            score: Some(score),
            accent: None,
            cell: Some(cell),
        };

        self.surface.show_result(&outcome.headline);
        self.surface.show_detail(outcome.detail.as_deref().unwrap_or(""));
        self.surface.show_status(&outcome.message);
        self.surface.set_primary(false, "Picked");
        self.state = WidgetState::Revealed;
        log::debug!("board '{}' revealed cell {cell} ({score})", self.name);

        let outcome: &Outcome = self.outcome.insert(outcome);
        Ok(outcome)
    }

    pub fn share_text(&self, url: &str) -> Result<String, ShareError> {
        self.outcome
            .as_ref()
            .map(|o| share_text(o, url))
            .ok_or(ShareError::NoOutcome)
    }

    pub fn report_share(&mut self, result: Result<(), ShareError>) -> bool {
        share_status(&mut self.surface, result)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Clipboard, Surface};
    use crate::error::ShareError;
    use std::cell::RefCell;
    use std::future::{ready, Ready};
    use std::rc::Rc;

    /// Remembers the latest value of every region.
    #[derive(Debug, Default, Clone)]
    pub struct Panel {
        pub result: String,
        pub detail: String,
        pub status: String,
        pub accent: Option<(String, String)>,
        pub primary_enabled: bool,
        pub primary_label: String,
        pub reroll_enabled: bool,
        pub results_shown: Vec<String>,
    }

    /// Shared handle so tests can look at the panel while a spin is running.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingSurface(pub Rc<RefCell<Panel>>);

    impl RecordingSurface {
        pub fn panel(&self) -> Panel {
            self.0.borrow().clone()
        }
    }

    impl Surface for RecordingSurface {
        fn show_result(&mut self, text: &str) {
            let mut p = self.0.borrow_mut();
            p.result = text.to_string();
            p.results_shown.push(text.to_string());
        }

        fn show_detail(&mut self, text: &str) {
            self.0.borrow_mut().detail = text.to_string();
        }

        fn show_status(&mut self, text: &str) {
            self.0.borrow_mut().status = text.to_string();
        }

        fn set_accent(&mut self, accent: Option<(&str, &str)>) {
            self.0.borrow_mut().accent = accent.map(|(bg, fg)| (bg.to_string(), fg.to_string()));
        }

        fn set_primary(&mut self, enabled: bool, label: &str) {
            let mut p = self.0.borrow_mut();
            p.primary_enabled = enabled;
            p.primary_label = label.to_string();
        }

        fn set_reroll_enabled(&mut self, enabled: bool) {
            self.0.borrow_mut().reroll_enabled = enabled;
        }
    }

    /// Clipboard that either accepts everything or refuses everything.
    #[derive(Default)]
    pub struct FakeClipboard {
        pub refuse: bool,
        pub written: RefCell<Vec<String>>,
    }

    impl Clipboard for FakeClipboard {
        type Write = Ready<Result<(), ShareError>>;

        fn write_text(&self, text: &str) -> Self::Write {
            if self.refuse {
                return ready(Err(ShareError::Rejected("permission denied".to_string())));
            }
            self.written.borrow_mut().push(text.to_string());
            ready(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FakeClipboard, RecordingSurface};
    use super::*;
    use crate::error::GridError;
    use crate::spin::test_support::RecordingTimer;
    use crate::spin::Step;
    use crate::variants::{grid_variant, spin_variant};
    use futures::executor::block_on;

    fn widget(name: &str, seed: u64) -> (Controller<RecordingSurface>, RecordingSurface) {
        let surface = RecordingSurface::default();
        let controller = Controller::new(spin_variant(name).unwrap(), surface.clone(), LuckRng::from_seed(seed));
        (controller, surface)
    }

    #[test]
    fn test_click_locks_before_first_tick() {
        let (mut w, surface) = widget("letter", 1);
        assert_eq!(w.state(), WidgetState::Ready);
        assert!(surface.panel().primary_enabled);

        let mut session = w.begin(Action::Primary).unwrap();
        assert_eq!(w.state(), WidgetState::Spinning);
        assert!(!surface.panel().primary_enabled);
        assert!(surface.panel().results_shown.is_empty());

        let final_item = session.final_item().clone();
        while let Some(step) = session.next_step() {
            match step {
                Step::Tick { item, .. } | Step::Settle(item) => w.render_tick(item),
            }
        }
        let outcome = w.finish(final_item.clone()).clone();

        assert_eq!(w.state(), WidgetState::Revealed);
        assert_eq!(outcome.headline, final_item.label);
        assert!(!outcome.headline.is_empty());
        assert_eq!(outcome.message, format!("{} is calling to you.", final_item.label));
        let panel = surface.panel();
        assert_eq!(panel.result, final_item.label);
        assert_eq!(panel.primary_label, "Spun");
        assert!(!panel.primary_enabled);
        assert!(!panel.reroll_enabled);
    }

    #[test]
    fn test_second_press_is_rejected_while_spinning() {
        let (mut w, _) = widget("number", 2);
        let _session = w.begin(Action::Primary).unwrap();
        assert_eq!(w.begin(Action::Primary).unwrap_err(), ControlError::Busy);
        assert_eq!(w.begin(Action::Reroll).unwrap_err(), ControlError::Busy);
    }

    #[test]
    fn test_non_reroll_widget_is_terminal() {
        let (mut w, _) = widget("luck", 3);
        let outcome = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap().clone();
        assert!(outcome.headline.ends_with("/5)"));
        assert_eq!(outcome.message, crate::variants::luck_meter_tiers().message_for(outcome.score.unwrap()));

        let timer = RecordingTimer::default();
        assert_eq!(block_on(w.press(Action::Primary, &timer)).unwrap_err(), ControlError::Locked);
        assert_eq!(block_on(w.press(Action::Reroll, &timer)).unwrap_err(), ControlError::RerollDisabled);
        assert_eq!(w.state(), WidgetState::Revealed);
        assert_eq!(w.outcome(), Some(&outcome));
    }

    #[test]
    fn test_reroll_keeps_previous_outcome_until_new_one_commits() {
        let (mut w, surface) = widget("watch", 4);
        assert_eq!(w.begin(Action::Reroll).unwrap_err(), ControlError::NothingToReroll);

        let first = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap().clone();
        assert!(surface.panel().reroll_enabled);
        assert_eq!(first.detail.as_deref().map(|d| d.contains('•')), Some(true));

        let session = w.begin(Action::Reroll).unwrap();
        assert_eq!(w.state(), WidgetState::Spinning);
        assert!(!surface.panel().reroll_enabled);
        assert_eq!(w.outcome(), Some(&first));

        let next = session.final_item().clone();
        let second = w.finish(next.clone()).clone();
        assert_eq!(second.headline, next.label);
        assert_eq!(w.outcome(), Some(&second));
        assert_eq!(w.state(), WidgetState::Revealed);
    }

    #[test]
    fn test_pending_status_shown_while_spinning() {
        let (mut w, surface) = widget("fortune", 5);
        let _session = w.begin(Action::Primary).unwrap();
        assert_eq!(surface.panel().status, "Cracking the cookie…");
    }

    #[test]
    fn test_colour_widget_paints_accent() {
        let (mut w, surface) = widget("color", 6);
        let outcome = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap().clone();
        let (bg, fg) = surface.panel().accent.unwrap();
        assert_eq!(Some(bg.clone()), outcome.accent);
        assert_eq!(fg, crate::color::readable_text_color(&bg));
    }

    #[test]
    fn test_empty_candidate_list_is_unavailable() {
        let surface = RecordingSurface::default();
        let variant = spin_variant("dinner").unwrap().with_candidates(Vec::new());
        let mut w = Controller::new(variant, surface.clone(), LuckRng::from_seed(0));

        assert_eq!(w.state(), WidgetState::Unavailable);
        let panel = surface.panel();
        assert!(!panel.primary_enabled);
        assert!(!panel.reroll_enabled);
        assert!(!panel.result.is_empty());
        assert_eq!(
            w.begin(Action::Primary).unwrap_err(),
            ControlError::Unavailable(ConfigError::EmptyCandidates)
        );
    }

    #[test]
    fn test_unreadable_page_list_is_unavailable() {
        let surface = RecordingSurface::default();
        let problem = crate::variants::parse_candidates(&mut serde_json::Deserializer::from_str(r#"[{"foo":1}]"#))
            .unwrap_err();
        let mut w = Controller::unavailable(spin_variant("dinner").unwrap(), surface.clone(), LuckRng::from_seed(0), problem);

        assert_eq!(w.state(), WidgetState::Unavailable);
        let panel = surface.panel();
        assert!(!panel.primary_enabled);
        assert!(!panel.reroll_enabled);
        assert!(!panel.result.is_empty());
        assert!(panel.status.starts_with("malformed candidate list"));
        assert!(matches!(
            w.begin(Action::Primary),
            Err(ControlError::Unavailable(ConfigError::Malformed(_)))
        ));
    }

    #[test]
    fn test_ticks_walk_a_shuffled_order() {
        let position = |label: &str| label.as_bytes()[0] - b'A';
        let mut out_of_order = 0;
        for seed in 0..10 {
            let (mut w, _) = widget("letter", seed);
            let mut session = w.begin(Action::Primary).unwrap();
            let mut labels = Vec::new();
            while let Some(Step::Tick { item, .. }) = session.next_step() {
                labels.push(item.label.clone());
            }
            assert!(labels.len() >= 18);
            let alphabetical = labels
                .windows(2)
                .all(|pair| (position(&pair[0]) + 1) % 26 == position(&pair[1]));
            if !alphabetical {
                out_of_order += 1;
            }
        }
        assert_eq!(out_of_order, 10);
    }

    #[test]
    fn test_jackpot_only_yields_known_tags() {
        for seed in 0..40 {
            let (mut w, _) = widget("jackpot", seed);
            let outcome = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap();
            assert!(["MEGA", "SUPER", "BIT", "NONE"].contains(&outcome.headline.as_str()));
        }
    }

    #[test]
    fn test_share_copies_three_lines() {
        let (mut w, surface) = widget("dinner", 7);
        let clipboard = FakeClipboard::default();
        assert!(!block_on(w.share(&clipboard, "https://example.test/luck")));
        assert_eq!(surface.panel().status, SHARE_FALLBACK);

        let outcome = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap().clone();
        assert!(block_on(w.share(&clipboard, "https://example.test/luck")));
        assert_eq!(surface.panel().status, SHARE_COPIED);
        let written = clipboard.written.borrow();
        assert_eq!(
            written[0],
            format!("{}\n{}\nhttps://example.test/luck", outcome.headline, outcome.message)
        );
    }

    #[test]
    fn test_share_failure_falls_back() {
        let (mut w, surface) = widget("number", 8);
        block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap();
        let clipboard = FakeClipboard { refuse: true, ..Default::default() };
        assert!(!block_on(w.share(&clipboard, "https://example.test")));
        assert_eq!(surface.panel().status, SHARE_FALLBACK);
        assert_eq!(w.state(), WidgetState::Revealed);
    }

    #[test]
    fn test_watch_share_has_no_message_line() {
        let (mut w, _) = widget("watch", 9);
        let outcome = block_on(w.press(Action::Primary, &RecordingTimer::default())).unwrap().clone();
        assert_eq!(outcome.message, "");
        let clipboard = FakeClipboard::default();
        assert!(block_on(w.share(&clipboard, "u")));
        assert_eq!(clipboard.written.borrow()[0], format!("{}\nu", outcome.headline));
    }

    #[test]
    fn test_share_text_skips_empty_message() {
        let outcome = Outcome {
            headline: "7".to_string(),
            detail: None,
            message: String::new(),
            score: None,
            accent: None,
            cell: None,
        };
        assert_eq!(share_text(&outcome, "u"), "7\nu");
    }

    // ─── Grid games ─────────────────────────────────────────────────────────

    #[test]
    fn test_grid_pick_locks_board() {
        let surface = RecordingSurface::default();
        let mut rng = LuckRng::from_seed(21);
        let mut game = GridGame::new(grid_variant("symbols").unwrap(), surface.clone(), &mut rng);
        assert_eq!(game.state(), WidgetState::Ready);

        let lucky = game.board().unwrap().lucky;
        let outcome = game.select(lucky).unwrap().clone();
        assert_eq!(outcome.score, Some(10));
        assert_eq!(outcome.headline, "BULLSEYE");
        assert_eq!(outcome.cell, Some(lucky));
        assert!(outcome.detail.unwrap().starts_with(&game.tile(lucky)));
        assert_eq!(surface.panel().primary_label, "Picked");

        assert_eq!(game.select(0).unwrap_err(), ControlError::Locked);
        assert_eq!(game.outcome().and_then(|o| o.cell), Some(lucky));
    }

    #[test]
    fn test_grid_rejects_out_of_range_cell() {
        let mut rng = LuckRng::from_seed(22);
        let mut game = GridGame::new(grid_variant("moods").unwrap(), RecordingSurface::default(), &mut rng);
        assert_eq!(
            game.select(40).unwrap_err(),
            ControlError::Grid(GridError::CellOutOfRange { cell: 40, count: 40 })
        );
        assert_eq!(game.state(), WidgetState::Ready);
    }

    #[test]
    fn test_grid_unlucky_cell_reads_unlucky_tier() {
        let mut rng = LuckRng::from_seed(23);
        let mut game = GridGame::new(grid_variant("hundred").unwrap(), RecordingSurface::default(), &mut rng);
        let board = game.board().unwrap().clone();
        let unlucky = board.unlucky.unwrap();
        let far = board.dims.distance(board.metric, unlucky, board.lucky);
        assert!(far >= 5, "unlucky cell should be far from lucky, got {far}");

        let outcome = game.select(unlucky).unwrap();
        assert_eq!(outcome.headline, "CURSED TILE");
        assert_eq!(outcome.score, Some(-5));
    }

    #[test]
    fn test_mood_tiles_repeat() {
        let mut rng = LuckRng::from_seed(24);
        let game = GridGame::new(grid_variant("moods").unwrap(), RecordingSurface::default(), &mut rng);
        assert_eq!(game.tile(0), game.tile(20));
        assert_eq!(game.tile(39), game.tile(19));
    }

    #[test]
    fn test_rising_lucky_tiers_make_board_unavailable() {
        let surface = RecordingSurface::default();
        let mut variant = grid_variant("symbols").unwrap();
        variant.tiers = TierTable::new(
            vec![Tier::new(1, "", "LOW", "low", 5), Tier::new(9, "", "HIGH", "high", 4)],
            Tier::new(20, "", "FLOOR", "floor", 0),
        )
        .unwrap();
        let mut game = GridGame::new(variant, surface.clone(), &mut LuckRng::from_seed(0));
        assert_eq!(game.state(), WidgetState::Unavailable);
        assert!(game.board().is_none());
        assert_eq!(
            game.select(0).unwrap_err(),
            ControlError::Unavailable(ConfigError::TierOrder { from: 1, to: 9 })
        );
    }

    #[test]
    fn test_zero_size_board_is_unavailable() {
        let surface = RecordingSurface::default();
        let mut variant = grid_variant("symbols").unwrap();
        variant.rows = 0;
        let mut game = GridGame::new(variant, surface.clone(), &mut LuckRng::from_seed(0));
        assert_eq!(game.state(), WidgetState::Unavailable);
        assert!(!surface.panel().primary_enabled);
        assert!(matches!(game.select(0), Err(ControlError::Unavailable(_))));
    }
}
