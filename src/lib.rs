//! WebAssembly engine for the luck generator widgets.
//!
//! Two mechanics power every widget on the page: the decelerating spin engine
//! (`spin`) and the lucky-tile grid scoring model (`scoring`). `tiers` maps
//! scores to text, `controller` holds the per-widget state machine and
//! `variants` carries the built-in configurations.
//!
//! Board data crosses the JS boundary row-major: `score[row * cols + col]`.

pub mod color;
pub mod controller;
pub mod error;
pub mod grid;
pub mod rng;
pub mod scoring;
pub mod spin;
pub mod tiers;
pub mod variants;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::future::LocalBoxFuture;
    use futures::FutureExt;
    use js_sys::{Array, Function, Promise, Reflect};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

    use crate::controller::{Action, Clipboard, Controller, GridGame, Surface};
    use crate::error::{ConfigError, ShareError};
    use crate::grid::{GridDims, Metric};
    use crate::rng::LuckRng;
    use crate::scoring::{self, UnluckyZone};
    use crate::spin::BrowserTimer;
    use crate::tiers::{Slope, TierTable};
    use crate::variants::{self, Candidate};

    fn to_js(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn parse_metric(name: &str) -> Result<Metric, JsValue> {
        Metric::from_name(name).ok_or_else(|| JsValue::from_str(&format!("unknown metric '{name}'")))
    }

    fn busy(_: impl std::fmt::Debug) -> JsValue {
        JsValue::from_str("widget is updating its surface; call again after the callback returns")
    }

    fn optional_tiers(value: JsValue, slope: Slope) -> Result<Option<TierTable>, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        let table: TierTable = serde_wasm_bindgen::from_value(value).map_err(to_js)?;
        table.check_slope(slope).map_err(to_js)?;
        Ok(Some(table))
    }

    /// `None` when the page gave no list.
    fn page_candidates(value: JsValue) -> Result<Option<Vec<Candidate>>, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        variants::parse_candidates(serde_wasm_bindgen::Deserializer::from(value)).map(Some)
    }

    /// Page object with optional `showResult`, `showDetail`, `showStatus`,
    /// `setAccent`, `setPrimary` and `setRerollEnabled` methods.
    struct JsSurface {
        target: JsValue,
    }

    impl JsSurface {
        fn call(&self, method: &str, args: &[JsValue]) {
            let Ok(f) = Reflect::get(&self.target, &method.into()) else { return };
            let Some(f) = f.dyn_ref::<Function>() else { return };
            let argv: Array = args.iter().collect();
            if let Err(err) = f.apply(&self.target, &argv) {
                log::warn!("surface.{method} threw: {err:?}");
            }
        }
    }

    impl Surface for JsSurface {
        fn show_result(&mut self, text: &str) {
            self.call("showResult", &[text.into()]);
        }

        fn show_detail(&mut self, text: &str) {
            self.call("showDetail", &[text.into()]);
        }

        fn show_status(&mut self, text: &str) {
            self.call("showStatus", &[text.into()]);
        }

        fn set_accent(&mut self, accent: Option<(&str, &str)>) {
            match accent {
                Some((bg, fg)) => self.call("setAccent", &[bg.into(), fg.into()]),
                None => self.call("setAccent", &[JsValue::NULL, JsValue::NULL]),
            }
        }

        fn set_primary(&mut self, enabled: bool, label: &str) {
            self.call("setPrimary", &[enabled.into(), label.into()]);
        }

        fn set_reroll_enabled(&mut self, enabled: bool) {
            self.call("setRerollEnabled", &[enabled.into()]);
        }
    }

    /// `navigator.clipboard.writeText`, looked up at call time.
    struct JsClipboard;

    impl Clipboard for JsClipboard {
        type Write = LocalBoxFuture<'static, Result<(), ShareError>>;

        fn write_text(&self, text: &str) -> Self::Write {
            let text = JsValue::from_str(text);
            async move {
                let lookup = |target: &JsValue, key: &str| {
                    Reflect::get(target, &key.into())
                        .ok()
                        .filter(|v| !v.is_undefined() && !v.is_null())
                };
                let clipboard = lookup(js_sys::global().as_ref(), "navigator")
                    .and_then(|nav| lookup(&nav, "clipboard"))
                    .ok_or(ShareError::Unsupported)?;
                let write = lookup(&clipboard, "writeText")
                    .and_then(|f| f.dyn_into::<Function>().ok())
                    .ok_or(ShareError::Unsupported)?;
                let promise = write
                    .call1(&clipboard, &text)
                    .map_err(|e| ShareError::Rejected(format!("{e:?}")))?
                    .dyn_into::<Promise>()
                    .map_err(|_| ShareError::Unsupported)?;
                JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|e| ShareError::Rejected(format!("{e:?}")))
            }
            .boxed_local()
        }
    }

    /// Grade a board. Returns `{ score: number[], overlay: string[] }`.
    #[wasm_bindgen(js_name = "buildScoreMap")]
    pub fn wasm_build_score_map(
        cols: usize,
        rows: usize,
        metric: &str,
        lucky: usize,
        unlucky: Option<u32>,
        lucky_tiers: JsValue,
        unlucky_tiers: JsValue,
    ) -> Result<JsValue, JsValue> {
        let dims = GridDims::new(cols, rows).map_err(to_js)?;
        let metric = parse_metric(metric)?;
        let tiers = optional_tiers(lucky_tiers, Slope::Falling)?.unwrap_or_else(variants::hundred_grid_tiers);
        let unlucky_table = optional_tiers(unlucky_tiers, Slope::Rising)?.unwrap_or_else(variants::unlucky_tiers);
        let zone = unlucky.map(|cell| UnluckyZone { cell: cell as usize, tiers: &unlucky_table });

        let map = scoring::build_score_map(dims, metric, lucky, zone, &tiers).map_err(to_js)?;
        serde_wasm_bindgen::to_value(&map).map_err(to_js)
    }

    /// Cells at maximum distance from `cell`.
    #[wasm_bindgen(js_name = "farthestCells")]
    pub fn wasm_farthest_cells(cols: usize, rows: usize, metric: &str, cell: usize) -> Result<Vec<u32>, JsValue> {
        let dims = GridDims::new(cols, rows).map_err(to_js)?;
        let far = scoring::farthest_cells(dims, parse_metric(metric)?, cell).map_err(to_js)?;
        Ok(far.into_iter().map(|c| c as u32).collect())
    }

    #[wasm_bindgen(js_name = "readableTextColor")]
    pub fn wasm_readable_text_color(hex: &str) -> String {
        crate::color::readable_text_color(hex).to_string()
    }

    /// One slot-style widget bound to a page surface.
    ///
    /// Surface callbacks run while the widget is updating. Calling back into
    /// the widget from one of them returns an error instead of re-entering.
    #[wasm_bindgen]
    pub struct SpinWidget {
        inner: Rc<RefCell<Controller<JsSurface>>>,
    }

    impl SpinWidget {
        fn start(&self, action: Action) -> Result<(), JsValue> {
            // locks the widget before the first tick is scheduled
            let session = self.inner.try_borrow_mut().map_err(busy)?.begin(action).map_err(to_js)?;
            let inner = self.inner.clone();
            spawn_local(async move {
                let item = session
                    .run(&BrowserTimer, |tick| inner.borrow_mut().render_tick(tick))
                    .await;
                inner.borrow_mut().finish(item);
            });
            Ok(())
        }
    }

    #[wasm_bindgen]
    impl SpinWidget {
        /// `candidates` is optional; when given it replaces the built-in list.
        #[wasm_bindgen(constructor)]
        pub fn new(variant: &str, surface: JsValue, candidates: JsValue) -> Result<SpinWidget, JsValue> {
            let config = variants::spin_variant(variant).map_err(to_js)?;
            let surface = JsSurface { target: surface };
            let controller = match page_candidates(candidates) {
                Ok(Some(list)) => Controller::new(config.with_candidates(list), surface, LuckRng::new()),
                Ok(None) => Controller::new(config, surface, LuckRng::new()),
                Err(problem) => Controller::unavailable(config, surface, LuckRng::new(), problem),
            };
            Ok(SpinWidget { inner: Rc::new(RefCell::new(controller)) })
        }

        pub fn press(&self) -> Result<(), JsValue> {
            self.start(Action::Primary)
        }

        pub fn reroll(&self) -> Result<(), JsValue> {
            self.start(Action::Reroll)
        }

        /// Resolves to `true` when the summary reached the clipboard.
        pub fn share(&self, url: String) -> Promise {
            let inner = self.inner.clone();
            future_to_promise(async move {
                let text = inner.try_borrow().map_err(busy)?.share_text(&url);
                let result = match text {
                    Ok(text) => JsClipboard.write_text(&text).await,
                    Err(err) => Err(err),
                };
                let copied = inner.try_borrow_mut().map_err(busy)?.report_share(result);
                Ok(JsValue::from_bool(copied))
            })
        }

        pub fn state(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(&self.inner.try_borrow().map_err(busy)?.state()).map_err(to_js)
        }

        pub fn outcome(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(&self.inner.try_borrow().map_err(busy)?.outcome()).map_err(to_js)
        }
    }

    /// One lucky-tile board bound to a page surface. Same re-entry rule as
    /// [`SpinWidget`].
    #[wasm_bindgen]
    pub struct GridWidget {
        inner: Rc<RefCell<GridGame<JsSurface>>>,
    }

    #[wasm_bindgen]
    impl GridWidget {
        #[wasm_bindgen(constructor)]
        pub fn new(variant: &str, surface: JsValue) -> Result<GridWidget, JsValue> {
            let config = variants::grid_variant(variant).map_err(to_js)?;
            let game = GridGame::new(config, JsSurface { target: surface }, &mut LuckRng::new());
            Ok(GridWidget { inner: Rc::new(RefCell::new(game)) })
        }

        pub fn select(&self, cell: usize) -> Result<JsValue, JsValue> {
            let mut game = self.inner.try_borrow_mut().map_err(busy)?;
            let outcome = game.select(cell).map_err(to_js)?;
            serde_wasm_bindgen::to_value(outcome).map_err(to_js)
        }

        /// Tile face for `cell`.
        pub fn tile(&self, cell: usize) -> Result<String, JsValue> {
            Ok(self.inner.try_borrow().map_err(busy)?.tile(cell))
        }

        /// Full `{ score, overlay }` map, for painting the board after a pick.
        #[wasm_bindgen(js_name = "scoreMap")]
        pub fn score_map(&self) -> Result<JsValue, JsValue> {
            let game = self.inner.try_borrow().map_err(busy)?;
            let board = game.board().ok_or_else(|| JsValue::from_str("board unavailable"))?;
            serde_wasm_bindgen::to_value(&board.map).map_err(to_js)
        }

        pub fn share(&self, url: String) -> Promise {
            let inner = self.inner.clone();
            future_to_promise(async move {
                let text = inner.try_borrow().map_err(busy)?.share_text(&url);
                let result = match text {
                    Ok(text) => JsClipboard.write_text(&text).await,
                    Err(err) => Err(err),
                };
                let copied = inner.try_borrow_mut().map_err(busy)?.report_share(result);
                Ok(JsValue::from_bool(copied))
            })
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "luck engine ready".to_string()
    }
}
