//! Built-in widget configurations.
//!
//! Each widget on the page differs only in data: its spin curve, candidate
//! list, how the final pick is drawn and the text shown afterwards. Grid games
//! supply board size, metric and tier tables. The candidate lists here are the
//! fallbacks used when the page does not provide its own.

use crate::color::readable_text_color;
use crate::error::ConfigError;
use crate::grid::Metric;
use crate::spin::SpinConfig;
use crate::tiers::{Tier, TierTable, WeightedTable};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A display item: primary label plus optional secondary text.
///
/// Pages pass either bare strings or records. Watch-list records carry `type`
/// and `year`, which make up the detail line when `meta` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageItem")]
pub struct Candidate {
    pub label: String,
    pub detail: Option<String>,
    /// `#rrggbb` swatch, for the colour widget.
    pub accent: Option<String>,
    pub score: Option<i32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageItem {
    Text(String),
    Record(PageRecord),
}

#[derive(Deserialize)]
struct PageRecord {
    #[serde(alias = "title", alias = "name")]
    label: String,
    #[serde(default, alias = "meta")]
    detail: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    year: Option<Year>,
    #[serde(default, alias = "hex")]
    accent: Option<String>,
    #[serde(default)]
    score: Option<i32>,
}

/// `1987` or `"2004–2007"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Year {
    Number(f64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{n}"),
            Year::Text(s) => f.write_str(s),
        }
    }
}

impl From<PageItem> for Candidate {
    fn from(item: PageItem) -> Self {
        let record = match item {
            PageItem::Text(label) => return Candidate::text(label),
            PageItem::Record(record) => record,
        };
        let detail = record.detail.or_else(|| {
            let parts: Vec<String> = record
                .kind
                .into_iter()
                .chain(record.year.map(|y| y.to_string()))
                .filter(|part| !part.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" • "))
        });
        Candidate { label: record.label, detail, accent: record.accent, score: record.score }
    }
}

/// Read a page-supplied candidate list. Anything unreadable is a
/// configuration problem for the widget, not an exception for the page.
pub fn parse_candidates<'de, D: Deserializer<'de>>(list: D) -> Result<Vec<Candidate>, ConfigError> {
    Vec::<Candidate>::deserialize(list).map_err(|err| ConfigError::Malformed(err.to_string()))
}

impl Candidate {
    pub fn text(label: impl Into<String>) -> Self {
        Self { label: label.into(), detail: None, accent: None, score: None }
    }

    pub fn with_detail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { detail: Some(detail.into()), ..Self::text(label) }
    }

    /// Text colour to pair with the accent, if any.
    pub fn accent_text(&self) -> Option<&'static str> {
        self.accent.as_deref().map(readable_text_color)
    }
}

/// How the final item is drawn.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Uniform over the candidate list.
    Uniform,
    /// Categorical over the listed items; they also make up the spin list.
    Weighted(WeightedTable<Candidate>),
}

/// Text shown under the result once the spin settles.
#[derive(Debug, Clone)]
pub enum Flavor {
    Fixed(&'static str),
    /// `{label}` is replaced by the result label.
    Template(&'static str),
    /// Looked up by the result's score.
    Tiered(TierTable),
}

impl Flavor {
    pub fn message_for(&self, item: &Candidate) -> String {
        match self {
            Flavor::Fixed(text) => text.to_string(),
            Flavor::Template(text) => text.replace("{label}", &item.label),
            Flavor::Tiered(table) => match item.score {
                Some(score) => table.message_for(score).to_string(),
                None => table.floor().message.clone(),
            },
        }
    }
}

/// Everything that distinguishes one slot-style widget from another.
#[derive(Debug, Clone)]
pub struct SpinVariant {
    pub name: &'static str,
    pub spin: SpinConfig,
    pub candidates: Vec<Candidate>,
    pub selection: Selection,
    /// Status line while spinning.
    pub pending: Option<&'static str>,
    pub flavor: Flavor,
    /// When set, the headline reads `LABEL (score/max)`.
    pub score_max: Option<i32>,
    pub reroll: bool,
}

impl SpinVariant {
    /// Swap in a page-provided list. Weighted variants keep their own items.
    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        if matches!(self.selection, Selection::Uniform) {
            self.candidates = candidates;
        }
        self
    }
}

/// Everything that distinguishes one lucky-tile board from another.
#[derive(Debug, Clone)]
pub struct GridVariant {
    pub name: &'static str,
    pub cols: usize,
    pub rows: usize,
    pub metric: Metric,
    pub tiers: TierTable,
    pub unlucky: Option<TierTable>,
    /// Tile faces, repeated to fill the board.
    pub tiles: Vec<Candidate>,
}

// ─── Spin widgets ───────────────────────────────────────────────────────────

pub const DEFAULT_SPIN: SpinConfig = SpinConfig::new(18, 28, 35, 7);
pub const LUCK_SPIN: SpinConfig = SpinConfig::new(20, 32, 35, 8);
pub const DINNER_SPIN: SpinConfig = SpinConfig::new(18, 26, 28, 6);
pub const WATCH_SPIN: SpinConfig = SpinConfig::new(22, 34, 25, 7);
pub const FORTUNE_SPIN: SpinConfig = SpinConfig::new(16, 24, 28, 6);

pub const SPIN_VARIANTS: &[&str] = &[
    "luck", "number", "letter", "color", "emoji", "dinner", "watch", "fortune", "jackpot",
];
pub const GRID_VARIANTS: &[&str] = &["symbols", "moods", "hundred"];

fn tier(score: i32, label: &str, message: &str) -> Tier {
    Tier::new(score, "", label, message, 0)
}

/// Luck meter outcomes, best first. Index doubles as "steps below the top".
pub fn luck_meter_tiers() -> TierTable {
    TierTable::builtin(
        vec![
            tier(5, "MEGA LUCKY DAY", "Green lights. Say yes to the good stuff."),
            tier(4, "VERY LUCKY DAY", "Nice tailwind. Take one confident swing."),
            tier(3, "LUCK IS AROUND YOU", "Not perfect, but things can click for you today."),
            tier(2, "LOW FRICTION DAY", "Nothing dramatic. Just a smoother ride."),
            tier(1, "MAKE YOUR OWN LUCK DAY", "Create the luck. Keep it simple and steady."),
        ],
        tier(0, "NOT MUCH LUCK TODAY", "Play it safe. Tomorrow is a new roll."),
    )
}

/// Tag weights for the jackpot widget.
pub fn luck_tier_weights() -> WeightedTable<&'static str> {
    WeightedTable::builtin(vec![("MEGA", 1), ("SUPER", 3), ("BIT", 6), ("NONE", 6)])
}

fn jackpot_tiers() -> TierTable {
    TierTable::builtin(
        vec![
            tier(3, "MEGA", "The jackpot lights are on. Go big."),
            tier(2, "SUPER", "Strong luck. Use it on something that matters."),
            tier(1, "BIT", "A little sparkle. Enough for a small win."),
        ],
        tier(0, "NONE", "The machine is resting. Try again tomorrow."),
    )
}

fn jackpot_selection() -> Selection {
    let tiers = jackpot_tiers();
    let weighted = luck_tier_weights()
        .entries()
        .iter()
        .map(|&(tag, weight)| {
            let score = tiers.tiers().find(|t| t.label == tag).map(|t| t.score);
            (Candidate { score, ..Candidate::text(tag) }, weight)
        })
        .collect();
    Selection::Weighted(WeightedTable::builtin(weighted))
}

pub fn colors() -> Vec<Candidate> {
    [
        ("Emerald", "#55be0a"),
        ("Violet", "#875da6"),
        ("Ocean", "#1677ff"),
        ("Sunset", "#ff6a3d"),
        ("Gold", "#f5c542"),
        ("Rose", "#ff4d8d"),
        ("Mint", "#2dd4bf"),
        ("Midnight", "#111827"),
    ]
    .iter()
    .map(|&(name, hex)| Candidate {
        accent: Some(hex.to_string()),
        ..Candidate::text(format!("{name} {hex}"))
    })
    .collect()
}

fn texts(items: &[&str]) -> Vec<Candidate> {
    items.iter().map(|s| Candidate::text(*s)).collect()
}

fn watch_fallback() -> Vec<Candidate> {
    [
        ("The Matrix", "Movie", "1999"),
        ("Heat", "Movie", "1995"),
        ("The Office (US)", "TV", "2005–2013"),
        ("Severance", "TV", "2022–"),
    ]
    .iter()
    .map(|&(title, kind, year)| Candidate::with_detail(title, format!("{kind} • {year}")))
    .collect()
}

/// Look up a slot-style widget by name.
pub fn spin_variant(name: &str) -> Result<SpinVariant, ConfigError> {
    let base = |name: &'static str,
                spin: SpinConfig,
                candidates: Vec<Candidate>,
                pending: Option<&'static str>,
                flavor: Flavor,
                reroll: bool| SpinVariant {
        name,
        spin,
        candidates,
        selection: Selection::Uniform,
        pending,
        flavor,
        score_max: None,
        reroll,
    };

    let variant = match name {
        "luck" => {
            let tiers = luck_meter_tiers();
            let candidates = tiers
                .tiers()
                .map(|t| Candidate { score: Some(t.score), ..Candidate::text(t.label.clone()) })
                .collect();
            SpinVariant {
                score_max: Some(5),
                ..base("luck", LUCK_SPIN, candidates, Some("Consulting the cosmos…"), Flavor::Tiered(tiers), false)
            }
        }
        "number" => {
            let digits = (0..10).map(|d| Candidate::text(d.to_string())).collect();
            base("number", DEFAULT_SPIN, digits, None, Flavor::Fixed("Good luck."), false)
        }
        "letter" => {
            let letters: Vec<Candidate> = ('A'..='Z').map(|c| Candidate::text(c.to_string())).collect();
            base("letter", DEFAULT_SPIN, letters, None, Flavor::Template("{label} is calling to you."), false)
        }
        "color" => base("color", DEFAULT_SPIN, colors(), None, Flavor::Fixed("Wear it. Notice it. Use it."), false),
        "emoji" => base(
            "emoji",
            DEFAULT_SPIN,
            texts(&["✨", "🍀", "🔥", "🧠", "🫶", "😌", "😤", "😵‍💫", "🥳", "🤝", "☕", "🏠", "🐶", "🐱", "🪩", "🧊"]),
            None,
            Flavor::Fixed("This one is yours today."),
            false,
        ),
        "dinner" => base(
            "dinner",
            DINNER_SPIN,
            texts(&["Tacos", "Pizza", "Burgers", "Pasta", "Sushi"]),
            Some("Choosing…"),
            Flavor::Fixed("Keep it simple tonight."),
            true,
        ),
        "watch" => base(
            "watch",
            WATCH_SPIN,
            watch_fallback(),
            Some("Scanning the archives…"),
            Flavor::Fixed(""),
            true,
        ),
        "fortune" => base(
            "fortune",
            FORTUNE_SPIN,
            texts(&[
                "Luck likes motion.",
                "Small steps still count.",
                "Good timing finds you when you are ready.",
                "A little risk clears the fog.",
                "You are closer than you think.",
            ]),
            Some("Cracking the cookie…"),
            Flavor::Fixed(""),
            true,
        ),
        "jackpot" => {
            let selection = jackpot_selection();
            let candidates = match &selection {
                Selection::Weighted(table) => table.entries().iter().map(|(c, _)| c.clone()).collect(),
                Selection::Uniform => Vec::new(),
            };
            SpinVariant {
                selection,
                ..base("jackpot", LUCK_SPIN, candidates, Some("Pulling the lever…"), Flavor::Tiered(jackpot_tiers()), false)
            }
        }
        other => return Err(ConfigError::UnknownVariant(other.to_string())),
    };
    Ok(variant)
}

// ─── Grid games ─────────────────────────────────────────────────────────────

/// Square rings around the lucky symbol.
pub fn symbol_grid_tiers() -> TierTable {
    TierTable::builtin(
        vec![
            Tier::new(10, "bullseye", "BULLSEYE", "You found the lucky symbol.", 5),
            Tier::new(8, "hot", "SO CLOSE", "The lucky symbol is right next door.", 4),
            Tier::new(6, "warm", "WARM", "Luck is in the neighbourhood.", 4),
        ],
        Tier::new(5, "cold", "STEADY", "Quiet luck. Still counts.", 0),
    )
}

/// Diamond rings around the lucky tile on the larger boards.
pub fn hundred_grid_tiers() -> TierTable {
    TierTable::builtin(
        vec![
            Tier::new(10, "bullseye", "JACKPOT TILE", "Dead centre of the luck.", 5),
            Tier::new(7, "hot", "HOT", "One step from the jackpot.", 4),
            Tier::new(4, "warm", "WARM", "Close enough to feel it.", 4),
        ],
        Tier::new(1, "cold", "COOL", "Ordinary luck today.", 0),
    )
}

/// Rings around the unlucky tile: centre, orthogonal ring, diagonal ring.
pub fn unlucky_tiers() -> TierTable {
    TierTable::builtin(
        vec![
            Tier::new(-5, "cursed", "CURSED TILE", "You found the unlucky tile. Shake it off.", 1),
            Tier::new(-2, "gloomy", "GLOOMY", "Right beside the bad luck.", 2),
            Tier::new(-1, "shady", "SHADY", "A little too close to trouble.", 3),
        ],
        Tier::new(0, "plain", "PLAIN", "Nothing happens.", 0),
    )
}

/// A–Z then 0–9.
pub fn symbols() -> Vec<Candidate> {
    ('A'..='Z').chain('0'..='9').map(|c| Candidate::text(c.to_string())).collect()
}

pub fn moods() -> Vec<Candidate> {
    [
        ("Happy", "😊"),
        ("Meh", "😐"),
        ("Rage", "😡"),
        ("Frustrated", "😤"),
        ("Anxious", "😰"),
        ("Tired", "😴"),
        ("Hopeful", "🤞"),
        ("Confident", "😎"),
        ("Overwhelmed", "🤯"),
        ("Nervous", "😬"),
        ("Excited", "🥳"),
        ("Nauseous", "🤢"),
        ("Playful", "🐱"),
        ("Unsure", "🤔"),
        ("Goofy", "🤪"),
        ("Devilish", "😈"),
        ("Melting", "🫠"),
        ("Heart Eyes", "😍"),
        ("Frazzled", "😵‍💫"),
        ("Shrug", "🤷"),
    ]
    .iter()
    .map(|&(name, symbol)| Candidate::with_detail(symbol, name))
    .collect()
}

/// Look up a lucky-tile board by name.
pub fn grid_variant(name: &str) -> Result<GridVariant, ConfigError> {
    let variant = match name {
        "symbols" => GridVariant {
            name: "symbols",
            cols: 6,
            rows: 6,
            metric: Metric::Chebyshev,
            tiers: symbol_grid_tiers(),
            unlucky: None,
            tiles: symbols(),
        },
        // 20 moods shown twice
        "moods" => GridVariant {
            name: "moods",
            cols: 8,
            rows: 5,
            metric: Metric::Grid,
            tiers: hundred_grid_tiers(),
            unlucky: Some(unlucky_tiers()),
            tiles: moods(),
        },
        "hundred" => GridVariant {
            name: "hundred",
            cols: 10,
            rows: 10,
            metric: Metric::Grid,
            tiers: hundred_grid_tiers(),
            unlucky: Some(unlucky_tiers()),
            tiles: Vec::new(),
        },
        other => return Err(ConfigError::UnknownVariant(other.to_string())),
    };
    Ok(variant)
}
