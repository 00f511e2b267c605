//! Reasoning-budget directives embedded in model names.
//!
//! A model name may carry a `:<budget>` suffix, e.g. `gemini-2.5-flash:4k`.
//! The suffix is only honored for models that accept a configurable thinking
//! budget, and the resulting value is clamped into the range Gemini accepts.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{GemPromptError, Result};

/// Smallest thinking budget Gemini accepts. Zero disables thinking.
pub const MIN_THINKING_BUDGET: u32 = 0;
/// Largest thinking budget Gemini accepts.
pub const MAX_THINKING_BUDGET: u32 = 24_576;
/// Budget substituted when thinking is requested off for a model that can't disable it.
pub const ALWAYS_THINKING_FLOOR: u32 = 1024;
/// Multiplier applied to `k`-suffixed and small bare values.
pub const KILO: u32 = 1024;
/// Bare values below this are read as thousands (`:4` means `:4k`).
pub const IMPLICIT_KILO_THRESHOLD: u32 = 100;

/// Models that accept a configurable thinking budget.
pub const THINKING_ENABLED_MODELS: &[&str] = &[
    "gemini-2.0-flash-thinking",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
    "gemini-2.5-flash-preview-04-17",
];

/// The thinking-enabled model whose reasoning can't be turned off.
pub const ALWAYS_THINKING_MODEL: &str = "gemini-2.5-pro";

static BUDGET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+k?$").expect("valid regex"));

/// Returns true if `model` accepts a `:<budget>` directive.
pub fn supports_thinking_budget(model: &str) -> bool {
    THINKING_ENABLED_MODELS.contains(&model)
}

/// A model name split into its base model and thinking budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirective {
    pub base_model: String,
    /// Thinking tokens to request; 0 means a plain request
    pub thinking_budget: u32,
}

/// Why a directive was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    UnsupportedModel,
    InvalidFormat,
}

impl ModelDirective {
    fn plain(base_model: impl Into<String>) -> Self {
        Self {
            base_model: base_model.into(),
            thinking_budget: 0,
        }
    }

    /// Parse a model name, degrading any unusable directive to a zero budget.
    ///
    /// Never fails. Directives on models outside [`THINKING_ENABLED_MODELS`],
    /// and suffixes that aren't ASCII digits optionally followed by a single
    /// `k`, are logged at warn level and discarded.
    ///
    /// ```
    /// use gemprompt::ModelDirective;
    ///
    /// let directive = ModelDirective::parse("gemini-2.5-flash:4k");
    /// assert_eq!(directive.base_model, "gemini-2.5-flash");
    /// assert_eq!(directive.thinking_budget, 4096);
    ///
    /// let directive = ModelDirective::parse("gemini-1.5-pro:4k");
    /// assert_eq!(directive.thinking_budget, 0);
    /// ```
    pub fn parse(model: &str) -> Self {
        match Self::resolve(model) {
            Ok(directive) => directive,
            Err((directive, _)) => directive,
        }
    }

    /// Parse a model name, returning [`GemPromptError::InvalidDirective`] where
    /// [`ModelDirective::parse`] would have discarded the directive.
    ///
    /// Names without a directive are accepted, as is an empty directive on a
    /// thinking-enabled model. Clamping and the always-thinking floor still
    /// apply, with their warnings.
    pub fn parse_strict(model: &str) -> Result<Self> {
        Self::resolve(model).map_err(|(directive, rejection)| {
            let reason = match rejection {
                Rejection::UnsupportedModel => format!(
                    "model {} does not support a reasoning budget",
                    directive.base_model
                ),
                Rejection::InvalidFormat => format!(
                    "invalid thinking budget in {:?}; expected digits optionally followed by 'k'",
                    model
                ),
            };
            GemPromptError::InvalidDirective(reason)
        })
    }

    /// True if a thinking budget should be sent with the request.
    pub fn has_budget(&self) -> bool {
        self.thinking_budget > 0
    }

    fn resolve(model: &str) -> std::result::Result<Self, (Self, Rejection)> {
        let Some((base_model, suffix)) = model.split_once(':') else {
            return Ok(Self::plain(model));
        };

        if !supports_thinking_budget(base_model) {
            warn!(
                model = base_model,
                "Model does not support a reasoning budget, ignoring thinking suffix"
            );
            return Err((Self::plain(base_model), Rejection::UnsupportedModel));
        }

        if suffix.is_empty() {
            return Ok(Self::plain(base_model));
        }

        if !BUDGET_SUFFIX.is_match(suffix) {
            warn!(suffix, "Invalid thinking budget format, ignoring");
            return Err((Self::plain(base_model), Rejection::InvalidFormat));
        }

        let Some(requested) = interpret_budget(suffix) else {
            warn!(suffix, "Invalid thinking budget format, ignoring");
            return Err((Self::plain(base_model), Rejection::InvalidFormat));
        };

        let mut budget = requested;
        if base_model == ALWAYS_THINKING_MODEL && budget == 0 {
            warn!(
                model = base_model,
                floor = ALWAYS_THINKING_FLOOR,
                "Thinking cannot be turned off for this model, using minimum budget"
            );
            budget = i64::from(ALWAYS_THINKING_FLOOR);
        }

        let budget = clamp_budget(budget);
        info!(
            model = base_model,
            thinking_budget = budget,
            "Using thinking budget"
        );

        Ok(Self {
            base_model: base_model.to_string(),
            thinking_budget: budget,
        })
    }
}

impl From<ModelDirective> for (String, u32) {
    fn from(directive: ModelDirective) -> Self {
        (directive.base_model, directive.thinking_budget)
    }
}

/// Split a model name into `(base_model, thinking_budget)`.
///
/// See [`ModelDirective::parse`] for the rules.
///
/// ```
/// use gemprompt::parse_thinking_suffix;
///
/// assert_eq!(parse_thinking_suffix("gemini-2.5-flash:24k"), ("gemini-2.5-flash".to_string(), 24576));
/// assert_eq!(parse_thinking_suffix("gemini-2.5-pro:0"), ("gemini-2.5-pro".to_string(), 1024));
/// assert_eq!(parse_thinking_suffix("gemini-2.0-flash"), ("gemini-2.0-flash".to_string(), 0));
/// ```
pub fn parse_thinking_suffix(model: &str) -> (String, u32) {
    ModelDirective::parse(model).into()
}

/// Convert a validated suffix into a raw (unclamped) token count.
///
/// Values too large for an `i64` saturate, so they still clamp to the maximum.
/// Returns `None` only if the digits themselves don't parse.
fn interpret_budget(suffix: &str) -> Option<i64> {
    match suffix.strip_suffix('k') {
        Some(digits) => Some(parse_digits(digits)?.saturating_mul(i64::from(KILO))),
        None => {
            let value = parse_digits(suffix)?;
            if value < i64::from(IMPLICIT_KILO_THRESHOLD) {
                Some(value.saturating_mul(i64::from(KILO)))
            } else {
                Some(value)
            }
        }
    }
}

fn parse_digits(digits: &str) -> Option<i64> {
    match digits.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(i64::MAX),
        Err(_) => None,
    }
}

fn clamp_budget(budget: i64) -> u32 {
    if budget < i64::from(MIN_THINKING_BUDGET) {
        warn!(
            thinking_budget = budget,
            min = MIN_THINKING_BUDGET,
            "Thinking budget below minimum, using minimum instead"
        );
        MIN_THINKING_BUDGET
    } else if budget > i64::from(MAX_THINKING_BUDGET) {
        warn!(
            thinking_budget = budget,
            max = MAX_THINKING_BUDGET,
            "Thinking budget above maximum, using maximum instead"
        );
        MAX_THINKING_BUDGET
    } else {
        // In range, so the conversion can't fail.
        u32::try_from(budget).unwrap_or(MAX_THINKING_BUDGET)
    }
}
