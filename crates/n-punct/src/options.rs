//! Engine options: the `:set` layer.
//!
//! Parses `:set`-style directives and applies them to [`PunctOptions`].
//!
//! # Supported syntax
//!
//! | Syntax          | Effect                        |
//! |-----------------|-------------------------------|
//! | `option`        | Enable boolean / show numeric |
//! | `nooption`      | Disable boolean               |
//! | `option!`       | Toggle boolean                |
//! | `option?`       | Query current value           |
//! | `option=N`      | Assign numeric value          |
//! | (empty)         | Show changed options          |
//! | `all`           | Show all options              |
//!
//! # Option names
//!
//! | Full name    | Abbrev | Type    | Default |
//! |--------------|--------|---------|---------|
//! | `smartsemi`  | `ss`   | bool    | true    |
//! | `semiwindow` | `sws`  | integer | 4000    |
//! | `autoquote`  | `aq`   | bool    | true    |

use thiserror::Error;

use crate::terminator::DEFAULT_LOOKAHEAD;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a directive could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("not a boolean option: {0}")]
    NotBoolean(String),

    #[error("not a numeric option: {0}")]
    NotNumeric(String),

    #[error("invalid number for {name}: {value:?}")]
    InvalidNumber { name: String, value: String },

    #[error("{0} must be greater than zero")]
    Zero(String),
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// A known option, independent of how it was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    SmartSemi,
    SemiWindow,
    AutoQuote,
}

impl OptionName {
    /// Every option, in display order.
    pub const ALL: [Self; 3] = [Self::SmartSemi, Self::SemiWindow, Self::AutoQuote];

    /// Resolve a full name or abbreviation.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "smartsemi" | "ss" => Some(Self::SmartSemi),
            "semiwindow" | "sws" => Some(Self::SemiWindow),
            "autoquote" | "aq" => Some(Self::AutoQuote),
            _ => None,
        }
    }

    /// Canonical full name.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::SmartSemi => "smartsemi",
            Self::SemiWindow => "semiwindow",
            Self::AutoQuote => "autoquote",
        }
    }

    #[must_use]
    pub const fn is_bool(self) -> bool {
        !matches!(self, Self::SemiWindow)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A parsed `:set` directive. Names are kept as written; they are resolved
/// when the directive is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Query(String),
    Assign(String, String),
    ShowChanged,
    ShowAll,
}

/// Parse a whole directive string. Empty input shows changed options.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // `no` only negates a known name, so a future option spelled `no...`
    // still parses as itself.
    if let Some(name) = arg.strip_prefix("no") {
        if OptionName::lookup(name).is_some() {
            return SetDirective::Off(name.to_string());
        }
    }
    if OptionName::lookup(arg).is_some_and(|o| !o.is_bool()) {
        return SetDirective::Query(arg.to_string());
    }
    SetDirective::On(arg.to_string())
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// PunctOptions
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunctOptions {
    /// Run the terminator placement policy on `;`.
    pub smart_terminator: bool,
    /// Landmark search window, in chars. Never zero.
    pub lookahead: usize,
    /// Pair quotes on insert and delete empty pairs on backspace.
    pub auto_quotes: bool,
}

impl Default for PunctOptions {
    fn default() -> Self {
        Self {
            smart_terminator: true,
            lookahead: DEFAULT_LOOKAHEAD,
            auto_quotes: true,
        }
    }
}

impl PunctOptions {
    /// Apply every directive in `args`, stopping at the first error.
    /// Returns the lines any queries produced.
    ///
    /// # Errors
    ///
    /// The first [`OptionError`] encountered. Directives before it stay
    /// applied.
    pub fn apply_str(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut out = Vec::new();
        for directive in parse_set(args) {
            if let Some(line) = self.apply(&directive)? {
                out.push(line);
            }
        }
        Ok(out)
    }

    /// Apply one directive. Queries return the text to show.
    ///
    /// # Errors
    ///
    /// Unknown names, boolean operations on numeric options (and the reverse),
    /// unparsable numbers, and a zero window.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => Ok(Some(self.display(resolve(name)?))),
            SetDirective::Assign(name, value) => self.assign(name, value).map(|()| None),
            SetDirective::ShowChanged => Ok(Some(self.show(true))),
            SetDirective::ShowAll => Ok(Some(self.show(false))),
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        let slot = match resolve(name)? {
            OptionName::SmartSemi => &mut self.smart_terminator,
            OptionName::AutoQuote => &mut self.auto_quotes,
            OptionName::SemiWindow => return Err(OptionError::NotBoolean(name.to_string())),
        };
        *slot = f(*slot);
        Ok(())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let option = resolve(name)?;
        if option.is_bool() {
            return Err(OptionError::NotNumeric(name.to_string()));
        }
        let n: usize = value.parse().map_err(|_| OptionError::InvalidNumber {
            name: name.to_string(),
            value: value.to_string(),
        })?;
        if n == 0 {
            return Err(OptionError::Zero(option.full_name().to_string()));
        }
        self.lookahead = n;
        Ok(())
    }

    /// One option rendered the way `:set` shows it.
    #[must_use]
    pub fn display(&self, option: OptionName) -> String {
        let name = option.full_name();
        match option {
            OptionName::SmartSemi => format_bool(name, self.smart_terminator),
            OptionName::AutoQuote => format_bool(name, self.auto_quotes),
            OptionName::SemiWindow => format!("{name}={}", self.lookahead),
        }
    }

    fn show(&self, changed_only: bool) -> String {
        let defaults = Self::default();
        OptionName::ALL
            .iter()
            .filter(|&&o| !changed_only || self.display(o) != defaults.display(o))
            .map(|&o| self.display(o))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn resolve(name: &str) -> Result<OptionName, OptionError> {
    OptionName::lookup(name).ok_or_else(|| OptionError::Unknown(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- parse_set_arg ------------------------------------------------------

    #[test]
    fn parse_boolean_forms() {
        assert_eq!(parse_set_arg("smartsemi"), SetDirective::On("smartsemi".into()));
        assert_eq!(parse_set_arg("noss"), SetDirective::Off("ss".into()));
        assert_eq!(parse_set_arg("aq!"), SetDirective::Toggle("aq".into()));
        assert_eq!(parse_set_arg("aq?"), SetDirective::Query("aq".into()));
    }

    #[test]
    fn parse_numeric_forms() {
        assert_eq!(
            parse_set_arg("semiwindow=200"),
            SetDirective::Assign("semiwindow".into(), "200".into())
        );
        // Bare numeric name is a query.
        assert_eq!(parse_set_arg("sws"), SetDirective::Query("sws".into()));
    }

    #[test]
    fn parse_no_prefix_only_for_known_names() {
        assert_eq!(parse_set_arg("nofoo"), SetDirective::On("nofoo".into()));
        assert_eq!(parse_set_arg("nosws"), SetDirective::Off("sws".into()));
    }

    #[test]
    fn parse_multiple_and_empty() {
        assert_eq!(
            parse_set("noss  sws=10"),
            vec![
                SetDirective::Off("ss".into()),
                SetDirective::Assign("sws".into(), "10".into()),
            ]
        );
        assert_eq!(parse_set("   "), vec![SetDirective::ShowChanged]);
        assert_eq!(parse_set("all"), vec![SetDirective::ShowAll]);
    }

    // -- apply --------------------------------------------------------------

    #[test]
    fn defaults() {
        let opts = PunctOptions::default();
        assert!(opts.smart_terminator);
        assert!(opts.auto_quotes);
        assert_eq!(opts.lookahead, 4000);
    }

    #[test]
    fn apply_booleans() {
        let mut opts = PunctOptions::default();
        opts.apply_str("nosmartsemi aq!").unwrap();
        assert!(!opts.smart_terminator);
        assert!(!opts.auto_quotes);
        opts.apply_str("ss autoquote!").unwrap();
        assert!(opts.smart_terminator);
        assert!(opts.auto_quotes);
    }

    #[test]
    fn apply_window() {
        let mut opts = PunctOptions::default();
        opts.apply_str("semiwindow=120").unwrap();
        assert_eq!(opts.lookahead, 120);
    }

    #[test]
    fn queries_return_text() {
        let mut opts = PunctOptions::default();
        assert_eq!(opts.apply_str("ss? sws").unwrap(), vec!["smartsemi", "semiwindow=4000"]);
        opts.apply_str("noaq").unwrap();
        assert_eq!(opts.apply_str("aq?").unwrap(), vec!["noautoquote"]);
    }

    #[test]
    fn show_changed_and_all() {
        let mut opts = PunctOptions::default();
        assert_eq!(opts.apply_str("").unwrap(), vec![""]);
        opts.apply_str("sws=9").unwrap();
        assert_eq!(opts.apply_str("").unwrap(), vec!["semiwindow=9"]);
        assert_eq!(
            opts.apply_str("all").unwrap(),
            vec!["smartsemi  semiwindow=9  autoquote"]
        );
    }

    // -- Errors -------------------------------------------------------------

    #[test]
    fn unknown_option() {
        let mut opts = PunctOptions::default();
        assert_eq!(
            opts.apply_str("shiftwidth=2"),
            Err(OptionError::Unknown("shiftwidth".into()))
        );
        assert_eq!(opts.apply_str("bogus"), Err(OptionError::Unknown("bogus".into())));
    }

    #[test]
    fn type_mismatches() {
        let mut opts = PunctOptions::default();
        assert_eq!(opts.apply_str("nosws"), Err(OptionError::NotBoolean("sws".into())));
        assert_eq!(opts.apply_str("sws!"), Err(OptionError::NotBoolean("sws".into())));
        assert_eq!(opts.apply_str("ss=1"), Err(OptionError::NotNumeric("ss".into())));
    }

    #[test]
    fn bad_numbers() {
        let mut opts = PunctOptions::default();
        assert_eq!(
            opts.apply_str("sws=lots"),
            Err(OptionError::InvalidNumber {
                name: "sws".into(),
                value: "lots".into()
            })
        );
        assert_eq!(opts.apply_str("sws=0"), Err(OptionError::Zero("semiwindow".into())));
        assert_eq!(opts.lookahead, 4000);
    }

    #[test]
    fn earlier_directives_stay_applied() {
        let mut opts = PunctOptions::default();
        assert!(opts.apply_str("noaq bogus noss").is_err());
        assert!(!opts.auto_quotes);
        assert!(opts.smart_terminator);
    }

    #[test]
    fn error_messages() {
        assert_eq!(OptionError::Unknown("x".into()).to_string(), "unknown option: x");
        assert_eq!(
            OptionError::Zero("semiwindow".into()).to_string(),
            "semiwindow must be greater than zero"
        );
    }
}
