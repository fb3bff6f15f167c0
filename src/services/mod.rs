pub mod format_checker;

pub use format_checker::{
    FixedFormatChecker, FormatCheckOutcome, FormatChecker, RandomFormatChecker, DEFAULT_ISSUES,
};
